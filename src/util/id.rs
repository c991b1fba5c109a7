//! ID generation for tasks created from the command line.
//!
//! IDs look like `kb-3f9a`: a prefix and a base36 slice of a SHA-256 over
//! the team, title, creation time and a nonce. The slice grows with the
//! number of existing tasks to keep collisions unlikely.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

pub const DEFAULT_PREFIX: &str = "kb";

const MIN_HASH_LENGTH: usize = 4;
const MAX_HASH_LENGTH: usize = 10;
const MAX_COLLISION_PROB: f64 = 0.1;
const NONCES_PER_LENGTH: u32 = 10;

/// Generates unique task IDs for one team.
#[derive(Debug, Clone)]
pub struct TaskIdGenerator {
    prefix: String,
    team: String,
}

impl TaskIdGenerator {
    #[must_use]
    pub fn new(prefix: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            team: team.into(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Shortest hash length whose birthday-bound collision chance stays
    /// under the limit for `task_count` existing tasks.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn hash_length(task_count: usize) -> usize {
        let n = task_count as f64;
        (MIN_HASH_LENGTH..=MAX_HASH_LENGTH)
            .find(|&len| {
                let space = 36_f64.powi(len as i32);
                1.0 - (-n * n / (2.0 * space)).exp() < MAX_COLLISION_PROB
            })
            .unwrap_or(MAX_HASH_LENGTH)
    }

    /// Generate an ID that `exists` reports as free.
    pub fn generate(
        &self,
        title: &str,
        created_at: DateTime<Utc>,
        task_count: usize,
        exists: impl Fn(&str) -> bool,
    ) -> String {
        let mut length = Self::hash_length(task_count);
        let mut nonce = 0;
        loop {
            for _ in 0..NONCES_PER_LENGTH {
                let seed = self.seed(title, created_at, nonce);
                let id = format!("{}-{}", self.prefix, hash_base36(&seed, length));
                if !exists(&id) {
                    return id;
                }
                nonce += 1;
            }
            if length == MAX_HASH_LENGTH {
                let seed = self.seed(title, created_at, nonce);
                return format!("{}-{}", self.prefix, hash_base36(&seed, 13));
            }
            length += 1;
        }
    }

    fn seed(&self, title: &str, created_at: DateTime<Utc>, nonce: u32) -> String {
        format!(
            "{}|{}|{}|{}",
            self.team,
            title,
            created_at.timestamp_nanos_opt().unwrap_or(0),
            nonce
        )
    }
}

/// Base36 of the first eight digest bytes, cut or zero-padded to `length`.
#[must_use]
pub fn hash_base36(input: &str, length: usize) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let num = digest
        .iter()
        .take(8)
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte));

    let encoded = base36_encode(num);
    format!("{encoded:0>length$}").chars().take(length).collect()
}

fn base36_encode(mut num: u64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if num == 0 {
        return "0".to_string();
    }
    let mut chars = Vec::new();
    while num > 0 {
        chars.push(char::from(ALPHABET[(num % 36) as usize]));
        num /= 36;
    }
    chars.into_iter().rev().collect()
}
