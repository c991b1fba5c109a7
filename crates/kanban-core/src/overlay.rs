//! Optimistic column patches layered over the authoritative status registry.
//!
//! Every write stamps the touched fields with a fresh generation. When the
//! remote call for a write resolves, only fields still carrying that
//! generation are committed or discarded; anything overwritten in the
//! meantime belongs to a newer gesture and is left alone.

use std::collections::HashMap;

use crate::model::{Status, StatusPatch};

/// A patched value and the write that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending<T> {
    pub value: T,
    pub generation: u64,
}

/// Pending fields for one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchEntry {
    pub is_collapsed: Option<Pending<bool>>,
    pub order: Option<Pending<i32>>,
}

impl PatchEntry {
    const fn is_empty(&self) -> bool {
        self.is_collapsed.is_none() && self.order.is_none()
    }

    /// Current patched values without generations.
    #[must_use]
    pub fn values(&self) -> StatusPatch {
        StatusPatch {
            is_collapsed: self.is_collapsed.map(|p| p.value),
            order: self.order.map(|p| p.value),
        }
    }
}

/// Identifies one optimistic write so its remote outcome can be matched back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchTicket {
    pub status_id: String,
    pub patch: StatusPatch,
    pub generation: u64,
}

/// What resolving a ticket did to local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Values merged into the registry and the patch cleared.
    Committed,
    /// Patch discarded; the registry value shows again.
    RolledBack,
    /// A newer write owns every field; nothing changed.
    Superseded,
}

/// Per-column overlay of pending optimistic values.
#[derive(Debug, Default)]
pub struct PatchOverlay {
    entries: HashMap<String, PatchEntry>,
    next_generation: u64,
}

impl PatchOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the patched fields for a column. Fields not set in `patch`
    /// keep whatever is pending for them.
    pub fn write(&mut self, status_id: &str, patch: StatusPatch) -> PatchTicket {
        self.next_generation += 1;
        let generation = self.next_generation;
        let entry = self.entries.entry(status_id.to_string()).or_default();

        if let Some(value) = patch.is_collapsed {
            entry.is_collapsed = Some(Pending { value, generation });
        }
        if let Some(value) = patch.order {
            entry.order = Some(Pending { value, generation });
        }
        if entry.is_empty() {
            self.entries.remove(status_id);
        }

        tracing::debug!(status_id, generation, ?patch, "optimistic patch written");

        PatchTicket {
            status_id: status_id.to_string(),
            patch,
            generation,
        }
    }

    /// Settle a write once its remote call has finished.
    ///
    /// `applied` commits the ticket's still-current fields into `registry`;
    /// otherwise they are dropped. Stale fields are ignored either way.
    pub fn resolve(
        &mut self,
        ticket: &PatchTicket,
        applied: bool,
        registry: &mut [Status],
    ) -> Resolution {
        let Some(entry) = self.entries.get_mut(&ticket.status_id) else {
            return Resolution::Superseded;
        };

        let mut settled = StatusPatch::default();
        if ticket.patch.is_collapsed.is_some()
            && entry
                .is_collapsed
                .is_some_and(|p| p.generation == ticket.generation)
        {
            settled.is_collapsed = entry.is_collapsed.take().map(|p| p.value);
        }
        if ticket.patch.order.is_some()
            && entry.order.is_some_and(|p| p.generation == ticket.generation)
        {
            settled.order = entry.order.take().map(|p| p.value);
        }
        if entry.is_empty() {
            self.entries.remove(&ticket.status_id);
        }

        if settled.is_empty() {
            return Resolution::Superseded;
        }
        if !applied {
            return Resolution::RolledBack;
        }

        if let Some(status) = registry.iter_mut().find(|s| s.id == ticket.status_id) {
            settled.apply_to(status);
        } else {
            tracing::debug!(
                status_id = %ticket.status_id,
                "committed patch for a column no longer in the registry"
            );
        }
        Resolution::Committed
    }

    #[must_use]
    pub fn get(&self, status_id: &str) -> Option<&PatchEntry> {
        self.entries.get(status_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Merge the overlay onto the registry and sort into display order.
///
/// Columns are ordered by `order`; equal orders keep registry position.
#[must_use]
pub fn effective_columns(registry: &[Status], overlay: &PatchOverlay) -> Vec<Status> {
    let mut columns: Vec<Status> = registry
        .iter()
        .map(|status| {
            let mut status = status.clone();
            if let Some(entry) = overlay.get(&status.id) {
                entry.values().apply_to(&mut status);
            }
            status
        })
        .collect();
    columns.sort_by_key(|s| s.order);
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Vec<Status> {
        vec![
            Status {
                id: "s1".to_string(),
                name: "Todo".to_string(),
                order: 0,
                ..Default::default()
            },
            Status {
                id: "s2".to_string(),
                name: "Done".to_string(),
                order: 1,
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_write_is_visible_in_effective_columns() {
        let registry = registry();
        let mut overlay = PatchOverlay::new();
        overlay.write("s1", StatusPatch::collapsed(true));

        let columns = effective_columns(&registry, &overlay);
        assert!(columns[0].is_collapsed);
        assert!(!registry[0].is_collapsed);
    }

    #[test]
    fn test_order_patch_resorts_columns() {
        let registry = registry();
        let mut overlay = PatchOverlay::new();
        overlay.write("s1", StatusPatch::order(5));

        let names: Vec<String> = effective_columns(&registry, &overlay)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Done", "Todo"]);
    }

    #[test]
    fn test_commit_merges_into_registry() {
        let mut registry = registry();
        let mut overlay = PatchOverlay::new();
        let ticket = overlay.write("s2", StatusPatch::collapsed(true));

        let resolution = overlay.resolve(&ticket, true, &mut registry);
        assert_eq!(resolution, Resolution::Committed);
        assert!(registry[1].is_collapsed);
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_failure_discards_without_touching_registry() {
        let mut registry = registry();
        let mut overlay = PatchOverlay::new();
        let ticket = overlay.write("s2", StatusPatch::order(9));

        let resolution = overlay.resolve(&ticket, false, &mut registry);
        assert_eq!(resolution, Resolution::RolledBack);
        assert_eq!(registry[1].order, 1);
        assert_eq!(effective_columns(&registry, &overlay)[1].order, 1);
    }

    #[test]
    fn test_stale_ticket_is_superseded() {
        let mut registry = registry();
        let mut overlay = PatchOverlay::new();
        let first = overlay.write("s1", StatusPatch::order(2));
        let second = overlay.write("s1", StatusPatch::order(5));

        assert_eq!(
            overlay.resolve(&second, true, &mut registry),
            Resolution::Committed
        );
        assert_eq!(
            overlay.resolve(&first, true, &mut registry),
            Resolution::Superseded
        );
        assert_eq!(registry[0].order, 5);
    }

    #[test]
    fn test_stale_failure_does_not_drop_newer_patch() {
        let mut registry = registry();
        let mut overlay = PatchOverlay::new();
        let first = overlay.write("s1", StatusPatch::order(2));
        overlay.write("s1", StatusPatch::order(5));

        assert_eq!(
            overlay.resolve(&first, false, &mut registry),
            Resolution::Superseded
        );
        assert_eq!(overlay.get("s1").unwrap().values().order, Some(5));
    }

    #[test]
    fn test_fields_are_tracked_independently() {
        let mut registry = registry();
        let mut overlay = PatchOverlay::new();
        let collapse = overlay.write("s1", StatusPatch::collapsed(true));
        let reorder = overlay.write("s1", StatusPatch::order(3));

        assert_eq!(
            overlay.resolve(&collapse, true, &mut registry),
            Resolution::Committed
        );
        assert!(registry[0].is_collapsed);
        assert_eq!(overlay.get("s1").unwrap().values(), StatusPatch::order(3));

        assert_eq!(
            overlay.resolve(&reorder, false, &mut registry),
            Resolution::RolledBack
        );
        assert!(overlay.is_empty());
        assert_eq!(registry[0].order, 0);
    }
}
