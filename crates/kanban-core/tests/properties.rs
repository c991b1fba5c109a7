//! Property tests for the filter pipeline and board projection.

use std::collections::HashSet;

use kanban_core::{Board, Priority, Status, Task, TaskFilters, filter_tasks};
use proptest::prelude::*;

fn status_strategy() -> impl Strategy<Value = Vec<Status>> {
    proptest::sample::subsequence((0..8).collect::<Vec<usize>>(), 0..=8).prop_flat_map(|picked| {
        let len = picked.len();
        (Just(picked), proptest::collection::vec(-5i32..5, len)).prop_map(|(picked, orders)| {
            picked
                .into_iter()
                .zip(orders)
                .map(|(n, order)| Status {
                    id: format!("s{n}"),
                    name: format!("Column {n}"),
                    order,
                    ..Default::default()
                })
                .collect()
        })
    })
}

fn priority_strategy() -> impl Strategy<Value = Option<Priority>> {
    prop_oneof![
        Just(None),
        Just(Some(Priority::Urgent)),
        Just(Some(Priority::High)),
        Just(Some(Priority::Medium)),
        Just(Some(Priority::Low)),
    ]
}

fn task_strategy() -> impl Strategy<Value = Vec<Task>> {
    proptest::collection::vec(
        (
            proptest::option::of(0usize..10),
            priority_strategy(),
            "[a-c]{0,3}",
        ),
        0..40,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(index, (status, priority, title))| Task {
                id: format!("t{index}"),
                title,
                task_status_id: status.map(|n| format!("s{n}")),
                priority,
                ..Default::default()
            })
            .collect()
    })
}

fn filter_strategy() -> impl Strategy<Value = TaskFilters> {
    ("[a-c]{0,2}", proptest::collection::hash_set(priority_strategy(), 0..3)).prop_map(
        |(search_text, priorities)| TaskFilters {
            search_text,
            priorities: priorities.into_iter().flatten().collect(),
            ..Default::default()
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn projection_covers_each_known_task_once(
        statuses in status_strategy(),
        tasks in task_strategy(),
    ) {
        let refs: Vec<&Task> = tasks.iter().collect();
        let board = Board::project(&statuses, &refs);

        let known: HashSet<&str> = statuses.iter().map(|s| s.id.as_str()).collect();
        let mut expected: Vec<&str> = tasks
            .iter()
            .filter(|t| t.task_status_id.as_deref().is_some_and(|id| known.contains(id)))
            .map(|t| t.id.as_str())
            .collect();
        let mut placed: Vec<&str> = board
            .columns()
            .iter()
            .flat_map(|c| c.tasks.iter().map(|t| t.id.as_str()))
            .collect();

        expected.sort_unstable();
        placed.sort_unstable();
        prop_assert_eq!(placed, expected);
        prop_assert_eq!(board.columns().len(), statuses.len());
    }

    #[test]
    fn projection_keeps_filter_order(
        statuses in status_strategy(),
        tasks in task_strategy(),
        filters in filter_strategy(),
    ) {
        let filtered = filter_tasks(&tasks, &filters);
        let board = Board::project(&statuses, &filtered);

        for column in board.columns() {
            let expected: Vec<&str> = filtered
                .iter()
                .filter(|t| t.task_status_id.as_deref() == Some(column.status.id.as_str()))
                .map(|t| t.id.as_str())
                .collect();
            let actual: Vec<&str> = column.tasks.iter().map(|t| t.id.as_str()).collect();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn filter_output_is_ordered_subset(
        tasks in task_strategy(),
        filters in filter_strategy(),
    ) {
        let filtered = filter_tasks(&tasks, &filters);
        let positions: Vec<usize> = filtered
            .iter()
            .map(|t| tasks.iter().position(|x| x.id == t.id).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(filtered.iter().all(|t| filters.matches(t)));
        prop_assert_eq!(
            filtered.len(),
            tasks.iter().filter(|t| filters.matches(t)).count()
        );
    }

    #[test]
    fn projection_is_idempotent(
        statuses in status_strategy(),
        tasks in task_strategy(),
        filters in filter_strategy(),
    ) {
        let filtered = filter_tasks(&tasks, &filters);
        let first = Board::project(&statuses, &filtered);
        let second = Board::project(&statuses, &filtered);
        prop_assert_eq!(first, second);
    }
}
