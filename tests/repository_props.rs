//! Property tests for the task transforms and the completed-only view.

use proptest::prelude::*;
use todos::model::Task;
use todos::repository::{
    add_tag, append_task, assign_user, delete_task, remove_tag, toggle_completion, Revision,
};
use todos::seed::SeedProvider;
use todos::storage::MemoryStore;
use todos::view::{visible_tasks, ViewFilter};
use todos::TaskRepository;

const TAG_POOL: [&str; 4] = ["g0", "g1", "g2", "g3"];
const USER_POOL: [&str; 3] = ["u0", "u1", "u2"];

fn arb_tag_id() -> impl Strategy<Value = String> {
    prop::sample::select(TAG_POOL.to_vec()).prop_map(str::to_string)
}

fn arb_user_id() -> impl Strategy<Value = String> {
    prop::sample::select(USER_POOL.to_vec()).prop_map(str::to_string)
}

/// Tasks with distinct ids `t0..tN`.
fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(
        (
            "[a-z ]{0,12}",
            any::<bool>(),
            prop::collection::vec(arb_tag_id(), 0..4),
            arb_user_id(),
        ),
        0..8,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(index, (title, completed, tags, user))| Task {
                id: format!("t{index}"),
                title,
                completed,
                tags,
                assigned_user_id: user,
            })
            .collect()
    })
}

/// Tasks plus the id of one of them; empty collections are skipped.
fn arb_tasks_with_target() -> impl Strategy<Value = (Vec<Task>, String)> {
    arb_tasks()
        .prop_filter("need at least one task", |tasks| !tasks.is_empty())
        .prop_flat_map(|tasks| {
            let len = tasks.len();
            (Just(tasks), 0..len)
        })
        .prop_map(|(tasks, index)| {
            let id = tasks[index].id.clone();
            (tasks, id)
        })
}

proptest! {
    #[test]
    fn unknown_task_id_is_a_no_op(
        tasks in arb_tasks(),
        tag in arb_tag_id(),
        user in arb_user_id(),
    ) {
        let missing = "missing";
        prop_assert_eq!(&toggle_completion(&tasks, missing), &tasks);
        prop_assert_eq!(&delete_task(&tasks, missing), &tasks);
        prop_assert_eq!(&add_tag(&tasks, missing, &tag), &tasks);
        prop_assert_eq!(&remove_tag(&tasks, missing, &tag), &tasks);
        prop_assert_eq!(&assign_user(&tasks, missing, &user), &tasks);
    }

    #[test]
    fn toggle_twice_restores_tasks((tasks, id) in arb_tasks_with_target()) {
        let once = toggle_completion(&tasks, &id);
        prop_assert_eq!(once.len(), tasks.len());
        for (before, after) in tasks.iter().zip(&once) {
            if before.id == id {
                prop_assert_eq!(after.completed, !before.completed);
            } else {
                prop_assert_eq!(after, before);
            }
        }
        prop_assert_eq!(toggle_completion(&once, &id), tasks);
    }

    #[test]
    fn delete_removes_exactly_one((tasks, id) in arb_tasks_with_target()) {
        let next = delete_task(&tasks, &id);
        prop_assert_eq!(next.len(), tasks.len() - 1);
        prop_assert!(next.iter().all(|task| task.id != id));
        let expected: Vec<Task> = tasks.iter().filter(|t| t.id != id).cloned().collect();
        prop_assert_eq!(&next, &expected);
        prop_assert_eq!(delete_task(&next, &id), next);
    }

    #[test]
    fn add_tag_appends_even_when_present(
        (tasks, id) in arb_tasks_with_target(),
        tag in arb_tag_id(),
    ) {
        let next = add_tag(&tasks, &id, &tag);
        let before = tasks.iter().find(|t| t.id == id).map(|t| t.tags.clone()).unwrap_or_default();
        let after = next.iter().find(|t| t.id == id).map(|t| t.tags.clone()).unwrap_or_default();
        prop_assert_eq!(after.len(), before.len() + 1);
        prop_assert_eq!(after.last(), Some(&tag));
        prop_assert_eq!(&after[..before.len()], &before[..]);
    }

    #[test]
    fn remove_tag_drops_every_occurrence(
        (tasks, id) in arb_tasks_with_target(),
        tag in arb_tag_id(),
        repeats in 1usize..3,
    ) {
        let mut tagged = tasks.clone();
        for _ in 0..repeats {
            tagged = add_tag(&tagged, &id, &tag);
        }
        let next = remove_tag(&tagged, &id, &tag);
        let target = next.iter().find(|t| t.id == id);
        prop_assert!(target.is_some_and(|t| !t.has_tag(&tag)));

        let original = tasks.iter().find(|t| t.id == id);
        let expected: Vec<String> = original
            .map(|t| t.tags.iter().filter(|g| **g != tag).cloned().collect())
            .unwrap_or_default();
        prop_assert_eq!(target.map(|t| t.tags.clone()), Some(expected));
    }

    #[test]
    fn assign_only_touches_target(
        (tasks, id) in arb_tasks_with_target(),
        user in arb_user_id(),
    ) {
        let next = assign_user(&tasks, &id, &user);
        for (before, after) in tasks.iter().zip(&next) {
            if before.id == id {
                prop_assert_eq!(&after.assigned_user_id, &user);
                prop_assert_eq!(&after.tags, &before.tags);
                prop_assert_eq!(after.completed, before.completed);
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }

    #[test]
    fn append_keeps_existing_order(tasks in arb_tasks(), title in "[a-z]{0,8}") {
        let task = Task::new(title, "u0");
        let next = append_task(&tasks, task.clone());
        prop_assert_eq!(&next[..tasks.len()], &tasks[..]);
        prop_assert_eq!(next.last(), Some(&task));
    }

    #[test]
    fn completed_view_is_ordered_subsequence(tasks in arb_tasks()) {
        let visible = visible_tasks(&tasks, true);
        let expected: Vec<Task> = tasks.iter().filter(|t| t.completed).cloned().collect();
        prop_assert_eq!(visible.as_ref(), expected.as_slice());
        let unfiltered = visible_tasks(&tasks, false);
        prop_assert_eq!(unfiltered.as_ref(), tasks.as_slice());

        let mut filter = ViewFilter::new();
        let memoized: Vec<Task> = filter
            .visible(&tasks, &Revision::new(), true)
            .into_iter()
            .cloned()
            .collect();
        prop_assert_eq!(memoized, expected);
    }

    #[test]
    fn created_tasks_start_open_and_unassigned(titles in prop::collection::vec("[a-zA-Z ]{0,10}", 1..5)) {
        let mut repo = TaskRepository::load(MemoryStore::new(), &SeedProvider::new())
            .expect("load repository");
        let seeded = repo.tasks().len();
        let unassigned = repo.unassigned().id.clone();

        for title in &titles {
            let task = repo.create_task(title).expect("create task");
            prop_assert_eq!(&task.title, title);
            prop_assert!(!task.completed);
            prop_assert!(task.tags.is_empty());
            prop_assert_eq!(&task.assigned_user_id, &unassigned);
            prop_assert_eq!(repo.tasks().last(), Some(&task));
        }
        prop_assert_eq!(repo.tasks().len(), seeded + titles.len());
        prop_assert_eq!(repo.revision(), titles.len() as u64);
    }
}
