//! Task repository: the in-memory collections and their persistence.
//!
//! Every mutation rebuilds the task collection through one of the pure
//! transforms below, swaps it in, and writes it to the store before
//! returning. Transforms keyed on an unknown task id return the collection
//! unchanged.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::Result;
use crate::model::{new_id, Tag, Task, User};
use crate::seed::SeedProvider;
use crate::storage::{
    read_collection, write_collection, KeyValueStore, TAGS_KEY, TODOS_KEY, USERS_KEY,
};

/// Apply `f` to the task with `task_id`, passing every other task through.
fn map_task(tasks: &[Task], task_id: &str, f: impl Fn(&Task) -> Task) -> Vec<Task> {
    tasks
        .iter()
        .map(|task| if task.id == task_id { f(task) } else { task.clone() })
        .collect()
}

pub fn toggle_completion(tasks: &[Task], task_id: &str) -> Vec<Task> {
    map_task(tasks, task_id, |task| Task {
        completed: !task.completed,
        ..task.clone()
    })
}

pub fn delete_task(tasks: &[Task], task_id: &str) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.id != task_id)
        .cloned()
        .collect()
}

pub fn append_task(tasks: &[Task], task: Task) -> Vec<Task> {
    let mut next = tasks.to_vec();
    next.push(task);
    next
}

/// Appends without a membership check, so a tag can be attached twice.
pub fn add_tag(tasks: &[Task], task_id: &str, tag_id: &str) -> Vec<Task> {
    map_task(tasks, task_id, |task| {
        let mut tags = task.tags.clone();
        tags.push(tag_id.to_string());
        Task {
            tags,
            ..task.clone()
        }
    })
}

/// Removes every occurrence of `tag_id`; tasks without it are left as is.
pub fn remove_tag(tasks: &[Task], task_id: &str, tag_id: &str) -> Vec<Task> {
    map_task(tasks, task_id, |task| {
        if !task.has_tag(tag_id) {
            return task.clone();
        }
        Task {
            tags: task.tags.iter().filter(|t| *t != tag_id).cloned().collect(),
            ..task.clone()
        }
    })
}

pub fn assign_user(tasks: &[Task], task_id: &str, user_id: &str) -> Vec<Task> {
    map_task(tasks, task_id, |task| Task {
        assigned_user_id: user_id.to_string(),
        ..task.clone()
    })
}

/// A task that references a user or tag id missing from the collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingTask {
    pub task_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unknown_user: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_tags: Vec<String>,
}

/// Identifies one state of a repository's task collection.
///
/// The epoch is fresh for every loaded repository, so two repositories at
/// the same counter still compare unequal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    epoch: String,
    counter: u64,
}

impl Revision {
    pub fn new() -> Self {
        Self {
            epoch: new_id(),
            counter: 0,
        }
    }

    /// Number of changes since the epoch started
    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn bump(&mut self) {
        self.counter += 1;
    }
}

impl Default for Revision {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the task, tag, and user collections and the store they mirror to.
#[derive(Debug)]
pub struct TaskRepository<S: KeyValueStore> {
    store: S,
    tasks: Vec<Task>,
    tags: Vec<Tag>,
    users: Vec<User>,
    unassigned: User,
    revision: Revision,
}

impl<S: KeyValueStore> TaskRepository<S> {
    /// Load all collections from `store`, seeding (and persisting) any key
    /// that has no value yet.
    pub fn load(mut store: S, seeds: &SeedProvider) -> Result<Self> {
        let mut users = match read_collection::<User>(&store, USERS_KEY)? {
            Some(users) => users,
            None => {
                let users = seeds.seed_users();
                write_collection(&mut store, USERS_KEY, &users)?;
                tracing::debug!(count = users.len(), "seeded users");
                users
            }
        };

        let unassigned = match users.iter().find(|user| user.is_unassigned()) {
            Some(user) => user.clone(),
            None => {
                let user = seeds.unassigned();
                tracing::warn!(id = %user.id, "stored users lack the Unassigned user; restoring it");
                users.push(user.clone());
                write_collection(&mut store, USERS_KEY, &users)?;
                user
            }
        };

        let tags = match read_collection::<Tag>(&store, TAGS_KEY)? {
            Some(tags) => tags,
            None => {
                let tags = seeds.seed_tags();
                write_collection(&mut store, TAGS_KEY, &tags)?;
                tracing::debug!(count = tags.len(), "seeded tags");
                tags
            }
        };

        let tasks = match read_collection::<Task>(&store, TODOS_KEY)? {
            Some(tasks) => tasks,
            None => {
                // Stored users may predate this seed provider
                let tasks: Vec<Task> = seeds
                    .seed_tasks()
                    .into_iter()
                    .map(|task| Task {
                        assigned_user_id: unassigned.id.clone(),
                        ..task
                    })
                    .collect();
                write_collection(&mut store, TODOS_KEY, &tasks)?;
                tracing::debug!(count = tasks.len(), "seeded tasks");
                tasks
            }
        };

        Ok(Self {
            store,
            tasks,
            tags,
            users,
            unassigned,
            revision: Revision::new(),
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// The user new tasks are assigned to
    pub fn unassigned(&self) -> &User {
        &self.unassigned
    }

    /// Bumped whenever the task collection changes
    /// Changes applied since load
    pub fn revision(&self) -> u64 {
        self.revision.counter()
    }

    /// Change key for [`crate::view::ViewFilter`]
    pub fn revision_key(&self) -> &Revision {
        &self.revision
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn tag_by_id(&self, tag_id: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id == tag_id)
    }

    pub fn user_by_id(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == user_id)
    }

    pub fn toggle_completion(&mut self, task_id: &str) -> Result<()> {
        tracing::debug!(task_id, "toggle completion");
        let next = toggle_completion(&self.tasks, task_id);
        self.commit(next)
    }

    pub fn delete_task(&mut self, task_id: &str) -> Result<()> {
        tracing::debug!(task_id, "delete task");
        let next = delete_task(&self.tasks, task_id);
        self.commit(next)
    }

    /// Append a new open, untagged task assigned to the Unassigned user.
    ///
    /// The title is stored as given; an empty title is accepted.
    pub fn create_task(&mut self, title: &str) -> Result<Task> {
        let task = Task::new(title, self.unassigned.id.clone());
        tracing::debug!(task_id = %task.id, "create task");
        let next = append_task(&self.tasks, task.clone());
        self.commit(next)?;
        Ok(task)
    }

    pub fn add_tag(&mut self, task_id: &str, tag_id: &str) -> Result<()> {
        tracing::debug!(task_id, tag_id, "add tag");
        let next = add_tag(&self.tasks, task_id, tag_id);
        self.commit(next)
    }

    pub fn remove_tag(&mut self, task_id: &str, tag_id: &str) -> Result<()> {
        tracing::debug!(task_id, tag_id, "remove tag");
        let next = remove_tag(&self.tasks, task_id, tag_id);
        self.commit(next)
    }

    /// Does not check that `user_id` names an existing user.
    pub fn assign_user(&mut self, task_id: &str, user_id: &str) -> Result<()> {
        tracing::debug!(task_id, user_id, "assign user");
        let next = assign_user(&self.tasks, task_id, user_id);
        self.commit(next)
    }

    /// Tasks whose assignee or tags are not in the user/tag collections.
    pub fn dangling_references(&self) -> Vec<DanglingTask> {
        let user_ids: HashSet<&str> = self.users.iter().map(|u| u.id.as_str()).collect();
        let tag_ids: HashSet<&str> = self.tags.iter().map(|t| t.id.as_str()).collect();

        self.tasks
            .iter()
            .filter_map(|task| {
                let unknown_user = (!user_ids.contains(task.assigned_user_id.as_str()))
                    .then(|| task.assigned_user_id.clone());
                let mut seen = HashSet::new();
                let unknown_tags: Vec<String> = task
                    .tags
                    .iter()
                    .filter(|tag| !tag_ids.contains(tag.as_str()) && seen.insert(tag.as_str()))
                    .cloned()
                    .collect();
                if unknown_user.is_none() && unknown_tags.is_empty() {
                    return None;
                }
                Some(DanglingTask {
                    task_id: task.id.clone(),
                    title: task.title.clone(),
                    unknown_user,
                    unknown_tags,
                })
            })
            .collect()
    }

    /// Swap in `next` and persist it. The in-memory state keeps the change
    /// even if the write fails.
    fn commit(&mut self, next: Vec<Task>) -> Result<()> {
        if next != self.tasks {
            self.revision.bump();
        }
        self.tasks = next;
        write_collection(&mut self.store, TODOS_KEY, &self.tasks)
    }
}
