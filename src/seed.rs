//! Default collections used when the store has no value for a key.

use crate::model::{Tag, Task, User, UNASSIGNED_USER_NAME};

const DEFAULT_TAGS: [(&str, &str); 5] = [
    ("work", "#f00"),
    ("home", "#ff0"),
    ("urgent", "#f0f"),
    ("morning", "#0f0"),
    ("weekend", "#00f"),
];

const DEFAULT_USERS: [&str; 4] = ["Yuliia", "John", "Thomas", "Mark"];

const DEFAULT_TASKS: [(&str, bool); 3] = [
    ("Setup development environment", true),
    ("Develop website and add content", false),
    ("Deploy to live server", false),
];

/// Supplies the default tags, users, and tasks.
///
/// Ids are generated once in [`SeedProvider::new`], so every call on the same
/// provider returns the same ids. Seed tasks reference the provider's own
/// Unassigned user.
#[derive(Debug, Clone)]
pub struct SeedProvider {
    tags: Vec<Tag>,
    users: Vec<User>,
    tasks: Vec<Task>,
}

impl Default for SeedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SeedProvider {
    pub fn new() -> Self {
        let tags = DEFAULT_TAGS
            .iter()
            .map(|(name, color)| Tag::new(*name, *color))
            .collect();

        let unassigned = User::new(UNASSIGNED_USER_NAME);
        let mut users: Vec<User> = DEFAULT_USERS.iter().map(|name| User::new(*name)).collect();
        users.push(unassigned.clone());

        let tasks = DEFAULT_TASKS
            .iter()
            .map(|(title, completed)| {
                let mut task = Task::new(*title, unassigned.id.clone());
                task.completed = *completed;
                task
            })
            .collect();

        Self { tags, users, tasks }
    }

    pub fn seed_tasks(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn seed_tags(&self) -> Vec<Tag> {
        self.tags.clone()
    }

    pub fn seed_users(&self) -> Vec<User> {
        self.users.clone()
    }

    /// The seed's Unassigned sentinel.
    pub fn unassigned(&self) -> User {
        self.users
            .iter()
            .find(|user| user.is_unassigned())
            .cloned()
            // DEFAULT_USERS never contains the sentinel name, and `new` always pushes it.
            .unwrap_or_else(|| User::new(UNASSIGNED_USER_NAME))
    }
}
