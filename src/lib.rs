//! todos - task list library
//!
//! Core functionality for the `todo` CLI: a repository of tasks, tags, and
//! users mirrored to a persistent key-value store after every change.
//!
//! # Core Concepts
//!
//! - **Tasks**: titled items that can be completed, tagged, and assigned
//! - **Tags**: named, colored labels attached to tasks
//! - **Users**: people tasks are assigned to, plus the Unassigned sentinel
//! - **Store**: string-keyed JSON values (`todos`, `tags`, `users`)
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.todo.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes
//! - `model`: Task, tag, and user records
//! - `output`: Human and JSON output
//! - `repository`: In-memory collections and their mutations
//! - `seed`: Default collections for an empty store
//! - `storage`: Key-value store trait and its file/memory backends
//! - `view`: Completed-only filtering and its memoized form

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod model;
pub mod output;
pub mod repository;
pub mod seed;
pub mod storage;
pub mod view;

pub use error::{Error, Result};
pub use repository::TaskRepository;
