//! Command-line interface for todo
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in [`task`].

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod task;

/// todo - a small task list with tags and assignees
///
/// State lives in a store directory (`todos.json`, `tags.json`,
/// `users.json`) and is rewritten after every change.
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Store directory (overrides `store.dir` in .todo.toml)
    #[arg(long, global = true, env = "TODO_STORE")]
    pub store: Option<PathBuf>,

    /// Config file (defaults to ./.todo.toml when present)
    #[arg(long, global = true, env = "TODO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Keep state in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tasks
    #[command(alias = "ls")]
    List {
        /// Show only completed tasks
        #[arg(long, conflicts_with = "all")]
        completed: bool,

        /// Show every task, ignoring `view.only_completed`
        #[arg(long)]
        all: bool,
    },

    /// Create a task
    Add {
        /// Task title
        title: String,
    },

    /// Flip a task between open and completed
    Toggle {
        /// Task id or unique id prefix
        task: String,
    },

    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task id or unique id prefix
        task: String,
    },

    /// Tag management
    #[command(subcommand)]
    Tag(TagCommands),

    /// Assign a task to a user
    Assign {
        /// Task id or unique id prefix
        task: String,

        /// User name, id, or unique id prefix
        user: String,
    },

    /// List users
    Users,

    /// Report tasks that reference unknown users or tags
    Check,
}

/// Tag subcommands
#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// Attach a tag to a task
    Add {
        /// Task id or unique id prefix
        task: String,

        /// Tag name, id, or unique id prefix
        tag: String,
    },

    /// Detach every occurrence of a tag from a task
    Rm {
        /// Task id or unique id prefix
        task: String,

        /// Tag name, id, or unique id prefix
        tag: String,
    },

    /// List tags
    List,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let context = task::ContextOptions {
            store: self.store,
            config: self.config,
            ephemeral: self.ephemeral,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::List { completed, all } => task::run_list(task::ListOptions {
                completed,
                all,
                context,
            }),
            Commands::Add { title } => task::run_add(task::AddOptions { title, context }),
            Commands::Toggle { task } => task::run_toggle(task::ToggleOptions { task, context }),
            Commands::Delete { task } => task::run_delete(task::DeleteOptions { task, context }),
            Commands::Tag(cmd) => match cmd {
                TagCommands::Add { task, tag } => task::run_tag_add(task::TagOptions {
                    task,
                    tag,
                    context,
                }),
                TagCommands::Rm { task, tag } => task::run_tag_rm(task::TagOptions {
                    task,
                    tag,
                    context,
                }),
                TagCommands::List => task::run_tag_list(context),
            },
            Commands::Assign { task, user } => task::run_assign(task::AssignOptions {
                task,
                user,
                context,
            }),
            Commands::Users => task::run_users(context),
            Commands::Check => task::run_check(context),
        }
    }
}
