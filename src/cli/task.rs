//! todo command implementations.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Tag, Task, User};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::repository::{DanglingTask, TaskRepository};
use crate::seed::SeedProvider;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::view::ViewFilter;

/// Characters of an id shown in human output
const SHORT_ID_LEN: usize = 8;

/// Options shared by every command
pub struct ContextOptions {
    pub store: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub ephemeral: bool,
    pub json: bool,
    pub quiet: bool,
}

impl ContextOptions {
    fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

pub struct ListOptions {
    pub completed: bool,
    pub all: bool,
    pub context: ContextOptions,
}

pub struct AddOptions {
    pub title: String,
    pub context: ContextOptions,
}

pub struct ToggleOptions {
    pub task: String,
    pub context: ContextOptions,
}

pub struct DeleteOptions {
    pub task: String,
    pub context: ContextOptions,
}

pub struct TagOptions {
    pub task: String,
    pub tag: String,
    pub context: ContextOptions,
}

pub struct AssignOptions {
    pub task: String,
    pub user: String,
    pub context: ContextOptions,
}

#[derive(Serialize)]
struct TaskView {
    id: String,
    title: String,
    completed: bool,
    tags: Vec<String>,
    assignee: String,
}

#[derive(Serialize)]
struct TaskListOutput {
    total: usize,
    only_completed: bool,
    tasks: Vec<TaskView>,
}

#[derive(Serialize)]
struct TaskChangedOutput {
    task: TaskView,
}

#[derive(Serialize)]
struct TaskDeletedOutput {
    id: String,
    deleted: bool,
}

#[derive(Serialize)]
struct TagUsage {
    id: String,
    name: String,
    color: String,
    tasks: usize,
}

#[derive(Serialize)]
struct TagListOutput {
    total: usize,
    tags: Vec<TagUsage>,
}

#[derive(Serialize)]
struct UserUsage {
    id: String,
    name: String,
    tasks: usize,
}

#[derive(Serialize)]
struct UserListOutput {
    total: usize,
    users: Vec<UserUsage>,
}

#[derive(Serialize)]
struct CheckOutput {
    ok: bool,
    dangling: Vec<DanglingTask>,
}

type Repository = TaskRepository<Box<dyn KeyValueStore>>;

struct TaskContext {
    repo: Repository,
    config: Config,
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(&options.context)?;
    let only_completed = if options.all {
        false
    } else {
        options.completed || ctx.config.view.only_completed
    };

    let mut filter = ViewFilter::new();
    let tasks: Vec<TaskView> = filter
        .visible(ctx.repo.tasks(), ctx.repo.revision_key(), only_completed)
        .into_iter()
        .map(|task| task_view(&ctx.repo, task))
        .collect();

    let mut human = HumanOutput::new(if only_completed {
        "Tasks (completed only)"
    } else {
        "Tasks"
    });
    human.push_summary("Total", tasks.len().to_string());
    for task in &tasks {
        human.push_detail(task_line(task));
    }
    if tasks.is_empty() {
        human.push_next_step("todo add <title>");
    }

    let output = TaskListOutput {
        total: tasks.len(),
        only_completed,
        tasks,
    };

    emit_success(options.context.output(), "list", &output, Some(&human))
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut ctx = load_context(&options.context)?;
    let task = ctx.repo.create_task(&options.title)?;
    let view = task_view(&ctx.repo, &task);

    let mut human = HumanOutput::new("Task created");
    human.push_summary("ID", view.id.clone());
    human.push_summary("Title", view.title.clone());
    human.push_summary("Assignee", view.assignee.clone());
    if view.title.trim().is_empty() {
        human.push_warning("task title is empty");
    }

    emit_success(
        options.context.output(),
        "add",
        &TaskChangedOutput { task: view },
        Some(&human),
    )
}

pub fn run_toggle(options: ToggleOptions) -> Result<()> {
    let mut ctx = load_context(&options.context)?;
    let task_id = resolve_task(ctx.repo.tasks(), &options.task)?;
    ctx.repo.toggle_completion(&task_id)?;
    let view = changed_task_view(&ctx.repo, &task_id)?;

    let header = if view.completed {
        "Task completed"
    } else {
        "Task reopened"
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("ID", view.id.clone());
    human.push_summary("Title", view.title.clone());

    emit_success(
        options.context.output(),
        "toggle",
        &TaskChangedOutput { task: view },
        Some(&human),
    )
}

pub fn run_delete(options: DeleteOptions) -> Result<()> {
    let mut ctx = load_context(&options.context)?;
    let task_id = resolve_task(ctx.repo.tasks(), &options.task)?;
    ctx.repo.delete_task(&task_id)?;

    let mut human = HumanOutput::new("Task deleted");
    human.push_summary("ID", task_id.clone());

    emit_success(
        options.context.output(),
        "delete",
        &TaskDeletedOutput {
            id: task_id,
            deleted: true,
        },
        Some(&human),
    )
}

pub fn run_tag_add(options: TagOptions) -> Result<()> {
    let mut ctx = load_context(&options.context)?;
    let task_id = resolve_task(ctx.repo.tasks(), &options.task)?;
    let tag_id = resolve_tag(ctx.repo.tags(), &options.tag)?;

    let already_tagged = ctx
        .repo
        .find_task(&task_id)
        .is_some_and(|task| task.has_tag(&tag_id));
    ctx.repo.add_tag(&task_id, &tag_id)?;
    let view = changed_task_view(&ctx.repo, &task_id)?;

    let mut human = HumanOutput::new("Tag added");
    human.push_summary("Task", view.id.clone());
    human.push_summary("Tags", view.tags.join(", "));
    if already_tagged {
        human.push_warning("task already had this tag; it is now listed more than once");
    }

    emit_success(
        options.context.output(),
        "tag add",
        &TaskChangedOutput { task: view },
        Some(&human),
    )
}

pub fn run_tag_rm(options: TagOptions) -> Result<()> {
    let mut ctx = load_context(&options.context)?;
    let task_id = resolve_task(ctx.repo.tasks(), &options.task)?;
    let tag_id = resolve_tag(ctx.repo.tags(), &options.tag)?;

    let was_tagged = ctx
        .repo
        .find_task(&task_id)
        .is_some_and(|task| task.has_tag(&tag_id));
    ctx.repo.remove_tag(&task_id, &tag_id)?;
    let view = changed_task_view(&ctx.repo, &task_id)?;

    let mut human = HumanOutput::new("Tag removed");
    human.push_summary("Task", view.id.clone());
    human.push_summary("Tags", view.tags.join(", "));
    if !was_tagged {
        human.push_warning("task did not have this tag");
    }

    emit_success(
        options.context.output(),
        "tag rm",
        &TaskChangedOutput { task: view },
        Some(&human),
    )
}

pub fn run_tag_list(options: ContextOptions) -> Result<()> {
    let ctx = load_context(&options)?;
    let tags: Vec<TagUsage> = ctx
        .repo
        .tags()
        .iter()
        .map(|tag| TagUsage {
            id: tag.id.clone(),
            name: tag.name.clone(),
            color: tag.color.clone(),
            tasks: ctx.repo.tasks().iter().filter(|t| t.has_tag(&tag.id)).count(),
        })
        .collect();

    let mut human = HumanOutput::new("Tags");
    human.push_summary("Total", tags.len().to_string());
    for tag in &tags {
        human.push_detail(format!(
            "{} {} ({}) - {} task(s)",
            short_id(&tag.id),
            tag.name,
            tag.color,
            tag.tasks
        ));
    }

    let output = TagListOutput {
        total: tags.len(),
        tags,
    };
    emit_success(options.output(), "tag list", &output, Some(&human))
}

pub fn run_assign(options: AssignOptions) -> Result<()> {
    let mut ctx = load_context(&options.context)?;
    let task_id = resolve_task(ctx.repo.tasks(), &options.task)?;
    let user_id = resolve_user(ctx.repo.users(), &options.user)?;
    ctx.repo.assign_user(&task_id, &user_id)?;
    let view = changed_task_view(&ctx.repo, &task_id)?;

    let mut human = HumanOutput::new("Task assigned");
    human.push_summary("Task", view.id.clone());
    human.push_summary("Assignee", view.assignee.clone());

    emit_success(
        options.context.output(),
        "assign",
        &TaskChangedOutput { task: view },
        Some(&human),
    )
}

pub fn run_users(options: ContextOptions) -> Result<()> {
    let ctx = load_context(&options)?;
    let users: Vec<UserUsage> = ctx
        .repo
        .users()
        .iter()
        .map(|user| UserUsage {
            id: user.id.clone(),
            name: user.name.clone(),
            tasks: ctx
                .repo
                .tasks()
                .iter()
                .filter(|t| t.assigned_user_id == user.id)
                .count(),
        })
        .collect();

    let mut human = HumanOutput::new("Users");
    human.push_summary("Total", users.len().to_string());
    for user in &users {
        human.push_detail(format!(
            "{} {} - {} task(s)",
            short_id(&user.id),
            user.name,
            user.tasks
        ));
    }

    let output = UserListOutput {
        total: users.len(),
        users,
    };
    emit_success(options.output(), "users", &output, Some(&human))
}

pub fn run_check(options: ContextOptions) -> Result<()> {
    let ctx = load_context(&options)?;
    let dangling = ctx.repo.dangling_references();

    let mut human = HumanOutput::new(if dangling.is_empty() {
        "Check passed"
    } else {
        "Check found dangling references"
    });
    human.push_summary("Tasks", ctx.repo.tasks().len().to_string());
    human.push_summary("Dangling", dangling.len().to_string());
    for entry in &dangling {
        if let Some(user) = &entry.unknown_user {
            human.push_warning(format!(
                "{} '{}' is assigned to unknown user {}",
                short_id(&entry.task_id),
                entry.title,
                user
            ));
        }
        for tag in &entry.unknown_tags {
            human.push_warning(format!(
                "{} '{}' references unknown tag {}",
                short_id(&entry.task_id),
                entry.title,
                tag
            ));
        }
    }
    if !dangling.is_empty() {
        human.push_next_step("todo assign <task> <user>");
        human.push_next_step("todo tag rm <task> <tag>");
    }

    let output = CheckOutput {
        ok: dangling.is_empty(),
        dangling,
    };
    emit_success(options.output(), "check", &output, Some(&human))
}

fn load_context(options: &ContextOptions) -> Result<TaskContext> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let (config, base) = match &options.config {
        Some(path) => {
            let base = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.clone());
            (Config::load(path)?, base)
        }
        None => (Config::load_from_dir(&cwd)?, cwd.clone()),
    };

    let store: Box<dyn KeyValueStore> = if options.ephemeral {
        tracing::debug!("using ephemeral store");
        Box::new(MemoryStore::new())
    } else {
        let dir = match &options.store {
            Some(dir) => dir.clone(),
            None => config.store_dir(&base),
        };
        let store = FileStore::new(dir).with_lock_timeout(config.store.lock_timeout_ms);
        tracing::debug!(store = %store.dir().display(), "opening store");
        Box::new(store)
    };

    let repo = TaskRepository::load(store, &SeedProvider::new())?;
    Ok(TaskContext { repo, config })
}

fn task_view(repo: &Repository, task: &Task) -> TaskView {
    let tags = task
        .tags
        .iter()
        .map(|tag_id| {
            repo.tag_by_id(tag_id)
                .map(|tag| tag.name.clone())
                .unwrap_or_else(|| format!("?{}", short_id(tag_id)))
        })
        .collect();
    let assignee = repo
        .user_by_id(&task.assigned_user_id)
        .map(|user| user.name.clone())
        .unwrap_or_else(|| format!("?{}", short_id(&task.assigned_user_id)));

    TaskView {
        id: task.id.clone(),
        title: task.title.clone(),
        completed: task.completed,
        tags,
        assignee,
    }
}

fn changed_task_view(repo: &Repository, task_id: &str) -> Result<TaskView> {
    repo.find_task(task_id)
        .map(|task| task_view(repo, task))
        .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
}

fn task_line(task: &TaskView) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!("[{}] {} {}", mark, short_id(&task.id), task.title);
    line.push_str(&format!(" @{}", task.assignee));
    for tag in &task.tags {
        line.push_str(&format!(" #{tag}"));
    }
    line
}

fn short_id(id: &str) -> &str {
    id.char_indices()
        .nth(SHORT_ID_LEN)
        .map(|(index, _)| &id[..index])
        .unwrap_or(id)
}

/// Outcome of matching user input against entity ids and names
#[derive(Debug, PartialEq, Eq)]
enum Lookup {
    Found(String),
    Missing,
    Ambiguous(Vec<String>),
}

/// Match `input` against `(id, name)` pairs.
///
/// Exact id wins, then a case-insensitive name, then a unique
/// case-insensitive id prefix.
fn lookup<'a>(
    input: &str,
    entries: impl Iterator<Item = (&'a str, Option<&'a str>)> + Clone,
) -> Lookup {
    let input = input.trim();
    let input_lower = input.to_lowercase();

    if let Some((id, _)) = entries.clone().find(|(id, _)| *id == input) {
        return Lookup::Found(id.to_string());
    }

    let by_name: Vec<String> = entries
        .clone()
        .filter(|(_, name)| name.is_some_and(|name| name.to_lowercase() == input_lower))
        .map(|(id, _)| id.to_string())
        .collect();
    match by_name.len() {
        0 => {}
        1 => return Lookup::Found(by_name[0].clone()),
        _ => return Lookup::Ambiguous(by_name),
    }

    let mut by_prefix: Vec<String> = entries
        .filter(|(id, _)| id.to_lowercase().starts_with(&input_lower))
        .map(|(id, _)| id.to_string())
        .collect();
    match by_prefix.len() {
        0 => Lookup::Missing,
        1 => Lookup::Found(by_prefix.remove(0)),
        _ => Lookup::Ambiguous(by_prefix),
    }
}

fn finish_lookup(
    kind: &'static str,
    input: &str,
    result: Lookup,
    missing: impl FnOnce(String) -> Error,
) -> Result<String> {
    match result {
        Lookup::Found(id) => Ok(id),
        Lookup::Missing => Err(missing(input.trim().to_string())),
        Lookup::Ambiguous(candidates) => Err(Error::Ambiguous {
            kind,
            input: input.trim().to_string(),
            candidates,
        }),
    }
}

fn ensure_not_empty(kind: &str, input: &str) -> Result<()> {
    if input.trim().is_empty() {
        return Err(Error::InvalidArgument(format!("{kind} cannot be empty")));
    }
    Ok(())
}

fn resolve_task(tasks: &[Task], input: &str) -> Result<String> {
    ensure_not_empty("task id", input)?;
    let result = lookup(input, tasks.iter().map(|task| (task.id.as_str(), None)));
    finish_lookup("task", input, result, Error::TaskNotFound)
}

fn resolve_tag(tags: &[Tag], input: &str) -> Result<String> {
    ensure_not_empty("tag", input)?;
    let result = lookup(
        input,
        tags.iter().map(|tag| (tag.id.as_str(), Some(tag.name.as_str()))),
    );
    finish_lookup("tag", input, result, Error::TagNotFound)
}

fn resolve_user(users: &[User], input: &str) -> Result<String> {
    ensure_not_empty("user", input)?;
    let result = lookup(
        input,
        users.iter().map(|user| (user.id.as_str(), Some(user.name.as_str()))),
    );
    finish_lookup("user", input, result, Error::UserNotFound)
}
