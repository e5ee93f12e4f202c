#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;
use todos::model::{Tag, Task, User};

/// A scratch working directory with its own store.
pub struct TestStore {
    dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_dir(&self) -> PathBuf {
        self.dir.path().join("store")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(".todo.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// `todo` running in this directory against this store
    pub fn cmd(&self) -> Command {
        let mut cmd = todo_cmd();
        cmd.current_dir(self.path());
        cmd.env_remove("TODO_CONFIG");
        cmd.arg("--store").arg(self.store_dir());
        cmd
    }

    /// Run with `--json` and return the `data` field of the success envelope
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .arg("--json")
            .args(args)
            .output()
            .expect("run todo");
        assert!(
            output.status.success(),
            "todo {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        let envelope: Value = serde_json::from_slice(&output.stdout).expect("json envelope");
        assert_eq!(envelope["status"], "success");
        envelope["data"].clone()
    }

    pub fn read_tasks(&self) -> Vec<Task> {
        read_json(&self.store_dir().join("todos.json"))
    }

    pub fn read_tags(&self) -> Vec<Tag> {
        read_json(&self.store_dir().join("tags.json"))
    }

    pub fn read_users(&self) -> Vec<User> {
        read_json(&self.store_dir().join("users.json"))
    }
}

pub fn todo_cmd() -> Command {
    let mut cmd = Command::cargo_bin("todo").expect("todo binary");
    cmd.env_remove("TODO_STORE");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> T {
    let content = fs::read_to_string(path).expect("read store file");
    serde_json::from_str(&content).expect("parse store file")
}
