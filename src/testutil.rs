#![cfg(test)]

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

use crate::delegate::{Delegate, DelegateError, Invocation, OutputMode};

/// Records every invocation instead of running it. Can be told to fail the
/// n-th call (0-based) with a given exit code.
#[derive(Default)]
pub struct RecordingDelegate {
    calls: RefCell<Vec<(Invocation, OutputMode)>>,
    fail_at: Option<(usize, i32)>,
    output: String,
    count: Cell<usize>,
}

impl RecordingDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(index: usize, code: i32) -> Self {
        Self {
            fail_at: Some((index, code)),
            ..Self::default()
        }
    }

    pub fn with_output(output: &str) -> Self {
        Self {
            output: output.to_string(),
            ..Self::default()
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(inv, _)| inv.to_string())
            .collect()
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.borrow().iter().map(|(inv, _)| inv.clone()).collect()
    }

    pub fn modes(&self) -> Vec<OutputMode> {
        self.calls.borrow().iter().map(|(_, mode)| *mode).collect()
    }
}

impl Delegate for RecordingDelegate {
    fn execute(&self, invocation: &Invocation, mode: OutputMode) -> Result<String, DelegateError> {
        let index = self.count.get();
        self.count.set(index + 1);
        self.calls.borrow_mut().push((invocation.clone(), mode));

        if let Some((fail_index, code)) = self.fail_at {
            if fail_index == index {
                return Err(DelegateError::Failed {
                    command: invocation.to_string(),
                    code: Some(code),
                    stdout: String::new(),
                    stderr: "simulated failure".to_string(),
                });
            }
        }

        match mode {
            OutputMode::Stream => Ok(String::new()),
            OutputMode::Capture => Ok(self.output.clone()),
        }
    }
}

/// A temporary git repository with one commit holding a README, and a local
/// identity. The root commit has content so `commit --amend` can rewrite it.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let env = Self { dir };
        env.git(&["init"]);
        env.git(&["config", "user.name", "Test"]);
        env.git(&["config", "user.email", "test@test.com"]);
        env.git(&["config", "commit.gpgsign", "false"]);
        std::fs::write(env.dir.path().join("README.md"), "# test\n")
            .expect("failed to write README");
        env.git(&["add", "README.md"]);
        env.git(&["commit", "-m", "initial"]);
        env
    }

    pub fn repo(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim_end().to_string()
    }
}
