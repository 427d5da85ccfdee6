use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;

/// A program plus its argument list. Spawned directly, never through a shell,
/// so user text always lands in a single argv element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("git", args)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", quote_for_display(arg))?;
        }
        Ok(())
    }
}

/// Renders an argument the way a user would type it. Display only.
fn quote_for_display(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_alphanumeric() || "-_./:=@,+~^%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Child inherits stdin/stdout/stderr. Nothing is returned on success.
    Stream,
    /// stdout and stderr are piped. stdout is returned on success.
    Capture,
}

#[derive(Debug, Error)]
pub enum DelegateError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` failed (exit code: {})", describe_code(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    code.map_or("signal".to_string(), |c| c.to_string())
}

impl DelegateError {
    /// The child's own exit code when known and non-zero, otherwise 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            DelegateError::Failed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }

    pub fn command(&self) -> &str {
        match self {
            DelegateError::Spawn { command, .. } | DelegateError::Failed { command, .. } => command,
        }
    }

    pub fn stdout(&self) -> &str {
        match self {
            DelegateError::Failed { stdout, .. } => stdout,
            DelegateError::Spawn { .. } => "",
        }
    }

    pub fn stderr(&self) -> &str {
        match self {
            DelegateError::Failed { stderr, .. } => stderr,
            DelegateError::Spawn { .. } => "",
        }
    }
}

/// Runs delegated commands. The dispatcher only talks to this seam.
pub trait Delegate {
    fn execute(&self, invocation: &Invocation, mode: OutputMode) -> Result<String, DelegateError>;
}

pub struct SystemDelegate {
    debug: bool,
    current_dir: Option<PathBuf>,
}

impl SystemDelegate {
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            current_dir: None,
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    fn command(&self, invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl Delegate for SystemDelegate {
    fn execute(&self, invocation: &Invocation, mode: OutputMode) -> Result<String, DelegateError> {
        let command = invocation.to_string();
        if self.debug {
            eprintln!("[debug] exec ({:?}): {}", mode, command);
        }

        let mut cmd = self.command(invocation);
        let (status, stdout, stderr) = match mode {
            OutputMode::Stream => {
                let status = cmd
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .map_err(|source| DelegateError::Spawn {
                        command: command.clone(),
                        source,
                    })?;
                (status, String::new(), String::new())
            }
            OutputMode::Capture => {
                let output = cmd
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .output()
                    .map_err(|source| DelegateError::Spawn {
                        command: command.clone(),
                        source,
                    })?;
                (
                    output.status,
                    String::from_utf8_lossy(&output.stdout).into_owned(),
                    String::from_utf8_lossy(&output.stderr).into_owned(),
                )
            }
        };

        if self.debug {
            eprintln!("[debug] exit: {}", status);
        }

        if !status.success() {
            return Err(DelegateError::Failed {
                command,
                code: status.code(),
                stdout,
                stderr,
            });
        }

        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestEnv;

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let inv = Invocation::git(["commit", "-m", ":bug: FIX : hello world"]);
        assert_eq!(inv.to_string(), "git commit -m \":bug: FIX : hello world\"");
    }

    #[test]
    fn display_leaves_plain_arguments_bare() {
        let inv = Invocation::git(["reset", "--hard", "HEAD~1"]);
        assert_eq!(inv.to_string(), "git reset --hard HEAD~1");
    }

    #[test]
    fn display_escapes_embedded_quotes() {
        let inv = Invocation::git(["commit", "-m", "say \"hi\""]);
        assert_eq!(inv.to_string(), "git commit -m \"say \\\"hi\\\"\"");
    }

    #[test]
    fn exit_code_prefers_child_code() {
        let err = DelegateError::Failed {
            command: "git push".to_string(),
            code: Some(128),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(err.exit_code(), 128);
    }

    #[test]
    fn exit_code_defaults_to_one() {
        let signalled = DelegateError::Failed {
            command: "git push".to_string(),
            code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(signalled.exit_code(), 1);

        let spawn = DelegateError::Spawn {
            command: "nope".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(spawn.exit_code(), 1);
    }

    #[test]
    fn capture_returns_stdout() {
        let env = TestEnv::new();
        let delegate = SystemDelegate::new(false).in_dir(env.repo());
        let out = delegate
            .execute(&Invocation::git(["rev-parse", "HEAD"]), OutputMode::Capture)
            .unwrap();
        assert_eq!(out.trim_end().len(), 40); // SHA-1 hex
    }

    #[test]
    fn capture_failure_carries_stderr_and_code() {
        let env = TestEnv::new();
        let delegate = SystemDelegate::new(false).in_dir(env.repo());
        let err = delegate
            .execute(
                &Invocation::git(["log", "--oneline", "--not-a-real-flag"]),
                OutputMode::Capture,
            )
            .unwrap_err();
        assert!(matches!(err, DelegateError::Failed { .. }));
        assert_eq!(err.command(), "git log --oneline --not-a-real-flag");
        assert!(!err.stderr().is_empty());
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn stream_success_returns_empty() {
        let env = TestEnv::new();
        let delegate = SystemDelegate::new(false).in_dir(env.repo());
        let out = delegate
            .execute(&Invocation::git(["status"]), OutputMode::Stream)
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn stream_failure_reports_exit_code() {
        let env = TestEnv::new();
        let delegate = SystemDelegate::new(false).in_dir(env.repo());
        let err = delegate
            .execute(
                &Invocation::git(["checkout", "nonexistent-branch"]),
                OutputMode::Stream,
            )
            .unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn message_is_not_reparsed_by_a_shell() {
        let env = TestEnv::new();
        let delegate = SystemDelegate::new(false).in_dir(env.repo());
        let message = "quote \" and $(echo injected) `stay` literal";
        delegate
            .execute(
                &Invocation::git(["commit", "--allow-empty", "-m", message]),
                OutputMode::Capture,
            )
            .unwrap();
        let subject = delegate
            .execute(&Invocation::git(["log", "-1", "--format=%s"]), OutputMode::Capture)
            .unwrap();
        assert_eq!(subject.trim_end(), message);
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let delegate = SystemDelegate::new(false);
        let err = delegate
            .execute(
                &Invocation::new("gx-definitely-not-a-real-program", Vec::<String>::new()),
                OutputMode::Capture,
            )
            .unwrap_err();
        assert!(matches!(err, DelegateError::Spawn { .. }));
        assert_eq!(err.exit_code(), 1);
    }
}
