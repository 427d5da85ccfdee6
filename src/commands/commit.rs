use anyhow::{anyhow, Result};
use colored::Colorize;
use serde::Serialize;

use super::{format_dry_run, run_step, RunOptions, Step};
use crate::delegate::{Delegate, Invocation};
use crate::table::{CommandTable, CommitType};

pub struct CommitInputs {
    pub type_key: String,
    pub message: Vec<String>,
    pub stage_all: bool,
    pub amend: bool,
}

#[derive(Debug, Serialize)]
pub struct CommitResult {
    pub commit_type: String,
    pub label: String,
    pub body: String,
    pub amend: bool,
    pub dry_run: bool,
    pub steps: Vec<Step>,
}

fn commit_invocation(body: &str, amend: bool) -> Invocation {
    if amend {
        Invocation::git(["commit", "--amend", "-m", body])
    } else {
        Invocation::git(["commit", "-m", body])
    }
}

fn stage_all_invocation() -> Invocation {
    Invocation::git(["add", "."])
}

/// Delegates the commit for an already-resolved type. A failed stage step
/// aborts before the commit is attempted.
pub(super) fn commit_with_type(
    commit_type: &CommitType,
    message: &[String],
    stage_all: bool,
    amend: bool,
    delegate: &dyn Delegate,
    opts: RunOptions,
) -> Result<CommitResult> {
    let mut steps = Vec::new();

    if stage_all {
        if !opts.dry_run {
            eprintln!("{}", "Running: git add .".dimmed());
        }
        run_step(delegate, stage_all_invocation(), opts, &mut steps)?;
    }

    let body = commit_type.message_body(&message.join(" "));
    if !opts.dry_run {
        let verb = if amend { "Amending" } else { "Committing" };
        eprintln!(
            "{}",
            format!("{}: {} {}", verb, commit_type.glyph, commit_type.label).green()
        );
    }
    run_step(delegate, commit_invocation(&body, amend), opts, &mut steps)?;

    Ok(CommitResult {
        commit_type: commit_type.key.clone(),
        label: commit_type.label.clone(),
        body,
        amend,
        dry_run: opts.dry_run,
        steps,
    })
}

pub fn cmd_commit(
    inputs: CommitInputs,
    table: &CommandTable,
    delegate: &dyn Delegate,
    opts: RunOptions,
) -> Result<CommitResult> {
    let commit_type = table.commit_type(&inputs.type_key).ok_or_else(|| {
        anyhow!(
            "unknown commit type {:?}\nHint: run `gx emoji-list` to see supported types.",
            inputs.type_key
        )
    })?;

    commit_with_type(
        commit_type,
        &inputs.message,
        inputs.stage_all,
        inputs.amend,
        delegate,
        opts,
    )
}

pub fn format_commit_human(result: &CommitResult) -> String {
    if result.dry_run {
        format_dry_run(&result.steps)
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::OutputMode;
    use crate::testutil::{RecordingDelegate, TestEnv};

    fn inputs(key: &str, message: &[&str], stage_all: bool, amend: bool) -> CommitInputs {
        CommitInputs {
            type_key: key.to_string(),
            message: message.iter().map(|s| s.to_string()).collect(),
            stage_all,
            amend,
        }
    }

    #[test]
    fn every_commit_type_delegates_exactly_one_commit() {
        let table = CommandTable::builtin();
        for ct in table.commit_types() {
            let delegate = RecordingDelegate::new();
            cmd_commit(
                inputs(&ct.key, &["add", "thing"], false, false),
                &table,
                &delegate,
                RunOptions::default(),
            )
            .unwrap();
            assert_eq!(
                delegate.invocations(),
                vec![Invocation::git([
                    "commit".to_string(),
                    "-m".to_string(),
                    format!("{} {} : add thing", ct.tag, ct.label),
                ])],
                "wrong delegation for {}",
                ct.key
            );
        }
    }

    #[test]
    fn message_tokens_joined_with_single_spaces() {
        let table = CommandTable::builtin();
        let delegate = RecordingDelegate::new();
        let result = cmd_commit(
            inputs("feature", &["added", "login", "form"], false, false),
            &table,
            &delegate,
            RunOptions::default(),
        )
        .unwrap();
        assert_eq!(result.body, ":sparkles: FEATURE : added login form");
        assert_eq!(
            delegate.commands(),
            vec!["git commit -m \":sparkles: FEATURE : added login form\""]
        );
    }

    #[test]
    fn stage_all_runs_add_before_commit() {
        let table = CommandTable::builtin();
        let delegate = RecordingDelegate::new();
        cmd_commit(
            inputs("fix", &["crash"], true, false),
            &table,
            &delegate,
            RunOptions::default(),
        )
        .unwrap();
        assert_eq!(
            delegate.commands(),
            vec!["git add .", "git commit -m \":bug: FIX : crash\""]
        );
        assert_eq!(delegate.modes(), vec![OutputMode::Stream, OutputMode::Stream]);
    }

    #[test]
    fn failed_stage_never_commits() {
        let table = CommandTable::builtin();
        let delegate = RecordingDelegate::failing_at(0, 128);
        let err = cmd_commit(
            inputs("fix", &["crash"], true, false),
            &table,
            &delegate,
            RunOptions::default(),
        )
        .unwrap_err();
        assert_eq!(delegate.commands(), vec!["git add ."]);
        let delegate_err = err
            .downcast_ref::<crate::delegate::DelegateError>()
            .expect("delegate error");
        assert_eq!(delegate_err.exit_code(), 128);
    }

    #[test]
    fn amend_flag_substitutes_amend() {
        let table = CommandTable::builtin();
        let delegate = RecordingDelegate::new();
        cmd_commit(
            inputs("docs", &["typo"], false, true),
            &table,
            &delegate,
            RunOptions::default(),
        )
        .unwrap();
        assert_eq!(
            delegate.commands(),
            vec!["git commit --amend -m \":books: DOCS : typo\""]
        );
    }

    #[test]
    fn stage_all_applies_before_amend() {
        let table = CommandTable::builtin();
        let delegate = RecordingDelegate::new();
        cmd_commit(
            inputs("fix", &["tweak", "message"], true, true),
            &table,
            &delegate,
            RunOptions::default(),
        )
        .unwrap();
        assert_eq!(
            delegate.commands(),
            vec![
                "git add .",
                "git commit --amend -m \":bug: FIX : tweak message\""
            ]
        );
    }

    #[test]
    fn message_with_quotes_stays_one_argument() {
        let table = CommandTable::builtin();
        let delegate = RecordingDelegate::new();
        cmd_commit(
            inputs("fix", &["say", "\"hi\";", "rm", "-rf"], false, false),
            &table,
            &delegate,
            RunOptions::default(),
        )
        .unwrap();
        let invocations = delegate.invocations();
        assert_eq!(invocations[0].args.len(), 3);
        assert_eq!(invocations[0].args[2], ":bug: FIX : say \"hi\"; rm -rf");
    }

    #[test]
    fn dry_run_executes_nothing() {
        let table = CommandTable::builtin();
        let delegate = RecordingDelegate::new();
        let result = cmd_commit(
            inputs("fix", &["crash"], true, false),
            &table,
            &delegate,
            RunOptions {
                dry_run: true,
                capture: false,
            },
        )
        .unwrap();
        assert!(delegate.commands().is_empty());
        assert!(result.dry_run);
        let planned: Vec<&str> = result.steps.iter().map(|s| s.command.as_str()).collect();
        assert_eq!(planned, vec!["git add .", "git commit -m \":bug: FIX : crash\""]);
        let text = format_commit_human(&result);
        assert!(text.contains("Dry run"));
        assert!(text.contains("git add ."));
    }

    #[test]
    fn capture_mode_records_output() {
        let table = CommandTable::builtin();
        let delegate = RecordingDelegate::with_output("[main abc123] done\n");
        let result = cmd_commit(
            inputs("fix", &["crash"], false, false),
            &table,
            &delegate,
            RunOptions {
                dry_run: false,
                capture: true,
            },
        )
        .unwrap();
        assert_eq!(delegate.modes(), vec![OutputMode::Capture]);
        assert_eq!(result.steps[0].output.as_deref(), Some("[main abc123] done\n"));
    }

    #[test]
    fn unknown_type_runs_nothing() {
        let table = CommandTable::builtin();
        let delegate = RecordingDelegate::new();
        let result = cmd_commit(
            inputs("nope", &["x"], true, false),
            &table,
            &delegate,
            RunOptions::default(),
        );
        assert!(result.is_err());
        assert!(delegate.commands().is_empty());
    }

    #[test]
    fn commit_lands_in_real_repo() {
        let env = TestEnv::new();
        std::fs::write(env.repo().join("file.txt"), "hello").unwrap();
        let delegate = crate::delegate::SystemDelegate::new(false).in_dir(env.repo());
        let table = CommandTable::builtin();
        cmd_commit(
            inputs("feature", &["added", "file"], true, false),
            &table,
            &delegate,
            RunOptions {
                dry_run: false,
                capture: true,
            },
        )
        .unwrap();
        assert_eq!(
            env.git(&["log", "-1", "--format=%s"]),
            ":sparkles: FEATURE : added file"
        );
        assert_eq!(env.git(&["rev-list", "--count", "HEAD"]), "2");
    }

    #[test]
    fn amend_does_not_add_a_commit() {
        let env = TestEnv::new();
        let delegate = crate::delegate::SystemDelegate::new(false).in_dir(env.repo());
        let table = CommandTable::builtin();
        cmd_commit(
            inputs("chore", &["relabel"], false, true),
            &table,
            &delegate,
            RunOptions {
                dry_run: false,
                capture: true,
            },
        )
        .unwrap();
        assert_eq!(env.git(&["rev-list", "--count", "HEAD"]), "1");
        assert_eq!(
            env.git(&["log", "-1", "--format=%s"]),
            ":wastebasket: CHORE : relabel"
        );
    }
}
