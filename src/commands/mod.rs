/// Result structs for command output. Commands return these instead of printing
/// their results directly; main.rs formats them as human-readable text or JSON.
mod alias;
mod amend;
mod commit;
mod reference;
mod show_config;

pub use alias::*;
pub use amend::*;
pub use commit::*;
pub use reference::*;
pub use show_config::*;

use anyhow::Result;
use serde::Serialize;

use crate::delegate::{Delegate, Invocation, OutputMode};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Build invocations without executing them.
    pub dry_run: bool,
    /// Capture child stdout into the result instead of streaming it.
    pub capture: bool,
}

impl RunOptions {
    fn mode(&self) -> OutputMode {
        if self.capture {
            OutputMode::Capture
        } else {
            OutputMode::Stream
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Step {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Runs one delegated invocation, recording it. Stops the flow on failure.
fn run_step(
    delegate: &dyn Delegate,
    invocation: Invocation,
    opts: RunOptions,
    steps: &mut Vec<Step>,
) -> Result<()> {
    let command = invocation.to_string();
    if opts.dry_run {
        steps.push(Step {
            command,
            output: None,
        });
        return Ok(());
    }

    let mode = opts.mode();
    let output = delegate.execute(&invocation, mode)?;
    steps.push(Step {
        command,
        output: (mode == OutputMode::Capture).then_some(output),
    });
    Ok(())
}

fn format_dry_run(steps: &[Step]) -> String {
    let mut lines = vec!["Dry run - nothing executed.".to_string(), String::new()];
    for step in steps {
        lines.push(format!("  {}", step.command));
    }
    lines.join("\n")
}
