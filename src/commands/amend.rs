use anyhow::{bail, Result};

use super::commit::commit_with_type;
use super::{CommitResult, RunOptions};
use crate::delegate::Delegate;
use crate::table::CommandTable;

pub struct AmendInputs {
    pub type_key: String,
    pub message: Vec<String>,
}

/// Rewrites the last commit's message with a new type and text.
pub fn cmd_amend(
    inputs: AmendInputs,
    table: &CommandTable,
    delegate: &dyn Delegate,
    opts: RunOptions,
) -> Result<CommitResult> {
    let Some(commit_type) = table.commit_type(&inputs.type_key) else {
        bail!(
            "invalid type {:?}\nHint: see `gx emoji-list` for supported types.",
            inputs.type_key
        );
    };

    commit_with_type(commit_type, &inputs.message, false, true, delegate, opts)
}
