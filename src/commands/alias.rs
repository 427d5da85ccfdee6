use anyhow::{bail, Result};
use colored::Colorize;
use serde::Serialize;

use super::{format_alias_list_human, format_dry_run, run_step, AliasListResult, RunOptions, Step};
use crate::delegate::{Delegate, Invocation};
use crate::table::{CommandTable, LIST_ALIAS};

pub struct AliasInputs {
    pub key: String,
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AliasRunResult {
    pub alias: String,
    pub dry_run: bool,
    pub steps: Vec<Step>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AliasResult {
    List(AliasListResult),
    Ran(AliasRunResult),
}

/// Template words followed by the user's extra arguments.
fn alias_invocation(words: &[&str], extra: &[String]) -> Option<Invocation> {
    let (program, rest) = words.split_first()?;
    let args = rest
        .iter()
        .map(|w| w.to_string())
        .chain(extra.iter().cloned());
    Some(Invocation::new(program, args))
}

pub fn cmd_alias(
    inputs: AliasInputs,
    table: &CommandTable,
    delegate: &dyn Delegate,
    opts: RunOptions,
) -> Result<AliasResult> {
    if inputs.key == LIST_ALIAS {
        return Ok(AliasResult::List(AliasListResult::from_table(table)));
    }

    let Some(alias) = table.alias(&inputs.key) else {
        bail!(
            "unknown alias {:?}\nValid aliases: {}\nHint: use `gx a list` to see all supported aliases.",
            inputs.key,
            table.alias_keys().join(", ")
        );
    };

    let Some(invocation) = alias_invocation(&alias.words(), &inputs.args) else {
        bail!("alias {:?} has an empty command", alias.key);
    };

    if !opts.dry_run {
        eprintln!("{}", format!("> Running: {}", invocation).bright_blue());
    }

    let mut steps = Vec::new();
    run_step(delegate, invocation, opts, &mut steps)?;

    Ok(AliasResult::Ran(AliasRunResult {
        alias: alias.key.clone(),
        dry_run: opts.dry_run,
        steps,
    }))
}

pub fn format_alias_human(result: &AliasResult) -> String {
    match result {
        AliasResult::List(list) => format_alias_list_human(list),
        AliasResult::Ran(ran) if ran.dry_run => format_dry_run(&ran.steps),
        AliasResult::Ran(_) => String::new(),
    }
}
