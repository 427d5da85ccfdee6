mod cli;
mod commands;
mod config;
mod delegate;
mod table;
mod testutil;

use anyhow::Result;
use cli::{Action, Command, Parsed};
use colored::Colorize;
use commands::{AliasInputs, AmendInputs, RunOptions};
use config::LoadedConfig;
use delegate::{DelegateError, SystemDelegate};
use std::io::IsTerminal;

fn main() {
    if !colors_allowed(std::io::stdout().is_terminal(), std::io::stderr().is_terminal()) {
        colored::control::set_override(false);
    }

    let loaded = config::load_default();
    if let Some(warning) = &loaded.warning {
        eprintln!("{} {}", "warning:".yellow(), warning);
    }

    let parsed = match cli::parse_from(&loaded.table, std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(e) => {
            let _ = e.print();
            std::process::exit(cli::parse_error_exit_code(&e));
        }
    };

    if let Err(e) = run(parsed, &loaded) {
        std::process::exit(report_error(&e));
    }
}

fn run(parsed: Parsed, loaded: &LoadedConfig) -> Result<()> {
    let globals = parsed.globals;
    if globals.debug {
        match &loaded.path {
            Some(path) => eprintln!(
                "[debug] config: {} ({})",
                path.display(),
                if loaded.exists { "loaded" } else { "not found" }
            ),
            None => eprintln!("[debug] config: no config directory"),
        }
    }

    let table = &loaded.table;
    let delegate = match &globals.dir {
        Some(dir) => SystemDelegate::new(globals.debug).in_dir(dir),
        None => SystemDelegate::new(globals.debug),
    };
    let opts = RunOptions {
        dry_run: globals.dry_run,
        capture: globals.json,
    };
    let json = globals.json;

    match parsed.action {
        Action::Commit(inputs) => {
            let result = commands::cmd_commit(inputs, table, &delegate, opts)?;
            output(&result, json, commands::format_commit_human)?;
        }
        Action::Builtin(None) => {
            cli::build_command(table).print_help()?;
        }
        Action::Builtin(Some(Command::Amend {
            commit_type,
            message,
        })) => {
            let inputs = AmendInputs {
                type_key: commit_type,
                message,
            };
            let result = commands::cmd_amend(inputs, table, &delegate, opts)?;
            output(&result, json, commands::format_commit_human)?;
        }
        Action::Builtin(Some(Command::A { alias, args })) => {
            let inputs = AliasInputs { key: alias, args };
            let result = commands::cmd_alias(inputs, table, &delegate, opts)?;
            output(&result, json, commands::format_alias_human)?;
        }
        Action::Builtin(Some(Command::EmojiList)) => {
            let result = commands::cmd_emoji_list(table);
            output(&result, json, commands::format_emoji_list_human)?;
        }
        Action::Builtin(Some(Command::Examples)) => {
            let result = commands::cmd_examples();
            output(&result, json, commands::format_examples_human)?;
        }
        Action::Builtin(Some(Command::ShowConfig { show_path })) => {
            let result = commands::cmd_show_config(loaded, show_path);
            output(&result, json, commands::format_show_config_human)?;
        }
    }
    Ok(())
}

fn output<T: serde::Serialize>(result: &T, json: bool, human_fn: fn(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        let text = human_fn(result);
        if !text.is_empty() {
            println!("{}", text);
        }
    }
    Ok(())
}

/// Colour is written to both streams, so it needs both to be terminals.
fn colors_allowed(stdout_is_tty: bool, stderr_is_tty: bool) -> bool {
    stdout_is_tty && stderr_is_tty
}

/// Prints the failure and returns the process exit code.
fn report_error(e: &anyhow::Error) -> i32 {
    if let Some(err) = e.downcast_ref::<DelegateError>() {
        eprintln!("{} {}", "Command failed:".red(), err.command().yellow());
        if let DelegateError::Spawn { source, .. } = err {
            eprintln!("{}", source);
        }
        if !err.stdout().trim().is_empty() {
            eprintln!("{}", err.stdout().trim_end());
        }
        if !err.stderr().trim().is_empty() {
            eprintln!("{}", err.stderr().trim_end().red());
        }
        return err.exit_code();
    }

    eprintln!("{} {:#}", "error:".red(), e);
    1
}
