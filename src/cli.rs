use clap::{Arg, ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::commands::CommitInputs;
use crate::table::{CommandTable, CommitType};

const DEVELOPER_NAME: &str = "Shahid Khan";
const DEVELOPER_GITHUB: &str = "https://github.com/shahidkhan18";
const DEVELOPER_EMAIL: &str = "shahidseran786@gmail.com";

#[derive(Parser)]
#[command(
    name = "gx",
    version,
    about = "Git helper CLI with gitmoji commit shortcuts and aliases"
)]
pub struct Cli {
    /// Print results as JSON (delegated output is captured)
    #[arg(long, global = true)]
    pub json: bool,

    /// Show what would be run without running it
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Print diagnostics to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Run delegated commands in <PATH> instead of the current directory
    #[arg(short = 'C', global = true, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Fixed subcommands. Commit-type subcommands are added at runtime from the
/// command table, see [`build_command`].
#[derive(Subcommand)]
pub enum Command {
    /// Amend last commit with a new type and message
    Amend {
        /// Commit type (e.g. fix, feature, ui, perf, docs)
        #[arg(value_name = "TYPE")]
        commit_type: String,
        /// New commit message
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Run git aliases (shortcut commands for frequent git ops)
    #[command(visible_alias = "alias")]
    A {
        /// Alias name (or 'list' to see all aliases)
        alias: String,
        /// Extra arguments appended to the aliased command
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Show gitmoji (emoji) reference table
    EmojiList,
    /// Show usage examples
    Examples,
    /// Show the config file location and what it adds
    ShowConfig {
        /// Print config path and exit
        #[arg(long)]
        show_path: bool,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Globals {
    pub json: bool,
    pub dry_run: bool,
    pub debug: bool,
    pub dir: Option<PathBuf>,
}

pub enum Action {
    Commit(CommitInputs),
    Builtin(Option<Command>),
}

pub struct Parsed {
    pub globals: Globals,
    pub action: Action,
}

fn developer_info() -> String {
    format!(
        "Developer Info\n  Name: {}\n  GitHub: {}\n  Email: {}\n  For full project information and contributions, see the GitHub repository.",
        DEVELOPER_NAME, DEVELOPER_GITHUB, DEVELOPER_EMAIL
    )
}

fn commit_subcommand(commit_type: &CommitType) -> clap::Command {
    clap::Command::new(commit_type.key.clone())
        .about(format!(
            "{} {} - {}",
            commit_type.glyph, commit_type.label, commit_type.description
        ))
        .arg(
            Arg::new("message")
                .value_name("MESSAGE")
                .help("Commit message")
                .required(true)
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("all")
                .short('a')
                .long("all")
                .action(ArgAction::SetTrue)
                .help("git add . before committing"),
        )
        .arg(
            Arg::new("amend")
                .short('A')
                .long("amend")
                .action(ArgAction::SetTrue)
                .help("Amend last commit instead of creating a new one"),
        )
}

/// The full parser: fixed subcommands plus one per commit type in `table`.
pub fn build_command(table: &CommandTable) -> clap::Command {
    table
        .commit_types()
        .iter()
        .fold(Cli::command(), |cmd, ct| cmd.subcommand(commit_subcommand(ct)))
        .after_help(developer_info())
}

fn globals(matches: &ArgMatches) -> Globals {
    Globals {
        json: matches.get_flag("json"),
        dry_run: matches.get_flag("dry_run"),
        debug: matches.get_flag("debug"),
        dir: matches.get_one::<PathBuf>("dir").cloned(),
    }
}

pub fn parse_from<I, T>(table: &CommandTable, args: I) -> Result<Parsed, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command(table).try_get_matches_from(args)?;

    if let Some((name, sub)) = matches.subcommand() {
        if table.commit_type(name).is_some() {
            let message = sub
                .get_many::<String>("message")
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            return Ok(Parsed {
                globals: globals(&matches),
                action: Action::Commit(CommitInputs {
                    type_key: name.to_string(),
                    message,
                    stage_all: sub.get_flag("all"),
                    amend: sub.get_flag("amend"),
                }),
            });
        }
    }

    let cli = Cli::from_arg_matches(&matches)?;
    Ok(Parsed {
        globals: Globals {
            json: cli.json,
            dry_run: cli.dry_run,
            debug: cli.debug,
            dir: cli.dir,
        },
        action: Action::Builtin(cli.command),
    })
}

/// Exit code for a parse failure: 0 when clap printed help or a version,
/// 1 for any usage error.
pub fn parse_error_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}
