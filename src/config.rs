use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::table::{Alias, CommandTable, CommitType};

/// User additions to the built-in tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub commit_types: Vec<CommitType>,
    #[serde(default)]
    pub aliases: Vec<Alias>,
}

/// Outcome of looking for the config file at startup. Never fails: problems
/// are surfaced as a warning and the built-in tables are used instead.
#[derive(Debug)]
pub struct LoadedConfig {
    pub path: Option<PathBuf>,
    pub exists: bool,
    pub custom_commit_types: usize,
    pub custom_aliases: usize,
    pub warning: Option<String>,
    pub table: CommandTable,
}

pub fn default_config_path() -> Result<PathBuf> {
    let proj = directories::ProjectDirs::from("", "", "gx")
        .context("could not determine config directory")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).context("failed to parse config TOML")
}

/// Reads the config file, returning `None` when it does not exist.
pub fn load_config(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;
    parse_config(&contents)
        .with_context(|| format!("invalid config at {}", path.display()))
        .map(Some)
}

/// Built-in tables extended with the config's entries.
pub fn resolve_table(config: &Config) -> Result<CommandTable> {
    CommandTable::builtin()
        .extended(config.commit_types.clone(), config.aliases.clone())
        .context("config entries conflict with the command table")
}

pub fn load_at(path: Option<PathBuf>) -> LoadedConfig {
    let mut loaded = LoadedConfig {
        exists: path.as_deref().is_some_and(Path::exists),
        path,
        custom_commit_types: 0,
        custom_aliases: 0,
        warning: None,
        table: CommandTable::builtin(),
    };

    let Some(path) = loaded.path.as_deref() else {
        return loaded;
    };

    let resolved = load_config(path).and_then(|config| match config {
        Some(config) => resolve_table(&config).map(|table| Some((config, table))),
        None => Ok(None),
    });

    match resolved {
        Ok(Some((config, table))) => {
            loaded.custom_commit_types = config.commit_types.len();
            loaded.custom_aliases = config.aliases.len();
            loaded.table = table;
        }
        Ok(None) => {}
        Err(e) => {
            loaded.warning = Some(format!("ignoring config: {:#}", e));
        }
    }
    loaded
}

pub fn load_default() -> LoadedConfig {
    match default_config_path() {
        Ok(path) => load_at(Some(path)),
        Err(e) => {
            let mut loaded = load_at(None);
            loaded.warning = Some(format!("{:#}", e));
            loaded
        }
    }
}
