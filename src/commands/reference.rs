use colored::Colorize;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::table::{Alias, CommandTable, CommitType};

const EXAMPLES: &[&str] = &[
    "gx feature \"added login form\"",
    "gx fix -a \"fixed crash on signup\"",
    "gx fix -a --amend \"tweak message\"",
    "gx amend fix \"updated commit message\"",
    "gx a ga",
    "gx a gco -b feature/login",
    "gx a list",
    "gx --dry-run docs \"update readme\"",
    "gx emoji-list",
];

#[derive(Debug, Serialize)]
pub struct EmojiListResult {
    pub commit_types: Vec<CommitType>,
}

#[derive(Debug, Serialize)]
pub struct AliasListResult {
    pub aliases: Vec<Alias>,
}

impl AliasListResult {
    pub fn from_table(table: &CommandTable) -> Self {
        Self {
            aliases: table.aliases().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExamplesResult {
    pub examples: Vec<String>,
}

pub fn cmd_emoji_list(table: &CommandTable) -> EmojiListResult {
    EmojiListResult {
        commit_types: table.commit_types().to_vec(),
    }
}

pub fn cmd_examples() -> ExamplesResult {
    ExamplesResult {
        examples: EXAMPLES.iter().map(|e| e.to_string()).collect(),
    }
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.map(UnicodeWidthStr::width).max().unwrap_or(0)
}

/// Left-aligns by terminal cell width, so emoji glyphs pad correctly.
fn pad_cells(value: &str, width: usize) -> String {
    let fill = width.saturating_sub(value.width());
    format!("{}{}", value, " ".repeat(fill))
}

pub fn format_emoji_list_human(result: &EmojiListResult) -> String {
    let glyph_width = column_width(result.commit_types.iter().map(|c| c.glyph.as_str()));
    let key_width = column_width(result.commit_types.iter().map(|c| c.key.as_str()));
    let label_width = column_width(result.commit_types.iter().map(|c| c.label.as_str()));
    let tag_width = column_width(result.commit_types.iter().map(|c| c.tag.as_str()));

    let mut lines = vec![
        String::new(),
        "Gitmoji Reference Table".bold().to_string(),
        String::new(),
    ];
    for c in &result.commit_types {
        lines.push(format!(
            "{}  {} {} {} {}",
            pad_cells(&c.glyph, glyph_width).yellow(),
            pad_cells(&c.key, key_width).bold(),
            pad_cells(&c.label, label_width).green(),
            pad_cells(&c.tag, tag_width).magenta(),
            c.description.cyan()
        ));
    }
    lines.push(String::new());
    lines.join("\n")
}

pub fn format_alias_list_human(result: &AliasListResult) -> String {
    let key_width = column_width(result.aliases.iter().map(|a| a.key.as_str()));
    let command_width = column_width(result.aliases.iter().map(|a| a.command.as_str()));

    let mut lines = vec![
        String::new(),
        "Git Aliases Reference".bold().to_string(),
        String::new(),
    ];
    for a in &result.aliases {
        lines.push(format!(
            "{} {} {}",
            pad_cells(&a.key, key_width).green(),
            pad_cells(&a.command, command_width).yellow(),
            a.description.cyan()
        ));
    }
    lines.push(String::new());
    lines.join("\n")
}

pub fn format_examples_human(result: &ExamplesResult) -> String {
    let mut lines = vec![String::new(), "Examples:".bold().to_string(), String::new()];
    for example in &result.examples {
        lines.push(format!("  {}", example.green()));
    }
    lines.push(String::new());
    lines.join("\n")
}
