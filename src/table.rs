use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Subcommand names owned by the CLI itself. Table keys may not shadow them.
pub const RESERVED_COMMANDS: &[&str] = &[
    "amend",
    "a",
    "alias",
    "emoji-list",
    "examples",
    "show-config",
    "help",
];

/// Alias key that lists the alias table instead of running anything.
pub const LIST_ALIAS: &str = "list";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitType {
    pub key: String,
    pub glyph: String,
    pub tag: String,
    pub label: String,
    pub description: String,
}

impl CommitType {
    /// `<tag> <LABEL> : <message>`
    pub fn message_body(&self, message: &str) -> String {
        format!("{} {} : {}", self.tag, self.label, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub key: String,
    /// Whitespace-separated program and arguments, without trailing user args.
    pub command: String,
    pub description: String,
}

impl Alias {
    pub fn words(&self) -> Vec<&str> {
        self.command.split_whitespace().collect()
    }
}

#[derive(Debug, Clone)]
pub struct CommandTable {
    commit_types: Vec<CommitType>,
    aliases: Vec<Alias>,
}

const BUILTIN_COMMIT_TYPES: &[(&str, &str, &str, &str, &str)] = &[
    ("init", "🎉", ":tada:", "INIT", "Initial project setup"),
    ("feature", "✨", ":sparkles:", "FEATURE", "New feature or enhancement"),
    ("fix", "🐛", ":bug:", "FIX", "Bug fix"),
    ("hotfix", "🚑", ":ambulance:", "HOTFIX", "Urgent production fix"),
    ("delete", "🔥", ":fire:", "DELETE", "Remove code/files"),
    ("refactor", "🔨", ":hammer:", "REFACTOR", "Code restructure (no behavior change)"),
    ("docs", "📚", ":books:", "DOCS", "Documentation updates"),
    ("style", "💄", ":lipstick:", "STYLE", "Formatting, styles, UI minor changes"),
    ("ui", "🎨", ":art:", "UI", "UI/UX improvements"),
    ("test", "✅", ":white_check_mark:", "TEST", "Add/update tests"),
    ("perf", "⚡", ":zap:", "PERF", "Performance improvements"),
    ("deploy", "🚀", ":rocket:", "DEPLOY", "Deployment / CI changes"),
    ("upgrade", "⬆️", ":arrow_up:", "UPGRADE", "Upgrade dependencies"),
    ("config", "🔧", ":wrench:", "CONFIG", "Config or environment changes"),
    ("ci", "👷", ":construction_worker:", "CI", "CI pipeline changes"),
    ("security", "🔒", ":lock:", "SECURITY", "Security related changes"),
    ("rollback", "⏪", ":rewind:", "ROLLBACK", "Rollback or revert"),
    ("release", "🔖", ":bookmark:", "RELEASE", "Release/Version tag"),
    ("seo", "🔍", ":mag:", "SEO", "Search engine optimization"),
    ("a11y", "🦽", ":wheelchair:", "ACCESSIBILITY", "Accessibility improvements"),
    ("merge", "🔀", ":twisted_rightwards_arrows:", "MERGE", "Merge branches"),
    ("chore", "🗑️", ":wastebasket:", "CHORE", "Routine chores/cleanup"),
];

const BUILTIN_ALIASES: &[(&str, &str, &str)] = &[
    ("ga", "git add .", "Stage all changes (shortcut for `git add .`)."),
    ("gs", "git status", "Show working tree status: modified, staged or untracked."),
    ("gm", "git commit", "Create a commit with staged changes (opens editor for message)."),
    ("gp", "git push", "Push current branch to remote."),
    ("gpl", "git pull", "Pull latest changes from remote for current branch."),
    ("gco", "git checkout", "Switch branches or restore files."),
    ("gb", "git branch", "List, create, or delete local branches."),
    ("gcm", "git checkout main", "Switch to the `main` branch."),
    ("gps", "git push origin main", "Push `main` branch to remote."),
    ("gplm", "git pull origin main", "Pull latest changes from `main` branch."),
    ("gld", "git log --oneline --graph --decorate --all", "Show history as a decorated graph."),
    ("reset-hard", "git reset --hard HEAD~1", "Discard the last commit and its changes permanently. ⚠️ Use with caution."),
    ("reset-soft", "git reset --soft HEAD~1", "Undo last commit but keep changes staged."),
    ("delete-local-branch", "git branch -d", "Delete a local branch that is already merged."),
    ("delete-remote-branch", "git push origin --delete", "Delete a branch on the remote. ⚠️ Be careful."),
    ("stash", "git stash", "Save uncommitted changes temporarily."),
    ("stash-pop", "git stash pop", "Restore most recent stashed changes and drop them from the stash."),
    ("cls", "clear", "Clear terminal screen."),
];

impl CommandTable {
    /// Builds a table and rejects it if any invariant is violated.
    pub fn new(commit_types: Vec<CommitType>, aliases: Vec<Alias>) -> Result<Self> {
        let table = Self {
            commit_types,
            aliases,
        };
        table.validate()?;
        Ok(table)
    }

    /// The built-in tables. Validity is covered by tests rather than checked
    /// on every start.
    pub fn builtin() -> Self {
        let commit_types = BUILTIN_COMMIT_TYPES
            .iter()
            .map(|(key, glyph, tag, label, description)| CommitType {
                key: key.to_string(),
                glyph: glyph.to_string(),
                tag: tag.to_string(),
                label: label.to_string(),
                description: description.to_string(),
            })
            .collect();
        let aliases = BUILTIN_ALIASES
            .iter()
            .map(|(key, command, description)| Alias {
                key: key.to_string(),
                command: command.to_string(),
                description: description.to_string(),
            })
            .collect();
        Self {
            commit_types,
            aliases,
        }
    }

    /// Appends entries to a copy of this table, validating the result.
    pub fn extended(&self, commit_types: Vec<CommitType>, aliases: Vec<Alias>) -> Result<Self> {
        let mut merged_types = self.commit_types.clone();
        merged_types.extend(commit_types);
        let mut merged_aliases = self.aliases.clone();
        merged_aliases.extend(aliases);
        Self::new(merged_types, merged_aliases)
    }

    pub fn commit_types(&self) -> &[CommitType] {
        &self.commit_types
    }

    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    pub fn commit_type(&self, key: &str) -> Option<&CommitType> {
        self.commit_types.iter().find(|c| c.key == key)
    }

    pub fn alias(&self, key: &str) -> Option<&Alias> {
        self.aliases.iter().find(|a| a.key == key)
    }

    pub fn alias_keys(&self) -> Vec<&str> {
        self.aliases.iter().map(|a| a.key.as_str()).collect()
    }

    pub fn validate(&self) -> Result<()> {
        let mut keys = HashSet::new();
        for ct in &self.commit_types {
            if ct.key.trim().is_empty() {
                bail!("commit type has empty key (label: {:?})", ct.label);
            }
            if ct.key.starts_with('-') || ct.key.chars().any(char::is_whitespace) {
                bail!("invalid commit type key: {:?}", ct.key);
            }
            if RESERVED_COMMANDS.contains(&ct.key.as_str()) {
                bail!(
                    "commit type key {:?} collides with a built-in command",
                    ct.key
                );
            }
            if ct.tag.trim().is_empty() {
                bail!("commit type {:?} has empty tag", ct.key);
            }
            if ct.label.trim().is_empty() {
                bail!("commit type {:?} has empty label", ct.key);
            }
            if !keys.insert(ct.key.as_str()) {
                bail!("duplicate commit type key: {}", ct.key);
            }
        }

        let mut keys = HashSet::new();
        for alias in &self.aliases {
            if alias.key.trim().is_empty() {
                bail!("alias has empty key (command: {:?})", alias.command);
            }
            if alias.key == LIST_ALIAS {
                bail!("alias key {:?} is reserved", LIST_ALIAS);
            }
            if alias.words().is_empty() {
                bail!("alias {:?} has empty command", alias.key);
            }
            if !keys.insert(alias.key.as_str()) {
                bail!("duplicate alias key: {}", alias.key);
            }
        }

        Ok(())
    }
}
