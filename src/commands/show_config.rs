use serde::Serialize;

use crate::config::LoadedConfig;

#[derive(Debug, Serialize)]
pub struct ShowConfigResult {
    pub path: Option<String>,
    pub exists: bool,
    pub custom_commit_types: usize,
    pub custom_aliases: usize,
    pub warning: Option<String>,
    #[serde(skip)]
    pub path_only: bool,
}

pub fn cmd_show_config(loaded: &LoadedConfig, path_only: bool) -> ShowConfigResult {
    ShowConfigResult {
        path: loaded.path.as_ref().map(|p| p.display().to_string()),
        exists: loaded.exists,
        custom_commit_types: loaded.custom_commit_types,
        custom_aliases: loaded.custom_aliases,
        warning: loaded.warning.clone(),
        path_only,
    }
}

pub fn format_show_config_human(result: &ShowConfigResult) -> String {
    let path = result.path.as_deref().unwrap_or("(unavailable)");
    if result.path_only {
        return path.to_string();
    }

    let mut lines = vec![format!("Config: {}", path)];
    if !result.exists {
        lines.push("  not found; using built-in tables only".to_string());
    } else if let Some(warning) = &result.warning {
        lines.push(format!("  warning: {}", warning));
    } else {
        lines.push(format!(
            "  {} custom commit type(s), {} custom alias(es)",
            result.custom_commit_types, result.custom_aliases
        ));
    }
    lines.join("\n")
}
