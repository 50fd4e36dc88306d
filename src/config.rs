use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::theme::Theme;

const APP_DIR: &str = "hangeuldown";
const LOCAL_RC: &str = ".hangeuldownrc";

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl From<ThemeMode> for Theme {
    fn from(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::Light,
            ThemeMode::Dark => Self::Dark,
        }
    }
}

/// Default flags that can be stored in a config file and merged with the CLI.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub perf: bool,
    pub theme: Option<ThemeMode>,
    pub output_dir: Option<PathBuf>,
    pub storage: Option<PathBuf>,
    pub render_debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: booleans are or-ed, options from `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            perf: self.perf || other.perf,
            theme: other.theme.or(self.theme),
            output_dir: other
                .output_dir
                .clone()
                .or_else(|| self.output_dir.clone()),
            storage: other.storage.clone().or_else(|| self.storage.clone()),
            render_debug_log: other
                .render_debug_log
                .clone()
                .or_else(|| self.render_debug_log.clone()),
        }
    }
}

/// Per-user application directory, or `None` when no home can be found.
pub fn app_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Some(PathBuf::from(appdata).join(APP_DIR));
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join(APP_DIR),
            );
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join(APP_DIR));
        }
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(".config").join(APP_DIR));
        }
    }

    None
}

pub fn global_config_path() -> PathBuf {
    app_config_dir().map_or_else(local_override_path, |dir| dir.join("config"))
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(LOCAL_RC)
}

/// Where the key-value store lives unless `--storage` says otherwise.
pub fn default_storage_path() -> PathBuf {
    app_config_dir().map_or_else(
        || PathBuf::from(".hangeuldown-storage.json"),
        |dir| dir.join("storage.json"),
    )
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# hangeuldown defaults (saved with --save)".to_string()];
    if let Some(theme) = flags.theme {
        let theme_str = match theme {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        };
        lines.push(format!("--theme {theme_str}"));
    }
    if let Some(dir) = &flags.output_dir {
        lines.push(format!("--output-dir {}", dir.display()));
    }
    if let Some(storage) = &flags.storage {
        lines.push(format!("--storage {}", storage.display()));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.render_debug_log {
        lines.push(format!("--render-debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract known flags from a token list, ignoring everything else.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let takes_value = matches!(
            name,
            "--theme" | "--output-dir" | "--storage" | "--render-debug-log"
        );
        let value = if takes_value && inline.is_none() {
            let next = tokens.get(i + 1).map(String::as_str);
            if next.is_some() {
                i += 1;
            }
            next
        } else {
            inline
        };

        match name {
            "--perf" => flags.perf = true,
            "--theme" => flags.theme = value.and_then(parse_theme),
            "--output-dir" => flags.output_dir = value.map(PathBuf::from),
            "--storage" => flags.storage = value.map(PathBuf::from),
            "--render-debug-log" => flags.render_debug_log = value.map(PathBuf::from),
            _ => {}
        }
        i += 1;
    }
    flags
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}
