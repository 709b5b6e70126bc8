/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Configuration is cosmetic only; nothing here reaches the engine.

use serde::Deserialize;
use std::path::PathBuf;

use crate::ui::theme::Scheme;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub scheme: Scheme,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    display: TomlDisplay,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_scheme")]
    scheme: String,
}

fn default_scheme() -> String {
    "original".into()
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay { scheme: default_scheme() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config, letting an explicit CLI scheme name win over the
    /// file. Unrecognized names (either source) silently fall back to
    /// the default scheme.
    pub fn load(cli_scheme: Option<&str>) -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        let scheme = cli_scheme
            .and_then(Scheme::from_name)
            .or_else(|| Scheme::from_name(&toml_cfg.display.scheme))
            .unwrap_or_default();

        GameConfig { scheme }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
