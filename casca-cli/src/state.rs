use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$CASCA_HOME`, else `~/.casca`
pub fn casca_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("CASCA_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set (or set CASCA_HOME)")?;
    Ok(PathBuf::from(home).join(".casca"))
}

pub fn ensure_casca_home() -> Result<PathBuf> {
    let dir = casca_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(casca_home()?.join("config.toml"))
}
