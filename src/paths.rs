use anyhow::Context;
use std::env;
use std::path::PathBuf;

fn home_dir() -> anyhow::Result<PathBuf> {
    // On Unix, HOME is standard. (Windows support can be expanded later.)
    let home = env::var_os("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home))
}

fn proxy_home() -> Option<PathBuf> {
    env::var_os("TUTOR_PROXY_HOME").map(PathBuf::from)
}

/// Directory holding `config.toml`. Not created; the file is optional.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    if let Some(base) = proxy_home() {
        return Ok(base.join("config"));
    }

    if let Some(xdg) = env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Ok(xdg.join("tutor-proxy"));
    }

    Ok(home_dir()?.join(".config").join("tutor-proxy"))
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
