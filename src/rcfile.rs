use rpnx::{Config, ConfigError};
use std::env;
use std::path::{Path, PathBuf};

/// Get home directory
pub(crate) fn dirs_home() -> Option<PathBuf> {
    env::var_os("HOME").map(PathBuf::from)
}

/// Path of the user config, `~/.rpnxrc.toml`
pub(crate) fn rc_path() -> Option<PathBuf> {
    dirs_home().map(|h| h.join(".rpnxrc.toml"))
}

/// Load a config file, `None` if it does not exist
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    Config::load(path).map(Some)
}

/// Load ~/.rpnxrc.toml if it exists, falling back to defaults with a warning
pub(crate) fn load_rpnxrc() -> Config {
    let path = match rc_path() {
        Some(p) => p,
        None => return Config::default(),
    };

    match load_from(&path) {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Warning: {}: {}", path.display(), e);
            Config::default()
        }
    }
}
