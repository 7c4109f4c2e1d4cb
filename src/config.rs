//! Engine configuration
//!
//! A `Config` is a plain value that can be passed explicitly to the
//! evaluator. For callers that prefer an ambient default, each thread holds a
//! current config that can be overridden for a scope; the previous value is
//! restored when the guard drops, including during unwinding.

use serde::Deserialize;
use std::cell::RefCell;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Unit used by `sin`, `cos` and `tan`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

impl AngleUnit {
    /// Convert an angle in this unit to radians
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleUnit::Radians => angle,
            AngleUnit::Degrees => angle.to_radians(),
        }
    }
}

/// Configuration read from `~/.rpnxrc.toml` or built in code
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Decimal places used when displaying results (None = shortest exact form)
    pub precision: Option<usize>,
    pub angle_unit: AngleUnit,
    /// Validate expressions when they are constructed
    pub strict: bool,
    /// Maximum evaluator stack depth
    pub max_stack_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: None,
            angle_unit: AngleUnit::Radians,
            strict: true,
            max_stack_size: 1000,
        }
    }
}

impl Config {
    /// Parse a config from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_angle_unit(mut self, unit: AngleUnit) -> Self {
        self.angle_unit = unit;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_max_stack_size(mut self, size: usize) -> Self {
        self.max_stack_size = size;
        self
    }
}

thread_local! {
    static CURRENT: RefCell<Config> = RefCell::new(Config::default());
}

/// The current thread's ambient config
pub fn current() -> Config {
    CURRENT.with(|c| *c.borrow())
}

/// Replace the current thread's ambient config
pub fn set_defaults(config: Config) {
    CURRENT.with(|c| *c.borrow_mut() = config);
}

/// Restore the built-in defaults on the current thread
pub fn reset() {
    set_defaults(Config::default());
}

/// Restores the previous ambient config when dropped
#[must_use = "the override ends when the guard is dropped"]
pub struct ConfigGuard {
    previous: Config,
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        set_defaults(self.previous);
    }
}

/// Install `config` as the ambient config until the returned guard drops
pub fn override_with(config: Config) -> ConfigGuard {
    let previous = CURRENT.with(|c| std::mem::replace(&mut *c.borrow_mut(), config));
    ConfigGuard { previous }
}

/// Run `f` with `config` as the ambient config
pub fn scoped<T>(config: Config, f: impl FnOnce() -> T) -> T {
    let _guard = override_with(config);
    f()
}
