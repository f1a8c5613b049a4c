//! Compiler configuration
//!
//! Settings come from [`Config::default`], optionally overlaid by `WUIC_*`
//! environment variables ([`Config::from_env`]) and finally by CLI flags.

use crate::consts::DEFAULT_PACKAGE_PREFIX;
use crate::error::{Error, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How compiled artifacts are trusted once produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Timestamps are compared on every staleness check
    Development,
    /// Timestamps are compared once; afterwards the artifact is trusted
    #[default]
    Production,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            other => Err(Error::config(format!("unknown mode '{}'", other))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Development => write!(f, "development"),
            Mode::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory resource ids resolve against
    pub source_root: PathBuf,
    /// Directory generated sources are written under
    pub destination_root: PathBuf,
    /// Prepended to derived package names
    pub package_prefix: String,
    /// Forces a character decoding directive in generated code
    pub charset: Option<String>,
    pub mode: Mode,
    /// Directories searched for `*.taglib.xml` descriptors
    pub taglib_dirs: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("."),
            destination_root: env::temp_dir().join("wuic"),
            package_prefix: DEFAULT_PACKAGE_PREFIX.to_string(),
            charset: None,
            mode: Mode::default(),
            taglib_dirs: Vec::new(),
        }
    }
}

impl Config {
    pub fn new(source_root: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            destination_root: destination_root.into(),
            ..Self::default()
        }
    }

    /// Defaults overlaid with the `WUIC_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with a caller-supplied variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(root) = value("WUIC_SOURCE_ROOT") {
            config.source_root = PathBuf::from(root);
        }
        if let Some(root) = value("WUIC_DEST_ROOT") {
            config.destination_root = PathBuf::from(root);
        }
        if let Some(prefix) = lookup("WUIC_PACKAGE") {
            // an explicitly empty prefix disables prefixing
            config.package_prefix = prefix.trim().to_string();
        }
        if let Some(charset) = value("WUIC_CHARSET") {
            config.charset = Some(charset.trim().to_string());
        }
        if let Some(mode) = value("WUIC_MODE") {
            config.mode = mode.parse()?;
        }
        if let Some(paths) = value("WUIC_TAGLIB_PATH") {
            config.taglib_dirs = env::split_paths(&paths).collect();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_package_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.package_prefix = prefix.into();
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.source_root.as_os_str().is_empty() {
            return Err(Error::config("source root is empty"));
        }
        if self.destination_root.as_os_str().is_empty() {
            return Err(Error::config("destination root is empty"));
        }
        let prefix_ok = self.package_prefix.is_empty()
            || self.package_prefix.split('.').all(|segment| {
                let mut chars = segment.chars();
                matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
                    && chars.all(|c| c.is_alphanumeric() || c == '_')
            });
        if !prefix_ok {
            return Err(Error::config(format!(
                "invalid package prefix '{}'",
                self.package_prefix
            )));
        }
        if let Some(charset) = &self.charset {
            if charset.is_empty() || charset.contains('"') || charset.contains('\\') {
                return Err(Error::config(format!("invalid charset '{}'", charset)));
            }
        }
        Ok(())
    }
}
