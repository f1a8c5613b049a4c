//! Template resources and artifact staleness

use crate::codegen::generated_identity;
use crate::config::{Config, Mode};
use crate::consts::GENERATED_EXTENSION;
use crate::error::{Error, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Path of a resource relative to the source root
pub(crate) fn relative_path(resource_id: &str) -> &str {
    resource_id.trim_start_matches(|c| c == '/' || c == '\\')
}

/// Where the generated source of `resource_id` is written
pub fn destination_path(resource_id: &str, config: &Config) -> Result<PathBuf> {
    let identity = generated_identity(resource_id, config)?;
    let mut path = config.destination_root.clone();
    for segment in identity.package.split('.').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.push(format!("{}.{}", identity.class_name, GENERATED_EXTENSION));
    Ok(path)
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// A template on disk together with the artifact generated from it
#[derive(Debug, Clone)]
pub struct Resource {
    id: String,
    source: PathBuf,
    destination: PathBuf,
    mode: Mode,
    /// Set until the artifact is known to be current
    reload: bool,
}

impl Resource {
    /// `None` when no template file exists for `resource_id`
    pub fn locate(resource_id: &str, config: &Config) -> Result<Option<Self>> {
        let source = config.source_root.join(relative_path(resource_id));
        if !source.is_file() {
            return Ok(None);
        }
        let destination = destination_path(resource_id, config)?;
        let reload = config.mode == Mode::Development
            || match (modified(&destination), modified(&source)) {
                (Some(artifact), Some(template)) => artifact < template,
                _ => true,
            };
        Ok(Some(Self {
            id: resource_id.to_string(),
            source,
            destination,
            mode: config.mode,
            reload,
        }))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_path(&self) -> &Path {
        &self.source
    }

    pub fn destination_path(&self) -> &Path {
        &self.destination
    }

    /// Whether the template file is still present
    pub fn exists(&self) -> bool {
        self.source.is_file()
    }

    /// Whether the artifact must be regenerated.
    ///
    /// In development mode timestamps are compared on every call; in production
    /// mode only the state recorded when the resource was located counts.
    pub fn is_stale(&self) -> Result<bool> {
        if self.reload {
            return Ok(true);
        }
        match self.mode {
            Mode::Production => Ok(false),
            Mode::Development => {
                let template = fs::metadata(&self.source)
                    .and_then(|m| m.modified())
                    .map_err(|e| Error::io(&self.source, e))?;
                Ok(modified(&self.destination).map_or(true, |artifact| artifact < template))
            }
        }
    }

    /// Record that the artifact is current
    pub fn mark_fresh(&mut self) {
        self.reload = false;
    }

    /// Force regeneration on the next check
    pub fn force_reload(&mut self) {
        self.reload = true;
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Resource {}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup(mode: Mode) -> (TempDir, TempDir, Config) {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let config = Config::new(src.path(), dst.path()).with_mode(mode);
        (src, dst, config)
    }

    fn touch(path: &Path, age: Duration) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<page/>").unwrap();
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[test]
    fn test_destination_path() {
        let config = Config::new("/src", "/out");
        assert_eq!(
            destination_path("/shop/cart-view.wui", &config).unwrap(),
            PathBuf::from("/out/wui/shop/cart_view.java")
        );
        let config = config.with_package_prefix("");
        assert_eq!(
            destination_path("index.wui", &config).unwrap(),
            PathBuf::from("/out/index.java")
        );
    }

    #[test]
    fn test_missing_template_is_not_located() {
        let (_src, _dst, config) = setup(Mode::Production);
        assert!(Resource::locate("absent.wui", &config).unwrap().is_none());
    }

    #[test]
    fn test_production_trusts_artifact_after_first_check() {
        let (src, _dst, config) = setup(Mode::Production);
        touch(&src.path().join("index.wui"), Duration::from_secs(60));

        let mut resource = Resource::locate("index.wui", &config).unwrap().unwrap();
        assert!(resource.is_stale().unwrap());
        touch(resource.destination_path(), Duration::from_secs(30));
        resource.mark_fresh();
        assert!(!resource.is_stale().unwrap());

        // newer template is not noticed
        touch(&src.path().join("index.wui"), Duration::ZERO);
        assert!(!resource.is_stale().unwrap());
        // but a fresh lookup sees it
        let relocated = Resource::locate("index.wui", &config).unwrap().unwrap();
        assert!(relocated.is_stale().unwrap());
    }

    #[test]
    fn test_development_rechecks_timestamps() {
        let (src, _dst, config) = setup(Mode::Development);
        touch(&src.path().join("a/page.wui"), Duration::from_secs(60));

        let mut resource = Resource::locate("a/page.wui", &config).unwrap().unwrap();
        assert!(resource.is_stale().unwrap());
        touch(resource.destination_path(), Duration::from_secs(30));
        resource.mark_fresh();
        assert!(!resource.is_stale().unwrap());

        touch(&src.path().join("a/page.wui"), Duration::ZERO);
        assert!(resource.is_stale().unwrap());
        resource.force_reload();
        assert!(resource.is_stale().unwrap());
    }
}
