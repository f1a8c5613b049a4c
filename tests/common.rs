// Common test utilities

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wuic::Config;

/// Source and destination roots that live as long as the fixture
pub struct Fixture {
    pub source: TempDir,
    pub destination: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            source: TempDir::new().unwrap(),
            destination: TempDir::new().unwrap(),
        }
    }

    pub fn config(&self) -> Config {
        Config::new(self.source.path(), self.destination.path())
    }

    /// Write a template below the source root
    pub fn template(&self, resource_id: &str, content: &str) -> PathBuf {
        let path = self.source.path().join(resource_id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Every file below the destination root
    pub fn artifacts(&self) -> Vec<PathBuf> {
        walk(self.destination.path())
    }
}

fn walk(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            files.extend(walk(&path));
        } else {
            files.push(path);
        }
    }
    files.sort();
    files
}
