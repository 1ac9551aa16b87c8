use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use super::weapon::{normalize, ConfigError, RawWeaponConfig, WeaponConfig};

const WEAPON_FILE_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum WeaponLoadError {
    #[error("failed to read weapon directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read directory entry in {path}: {source}")]
    ReadDirEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read weapon file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse weapon file {path} at {json_path}: {source}")]
    Parse {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid weapon file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
    #[error("weapon '{name}' is defined in both {first} and {second}")]
    DuplicateName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Normalized weapon definitions shared by every carrier that references them.
#[derive(Debug, Default, Clone)]
pub struct WeaponLibrary {
    weapons: Vec<Arc<WeaponConfig>>,
    index_by_name: HashMap<String, usize>,
}

impl WeaponLibrary {
    /// Adds `config` unless a weapon with the same name is already present.
    pub fn insert(&mut self, config: WeaponConfig) -> bool {
        if self.index_by_name.contains_key(config.name()) {
            return false;
        }
        self.index_by_name
            .insert(config.name().to_string(), self.weapons.len());
        self.weapons.push(Arc::new(config));
        true
    }

    pub fn get(&self, name: &str) -> Option<Arc<WeaponConfig>> {
        self.index_by_name
            .get(name)
            .and_then(|index| self.weapons.get(*index))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.weapons.iter().map(|config| config.name())
    }
}

impl FromIterator<WeaponConfig> for WeaponLibrary {
    fn from_iter<T: IntoIterator<Item = WeaponConfig>>(iter: T) -> Self {
        let mut library = Self::default();
        for config in iter {
            library.insert(config);
        }
        library
    }
}

/// Loads every `*.json` weapon file in `dir`, in file name order.
pub fn load_weapon_library(dir: &Path) -> Result<WeaponLibrary, WeaponLoadError> {
    let mut files = Vec::new();
    let entries = fs::read_dir(dir).map_err(|source| WeaponLoadError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| WeaponLoadError::ReadDirEntry {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_weapon_file = path.is_file()
            && path
                .extension()
                .is_some_and(|extension| extension == WEAPON_FILE_EXTENSION);
        if is_weapon_file {
            files.push(path);
        }
    }
    files.sort();

    let mut library = WeaponLibrary::default();
    let mut source_by_name: HashMap<String, PathBuf> = HashMap::new();
    for path in files {
        let raw = fs::read_to_string(&path).map_err(|source| WeaponLoadError::ReadFile {
            path: path.clone(),
            source,
        })?;
        let config = parse_weapon_file(&path, &raw)?;
        if let Some(first) = source_by_name.get(config.name()) {
            return Err(WeaponLoadError::DuplicateName {
                name: config.name().to_string(),
                first: first.clone(),
                second: path,
            });
        }
        debug!(weapon = config.name(), file = %path.display(), "weapon_config_parsed");
        source_by_name.insert(config.name().to_string(), path);
        library.insert(config);
    }

    info!(
        dir = %dir.display(),
        weapon_count = library.len(),
        "weapon_configs_loaded"
    );
    Ok(library)
}

fn parse_weapon_file(path: &Path, raw: &str) -> Result<WeaponConfig, WeaponLoadError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let parsed = serde_path_to_error::deserialize::<_, RawWeaponConfig>(&mut deserializer)
        .map_err(|error| {
            let json_path = error.path().to_string();
            WeaponLoadError::Parse {
                path: path.to_path_buf(),
                json_path,
                source: error.into_inner(),
            }
        })?;
    normalize(parsed).map_err(|source| WeaponLoadError::Config {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::weapon::OffsetCategory;
    use serde_json::json;

    fn write_json(dir: &Path, file_name: &str, value: serde_json::Value) {
        fs::write(dir.join(file_name), value.to_string()).expect("write weapon file");
    }

    fn sword_json() -> serde_json::Value {
        json!({
            "name": "sword",
            "path": "weapons/sword.png",
            "frameWidth": 32,
            "frameHeight": 32,
            "frameRate": 8,
            "animations": { "up": [0], "down": [1], "side": [2, 3, 4] },
            "offset": {
                "up": { "x": [0], "y": [-6] },
                "down": { "x": [0], "y": [6] },
                "side": { "x": [0, 10, 20], "y": [2, 2, 3] }
            }
        })
    }

    #[test]
    fn loads_all_json_files_and_ignores_others() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_json(temp.path(), "a_sword.json", sword_json());
        write_json(
            temp.path(),
            "b_stick.json",
            json!({
                "name": "stick",
                "path": "stick.png",
                "frameWidth": 16,
                "frameHeight": 16,
                "frameRate": 4
            }),
        );
        fs::write(temp.path().join("notes.txt"), "not a weapon").expect("write notes");

        let library = load_weapon_library(temp.path()).expect("load");

        assert_eq!(library.len(), 2);
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["sword", "stick"]);
        let sword = library.get("sword").expect("sword");
        assert_eq!(sword.frame_count(OffsetCategory::Side), 3);
        let stick = library.get("stick").expect("stick");
        assert_eq!(stick.offset().side.x, vec![0]);
    }

    #[test]
    fn parse_error_names_the_json_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut value = sword_json();
        value["offset"]["side"]["x"] = json!([0, "ten", 20]);
        write_json(temp.path(), "sword.json", value);

        let err = load_weapon_library(temp.path()).expect_err("parse failure");
        match err {
            WeaponLoadError::Parse { json_path, .. } => {
                assert_eq!(json_path, "offset.side.x[1]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn length_mismatch_surfaces_as_config_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut value = sword_json();
        value["offset"]["side"]["y"] = json!([2, 2]);
        write_json(temp.path(), "sword.json", value);

        let err = load_weapon_library(temp.path()).expect_err("config failure");
        assert!(matches!(
            err,
            WeaponLoadError::Config {
                source: ConfigError::OffsetLengthMismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn duplicate_names_across_files_are_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_json(temp.path(), "one.json", sword_json());
        write_json(temp.path(), "two.json", sword_json());

        let err = load_weapon_library(temp.path()).expect_err("duplicate");
        match err {
            WeaponLoadError::DuplicateName { name, first, second } => {
                assert_eq!(name, "sword");
                assert!(first.ends_with("one.json"));
                assert!(second.ends_with("two.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_directory_is_a_read_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = load_weapon_library(&temp.path().join("absent")).expect_err("missing dir");
        assert!(matches!(err, WeaponLoadError::ReadDir { .. }));
    }

    #[test]
    fn insert_keeps_the_first_definition() {
        let first = normalize(RawWeaponConfig::new("axe", "axe.png", 16, 16, 4)).expect("first");
        let second = normalize(RawWeaponConfig::new("axe", "axe_v2.png", 16, 16, 4)).expect("second");
        let mut library = WeaponLibrary::default();

        assert!(library.insert(first));
        assert!(!library.insert(second));
        assert_eq!(library.get("axe").expect("axe").path(), "axe.png");
    }
}
