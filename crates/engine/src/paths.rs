use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const ROOT_ENV_VAR: &str = "SWEEPER_ROOT";

/// Directories the game reads from, all derived from the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
    pub weapons_dir: PathBuf,
}

impl AppPaths {
    pub fn from_root(root: PathBuf) -> Self {
        let assets_dir = root.join("assets");
        let weapons_dir = assets_dir.join("weapons");
        Self {
            root,
            assets_dir,
            weapons_dir,
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("{var} is not valid unicode: {value:?}")]
    NonUnicodeRoot { var: &'static str, value: OsString },
    #[error("{var}={path} is not a project root (needs Cargo.toml plus crates/ or assets/)")]
    InvalidRootOverride { var: &'static str, path: PathBuf },
    #[error("cannot locate the running executable: {0}")]
    CurrentExe(#[source] io::Error),
    #[error(
        "no project root above {searched_from}; set {var} to the directory holding Cargo.toml and assets/"
    )]
    RootNotFound {
        searched_from: PathBuf,
        var: &'static str,
    },
}

/// Resolves paths from [`ROOT_ENV_VAR`], falling back to the first project
/// root above the running executable.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = locate_root(env::var_os(ROOT_ENV_VAR), env::current_exe)?;
    Ok(AppPaths::from_root(root))
}

fn locate_root(
    override_value: Option<OsString>,
    current_exe: impl FnOnce() -> io::Result<PathBuf>,
) -> Result<PathBuf, StartupError> {
    if let Some(value) = override_value {
        let path = match value.into_string() {
            Ok(text) => canonical(Path::new(&text)),
            Err(value) => {
                return Err(StartupError::NonUnicodeRoot {
                    var: ROOT_ENV_VAR,
                    value,
                })
            }
        };
        return if looks_like_project_root(&path) {
            Ok(path)
        } else {
            Err(StartupError::InvalidRootOverride {
                var: ROOT_ENV_VAR,
                path,
            })
        };
    }

    let exe = current_exe().map_err(StartupError::CurrentExe)?;
    let searched_from = exe.parent().unwrap_or(exe.as_path());
    searched_from
        .ancestors()
        .find(|dir| looks_like_project_root(dir))
        .map(canonical)
        .ok_or_else(|| StartupError::RootNotFound {
            searched_from: canonical(searched_from),
            var: ROOT_ENV_VAR,
        })
}

fn looks_like_project_root(dir: &Path) -> bool {
    dir.join("Cargo.toml").is_file()
        && (dir.join("crates").is_dir() || dir.join("assets").is_dir())
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
