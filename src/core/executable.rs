//! Simulator executable discovery.
//!
//! Discovery is an ordered list of [`LocatorStrategy`] values. Each strategy
//! answers found or not-found on its own, and [`locate_executable`] returns the
//! first hit.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One way of finding the simulator executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorStrategy {
    /// A configured path, used as-is if it points at a file
    Explicit {
        /// Path to the executable
        path: PathBuf,
    },
    /// Look for any of `names` in the directories listed in `PATH`
    SearchPath {
        /// Candidate file names
        names: Vec<String>,
    },
    /// Look for any of `names` inside the directory held by an environment variable
    HomeVar {
        /// Variable name, e.g. `ENERGYPLUS_HOME`
        var: String,
        /// Candidate file names
        names: Vec<String>,
    },
    /// Look for any of `names` in fixed installation directories
    InstallDirs {
        /// Directories to search, in order
        dirs: Vec<PathBuf>,
        /// Candidate file names
        names: Vec<String>,
    },
}

impl LocatorStrategy {
    /// Runs this strategy, returning the executable path if found.
    #[must_use]
    pub fn locate(&self) -> Option<PathBuf> {
        match self {
            Self::Explicit { path } => path.is_file().then(|| path.clone()),
            Self::SearchPath { names } => {
                let path_var = std::env::var_os("PATH")?;
                search_dirs(std::env::split_paths(&path_var), names)
            }
            Self::HomeVar { var, names } => {
                let home = std::env::var_os(var)?;
                find_in_dir(Path::new(&home), names)
            }
            Self::InstallDirs { dirs, names } => search_dirs(dirs.iter().cloned(), names),
        }
    }

    /// Short label used in logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Explicit { .. } => "explicit",
            Self::SearchPath { .. } => "path",
            Self::HomeVar { .. } => "home_var",
            Self::InstallDirs { .. } => "install_dirs",
        }
    }
}

/// Walks `strategies` in order and returns the first executable found.
#[must_use]
pub fn locate_executable(strategies: &[LocatorStrategy]) -> Option<PathBuf> {
    strategies.iter().find_map(|strategy| {
        let found = strategy.locate();
        debug!(
            strategy = strategy.label(),
            found = ?found,
            "searched for simulator executable"
        );
        found
    })
}

fn search_dirs<I>(dirs: I, names: &[String]) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    dirs.into_iter().find_map(|dir| find_in_dir(&dir, names))
}

/// Returns the first `dir/name` that is an existing file.
fn find_in_dir(dir: &Path, names: &[String]) -> Option<PathBuf> {
    if dir.as_os_str().is_empty() {
        return None;
    }
    names
        .iter()
        .map(|name| dir.join(OsStr::new(name)))
        .find(|candidate| candidate.is_file())
}
