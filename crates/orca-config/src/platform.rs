//! Platforms and where OrcaSlicer keeps its profiles on each of them.

use std::fmt;
use std::path::{Path, PathBuf};

/// Platform key used in the `paths` section of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Darwin,
    Windows,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Linux, Platform::Darwin, Platform::Windows];

    /// The platform this process runs on. Unknown Unix-likes count as Linux.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value to a platform.
    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" => Platform::Darwin,
            "windows" => Platform::Windows,
            _ => Platform::Linux,
        }
    }

    /// Key under `paths:` in the config file.
    pub fn key(&self) -> &'static str {
        match self {
            Platform::Linux => "Linux",
            Platform::Darwin => "Darwin",
            Platform::Windows => "Windows",
        }
    }

    /// Standard `user` and `system` profile directories.
    ///
    /// `env` looks up environment variables; Windows paths hang off
    /// `%APPDATA%`, falling back to `<home>/AppData/Roaming`.
    pub fn standard_paths(&self, home: &Path, env: &dyn Fn(&str) -> Option<String>) -> StandardPaths {
        let base = match self {
            Platform::Linux => home.join(".config").join("OrcaSlicer"),
            Platform::Darwin => home
                .join("Library")
                .join("Application Support")
                .join("OrcaSlicer"),
            Platform::Windows => env_dir(env, "APPDATA")
                .unwrap_or_else(|| home.join("AppData").join("Roaming"))
                .join("OrcaSlicer"),
        };

        StandardPaths {
            user: base.join("user"),
            system: base.join("system"),
        }
    }

    /// Extra install locations that may hold `user`/`system` directories.
    fn search_locations(&self, home: &Path, env: &dyn Fn(&str) -> Option<String>) -> Vec<PathBuf> {
        match self {
            Platform::Windows => {
                let mut locations: Vec<PathBuf> = ["LOCALAPPDATA", "PROGRAMFILES", "PROGRAMFILES(X86)"]
                    .iter()
                    .filter_map(|var| env_dir(env, var))
                    .map(|dir| dir.join("OrcaSlicer"))
                    .collect();
                locations.push(home.join("OrcaSlicer"));
                locations
            }
            Platform::Darwin => vec![
                home.join(".config").join("OrcaSlicer"),
                PathBuf::from("/Applications/OrcaSlicer.app/Contents/Resources/profiles"),
            ],
            Platform::Linux => vec![
                home.join(".local").join("share").join("OrcaSlicer"),
                home.join("OrcaSlicer"),
            ],
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn env_dir(env: &dyn Fn(&str) -> Option<String>, var: &str) -> Option<PathBuf> {
    env(var).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// The standard profile directories of one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardPaths {
    pub user: PathBuf,
    pub system: PathBuf,
}

/// Profile directories found on this machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredPaths {
    pub user: Vec<PathBuf>,
    pub system: Vec<PathBuf>,
}

impl DiscoveredPaths {
    pub fn is_empty(&self) -> bool {
        self.user.is_empty() && self.system.is_empty()
    }
}

/// Find OrcaSlicer profile directories for `platform` under `home`.
///
/// The standard locations come first, then the platform's extra install
/// locations. Only existing directories are returned, without duplicates.
pub fn discover_in(
    platform: Platform,
    home: &Path,
    env: &dyn Fn(&str) -> Option<String>,
) -> DiscoveredPaths {
    let standard = platform.standard_paths(home, env);
    let mut found = DiscoveredPaths::default();

    push_dir(&mut found.user, standard.user);
    push_dir(&mut found.system, standard.system);

    for base in platform.search_locations(home, env) {
        if !base.is_dir() {
            continue;
        }
        push_dir(&mut found.user, base.join("user"));
        push_dir(&mut found.system, base.join("system"));
    }

    tracing::debug!(
        platform = %platform,
        user = found.user.len(),
        system = found.system.len(),
        "Discovered profile directories"
    );
    found
}

/// [`discover_in`] for the current platform, home directory and environment.
pub fn discover_profile_paths() -> DiscoveredPaths {
    match dirs::home_dir() {
        Some(home) => discover_in(Platform::current(), &home, &|var| std::env::var(var).ok()),
        None => DiscoveredPaths::default(),
    }
}

fn push_dir(list: &mut Vec<PathBuf>, candidate: PathBuf) {
    if candidate.is_dir() && !list.contains(&candidate) {
        list.push(candidate);
    }
}
