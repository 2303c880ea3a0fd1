//! Loading, resolving and saving the configuration.

use std::path::{Path, PathBuf};

use orca_fs::{ConfigStore, NormalizedPath};

use crate::platform::{Platform, discover_profile_paths};
use crate::schema::ConfigFile;
use crate::{Error, Result};

/// File name looked up in the working directory and the config directory.
pub const CONFIG_FILE_NAME: &str = "orcasync-config.yaml";

/// Environment variable overriding where sync repositories are stored.
pub const DATA_DIR_ENV: &str = "ORCASYNC_DATA_DIR";

/// Settings after applying the active profile and platform.
#[derive(Debug, Clone, PartialEq)]
struct Resolved {
    repository_url: String,
    repository_name: String,
    auto_commit: bool,
    commit_message_template: String,
    branch_name: Option<String>,
    branch_prefix: String,
    branch_postfix: String,
    user_paths: Vec<String>,
    system_paths: Vec<String>,
}

/// Loaded configuration with one active profile resolved.
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    file: ConfigFile,
    profile: Option<String>,
    platform: Platform,
    resolved: Resolved,
}

impl Config {
    /// Load the configuration and resolve the active profile.
    ///
    /// `path` defaults to [`find_config_file`]. A missing file yields the
    /// generated defaults (not written until [`Config::save`]). The active
    /// profile is `profile`, else the file's `default_profile`, else none.
    pub fn load(path: Option<&Path>, profile: Option<&str>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => find_config_file(),
        };

        let file = if path.exists() {
            tracing::debug!(path = %path.display(), "Loading configuration");
            ConfigStore::new().load(&NormalizedPath::new(&path))?
        } else {
            tracing::debug!(path = %path.display(), "No configuration file; using defaults");
            generated_defaults()
        };

        Self::from_file(path, file, profile, Platform::current())
    }

    /// Resolve `file` as if it had been loaded from `path` on `platform`.
    pub fn from_file(
        path: PathBuf,
        file: ConfigFile,
        profile: Option<&str>,
        platform: Platform,
    ) -> Result<Self> {
        let profile = profile
            .map(str::to_string)
            .or_else(|| file.default_profile.clone())
            .filter(|name| !name.is_empty());
        let resolved = resolve(&file, profile.as_deref(), platform)?;

        Ok(Self {
            path,
            file,
            profile,
            platform,
            resolved,
        })
    }

    /// Write the configuration back to its path, atomically.
    pub fn save(&self) -> Result<()> {
        ConfigStore::new().save(&NormalizedPath::new(&self.path), &self.file)?;
        tracing::info!(path = %self.path.display(), "Saved configuration");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the configuration file exists on disk.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn file(&self) -> &ConfigFile {
        &self.file
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn active_profile_name(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Profile names in the file, sorted.
    pub fn list_profiles(&self) -> Vec<String> {
        self.file.profiles.keys().cloned().collect()
    }

    pub fn repository_url(&self) -> &str {
        &self.resolved.repository_url
    }

    pub fn repository_name(&self) -> &str {
        &self.resolved.repository_name
    }

    pub fn auto_commit(&self) -> bool {
        self.resolved.auto_commit
    }

    /// Branch for this machine, using the local hostname.
    pub fn branch_name(&self) -> String {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string());
        self.branch_name_for(&host)
    }

    /// The profile's fixed `branch_name`, else `{prefix}{hostname}{postfix}`.
    pub fn branch_name_for(&self, hostname: &str) -> String {
        match &self.resolved.branch_name {
            Some(name) => name.clone(),
            None => format!(
                "{}{}{}",
                self.resolved.branch_prefix, hostname, self.resolved.branch_postfix
            ),
        }
    }

    pub fn user_paths(&self) -> Vec<PathBuf> {
        expand_all(&self.resolved.user_paths)
    }

    pub fn system_paths(&self) -> Vec<PathBuf> {
        expand_all(&self.resolved.system_paths)
    }

    /// Every directory to sync: user paths, then system paths.
    pub fn sync_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.user_paths();
        paths.extend(self.system_paths());
        paths
    }

    /// Render the commit message template.
    ///
    /// `{hostname}` and `{timestamp}` are substituted; other text is kept.
    pub fn commit_message(&self, hostname: &str, timestamp: &str) -> String {
        self.resolved
            .commit_message_template
            .replace("{hostname}", hostname)
            .replace("{timestamp}", timestamp)
    }

    /// Set the remote URL where it is currently defined: the active
    /// profile when it overrides it, otherwise the top level.
    pub fn set_repository_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim().to_string();
        match self.active_profile_mut() {
            Some(profile) if profile.repository_url.is_some() => profile.repository_url = Some(url),
            _ => self.file.repository_url = url,
        }
        self.refresh()
    }

    /// Set the repository name, following the same rule as
    /// [`Config::set_repository_url`].
    pub fn set_repository_name(&mut self, name: &str) -> Result<()> {
        let name = name.trim().to_string();
        match self.active_profile_mut() {
            Some(profile) if profile.repository_name.is_some() => {
                profile.repository_name = Some(name)
            }
            _ => self.file.repository_name = name,
        }
        self.refresh()
    }

    /// Replace the synced directories for this platform.
    ///
    /// With an active profile the profile's entry for the current platform
    /// is updated; without one, the top-level lists are.
    pub fn set_sync_paths(&mut self, user: &[PathBuf], system: &[PathBuf]) -> Result<()> {
        let user = Some(to_strings(user));
        let system = Some(to_strings(system));
        let key = self.platform.key().to_string();

        match self.active_profile_mut() {
            Some(profile) => {
                let entry = profile.paths.entry(key).or_default();
                entry.user_paths = user;
                entry.system_paths = system;
            }
            None => {
                self.file.user_paths = user;
                self.file.system_paths = system;
            }
        }
        self.refresh()
    }

    fn active_profile_mut(&mut self) -> Option<&mut crate::schema::Profile> {
        let name = self.profile.as_deref()?;
        self.file.profiles.get_mut(name)
    }

    fn refresh(&mut self) -> Result<()> {
        self.resolved = resolve(&self.file, self.profile.as_deref(), self.platform)?;
        Ok(())
    }
}

fn resolve(file: &ConfigFile, profile: Option<&str>, platform: Platform) -> Result<Resolved> {
    let mut resolved = Resolved {
        repository_url: file.repository_url.clone(),
        repository_name: file.repository_name.clone(),
        auto_commit: file.auto_commit,
        commit_message_template: file.commit_message_template.clone(),
        branch_name: None,
        branch_prefix: file.branch_prefix.clone().unwrap_or_default(),
        branch_postfix: file.branch_postfix.clone().unwrap_or_default(),
        user_paths: file.user_paths.clone().unwrap_or_default(),
        system_paths: file.system_paths.clone().unwrap_or_default(),
    };

    let Some(name) = profile else {
        return Ok(resolved);
    };
    let Some(p) = file.profiles.get(name) else {
        let available = file.profiles.keys().cloned().collect::<Vec<_>>().join(", ");
        return Err(Error::ProfileNotFound {
            name: name.to_string(),
            available: if available.is_empty() {
                "none".to_string()
            } else {
                available
            },
        });
    };

    fn apply<T: Clone>(target: &mut T, value: &Option<T>) {
        if let Some(v) = value {
            *target = v.clone();
        }
    }

    apply(&mut resolved.repository_url, &p.repository_url);
    apply(&mut resolved.repository_name, &p.repository_name);
    apply(&mut resolved.auto_commit, &p.auto_commit);
    apply(&mut resolved.commit_message_template, &p.commit_message_template);
    apply(&mut resolved.branch_prefix, &p.branch_prefix);
    apply(&mut resolved.branch_postfix, &p.branch_postfix);
    apply(&mut resolved.user_paths, &p.user_paths);
    apply(&mut resolved.system_paths, &p.system_paths);
    resolved.branch_name = p.branch_name.clone().filter(|b| !b.trim().is_empty());

    if let Some(paths) = p.paths.get(platform.key()) {
        apply(&mut resolved.user_paths, &paths.user_paths);
        apply(&mut resolved.system_paths, &paths.system_paths);
    }

    Ok(resolved)
}

fn generated_defaults() -> ConfigFile {
    let home = dirs::home_dir().unwrap_or_default();
    ConfigFile::generated(
        Platform::current(),
        &discover_profile_paths(),
        &home,
        &|var| std::env::var(var).ok(),
    )
}

/// Where the configuration file is looked up.
///
/// `./orcasync-config.yaml` when it exists, otherwise
/// `<config dir>/orcasync/orcasync-config.yaml` (which may not exist yet).
pub fn find_config_file() -> PathBuf {
    if let Ok(cwd) = std::env::current_dir() {
        let local = cwd.join(CONFIG_FILE_NAME);
        if local.is_file() {
            return local;
        }
    }

    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_default()
        .join("orcasync")
        .join(CONFIG_FILE_NAME)
}

/// Local path of the sync repository for `config`.
///
/// `<data dir>/orcasync/<repository_name>`, where the data directory is
/// `$ORCASYNC_DATA_DIR` when set, otherwise the platform data directory.
pub fn repository_path(config: &Config) -> Result<PathBuf> {
    let base = match std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::data_dir().ok_or(Error::NoDataDir)?,
    };
    Ok(base.join("orcasync").join(config.repository_name()))
}

fn expand_all(paths: &[String]) -> Vec<PathBuf> {
    let home = dirs::home_dir();
    paths
        .iter()
        .filter(|p| !p.trim().is_empty())
        .map(|p| expand_home(p, home.as_deref()))
        .collect()
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home.to_path_buf(),
        (Some(rest), Some(home)) if rest.starts_with('/') || rest.starts_with('\\') => {
            home.join(&rest[1..])
        }
        _ => PathBuf::from(path),
    }
}

fn to_strings(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect()
}
