//! On-disk layout of `orcasync-config.yaml`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::platform::{DiscoveredPaths, Platform};

pub const DEFAULT_REPOSITORY_NAME: &str = "orca-profiles";
pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "Sync from {hostname} - {timestamp}";

/// The whole configuration file.
///
/// Top-level settings apply to every profile; a profile overrides any of
/// them, and its `paths` entry for the current platform overrides the path
/// lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub repository_url: String,

    #[serde(default = "default_repository_name")]
    pub repository_name: String,

    #[serde(default = "default_true")]
    pub auto_commit: bool,

    #[serde(default = "default_message_template")]
    pub commit_message_template: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_postfix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_paths: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_paths: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profiles: BTreeMap<String, Profile>,
}

/// A named set of overrides, e.g. one per printer farm or per machine role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Fixed branch name; without it the branch is derived from the hostname
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_postfix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_commit: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_message_template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_paths: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_paths: Option<Vec<String>>,

    /// Per-platform path lists, keyed `Linux`, `Darwin` or `Windows`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub paths: BTreeMap<String, PlatformPaths>,
}

/// Path lists for one platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformPaths {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_paths: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_paths: Option<Vec<String>>,
}

fn default_repository_name() -> String {
    DEFAULT_REPOSITORY_NAME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_message_template() -> String {
    DEFAULT_MESSAGE_TEMPLATE.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            repository_url: String::new(),
            repository_name: default_repository_name(),
            auto_commit: true,
            commit_message_template: default_message_template(),
            default_profile: None,
            branch_prefix: None,
            branch_postfix: None,
            user_paths: None,
            system_paths: None,
            profiles: BTreeMap::new(),
        }
    }
}

impl ConfigFile {
    /// The configuration written when none exists yet.
    ///
    /// A `default` profile on branch `main` syncs the standard `user`
    /// directory of every platform. On `current`, the first discovered
    /// `user` directory wins over the standard one. System profiles are not
    /// synced by default.
    pub fn generated(
        current: Platform,
        discovered: &DiscoveredPaths,
        home: &Path,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Self {
        let paths = Platform::ALL
            .iter()
            .map(|platform| {
                let standard = platform.standard_paths(home, env).user;
                let user = match discovered.user.first() {
                    Some(found) if *platform == current => found.clone(),
                    _ => standard,
                };
                let entry = PlatformPaths {
                    user_paths: Some(vec![user.to_string_lossy().into_owned()]),
                    system_paths: Some(Vec::new()),
                };
                (platform.key().to_string(), entry)
            })
            .collect();

        let profile = Profile {
            branch_name: Some(DEFAULT_BRANCH.to_string()),
            paths,
            ..Profile::default()
        };

        Self {
            default_profile: Some(DEFAULT_PROFILE.to_string()),
            profiles: BTreeMap::from([(DEFAULT_PROFILE.to_string(), profile)]),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_minimal_yaml_fills_defaults() {
        let file: ConfigFile = serde_yaml::from_str("repository_url: git@host:me/p.git\n").unwrap();
        assert_eq!(file.repository_url, "git@host:me/p.git");
        assert_eq!(file.repository_name, "orca-profiles");
        assert!(file.auto_commit);
        assert_eq!(file.commit_message_template, DEFAULT_MESSAGE_TEMPLATE);
        assert!(file.profiles.is_empty());
    }

    #[test]
    fn test_profile_with_platform_paths_parses() {
        let yaml = r#"
profiles:
  farm:
    branch_prefix: farm-
    paths:
      Linux:
        user_paths: ["/srv/orca/user"]
"#;
        let file: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        let farm = &file.profiles["farm"];
        assert_eq!(farm.branch_prefix.as_deref(), Some("farm-"));
        assert_eq!(
            farm.paths["Linux"].user_paths,
            Some(vec!["/srv/orca/user".to_string()])
        );
        assert_eq!(farm.paths["Linux"].system_paths, None);
    }

    #[test]
    fn test_generated_prefers_discovered_user_dir_on_current_platform() {
        let discovered = DiscoveredPaths {
            user: vec![PathBuf::from("/found/user")],
            system: vec![PathBuf::from("/found/system")],
        };
        let file = ConfigFile::generated(Platform::Linux, &discovered, Path::new("/h"), &no_env);

        assert_eq!(file.default_profile.as_deref(), Some("default"));
        let profile = &file.profiles["default"];
        assert_eq!(profile.branch_name.as_deref(), Some("main"));
        assert_eq!(
            profile.paths["Linux"].user_paths,
            Some(vec!["/found/user".to_string()])
        );
        assert_eq!(profile.paths["Linux"].system_paths, Some(vec![]));
        assert_eq!(
            profile.paths["Darwin"].user_paths,
            Some(vec![
                "/h/Library/Application Support/OrcaSlicer/user".to_string()
            ])
        );
    }

    #[test]
    fn test_unset_options_are_not_serialized() {
        let yaml = serde_yaml::to_string(&ConfigFile::default()).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        let mapping = value.as_mapping().unwrap();

        assert!(!mapping.contains_key("branch_prefix"));
        assert!(!mapping.contains_key("default_profile"));
        assert!(!mapping.contains_key("profiles"));
        assert_eq!(
            mapping.get("repository_name").and_then(|v| v.as_str()),
            Some("orca-profiles")
        );
    }
}
