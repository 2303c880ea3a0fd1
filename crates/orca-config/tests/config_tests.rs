//! Loading, profile resolution and saving of `orcasync-config.yaml`.

use orca_config::{Config, ConfigFile, Error, Platform};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FARM_CONFIG: &str = r#"
repository_url: git@github.com:me/orca-profiles.git
repository_name: printers
branch_prefix: "orca-"
branch_postfix: "-pc"
user_paths: ["/global/user"]
default_profile: studio
profiles:
  studio:
    branch_name: studio-main
    paths:
      Linux:
        user_paths: ["/linux/user"]
        system_paths: ["/linux/system"]
      Darwin:
        user_paths: ["/mac/user"]
  farm:
    repository_name: farm-profiles
    commit_message_template: "[{hostname}] {timestamp}"
"#;

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("orcasync-config.yaml");
    fs::write(&path, content).unwrap();
    path
}

fn load_on(path: &Path, profile: Option<&str>, platform: Platform) -> Result<Config, Error> {
    let file: ConfigFile = serde_yaml::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    Config::from_file(path.to_path_buf(), file, profile, platform)
}

#[test]
fn test_default_profile_applies_platform_paths() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), FARM_CONFIG);

    let config = load_on(&path, None, Platform::Linux).unwrap();

    assert_eq!(config.active_profile_name(), Some("studio"));
    assert_eq!(config.branch_name_for("box"), "studio-main");
    assert_eq!(config.repository_name(), "printers");
    assert_eq!(config.user_paths(), vec![PathBuf::from("/linux/user")]);
    assert_eq!(
        config.sync_paths(),
        vec![PathBuf::from("/linux/user"), PathBuf::from("/linux/system")]
    );
}

#[test]
fn test_platform_entry_without_system_keeps_global() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), FARM_CONFIG);

    let config = load_on(&path, None, Platform::Darwin).unwrap();

    assert_eq!(config.user_paths(), vec![PathBuf::from("/mac/user")]);
    assert!(config.system_paths().is_empty());
}

#[test]
fn test_platform_without_entry_uses_global_paths() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), FARM_CONFIG);

    let config = load_on(&path, None, Platform::Windows).unwrap();

    assert_eq!(config.user_paths(), vec![PathBuf::from("/global/user")]);
}

#[test]
fn test_explicit_profile_overrides_default() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), FARM_CONFIG);

    let config = load_on(&path, Some("farm"), Platform::Linux).unwrap();

    assert_eq!(config.active_profile_name(), Some("farm"));
    assert_eq!(config.repository_name(), "farm-profiles");
    assert_eq!(
        config.repository_url(),
        "git@github.com:me/orca-profiles.git"
    );
    assert_eq!(config.branch_name_for("box"), "orca-box-pc");
    assert_eq!(
        config.commit_message("box", "2024-01-02 03:04:05"),
        "[box] 2024-01-02 03:04:05"
    );
}

#[test]
fn test_unknown_profile_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), FARM_CONFIG);

    let err = Config::load(Some(&path), Some("garage")).unwrap_err();

    match err {
        Error::ProfileNotFound { name, available } => {
            assert_eq!(name, "garage");
            assert_eq!(available, "farm, studio");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_no_profile_uses_global_settings() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        "repository_url: https://example.com/p.git\nbranch_prefix: lab-\n",
    );

    let config = Config::load(Some(&path), None).unwrap();

    assert_eq!(config.active_profile_name(), None);
    assert!(config.list_profiles().is_empty());
    assert_eq!(config.branch_name_for("node7"), "lab-node7");
    assert_eq!(config.repository_name(), "orca-profiles");
    assert!(config.auto_commit());
    assert_eq!(
        config.commit_message("node7", "ts"),
        "Sync from node7 - ts"
    );
}

#[test]
fn test_empty_file_behaves_like_empty_mapping() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "");

    let config = Config::load(Some(&path), None).unwrap();

    assert_eq!(config.repository_url(), "");
    assert_eq!(config.repository_name(), "orca-profiles");
}

#[test]
fn test_malformed_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "profiles: [unclosed");

    let err = Config::load(Some(&path), None).unwrap_err();
    assert!(matches!(err, Error::Fs(_)), "got {err}");
}

#[test]
fn test_missing_file_generates_default_profile() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.yaml");

    let config = Config::load(Some(&path), None).unwrap();

    assert!(!config.exists());
    assert_eq!(config.list_profiles(), vec!["default".to_string()]);
    assert_eq!(config.active_profile_name(), Some("default"));
    assert_eq!(config.branch_name(), "main");
    assert_eq!(config.user_paths().len(), 1);
    assert!(config.system_paths().is_empty());
}

#[test]
fn test_save_then_load_preserves_edits() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/orcasync-config.yaml");

    let mut config = Config::load(Some(&path), None).unwrap();
    config.set_repository_url(" https://example.com/store.git ").unwrap();
    config.set_repository_name("shop").unwrap();
    config
        .set_sync_paths(&[PathBuf::from("/srv/orca/user")], &[])
        .unwrap();
    config.save().unwrap();

    let reloaded = Config::load(Some(&path), None).unwrap();
    assert!(reloaded.exists());
    assert_eq!(reloaded.repository_url(), "https://example.com/store.git");
    assert_eq!(reloaded.repository_name(), "shop");
    assert_eq!(reloaded.user_paths(), vec![PathBuf::from("/srv/orca/user")]);
    assert_eq!(reloaded.branch_name(), "main");
}

#[test]
fn test_set_sync_paths_without_profile_writes_globals() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "repository_url: ''\n");

    let mut config = Config::load(Some(&path), None).unwrap();
    config
        .set_sync_paths(&[PathBuf::from("/u")], &[PathBuf::from("/s")])
        .unwrap();

    assert_eq!(config.file().user_paths, Some(vec!["/u".to_string()]));
    assert_eq!(
        config.sync_paths(),
        vec![PathBuf::from("/u"), PathBuf::from("/s")]
    );
}

#[rstest]
#[case("", "", "host", "host")]
#[case("orca-", "", "host", "orca-host")]
#[case("", "-laptop", "host", "host-laptop")]
#[case("a/", "/b", "h", "a/h/b")]
fn test_branch_name_from_affixes(
    #[case] prefix: &str,
    #[case] postfix: &str,
    #[case] hostname: &str,
    #[case] expected: &str,
) {
    let file = ConfigFile {
        branch_prefix: Some(prefix.to_string()),
        branch_postfix: Some(postfix.to_string()),
        ..ConfigFile::default()
    };
    let config = Config::from_file(PathBuf::from("c.yaml"), file, None, Platform::Linux).unwrap();
    assert_eq!(config.branch_name_for(hostname), expected);
}
