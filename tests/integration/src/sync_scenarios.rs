//! Cross-crate scenarios: configuration drives the engine on several
//! simulated machines sharing one bare store.

use orca_config::{Config, ConfigFile, Platform};
use orca_fs::list_files;
use orca_git::{Error, SyncRepository};
use orca_test_utils::{Machine, bare_remote, remote_branch_tip, remote_file, write_profile};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};

/// A machine's configuration: its own branch, syncing `user` and `system`.
fn machine_config(machine: &Machine, remote: &Path, hostname: &str) -> Config {
    let yaml = format!(
        r#"repository_url: "{url}"
branch_prefix: "orca-"
profiles:
  workshop:
    paths:
      {platform}:
        user_paths: ["{user}"]
        system_paths: ["{system}"]
"#,
        url = remote.display(),
        platform = Platform::current().key(),
        user = machine.profile_dir("user").display(),
        system = machine.profile_dir("system").display(),
    );
    let file: ConfigFile = serde_yaml::from_str(&yaml).unwrap();
    let config = Config::from_file(
        machine.root().join("orcasync-config.yaml"),
        file,
        Some("workshop"),
        Platform::current(),
    )
    .unwrap();
    assert_eq!(config.branch_name_for(hostname), format!("orca-{hostname}"));
    config
}

fn push_workflow(machine: &Machine, config: &Config, branch: &str) -> SyncRepository {
    let mut repo =
        SyncRepository::open(machine.repo_path(), Some(config.repository_url())).unwrap();
    repo.ensure_branch(branch).unwrap();
    repo.push_tree(&config.sync_paths()).unwrap();
    let message = config.commit_message(branch, "2024-05-01 12:00:00");
    if repo.commit(Some(&message)).unwrap() {
        repo.push(branch).unwrap();
    }
    repo
}

fn pull_workflow(machine: &Machine, config: &Config, branch: &str) -> Vec<PathBuf> {
    let mut repo =
        SyncRepository::open(machine.repo_path(), Some(config.repository_url())).unwrap();
    repo.ensure_branch(branch).unwrap();
    repo.pull(branch).unwrap();
    repo.pull_tree(&config.sync_paths()).unwrap()
}

#[test]
fn test_each_machine_owns_its_branch() {
    let store = Machine::new();
    let remote = bare_remote(&store.root().join("store.git"));

    let a = Machine::new();
    let a_config = machine_config(&a, &remote, "alpha");
    write_profile(&a.profile_dir("user"), "filament/PLA.json", "alpha");
    push_workflow(&a, &a_config, &a_config.branch_name_for("alpha"));

    let b = Machine::new();
    let b_config = machine_config(&b, &remote, "beta");
    write_profile(&b.profile_dir("user"), "filament/PLA.json", "beta");
    push_workflow(&b, &b_config, &b_config.branch_name_for("beta"));

    assert_eq!(
        remote_file(&remote, "orca-alpha", "profiles/user/filament/PLA.json").as_deref(),
        Some("alpha")
    );
    assert_eq!(
        remote_file(&remote, "orca-beta", "profiles/user/filament/PLA.json").as_deref(),
        Some("beta")
    );
}

#[test]
fn test_user_and_system_trees_round_trip() {
    let store = Machine::new();
    let remote = bare_remote(&store.root().join("store.git"));

    let a = Machine::new();
    let config = machine_config(&a, &remote, "alpha");
    write_profile(&a.profile_dir("user"), "process/0.2mm.json", "fine");
    write_profile(&a.profile_dir("system"), "BBL/machine.json", "vendor");
    let repo = push_workflow(&a, &config, "orca-alpha");

    let tracked = list_files(&repo.profiles_dir()).unwrap();
    assert_eq!(tracked.len(), 2);
    let head = repo.git().head().unwrap().peel_to_commit().unwrap();
    assert_eq!(
        head.message(),
        Some("Sync from orca-alpha - 2024-05-01 12:00:00")
    );

    // Same branch on another machine, e.g. a reinstall.
    let b = Machine::new();
    let b_config = machine_config(&b, &remote, "alpha");
    let restored = pull_workflow(&b, &b_config, "orca-alpha");

    assert_eq!(restored.len(), 2);
    assert_eq!(
        fs::read_to_string(b.profile_dir("system").join("BBL/machine.json")).unwrap(),
        "vendor"
    );
    assert_eq!(
        fs::read_to_string(b.profile_dir("user").join("process/0.2mm.json")).unwrap(),
        "fine"
    );
}

#[test]
fn test_deleted_profile_disappears_everywhere() {
    let store = Machine::new();
    let remote = bare_remote(&store.root().join("store.git"));

    let a = Machine::new();
    let config = machine_config(&a, &remote, "alpha");
    write_profile(&a.profile_dir("user"), "keep.json", "1");
    write_profile(&a.profile_dir("user"), "drop.json", "2");
    push_workflow(&a, &config, "orca-alpha");

    let b = Machine::new();
    let b_config = machine_config(&b, &remote, "alpha");
    pull_workflow(&b, &b_config, "orca-alpha");
    assert!(b.profile_dir("user").join("drop.json").is_file());

    fs::remove_file(a.profile_dir("user").join("drop.json")).unwrap();
    push_workflow(&a, &config, "orca-alpha");
    pull_workflow(&b, &b_config, "orca-alpha");

    assert!(!b.profile_dir("user").join("drop.json").exists());
    assert!(b.profile_dir("user").join("keep.json").is_file());
}

#[test]
fn test_diverged_machines_need_reconciliation() {
    let store = Machine::new();
    let remote = bare_remote(&store.root().join("store.git"));

    let a = Machine::new();
    let a_config = machine_config(&a, &remote, "alpha");
    write_profile(&a.profile_dir("user"), "PLA.json", "base");
    push_workflow(&a, &a_config, "orca-alpha");

    let b = Machine::new();
    let b_config = machine_config(&b, &remote, "alpha");
    pull_workflow(&b, &b_config, "orca-alpha");

    // Both edit the same profile; A pushes first.
    write_profile(&a.profile_dir("user"), "PLA.json", "from a");
    push_workflow(&a, &a_config, "orca-alpha");
    let tip = remote_branch_tip(&remote, "orca-alpha");

    write_profile(&b.profile_dir("user"), "PLA.json", "from b");
    let mut repo_b =
        SyncRepository::open(b.repo_path(), Some(b_config.repository_url())).unwrap();
    repo_b.ensure_branch("orca-alpha").unwrap();
    repo_b.push_tree(&b_config.sync_paths()).unwrap();
    assert!(repo_b.commit(None).unwrap());

    let push_err = repo_b.push("orca-alpha").unwrap_err();
    assert!(matches!(push_err, Error::NonFastForward { .. }), "got {push_err}");

    let pull_err = repo_b.pull("orca-alpha").unwrap_err();
    assert!(matches!(pull_err, Error::DivergentHistory { .. }), "got {pull_err}");

    assert_eq!(remote_branch_tip(&remote, "orca-alpha"), tip);
    assert_eq!(
        fs::read_to_string(b.profile_dir("user").join("PLA.json")).unwrap(),
        "from b"
    );
}
