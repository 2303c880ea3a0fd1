//! Committing synced trees.

use orca_git::{SyncRepository, machine_hostname};
use orca_test_utils::{Machine, write_profile};

#[test]
fn test_commit_clean_tree_returns_false() {
    let machine = Machine::new();
    let mut repo = SyncRepository::open(machine.repo_path(), None).unwrap();
    let head = repo.git().head().unwrap().target();

    assert!(!repo.commit(None).unwrap());
    assert_eq!(repo.git().head().unwrap().target(), head);
}

#[test]
fn test_commit_default_message_names_host() {
    let machine = Machine::new();
    let user = machine.profile_dir("user");
    write_profile(&user, "a.json", "1");
    let mut repo = SyncRepository::open(machine.repo_path(), None).unwrap();
    repo.push_tree(&[user]).unwrap();

    assert!(repo.commit(None).unwrap());

    let head = repo.git().head().unwrap().peel_to_commit().unwrap();
    let message = head.message().unwrap();
    assert!(message.starts_with("Sync from "));
    assert!(message.contains(&machine_hostname()));
}

#[test]
fn test_commit_blank_message_uses_default() {
    let machine = Machine::new();
    let user = machine.profile_dir("user");
    write_profile(&user, "a.json", "1");
    let mut repo = SyncRepository::open(machine.repo_path(), None).unwrap();
    repo.push_tree(&[user]).unwrap();

    assert!(repo.commit(Some("   ")).unwrap());

    let head = repo.git().head().unwrap().peel_to_commit().unwrap();
    assert!(head.message().unwrap().starts_with("Sync from "));
}

#[test]
fn test_commit_records_deletions() {
    let machine = Machine::new();
    let user = machine.profile_dir("user");
    write_profile(&user, "a.json", "1");
    write_profile(&user, "b.json", "2");
    let mut repo = SyncRepository::open(machine.repo_path(), None).unwrap();
    repo.push_tree(&[user.clone()]).unwrap();
    repo.commit(Some("first")).unwrap();

    std::fs::remove_file(user.join("b.json")).unwrap();
    repo.push_tree(&[user]).unwrap();
    assert!(repo.commit(Some("second")).unwrap());

    let tree = repo.git().head().unwrap().peel_to_tree().unwrap();
    assert!(tree.get_path(std::path::Path::new("profiles/user/a.json")).is_ok());
    assert!(tree.get_path(std::path::Path::new("profiles/user/b.json")).is_err());

    let commits = repo
        .recent_commits(&repo.current_branch().unwrap().unwrap(), 10)
        .unwrap();
    assert_eq!(commits[0].message, "second");
    assert_eq!(commits[1].message, "first");
}
