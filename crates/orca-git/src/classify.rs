//! Classification of raw backend failure messages.
//!
//! libgit2 and the transports it drives report failures as free text. This
//! module maps that text onto a small taxonomy with case-insensitive
//! substring matching. The phrase lists track wording used by git servers
//! and libgit2 and need updating when that wording changes; nothing outside
//! this module inspects message text.

/// Category of a remote-layer failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credentials missing, rejected, or not obtainable without a prompt
    Auth,
    /// The remote repository does not exist or is hidden from this user
    NotFound,
    /// The remote branch has commits the local branch lacks
    NonFastForward,
    /// Anything else
    Generic,
}

const AUTH_PHRASES: &[&str] = &[
    "authentication failed",
    "could not read username",
    "could not read password",
    "permission denied",
    "authentication error",
    "invalid credentials",
    "access denied",
    "terminal prompts disabled",
    "no credentials",
    "403",
    "401",
];

const NOT_FOUND_PHRASES: &[&str] = &["repository not found", "404"];

const NON_FAST_FORWARD_PHRASES: &[&str] = &[
    "non-fast-forward",
    "non-fastforwardable",
    "fetch first",
    "not present locally",
];

const DIVERGENT_PHRASES: &[&str] = &["divergent branches", "need to specify how to reconcile"];

/// Classify a raw backend message. Authentication phrases win over the rest.
pub fn classify(message: &str) -> ErrorKind {
    let lower = message.to_lowercase();
    let matches = |phrases: &[&str]| phrases.iter().any(|p| lower.contains(p));

    if matches(AUTH_PHRASES) {
        ErrorKind::Auth
    } else if matches(NOT_FOUND_PHRASES) {
        ErrorKind::NotFound
    } else if matches(NON_FAST_FORWARD_PHRASES) {
        ErrorKind::NonFastForward
    } else {
        ErrorKind::Generic
    }
}

/// Whether a pull failure means local and remote history have diverged.
pub fn is_divergent(message: &str) -> bool {
    let lower = message.to_lowercase();
    DIVERGENT_PHRASES.iter().any(|p| lower.contains(p))
}

/// Remediation hints for an authentication failure on the given OS
/// (`std::env::consts::OS` values). Empty for unknown platforms.
pub fn auth_hints(os: &str) -> String {
    let steps: &[&str] = match os {
        "macos" => &[
            "Switch the repository_url in orcasync-config.yaml to an SSH remote (git@host:owner/repo.git)",
            "Or configure the keychain helper: git config --global credential.helper osxkeychain",
            "Or authenticate once by running `git push` inside the sync repository",
        ],
        "windows" => &[
            "Switch the repository_url in orcasync-config.yaml to an SSH remote (git@host:owner/repo.git)",
            "Or configure Git Credential Manager: git config --global credential.helper manager",
            "Or authenticate once by running `git push` inside the sync repository",
        ],
        "linux" => &[
            "Switch the repository_url in orcasync-config.yaml to an SSH remote and load your key into ssh-agent",
            "Or configure a credential helper: git config --global credential.helper store",
        ],
        _ => &[],
    };

    if steps.is_empty() {
        return String::new();
    }

    let mut hints = format!("\n\nSolutions for {os}:");
    for (i, step) in steps.iter().enumerate() {
        hints.push_str(&format!("\n{}. {}", i + 1, step));
    }
    hints
}
