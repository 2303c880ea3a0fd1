//! Non-interactive credential handling for network operations.
//!
//! libgit2 never prompts on a terminal, but it re-invokes the credential
//! callback after every rejected attempt. The callback here offers the SSH
//! agent and the configured credential helper, each at most once, and then
//! fails with a message that classifies as an authentication error instead
//! of looping.

use std::cell::Cell;

use git2::{Config, Cred, CredentialType, FetchOptions, RemoteCallbacks};

/// Message reported once every credential source has been tried.
pub const NO_CREDENTIALS: &str =
    "authentication failed: no usable credentials (terminal prompts disabled)";

/// Build remote callbacks that resolve credentials without prompting.
pub fn callbacks<'a>(config: Option<Config>) -> RemoteCallbacks<'a> {
    let tried_agent = Cell::new(false);
    let tried_helper = Cell::new(false);

    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username_from_url, allowed| {
        let user = username_from_url.unwrap_or("git");

        if allowed.contains(CredentialType::USERNAME) {
            return Cred::username(user);
        }

        if allowed.is_ssh_key() && !tried_agent.replace(true) {
            return Cred::ssh_key_from_agent(user);
        }

        if allowed.is_user_pass_plaintext()
            && !tried_helper.replace(true)
            && let Some(ref cfg) = config
            && let Ok(cred) = Cred::credential_helper(cfg, url, username_from_url)
        {
            return Ok(cred);
        }

        tracing::debug!(url, "No credential source left to try");
        Err(git2::Error::from_str(NO_CREDENTIALS))
    });
    callbacks
}

/// Fetch options wired to the non-interactive credential callback.
pub fn fetch_options<'a>(config: Option<Config>) -> FetchOptions<'a> {
    let mut options = FetchOptions::new();
    options.remote_callbacks(callbacks(config));
    options
}

/// Credential helper written into a fresh repository's config, if the
/// platform has a conventional one. Linux relies on the user's global git
/// configuration.
pub fn platform_credential_helper(os: &str) -> Option<&'static str> {
    match os {
        "macos" => Some("osxkeychain"),
        "windows" => Some("wincred"),
        _ => None,
    }
}
