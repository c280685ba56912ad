// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build identification, stamped in at compile time.
//!
//! Set `AGENTSYNC_GIT_BRANCH`, `AGENTSYNC_GIT_HASH` and `AGENTSYNC_BUILD_TYPE`
//! in the environment of `cargo build` (usually from the release pipeline).
//! Unset values fall back to the crate version, `dev` and `unknown`.

/// Branch or tag the binary was built from, e.g. `v1.0.2-5-g12350123`.
pub fn git_branch() -> &'static str {
    option_env!("AGENTSYNC_GIT_BRANCH").unwrap_or(env!("CARGO_PKG_VERSION"))
}

pub fn git_hash() -> &'static str {
    option_env!("AGENTSYNC_GIT_HASH").unwrap_or("dev")
}

pub fn build_type() -> &'static str {
    option_env!("AGENTSYNC_BUILD_TYPE").unwrap_or("unknown")
}

/// Full version line, used for `--version` and the startup log.
pub fn version_string() -> String {
    format_version(git_branch(), git_hash(), build_type())
}

fn format_version(branch: &str, hash: &str, build_type: &str) -> String {
    format!("version: {branch}, hash: {hash}, buildType: {build_type}")
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
