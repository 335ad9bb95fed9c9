//! Build identification for emofuse-server
//!
//! Exposes to the crate:
//! - `GIT_HASH`: `EMOFUSE_GIT_HASH` if set (tarball builds), else the short
//!   commit hash, else "unknown"
//! - `BUILD_TIMESTAMP`: RFC 3339, seconds precision
//! - `BUILD_PROFILE`: cargo profile (debug/release)
//!
//! No rerun-if-changed directives are emitted, so the script runs on every
//! build and the values stay current.

use std::process::Command;

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    Some(hash.trim().to_string())
}

fn main() {
    let git_hash = std::env::var("EMOFUSE_GIT_HASH")
        .ok()
        .filter(|h| !h.is_empty())
        .or_else(git_short_hash)
        .unwrap_or_else(|| "unknown".to_string());

    let build_timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    for (key, value) in [
        ("GIT_HASH", git_hash),
        ("BUILD_TIMESTAMP", build_timestamp),
        ("BUILD_PROFILE", profile),
    ] {
        println!("cargo:rustc-env={}={}", key, value);
    }
}
