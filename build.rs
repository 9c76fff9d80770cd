// SPDX-License-Identifier: MPL-2.0

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");

    // Packagers can pin the version string without a git checkout
    let version = match std::env::var("RETRO_CAM_VERSION") {
        Ok(v) => v,
        Err(_) => describe_version(),
    };

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Build a version string from `git describe`:
/// "0.1.0" on a tag becomes "0.1.0-abcdef1",
/// "0.1.0-5-gabcdef1" becomes "0.1.0-dirty-abcdef1".
fn describe_version() -> String {
    let pkg_version = env!("CARGO_PKG_VERSION");

    let Some(described) = git(&["describe", "--tags", "--always", "--match", "v*"]) else {
        return pkg_version.to_string();
    };
    let described = described.strip_prefix('v').unwrap_or(&described).to_string();

    let parts: Vec<&str> = described.rsplitn(3, '-').collect();
    if parts.len() == 3 {
        let hash = parts[0].strip_prefix('g').unwrap_or(parts[0]);
        return format!("{}-dirty-{}", parts[2], hash);
    }

    match git(&["rev-parse", "--short", "HEAD"]) {
        // `--always` falls back to a bare hash when no tag exists
        Some(hash) if hash == described => format!("{}-{}", pkg_version, hash),
        Some(hash) => format!("{}-{}", described, hash),
        None => described,
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}
