use std::process::{Command, Output};

/// Run a git subcommand, returning its output only when it succeeded.
fn git(args: &[&str]) -> Option<Output> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
}

fn main() {
    for path in [".git/HEAD", ".git/refs/heads/", ".git/refs/tags/"] {
        println!("cargo:rerun-if-changed={path}");
    }

    let hash = git(&["rev-parse", "--short", "HEAD"])
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string());

    // Release builds sit exactly on a tag
    let is_release = git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();

    let is_dirty = git(&["status", "--porcelain"]).is_some_and(|output| !output.stdout.is_empty());
    let suffix = if is_dirty { "-dirty" } else { "" };

    println!("cargo:rustc-env=WORKLOG_GIT_HASH={hash}{suffix}");
    println!("cargo:rustc-env=WORKLOG_IS_RELEASE={is_release}");
}
