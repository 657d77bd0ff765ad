use std::process::Command;

fn git_version() -> Option<String> {
    let out = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let raw = String::from_utf8_lossy(&out.stdout).trim().to_string();
    Some(raw.strip_prefix('v').unwrap_or(&raw).to_string())
}

fn main() {
    let version = git_version().unwrap_or_else(|| env!("CARGO_PKG_VERSION").into());
    println!("cargo:rustc-env=GIT_VERSION={version}");
}
