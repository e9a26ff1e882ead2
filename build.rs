//! Embeds build metadata for the /version endpoint.

use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string());

    emit("BUILD_TIME", &stamp);
    emit("GIT_HASH", &capture("git", &["rev-parse", "--short", "HEAD"]));
    emit("RUST_VERSION", &capture("rustc", &["--version"]));

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=Cargo.toml");
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env={}={}", key, value);
}

/// Best-effort command capture; builds without git or rustc on PATH
/// report "unknown" instead of failing
fn capture(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
