use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

fn main() {
    // Build number comes from CI when set, else from a checked-in counter file
    let build_number = env::var("PNGSHUFFLE_BUILD_NUMBER")
        .ok()
        .or_else(|| fs::read_to_string(Path::new("BUILD_NUMBER")).ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(0);

    let profile = env::var("PROFILE").unwrap_or_else(|_| "debug".to_string());
    let profile_label = if profile == "release" { "release" } else { "development" };

    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.1.0".to_string());

    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=PNGSHUFFLE_VERSION={}", version);
    println!("cargo:rustc-env=PNGSHUFFLE_BUILD={}", build_number);
    println!("cargo:rustc-env=PNGSHUFFLE_PROFILE={}", profile_label);
    println!("cargo:rustc-env=PNGSHUFFLE_GIT_HASH={}", git_hash);

    println!("cargo:rerun-if-changed=BUILD_NUMBER");
    println!("cargo:rerun-if-env-changed=PNGSHUFFLE_BUILD_NUMBER");
    println!("cargo:rerun-if-env-changed=PROFILE");
}
