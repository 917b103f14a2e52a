use std::process::Command;

fn git_hash() -> Option<String> {
    let out = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let hash = String::from_utf8(out.stdout).ok()?;
    Some(hash.trim().to_owned())
}

fn main() {
    // Appended to `song-tagger --version`
    let hash = git_hash().unwrap_or_else(|| "nogit".to_owned());
    println!("cargo:rustc-env=GIT_HASH={hash}");

    for path in [".git/HEAD", ".git/refs/heads/"] {
        println!("cargo:rerun-if-changed={path}");
    }
}
