use std::path::{Path, PathBuf};
use std::process::Command;

/// Stamp `EXTRACTO_BUILD_SHA` (short commit, or "unknown" outside a git
/// checkout) for `extracto --version`.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_default());

    let sha = git(&manifest_dir, &["rev-parse", "--short", "HEAD"])
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=EXTRACTO_BUILD_SHA={sha}");

    // HEAD only changes on checkout; commits move the branch ref it points at
    if let Some(git_dir) = git(&manifest_dir, &["rev-parse", "--absolute-git-dir"]) {
        for path in watched_refs(Path::new(&git_dir)) {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }
}

fn git(dir: &Path, args: &[&str]) -> Option<String> {
    let out = Command::new("git").arg("-C").arg(dir).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// `HEAD`, the ref file it names and `packed-refs`, whichever exist.
fn watched_refs(git_dir: &Path) -> Vec<PathBuf> {
    let head = git_dir.join("HEAD");
    let mut paths = vec![git_dir.join("packed-refs")];

    if let Some(target) = std::fs::read_to_string(&head)
        .ok()
        .and_then(|s| s.strip_prefix("ref:").map(|r| r.trim().to_string()))
    {
        paths.push(git_dir.join(target));
    }
    paths.push(head);

    paths.into_iter().filter(|p| p.exists()).collect()
}
