use std::process::Command;

fn main() {
  embed_build_info();
  println!("cargo:rerun-if-changed=build.rs");
  println!("cargo:rerun-if-changed=.git/HEAD");
}

/// Commit hash and date of the build, logged at debug level on startup.
fn embed_build_info() {
  for (var, args) in [
    ("GIT_HASH", ["rev-parse", "--short", "HEAD"]),
    ("GIT_DATE", ["log", "-1", "--format=%cs"]),
  ] {
    let Ok(output) = Command::new("git").args(args).output() else {
      continue;
    };
    if !output.status.success() {
      continue;
    }
    let value = String::from_utf8(output.stdout).unwrap_or_default();
    println!("cargo:rustc-env={var}={}", value.trim());
  }
}
