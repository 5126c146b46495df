//! Integration tests for scriptforge

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;

    fn scriptforge() -> Command {
        cargo_bin_cmd!("scriptforge")
    }

    #[test]
    fn help_displays() {
        scriptforge()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "run source snippets as cached toolchain projects",
            ));
    }

    #[test]
    fn version_displays() {
        scriptforge()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("scriptforge"));
    }

    #[test]
    fn run_requires_script_argument() {
        scriptforge()
            .arg("run")
            .assert()
            .failure()
            .stderr(predicate::str::contains("--script"));
    }

    #[test]
    fn run_missing_script_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        scriptforge()
            .args(["run", "--script", "does-not-exist.cs"])
            .current_dir(dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn invalid_config_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "not = [valid").unwrap();

        scriptforge()
            .arg("--config")
            .arg(&config)
            .arg("status")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }
}

#[cfg(unix)]
mod pipeline_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Stand-in toolchain: answers the version query, scaffolds on `new`,
    /// and drops a result artifact on `run`.
    const STUB_TOOLCHAIN: &str = r#"#!/bin/sh
case "$1" in
  --version) echo "2.1.403" ;;
  new) mkdir -p "$4" && : > "$4/project.csproj" ;;
  add) : ;;
  restore) : ;;
  build) : ;;
  run) printf '{"savedEnvironment":{"GREETING":"hello","DEPTH":"one\\\\two"}}' > execution-result.json ;;
  *) exit 2 ;;
esac
"#;

    fn write_stub(dir: &Path) -> PathBuf {
        let path = dir.join("stub-toolchain");
        std::fs::write(&path, STUB_TOOLCHAIN).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn write_config(dir: &Path, program: &Path) -> PathBuf {
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            format!("[toolchain]\nprogram = \"{}\"\n", program.display()),
        )
        .unwrap();
        path
    }

    fn scriptforge() -> Command {
        cargo_bin_cmd!("scriptforge")
    }

    #[test]
    fn run_captures_environment_map() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub(dir.path());
        let config = write_config(dir.path(), &stub);
        let script = dir.path().join("snippet.cs");
        std::fs::write(&script, "Console.WriteLine(1);").unwrap();

        scriptforge()
            .arg("--config")
            .arg(&config)
            .arg("run")
            .arg("--script")
            .arg(&script)
            .arg("--workspace")
            .arg(dir.path())
            .args(["-n", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("GREETING=hello"));

        // The escaping rule doubled the backslash on its way out
        scriptforge()
            .arg("--config")
            .arg(&config)
            .arg("run")
            .arg("--script")
            .arg(&script)
            .arg("--workspace")
            .arg(dir.path())
            .args(["-n", "2"])
            .assert()
            .success()
            .stdout(predicate::str::contains("DEPTH=one\\\\two"));
    }

    #[test]
    fn second_run_reuses_cache_entry() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub(dir.path());
        let config = write_config(dir.path(), &stub);
        let script = dir.path().join("snippet.cs");
        std::fs::write(&script, "Console.WriteLine(2);").unwrap();

        for build in ["1", "2"] {
            scriptforge()
                .arg("--config")
                .arg(&config)
                .arg("run")
                .arg("--script")
                .arg(&script)
                .arg("--workspace")
                .arg(dir.path())
                .args(["-n", build])
                .assert()
                .success();
        }

        // Exactly one cache entry, with a metadata marker inside the project
        let cache_root = dir.path().join(".scriptforge");
        let entries: Vec<_> = std::fs::read_dir(&cache_root).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let project = entries[0]
            .as_ref()
            .unwrap()
            .path()
            .join("project");
        assert!(project.join(".build-metadata.json").exists());
        assert!(project.join("TargetCode.cs").exists());
    }

    #[test]
    fn status_reports_supported_toolchain() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub(dir.path());
        let config = write_config(dir.path(), &stub);

        scriptforge()
            .arg("--config")
            .arg(&config)
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("2.1.403"))
            .stdout(predicate::str::contains("supported"));
    }
}
