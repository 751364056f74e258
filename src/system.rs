use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::runner::{self, CommandOutcome};

/// The host state the probes read: files, env, PATH and subprocesses.
pub trait SystemInspector {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    fn path_exists(&self, path: &Path) -> bool;
    fn env_var(&self, name: &str) -> Option<String>;
    fn which(&self, program: &str) -> Option<PathBuf>;
    fn run(&self, program: &str, args: &[String], timeout: Duration) -> CommandOutcome;
}

/// The real machine.
pub struct HostSystem;

impl SystemInspector for HostSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = std::fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|v| v.to_string_lossy().into_owned())
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    fn run(&self, program: &str, args: &[String], timeout: Duration) -> CommandOutcome {
        runner::run_command(program, args, timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn read_missing_file_is_err() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(HostSystem
            .read_to_string(&tmp.path().join("nope"))
            .is_err());
    }

    #[test]
    fn read_tolerates_invalid_utf8() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("osrelease");
        std::fs::write(&path, b"5.15.0-\xffmicrosoft\n").unwrap();
        let text = HostSystem.read_to_string(&path).unwrap();
        assert!(text.contains("microsoft"));
    }

    #[test]
    fn path_exists_checks_presence() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(HostSystem.path_exists(tmp.path()));
        assert!(!HostSystem.path_exists(&tmp.path().join("missing")));
    }

    #[test]
    #[serial]
    fn env_var_unset_is_none() {
        std::env::remove_var("WSL_GPU_CHECK_TEST_VAR");
        assert_eq!(HostSystem.env_var("WSL_GPU_CHECK_TEST_VAR"), None);

        std::env::set_var("WSL_GPU_CHECK_TEST_VAR", "wayland-0");
        assert_eq!(
            HostSystem.env_var("WSL_GPU_CHECK_TEST_VAR").as_deref(),
            Some("wayland-0")
        );
        std::env::remove_var("WSL_GPU_CHECK_TEST_VAR");
    }

    #[cfg(unix)]
    #[test]
    fn which_resolves_sh() {
        let path = HostSystem.which("sh").expect("sh should be on PATH");
        assert!(path.is_absolute());
    }

    #[test]
    fn which_missing_tool_is_none() {
        assert_eq!(HostSystem.which("definitely-not-a-real-tool-xyz"), None);
    }
}
