//! Environment health check
use std::{path::Path, process::Command};
use tracing::trace;

/// Minimum Node.js major version the templates are tested with
pub const MIN_NODE_MAJOR: u32 = 18;

/// Outcome of a single check
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Check {
    pub name: &'static str,
    pub passed: bool,
    /// Failing a required check means the environment is not ready
    pub required: bool,
    /// Version string or other detail
    pub detail: Option<String>,
    pub hint: Option<String>,
}

/// All checks
#[derive(Clone, Debug, Default)]
pub struct Report {
    pub checks: Vec<Check>,
}

impl Report {
    /// All required checks passed
    pub fn core_ready(&self) -> bool {
        self.checks.iter().filter(|check| check.required).all(|check| check.passed)
    }

    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }
}

/// `program --version`, if the program can be run and exits successfully
pub fn command_version(program: &str) -> Option<String> {
    let output = Command::new(program).arg("--version").output().ok()?;
    trace!("{program} --version exited with {}", output.status);
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Major version out of `v20.11.1`
fn node_major(version: &str) -> Option<u32> {
    version.trim().trim_start_matches('v').split('.').next()?.parse().ok()
}

fn tool(name: &'static str, program: &str) -> Check {
    let version = command_version(program);
    Check { name, passed: version.is_some(), required: true, detail: version, hint: None }
}

fn node() -> Check {
    let version = command_version("node");
    let hint = match version.as_deref().and_then(node_major) {
        Some(major) if major >= MIN_NODE_MAJOR => None,
        _ => Some(format!("Node.js {MIN_NODE_MAJOR}+ recommended")),
    };
    Check { name: "Node.js runtime", passed: hint.is_none(), required: false, detail: version, hint }
}

fn settings_file(path: &Path) -> Check {
    let exists = path.exists();
    Check {
        name: "Configuration file",
        passed: exists,
        required: false,
        detail: Some(path.display().to_string()),
        hint: (!exists).then(|| "Config created on first use".to_string()),
    }
}

/// Checks the Rust toolchain, Node.js and the settings file at `settings_path`
pub fn run(settings_path: &Path) -> Report {
    Report {
        checks: vec![
            tool("Rust compiler", "rustc"),
            tool("Cargo package manager", "cargo"),
            node(),
            settings_file(settings_path),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn node_versions() {
        assert_eq!(node_major("v20.11.1\n"), Some(20));
        assert_eq!(node_major("v16.0.0"), Some(16));
        assert_eq!(node_major("garbage"), None);
    }

    #[test]
    fn missing_command() {
        assert_eq!(command_version("l2-definitely-not-a-command"), None);
    }

    #[test]
    fn settings_check() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let check = settings_file(&path);
        assert!(!check.passed && !check.required);
        assert_eq!(check.hint.as_deref(), Some("Config created on first use"));

        std::fs::write(&path, "").unwrap();
        assert!(settings_file(&path).passed);
    }

    #[test]
    fn report_readiness() {
        let check = |required, passed| Check {
            name: "check",
            passed,
            required,
            detail: None,
            hint: None,
        };
        let report = Report { checks: vec![check(true, true), check(false, false)] };
        assert!(report.core_ready());
        assert!(!report.all_passed());

        let report = Report { checks: vec![check(true, false)] };
        assert!(!report.core_ready());
    }
}
