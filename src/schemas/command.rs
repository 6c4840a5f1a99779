// Value types produced by the shell executor and the package-manager adapters.

use std::fmt;
use std::time::Duration;

/// A command to run: program, arguments and an optional deadline.
///
/// Arguments are passed to the OS as-is (no shell quoting involved), `Display`
/// renders the command line the way a user would type it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(program: &str) -> Self {
        CommandSpec {
            program: program.to_string(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// `sudo <program>`; the program becomes the first argument.
    pub fn sudo(program: &str) -> Self {
        CommandSpec::new("sudo").arg(program)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Outcome of one shell invocation. Never mutated after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// The command was killed at its deadline. `exit_code` is -1 in that case.
    pub timed_out: bool,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }

    /// stdout and stderr joined, trimmed. Used when surfacing failures verbatim.
    pub fn combined_output(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        match (stdout.is_empty(), stderr.is_empty()) {
            (true, _) => stderr.to_string(),
            (false, true) => stdout.to_string(),
            (false, false) => format!("{stdout}\n{stderr}"),
        }
    }
}

/// Result of an adapter mutation (install, uninstall, upgrade).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    pub success: bool,
    pub output: String,
}

impl InstallResult {
    pub fn failed(output: impl Into<String>) -> Self {
        InstallResult {
            success: false,
            output: output.into(),
        }
    }
}

impl From<&CommandResult> for InstallResult {
    fn from(result: &CommandResult) -> Self {
        InstallResult {
            success: result.success(),
            output: result.combined_output(),
        }
    }
}

/// One row of `search` or `list_installed` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
}

impl PackageInfo {
    pub fn named(name: &str) -> Self {
        PackageInfo {
            name: name.to_string(),
            version: None,
            description: None,
        }
    }

    pub fn with_version(mut self, version: Option<&str>) -> Self {
        self.version = version
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        self
    }

    pub fn with_description(mut self, description: Option<&str>) -> Self {
        self.description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        self
    }
}
