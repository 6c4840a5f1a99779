//! Scripted stand-ins for the shell and the downloader.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::libs::context::InstallContext;
use crate::libs::downloads::Fetcher;
use crate::libs::lifecycle::InstallError;
use crate::libs::shell::{Shell, ShellError};
use crate::schemas::command::{CommandResult, CommandSpec};
use crate::schemas::platform::{PlatformDescriptor, PlatformKind};
use crate::schemas::settings::Settings;

struct Rule {
    prefix: String,
    result: CommandResult,
    provides: Vec<String>,
}

/// Records every command line it is asked to run and answers from a list of
/// prefix rules. Unmatched commands exit 0 with empty output.
#[derive(Default)]
pub struct FakeShell {
    on_path: RefCell<BTreeSet<String>>,
    rules: Vec<Rule>,
    calls: RefCell<Vec<String>>,
}

impl FakeShell {
    pub fn new() -> Self {
        FakeShell::default()
    }

    /// Puts `program` on PATH from the start.
    pub fn with_command(self, program: &str) -> Self {
        self.on_path.borrow_mut().insert(program.to_string());
        self
    }

    /// Answers commands starting with `prefix`.
    pub fn respond(mut self, prefix: &str, exit_code: i32, stdout: &str) -> Self {
        self.rules.push(Rule {
            prefix: prefix.to_string(),
            result: CommandResult {
                exit_code,
                stdout: stdout.to_string(),
                ..Default::default()
            },
            provides: Vec::new(),
        });
        self
    }

    /// Running a command starting with `prefix` succeeds and puts `program`
    /// on PATH.
    pub fn provides(mut self, prefix: &str, program: &str) -> Self {
        self.rules.push(Rule {
            prefix: prefix.to_string(),
            result: CommandResult::default(),
            provides: vec![program.to_string()],
        });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn ran(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

impl Shell for FakeShell {
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult, ShellError> {
        let line = spec.to_string();
        self.calls.borrow_mut().push(line.clone());
        match self.rules.iter().find(|rule| line.starts_with(&rule.prefix)) {
            Some(rule) => {
                self.on_path
                    .borrow_mut()
                    .extend(rule.provides.iter().cloned());
                Ok(rule.result.clone())
            }
            None => Ok(CommandResult::default()),
        }
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        self.on_path
            .borrow()
            .contains(program)
            .then(|| PathBuf::from("/usr/bin").join(program))
    }
}

/// Writes a small placeholder file for every URL and remembers the URLs.
#[derive(Default)]
pub struct FakeFetcher {
    urls: RefCell<Vec<String>>,
    payload: Option<Vec<u8>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        FakeFetcher::default()
    }

    /// Serves `bytes` instead of the placeholder.
    pub fn serving(bytes: Vec<u8>) -> Self {
        FakeFetcher {
            urls: RefCell::default(),
            payload: Some(bytes),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.borrow().clone()
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), InstallError> {
        self.urls.borrow_mut().push(url.to_string());
        let bytes = self.payload.clone().unwrap_or_else(|| b"#!/bin/sh\n".to_vec());
        fs::write(dest, bytes)?;
        Ok(())
    }
}

pub fn platform(kind: &str, architecture: &str, package_manager: &str) -> PlatformDescriptor {
    PlatformDescriptor::new(PlatformKind::from_id(kind), architecture, package_manager)
}

pub fn context<'a>(
    platform: PlatformDescriptor,
    shell: &'a FakeShell,
    fetcher: &'a FakeFetcher,
    settings: &'a Settings,
) -> InstallContext<'a> {
    InstallContext::new(platform, shell, fetcher, settings)
}

/// Settings whose profiles and user bin dir live inside `dir`.
pub fn sandboxed_settings(dir: &Path) -> Settings {
    Settings {
        shell_profiles: vec![dir.join(".bashrc").display().to_string()],
        user_bin_dir: dir.join("bin").display().to_string(),
        ..Settings::default()
    }
}
