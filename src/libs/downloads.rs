// Release downloads. Installers fetch prebuilt binaries and tarballs from
// fixed vendor URLs into a scratch directory that is removed when the
// installer is done with it.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use colored::Colorize;
use tempfile::TempDir;

use crate::libs::lifecycle::InstallError;
use crate::{log_debug, log_info};

/// Downloads `url` to `dest`. Mocked in tests.
pub trait Fetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), InstallError>;
}

/// `ureq`-backed fetcher. The timeout bounds connecting and each read, not
/// the whole transfer, so large tarballs on slow links still complete while a
/// stalled connection is abandoned.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(stall_timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new()
            .user_agent(concat!("dev-install/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = stall_timeout {
            builder = builder.timeout_connect(timeout).timeout_read(timeout);
        }
        HttpFetcher {
            agent: builder.build(),
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), InstallError> {
        log_debug!("[Download] Starting download from URL: {}", url.blue());

        let response = self.agent.get(url).call().map_err(|e| InstallError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let mut file = File::create(dest)?;
        let mut reader = response.into_reader();
        io::copy(&mut reader, &mut file).map_err(|e| InstallError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        log_debug!("[Download] Saved to {}", dest.display().to_string().green());
        Ok(())
    }
}

/// A downloaded file living inside its own temporary directory. Dropping it
/// deletes both.
pub struct Download {
    dir: TempDir,
    path: PathBuf,
}

impl Download {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Fetches `url` into a fresh temporary directory as `file_name`.
pub fn download(fetcher: &dyn Fetcher, url: &str, file_name: &str) -> Result<Download, InstallError> {
    let dir = tempfile::Builder::new().prefix("dev-install-").tempdir()?;
    let path = dir.path().join(file_name);
    log_info!("Downloading {}", url.cyan());
    fetcher.fetch(url, &path)?;
    Ok(Download { dir, path })
}
