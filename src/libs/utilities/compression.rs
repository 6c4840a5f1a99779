// Unpacking of vendor release archives.

use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tar::Archive;
use zip::ZipArchive;

use colored::Colorize;

use crate::log_debug;

/// Archive formats we unpack in-process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
}

impl ArchiveKind {
    /// Derives the format from a file name; `None` for anything we do not
    /// unpack ourselves.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(ArchiveKind::TarGz)
        } else if lower.ends_with(".zip") {
            Some(ArchiveKind::Zip)
        } else {
            None
        }
    }
}

/// Extracts `src` into `dest/extracted` and returns that directory.
pub fn extract_archive(src: &Path, dest: &Path, kind: ArchiveKind) -> io::Result<PathBuf> {
    log_debug!(
        "[Utils] Extracting {:?} archive {} into {}",
        kind,
        src.display().to_string().blue(),
        dest.display().to_string().cyan()
    );

    let extracted = dest.join("extracted");
    fs::create_dir_all(&extracted)?;

    match kind {
        ArchiveKind::TarGz => {
            let mut archive = Archive::new(GzDecoder::new(File::open(src)?));
            archive.unpack(&extracted)?;
        }
        ArchiveKind::Zip => {
            let mut archive = ZipArchive::new(File::open(src)?)?;
            archive.extract(&extracted)?;
        }
    }

    log_debug!("[Utils] Archive contents available at: {}", extracted.display().to_string().green());
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn tar_gz_with(path_in_archive: &str, contents: &[u8]) -> Vec<u8> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, path_in_archive, contents).unwrap();
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn kind_from_file_name() {
        assert_eq!(ArchiveKind::from_file_name("pandoc-3.7-linux-arm64.tar.gz"), Some(ArchiveKind::TarGz));
        assert_eq!(ArchiveKind::from_file_name("pandoc-3.7-windows-x86_64.ZIP"), Some(ArchiveKind::Zip));
        assert_eq!(ArchiveKind::from_file_name("yq_linux_amd64"), None);
    }

    #[test]
    fn unpacks_tar_gz() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("pandoc.tar.gz");
        fs::write(&archive, tar_gz_with("pandoc-3.7/bin/pandoc", b"#!/bin/sh\n")).unwrap();

        let out = extract_archive(&archive, dir.path(), ArchiveKind::TarGz).unwrap();
        assert!(out.join("pandoc-3.7/bin/pandoc").is_file());
    }

    #[test]
    fn unpacks_zip() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("pandoc.zip");
        {
            let mut writer = zip::ZipWriter::new(File::create(&archive).unwrap());
            writer
                .start_file("pandoc-3.7/pandoc.exe", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(b"MZ").unwrap();
            writer.finish().unwrap();
        }

        let out = extract_archive(&archive, dir.path(), ArchiveKind::Zip).unwrap();
        assert!(out.join("pandoc-3.7/pandoc.exe").is_file());
    }

    #[test]
    fn corrupt_archive_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.zip");
        fs::write(&archive, b"not a zip").unwrap();
        assert!(extract_archive(&archive, dir.path(), ArchiveKind::Zip).is_err());
    }
}
