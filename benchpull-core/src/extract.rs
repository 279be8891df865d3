// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Archive extraction (`.tar.gz`).
//!
//! Entries are unpacked into a private staging directory first and only
//! promoted into the destination once the whole archive unpacked cleanly.
//! A truncated or corrupt archive therefore never leaves a runnable tree.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::error::ExtractionError;

/// Gzip-compressed tar extractor.
pub struct Extractor;

impl Extractor {
    /// Unpack `archive` into `destination`, preserving the archive's internal
    /// directory structure. Returns the promoted top-level entries, sorted.
    ///
    /// `staging` must be on the same filesystem as `destination`; it is
    /// removed again before returning.
    /// Must only be called on an archive that already passed verification.
    pub fn extract(
        archive: &Path,
        destination: &Path,
        staging: &Path,
    ) -> Result<Vec<PathBuf>, ExtractionError> {
        let staging = staging.to_path_buf();

        let file = File::open(archive).map_err(|e| ExtractionError::Open {
            path: archive.to_path_buf(),
            source: e,
        })?;

        discard_staging(&staging);
        std::fs::create_dir_all(&staging).map_err(|e| ExtractionError::Promote {
            path: staging.clone(),
            source: e,
        })?;

        let mut tarball = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
        tarball.set_preserve_permissions(true);
        tarball.set_overwrite(true);

        if let Err(e) = tarball.unpack(&staging) {
            discard_staging(&staging);
            tracing::error!(archive = %archive.display(), error = %e, "Archive unpack failed");
            return Err(ExtractionError::Unpack {
                path: archive.to_path_buf(),
                reason: e.to_string(),
            });
        }

        let promoted = promote(&staging, destination);
        discard_staging(&staging);
        let mut promoted = promoted?;
        promoted.sort();

        tracing::info!(
            archive = %archive.display(),
            entries = promoted.len(),
            "Archive extracted"
        );

        Ok(promoted)
    }
}

/// Move every top-level staged entry into `destination`.
fn promote(staging: &Path, destination: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    let promote_err = |path: &Path, e: std::io::Error| ExtractionError::Promote {
        path: path.to_path_buf(),
        source: e,
    };

    let entries = std::fs::read_dir(staging).map_err(|e| promote_err(staging, e))?;
    let mut promoted = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| promote_err(staging, e))?;
        let source = entry.path();
        let target = destination.join(entry.file_name());

        if let Ok(meta) = std::fs::symlink_metadata(&target) {
            let removed = if meta.is_dir() {
                std::fs::remove_dir_all(&target)
            } else {
                std::fs::remove_file(&target)
            };
            removed.map_err(|e| promote_err(target.as_path(), e))?;
        }

        std::fs::rename(&source, &target).map_err(|e| promote_err(source.as_path(), e))?;
        promoted.push(target);
    }

    Ok(promoted)
}

fn discard_staging(staging: &Path) {
    match std::fs::remove_dir_all(staging) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %staging.display(), error = %e, "Failed to remove staging directory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::STAGING_DIR;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    /// Build a `.tar.gz` in memory from (path, mode, contents) triples.
    fn build_archive(entries: &[(&str, u32, &[u8])]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for (path, mode, contents) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(*mode);
            header.set_cksum();
            builder.append_data(&mut header, path, *contents).unwrap();
        }

        builder.into_inner().unwrap().finish().unwrap()
    }

    fn sample_archive() -> Vec<u8> {
        let plar = [7u8; 4096];
        build_archive(&[
            ("Geekbench-5.5.1-Linux/geekbench5", 0o755, &b"#!/bin/sh\necho ok\n"[..]),
            ("Geekbench-5.5.1-Linux/geekbench.plar", 0o644, &plar[..]),
            ("Geekbench-5.5.1-Linux/lib/helper.so", 0o644, &b"helper"[..]),
        ])
    }

    fn staging(dir: &TempDir) -> PathBuf {
        dir.path().join(STAGING_DIR)
    }

    fn visible_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_extract_preserves_structure() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("Geekbench-5.5.1-Linux.tar.gz");
        std::fs::write(&archive, sample_archive()).unwrap();

        let promoted = Extractor::extract(&archive, temp_dir.path(), &staging(&temp_dir)).unwrap();

        assert_eq!(promoted, vec![temp_dir.path().join("Geekbench-5.5.1-Linux")]);
        let root = temp_dir.path().join("Geekbench-5.5.1-Linux");
        assert_eq!(std::fs::read(root.join("lib/helper.so")).unwrap(), b"helper");
        assert_eq!(std::fs::read(root.join("geekbench.plar")).unwrap().len(), 4096);
        assert!(!temp_dir.path().join(STAGING_DIR).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_keeps_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("a.tar.gz");
        std::fs::write(&archive, sample_archive()).unwrap();

        Extractor::extract(&archive, temp_dir.path(), &staging(&temp_dir)).unwrap();

        let mode = std::fs::metadata(temp_dir.path().join("Geekbench-5.5.1-Linux/geekbench5"))
            .unwrap()
            .permissions()
            .mode();
        assert_ne!(mode & 0o111, 0);
    }

    #[test]
    fn test_truncated_archive_leaves_nothing_behind() {
        let temp_dir = TempDir::new().unwrap();
        let bytes = sample_archive();
        let archive = temp_dir.path().join("a.tar.gz");
        std::fs::write(&archive, &bytes[..bytes.len() / 2]).unwrap();

        let err = Extractor::extract(&archive, temp_dir.path(), &staging(&temp_dir)).unwrap_err();

        assert!(matches!(err, ExtractionError::Unpack { .. }));
        assert_eq!(visible_entries(temp_dir.path()), vec!["a.tar.gz".to_string()]);
    }

    #[test]
    fn test_not_a_gzip_archive() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("a.tar.gz");
        std::fs::write(&archive, b"<html>404 not found</html>").unwrap();

        let err = Extractor::extract(&archive, temp_dir.path(), &staging(&temp_dir)).unwrap_err();

        assert!(matches!(err, ExtractionError::Unpack { .. }));
        assert_eq!(visible_entries(temp_dir.path()), vec!["a.tar.gz".to_string()]);
    }

    #[test]
    fn test_missing_archive() {
        let temp_dir = TempDir::new().unwrap();
        let err = Extractor::extract(
            &temp_dir.path().join("absent.tar.gz"),
            temp_dir.path(),
            &staging(&temp_dir),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractionError::Open { .. }));
    }

    #[test]
    fn test_extract_replaces_existing_entry() {
        let temp_dir = TempDir::new().unwrap();
        let stale = temp_dir.path().join("Geekbench-5.5.1-Linux");
        std::fs::create_dir_all(&stale).unwrap();
        std::fs::write(stale.join("leftover"), b"old").unwrap();

        let archive = temp_dir.path().join("a.tar.gz");
        std::fs::write(&archive, sample_archive()).unwrap();
        Extractor::extract(&archive, temp_dir.path(), &staging(&temp_dir)).unwrap();

        assert!(!stale.join("leftover").exists());
        assert!(stale.join("geekbench5").exists());
    }
}
