// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Archive integrity verification using SHA-256.
//!
//! This is the only trust boundary in front of executing the benchmark.
//! Fails immediately on digest mismatch - NO warn-and-continue mode.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::IntegrityError;
use crate::types::Sha256Digest;

/// Read size for streaming the file through the hasher (64 KiB).
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Outcome of a verification that did not abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub path: PathBuf,
    pub matched: bool,
    pub digest: Sha256Digest,
}

/// Streaming SHA-256 verifier for downloaded archives.
pub struct IntegrityVerifier;

impl IntegrityVerifier {
    /// Hash any reader in `chunk_size` pieces. Memory use is bounded by the
    /// chunk size regardless of input length.
    pub fn digest_reader<R: Read>(mut reader: R, chunk_size: usize) -> io::Result<Sha256Digest> {
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; chunk_size.max(1)];

        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => hasher.update(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(Sha256Digest::from_bytes(&hasher.finalize()))
    }

    /// Hash an in-memory buffer.
    pub fn digest_bytes(bytes: &[u8]) -> Sha256Digest {
        Sha256Digest::from_bytes(&Sha256::digest(bytes))
    }

    /// Hash a file on disk in [`CHUNK_SIZE`] pieces.
    pub fn digest_file(path: &Path) -> Result<Sha256Digest, IntegrityError> {
        let file = File::open(path).map_err(|e| IntegrityError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::digest_reader(file, CHUNK_SIZE).map_err(|e| IntegrityError::Read {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Verify a file against the expected digest.
    ///
    /// The whole file is always hashed before comparing. Returns
    /// [`IntegrityError::ChecksumMismatch`] on any difference.
    pub fn verify(path: &Path, expected: &Sha256Digest) -> Result<VerificationResult, IntegrityError> {
        let actual = Self::digest_file(path)?;

        if actual != *expected {
            tracing::error!(
                path = %path.display(),
                expected = %expected,
                actual = %actual,
                "SHA-256 checksum mismatch"
            );
            return Err(IntegrityError::ChecksumMismatch {
                path: path.to_path_buf(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }

        tracing::debug!(path = %path.display(), digest = %actual, "SHA-256 checksum verified");

        Ok(VerificationResult {
            path: path.to_path_buf(),
            matched: true,
            digest: actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    /// Deterministic pseudo-random bytes so chunk boundaries land mid-pattern.
    fn sample_bytes(len: usize) -> Vec<u8> {
        let mut state: u32 = 0x9e37_79b9;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state as u8
            })
            .collect()
    }

    fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_known_digest() {
        // sha256("abc")
        let digest = IntegrityVerifier::digest_bytes(b"abc");
        assert_eq!(
            digest.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );

        // sha256("")
        let empty = IntegrityVerifier::digest_reader(Cursor::new(Vec::new()), CHUNK_SIZE).unwrap();
        assert_eq!(
            empty.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_chunk_boundary_independence() {
        let data = sample_bytes(3 * CHUNK_SIZE + 17);
        let whole = IntegrityVerifier::digest_bytes(&data);

        for chunk_size in [1, 7, 64, 4096, CHUNK_SIZE - 1, CHUNK_SIZE, CHUNK_SIZE + 1, data.len() * 2] {
            let chunked =
                IntegrityVerifier::digest_reader(Cursor::new(&data), chunk_size).unwrap();
            assert_eq!(chunked, whole, "chunk size {} changed the digest", chunk_size);
        }
    }

    #[test]
    fn test_verify_matching_file() {
        let temp_dir = TempDir::new().unwrap();
        let data = sample_bytes(200_000);
        let path = write_file(&temp_dir, "archive.tar.gz", &data);

        let expected = IntegrityVerifier::digest_bytes(&data);
        let result = IntegrityVerifier::verify(&path, &expected).unwrap();
        assert!(result.matched);
        assert_eq!(result.digest, expected);
    }

    #[test]
    fn test_verify_rejects_single_flipped_bit() {
        let temp_dir = TempDir::new().unwrap();
        let original = sample_bytes(10_000);
        let expected = IntegrityVerifier::digest_bytes(&original);

        for (index, bit) in [(0usize, 0u8), (5_000, 3), (9_999, 7)] {
            let mut tampered = original.clone();
            tampered[index] ^= 1 << bit;
            let path = write_file(&temp_dir, "tampered.tar.gz", &tampered);

            let err = IntegrityVerifier::verify(&path, &expected).unwrap_err();
            assert!(matches!(err, IntegrityError::ChecksumMismatch { .. }));
        }
    }

    #[test]
    fn test_verify_rejects_appended_byte() {
        let temp_dir = TempDir::new().unwrap();
        let original = sample_bytes(1_024);
        let expected = IntegrityVerifier::digest_bytes(&original);

        let mut longer = original;
        longer.push(0);
        let path = write_file(&temp_dir, "longer.tar.gz", &longer);

        assert!(IntegrityVerifier::verify(&path, &expected).is_err());
    }

    #[test]
    fn test_verify_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let expected = IntegrityVerifier::digest_bytes(b"");
        let err = IntegrityVerifier::verify(&temp_dir.path().join("absent"), &expected).unwrap_err();
        assert!(matches!(err, IntegrityError::Read { .. }));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The digest never depends on how the input is chunked.
            #[test]
            fn prop_digest_independent_of_chunk_size(
                data in proptest::collection::vec(any::<u8>(), 0..20_000),
                chunk_size in 1_usize..(2 * CHUNK_SIZE)
            ) {
                let whole = IntegrityVerifier::digest_bytes(&data);
                let chunked = IntegrityVerifier::digest_reader(Cursor::new(&data), chunk_size).unwrap();
                prop_assert_eq!(chunked, whole);
            }

            /// Flipping any single bit of the archive fails verification.
            #[test]
            fn prop_any_flipped_bit_is_rejected(
                data in proptest::collection::vec(any::<u8>(), 1..4_096),
                index in any::<proptest::sample::Index>(),
                bit in 0_u8..8
            ) {
                let temp_dir = TempDir::new().unwrap();
                let expected = IntegrityVerifier::digest_bytes(&data);

                let mut tampered = data.clone();
                tampered[index.index(data.len())] ^= 1 << bit;
                let path = write_file(&temp_dir, "tampered.tar.gz", &tampered);

                let err = IntegrityVerifier::verify(&path, &expected).unwrap_err();
                let is_mismatch = matches!(err, IntegrityError::ChecksumMismatch { .. });
                prop_assert!(is_mismatch);
            }
        }
    }

    #[test]
    fn test_digest_file_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(&temp_dir, "a.bin", &sample_bytes(70_000));

        let first = IntegrityVerifier::digest_file(&path).unwrap();
        let second = IntegrityVerifier::digest_file(&path).unwrap();
        assert_eq!(first, second);
    }
}
