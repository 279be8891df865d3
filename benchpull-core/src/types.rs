// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated inputs.
//!
//! Following the "Newtype" pattern in Rust to ensure valid state by construction.
//! All types validate their invariants at creation time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HardValidationError;

/// Length of a hex-encoded SHA-256 digest.
const SHA256_HEX_LEN: usize = 64;

/// Validated benchmark version, e.g. `5.5.1`.
/// Dot-separated numeric components, first component is the major version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BenchmarkVersion(pub(crate) String);

impl BenchmarkVersion {
    /// Create a new BenchmarkVersion with validation.
    pub fn new(version: impl Into<String>) -> Result<Self, HardValidationError> {
        let version = version.into();

        if version.is_empty() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "version",
                value: version,
                reason: "Version cannot be empty".to_string(),
            });
        }

        let well_formed = version
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
        if !well_formed {
            return Err(HardValidationError::InvalidFieldValue {
                field: "version",
                value: version,
                reason: "Version must be dot-separated numbers (e.g. 5.5.1)".to_string(),
            });
        }

        Ok(Self(version))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Major version component (`5` for `5.5.1`).
    pub fn major(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for BenchmarkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for BenchmarkVersion {
    type Error = HardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BenchmarkVersion> for String {
    fn from(version: BenchmarkVersion) -> Self {
        version.0
    }
}

/// Validated, lowercase hex-encoded SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha256Digest(pub(crate) String);

impl Sha256Digest {
    /// Parse a hex digest. Uppercase input is normalized to lowercase.
    pub fn new(digest: impl Into<String>) -> Result<Self, HardValidationError> {
        let digest: String = digest.into();
        let digest = digest.trim().to_ascii_lowercase();

        if digest.len() != SHA256_HEX_LEN || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(HardValidationError::InvalidDigest {
                field: "sha256",
                value: digest,
            });
        }

        Ok(Self(digest))
    }

    /// Build from raw digest bytes as produced by a hasher.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Get the inner hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = HardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sha256Digest> for String {
    fn from(digest: Sha256Digest) -> Self {
        digest.0
    }
}

/// Validated HTTP(S) URL without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HttpUrl(pub(crate) String);

impl HttpUrl {
    /// Create a new HttpUrl with scheme validation.
    pub fn new(url: impl Into<String>) -> Result<Self, HardValidationError> {
        let url: String = url.into();
        let trimmed = url.trim().trim_end_matches('/');

        let rest = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"));

        match rest {
            Some(host) if !host.is_empty() => Ok(Self(trimmed.to_string())),
            Some(_) => Err(HardValidationError::InvalidUrl {
                field: "url",
                value: url,
                reason: "URL has no host".to_string(),
            }),
            None => Err(HardValidationError::InvalidUrl {
                field: "url",
                value: url,
                reason: "URL must start with http:// or https://".to_string(),
            }),
        }
    }

    /// Join a file name onto the base with exactly one separator.
    pub fn join(&self, filename: &str) -> String {
        format!("{}/{}", self.0, filename.trim_start_matches('/'))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HttpUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for HttpUrl {
    type Error = HardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HttpUrl> for String {
    fn from(url: HttpUrl) -> Self {
        url.0
    }
}
