// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Architecture resolver.
//!
//! Maps the host CPU architecture to the benchmark archive name and the
//! official SHA-256 of that archive. The mapping is a static table, so adding
//! an architecture is a data change.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::BenchmarkConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{BenchmarkVersion, Sha256Digest};

/// Archive extension used by every Linux benchmark build.
pub const ARCHIVE_EXTENSION: &str = ".tar.gz";

/// Supported host architectures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Architecture {
    #[serde(rename = "x86_64")]
    X86_64,
    #[serde(rename = "aarch64")]
    Aarch64,
    #[serde(rename = "riscv64")]
    Riscv64,
}

impl Architecture {
    /// All supported architectures, in table order.
    pub const ALL: [Architecture; 3] = [Self::X86_64, Self::Aarch64, Self::Riscv64];

    /// Parse a machine string as reported by `uname -m`.
    pub fn from_machine(machine: &str) -> PipelineResult<Self> {
        match machine.trim() {
            "x86_64" | "AMD64" | "amd64" => Ok(Self::X86_64),
            "aarch64" | "arm64" => Ok(Self::Aarch64),
            "riscv64" => Ok(Self::Riscv64),
            other => Err(PipelineError::UnsupportedArchitecture {
                machine: other.to_string(),
            }),
        }
    }

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
            Self::Riscv64 => "riscv64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the static architecture table.
struct ProfileEntry {
    architecture: Architecture,
    platform_tag: &'static str,
    sha256: &'static str,
}

/// Official Geekbench 5.5.1 archives.
const PROFILE_TABLE: [ProfileEntry; 3] = [
    ProfileEntry {
        architecture: Architecture::X86_64,
        platform_tag: "Linux",
        sha256: "32037e55c3dc8f360fe16b7fbb188d31387ea75980e48d8cf028330e3239c404",
    },
    ProfileEntry {
        architecture: Architecture::Aarch64,
        platform_tag: "LinuxARMPreview",
        sha256: "9eb3ca9ec32abf0ebe1c64002b19108bfea53c411c6b556b0c2689514b8cbd6f",
    },
    ProfileEntry {
        architecture: Architecture::Riscv64,
        platform_tag: "LinuxRISCVPreview",
        sha256: "65070301ccedd33bfd4797a19e9d28991fe719cc38570dbc445b8355a5b9bc64",
    },
];

/// Everything the pipeline needs to know about the host's benchmark build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitectureProfile {
    pub architecture: Architecture,
    pub platform_tag: &'static str,
    pub archive_filename: String,
    pub expected_sha256: Sha256Digest,
}

impl ArchitectureProfile {
    /// Archive name without the `.tar.gz` extension. This is also the
    /// top-level directory inside the archive.
    pub fn archive_stem(&self) -> &str {
        self.archive_filename
            .strip_suffix(ARCHIVE_EXTENSION)
            .unwrap_or(&self.archive_filename)
    }

    /// Path of the benchmark executable relative to the extraction root,
    /// e.g. `Geekbench-5.5.1-Linux/geekbench5`.
    pub fn executable_relpath(&self, version: &BenchmarkVersion) -> PathBuf {
        PathBuf::from(self.archive_stem()).join(format!("geekbench{}", version.major()))
    }
}

/// Architecture table bound to a concrete version and checksum set.
#[derive(Debug, Clone)]
pub struct ProfileTable {
    version: BenchmarkVersion,
    profiles: Vec<ArchitectureProfile>,
}

impl ProfileTable {
    /// Build the table for the configured version, applying any checksum
    /// overrides on top of the official values.
    pub fn from_config(config: &BenchmarkConfig) -> PipelineResult<Self> {
        let version = config.benchmark.version.clone();
        let mut profiles = Vec::with_capacity(PROFILE_TABLE.len());

        for entry in &PROFILE_TABLE {
            let expected_sha256 = match config.benchmark.checksums.get(&entry.architecture) {
                Some(digest) => digest.clone(),
                None => Sha256Digest::new(entry.sha256)?,
            };

            profiles.push(ArchitectureProfile {
                architecture: entry.architecture,
                platform_tag: entry.platform_tag,
                archive_filename: format!(
                    "Geekbench-{}-{}{}",
                    version, entry.platform_tag, ARCHIVE_EXTENSION
                ),
                expected_sha256,
            });
        }

        Ok(Self { version, profiles })
    }

    /// Resolve a host machine string to its profile.
    pub fn resolve(&self, host_machine: &str) -> PipelineResult<ArchitectureProfile> {
        let architecture = Architecture::from_machine(host_machine)?;
        self.profile(architecture)
    }

    /// Look up the profile for a known architecture.
    pub fn profile(&self, architecture: Architecture) -> PipelineResult<ArchitectureProfile> {
        self.profiles
            .iter()
            .find(|p| p.architecture == architecture)
            .cloned()
            .ok_or_else(|| PipelineError::UnsupportedArchitecture {
                machine: architecture.to_string(),
            })
    }

    /// Benchmark version this table was built for.
    pub fn version(&self) -> &BenchmarkVersion {
        &self.version
    }
}

/// Read the host machine string via `uname(2)`.
pub fn host_machine() -> PipelineResult<String> {
    let uts = nix::sys::utsname::uname().map_err(|e| PipelineError::Syscall {
        syscall: "uname",
        message: e.to_string(),
    })?;
    Ok(uts.machine().to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;

    fn default_table() -> ProfileTable {
        ProfileTable::from_config(&BenchmarkConfig::default()).unwrap()
    }

    #[test]
    fn test_resolve_x86_64() {
        let profile = default_table().resolve("x86_64").unwrap();
        assert_eq!(profile.archive_filename, "Geekbench-5.5.1-Linux.tar.gz");
        assert_eq!(
            profile.expected_sha256.as_str(),
            "32037e55c3dc8f360fe16b7fbb188d31387ea75980e48d8cf028330e3239c404"
        );
    }

    #[test]
    fn test_resolve_aliases() {
        let table = default_table();
        assert_eq!(table.resolve("AMD64").unwrap().architecture, Architecture::X86_64);
        assert_eq!(table.resolve("arm64").unwrap().architecture, Architecture::Aarch64);
    }

    #[test]
    fn test_every_architecture_matches_table() {
        let table = default_table();
        for entry in &PROFILE_TABLE {
            let profile = table.resolve(entry.architecture.as_str()).unwrap();
            assert!(profile.archive_filename.contains(entry.platform_tag));
            assert!(profile.archive_filename.contains("5.5.1"));
            assert_eq!(profile.expected_sha256.as_str(), entry.sha256);
        }
    }

    #[test]
    fn test_resolve_unsupported() {
        let table = default_table();
        for machine in ["i686", "armv7l", "sparc64", "ppc64le", ""] {
            let err = table.resolve(machine).unwrap_err();
            assert!(matches!(err, PipelineError::UnsupportedArchitecture { .. }));
        }
    }

    #[test]
    fn test_executable_relpath() {
        let table = default_table();
        let profile = table.resolve("riscv64").unwrap();
        assert_eq!(profile.archive_stem(), "Geekbench-5.5.1-LinuxRISCVPreview");
        assert_eq!(
            profile.executable_relpath(table.version()),
            PathBuf::from("Geekbench-5.5.1-LinuxRISCVPreview/geekbench5")
        );
    }

    #[test]
    fn test_checksum_override() {
        let yaml = format!(
            r#"
benchmark:
  version: "6.2.0"
  checksums:
    aarch64: "{}"
"#,
            "0".repeat(64)
        );
        let config = ConfigLoader::load_string(&yaml).unwrap();
        let table = ProfileTable::from_config(&config).unwrap();

        let arm = table.resolve("aarch64").unwrap();
        assert_eq!(arm.archive_filename, "Geekbench-6.2.0-LinuxARMPreview.tar.gz");
        assert_eq!(arm.expected_sha256.as_str(), "0".repeat(64));

        let x86 = table.resolve("x86_64").unwrap();
        assert_eq!(x86.expected_sha256.as_str(), PROFILE_TABLE[0].sha256);
    }

    #[test]
    fn test_host_machine_is_readable() {
        assert!(!host_machine().unwrap().is_empty());
    }
}
