// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML configuration parser with strict schema validation.
//!
//! Every setting has a compiled-in default, so running without a config file
//! reproduces the stock behaviour. A config file only overrides fields.
//! Any invalid field results in a HardValidationError before the pipeline starts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::arch::Architecture;
use crate::error::{HardValidationError, PipelineError, PipelineResult};
use crate::types::{BenchmarkVersion, HttpUrl, Sha256Digest};

/// Benchmark version the checksum table was published for.
pub const DEFAULT_VERSION: &str = "5.5.1";
/// Official download CDN.
pub const DEFAULT_PRIMARY_URL: &str = "https://cdn.geekbench.com";
/// Proxy mirror of the official CDN.
pub const DEFAULT_MIRROR_URL: &str = "https://asset.bash.icu/https://cdn.geekbench.com";
/// Result-presentation page fetched after the run.
pub const DEFAULT_REPORT_URL: &str = "https://browser.geekbench.com/cpu/benchmark_results.html";
/// Scratch directory for a run.
pub const DEFAULT_WORKSPACE_DIR: &str = "./gb5-github-i-abc";

const MAX_CONNECT_TIMEOUT_SECS: u64 = 300;

/// Raw benchmark section as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBenchmarkConfig {
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    checksums: HashMap<Architecture, String>,
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

impl Default for RawBenchmarkConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            checksums: HashMap::new(),
        }
    }
}

/// Which configured download source a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceChoice {
    #[default]
    Primary,
    Mirror,
}

/// Raw download source section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSourceConfig {
    #[serde(default = "default_primary_url")]
    primary: String,
    #[serde(default = "default_mirror_url")]
    mirror: Option<String>,
    #[serde(default, rename = "use")]
    selected: SourceChoice,
}

fn default_primary_url() -> String {
    DEFAULT_PRIMARY_URL.to_string()
}

fn default_mirror_url() -> Option<String> {
    Some(DEFAULT_MIRROR_URL.to_string())
}

impl Default for RawSourceConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_url(),
            mirror: default_mirror_url(),
            selected: SourceChoice::default(),
        }
    }
}

/// Raw network section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNetworkConfig {
    #[serde(default = "default_connect_timeout_secs")]
    connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    1800 // 30 minutes for the full archive
}

impl Default for RawNetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Raw workspace section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWorkspaceConfig {
    #[serde(default = "default_workspace_dir")]
    dir: String,
}

fn default_workspace_dir() -> String {
    DEFAULT_WORKSPACE_DIR.to_string()
}

impl Default for RawWorkspaceConfig {
    fn default() -> Self {
        Self {
            dir: default_workspace_dir(),
        }
    }
}

/// Raw report section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReportConfig {
    #[serde(default = "default_fetch_page")]
    fetch_page: bool,
    #[serde(default = "default_report_url")]
    page_url: String,
}

fn default_fetch_page() -> bool {
    true
}

fn default_report_url() -> String {
    DEFAULT_REPORT_URL.to_string()
}

impl Default for RawReportConfig {
    fn default() -> Self {
        Self {
            fetch_page: default_fetch_page(),
            page_url: default_report_url(),
        }
    }
}

/// Raw root configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    benchmark: RawBenchmarkConfig,
    #[serde(default)]
    source: RawSourceConfig,
    #[serde(default)]
    network: RawNetworkConfig,
    #[serde(default)]
    workspace: RawWorkspaceConfig,
    #[serde(default)]
    report: RawReportConfig,
}

/// Validated benchmark settings.
#[derive(Debug, Clone)]
pub struct BenchmarkSettings {
    pub version: BenchmarkVersion,
    /// Per-architecture overrides of the official checksum table.
    pub checksums: HashMap<Architecture, Sha256Digest>,
}

/// Validated download source settings.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub primary: HttpUrl,
    pub mirror: Option<HttpUrl>,
    pub selected: SourceChoice,
}

impl SourceConfig {
    /// The single base URL this run downloads from.
    pub fn base_url(&self) -> &HttpUrl {
        match (self.selected, &self.mirror) {
            (SourceChoice::Mirror, Some(mirror)) => mirror,
            _ => &self.primary,
        }
    }
}

/// Validated network settings. Both timeouts are always explicit.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

/// Validated report settings.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub fetch_page: bool,
    pub page_url: HttpUrl,
}

/// Complete validated configuration. Immutable once built.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    pub benchmark: BenchmarkSettings,
    pub source: SourceConfig,
    pub network: NetworkConfig,
    pub workspace_dir: PathBuf,
    pub report: ReportConfig,
}

impl Default for BenchmarkConfig {
    /// The compiled-in configuration. The defaults are known-valid constants,
    /// so validation cannot fail here.
    fn default() -> Self {
        Self {
            benchmark: BenchmarkSettings {
                version: BenchmarkVersion(DEFAULT_VERSION.to_string()),
                checksums: HashMap::new(),
            },
            source: SourceConfig {
                primary: HttpUrl(DEFAULT_PRIMARY_URL.to_string()),
                mirror: Some(HttpUrl(DEFAULT_MIRROR_URL.to_string())),
                selected: SourceChoice::Primary,
            },
            network: NetworkConfig {
                connect_timeout: Duration::from_secs(default_connect_timeout_secs()),
                request_timeout: Duration::from_secs(default_request_timeout_secs()),
            },
            workspace_dir: PathBuf::from(DEFAULT_WORKSPACE_DIR),
            report: ReportConfig {
                fetch_page: default_fetch_page(),
                page_url: HttpUrl(DEFAULT_REPORT_URL.to_string()),
            },
        }
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> PipelineResult<BenchmarkConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PipelineError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::io("reading config file", path, e))?;

        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    /// An empty document yields the defaults.
    pub fn load_string(content: &str) -> PipelineResult<BenchmarkConfig> {
        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| PipelineError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?
        };

        Self::validate(raw)
    }

    /// Use the file if given, otherwise the compiled-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> PipelineResult<BenchmarkConfig> {
        match path {
            Some(path) => Self::load_file(path),
            None => Ok(BenchmarkConfig::default()),
        }
    }

    /// Validate raw configuration and convert to validated types.
    fn validate(raw: RawConfig) -> PipelineResult<BenchmarkConfig> {
        let benchmark = Self::validate_benchmark(raw.benchmark)?;
        let source = Self::validate_source(raw.source)?;
        let network = Self::validate_network(raw.network)?;

        if raw.workspace.dir.trim().is_empty() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "workspace.dir",
                value: raw.workspace.dir,
                reason: "Workspace directory cannot be empty".to_string(),
            }
            .into());
        }
        let workspace_dir = PathBuf::from(raw.workspace.dir);
        if workspace_dir.file_name().is_none() {
            // The workspace is deleted recursively: `/`, `.` and `..` are refused.
            return Err(HardValidationError::InvalidFieldValue {
                field: "workspace.dir",
                value: workspace_dir.display().to_string(),
                reason: "Workspace directory must name a dedicated directory".to_string(),
            }
            .into());
        }

        let report = ReportConfig {
            fetch_page: raw.report.fetch_page,
            page_url: Self::validate_url("report.page_url", raw.report.page_url)?,
        };

        Ok(BenchmarkConfig {
            benchmark,
            source,
            network,
            workspace_dir,
            report,
        })
    }

    fn validate_benchmark(raw: RawBenchmarkConfig) -> PipelineResult<BenchmarkSettings> {
        let version = BenchmarkVersion::new(raw.version)?;

        let mut checksums = HashMap::with_capacity(raw.checksums.len());
        for (architecture, value) in raw.checksums {
            let digest = Sha256Digest::new(value).map_err(|e| match e {
                HardValidationError::InvalidDigest { value, .. } => {
                    HardValidationError::InvalidDigest {
                        field: "benchmark.checksums",
                        value: format!("{}: {}", architecture, value),
                    }
                }
                other => other,
            })?;
            checksums.insert(architecture, digest);
        }

        Ok(BenchmarkSettings { version, checksums })
    }

    fn validate_source(raw: RawSourceConfig) -> PipelineResult<SourceConfig> {
        let primary = Self::validate_url("source.primary", raw.primary)?;
        let mirror = raw
            .mirror
            .map(|m| Self::validate_url("source.mirror", m))
            .transpose()?;

        if raw.selected == SourceChoice::Mirror && mirror.is_none() {
            return Err(HardValidationError::MissingRequiredField {
                field: "mirror",
                context: "source section with `use: mirror`".to_string(),
            }
            .into());
        }

        Ok(SourceConfig {
            primary,
            mirror,
            selected: raw.selected,
        })
    }

    fn validate_network(raw: RawNetworkConfig) -> PipelineResult<NetworkConfig> {
        if raw.connect_timeout_secs == 0 || raw.connect_timeout_secs > MAX_CONNECT_TIMEOUT_SECS {
            return Err(HardValidationError::InvalidFieldValue {
                field: "network.connect_timeout_secs",
                value: raw.connect_timeout_secs.to_string(),
                reason: format!("Must be between 1 and {} seconds", MAX_CONNECT_TIMEOUT_SECS),
            }
            .into());
        }

        if raw.request_timeout_secs == 0 {
            return Err(HardValidationError::InvalidFieldValue {
                field: "network.request_timeout_secs",
                value: "0".to_string(),
                reason: "Request timeout must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(NetworkConfig {
            connect_timeout: Duration::from_secs(raw.connect_timeout_secs),
            request_timeout: Duration::from_secs(raw.request_timeout_secs),
        })
    }

    fn validate_url(field: &'static str, value: String) -> PipelineResult<HttpUrl> {
        HttpUrl::new(value).map_err(|e| match e {
            HardValidationError::InvalidUrl { value, reason, .. } => {
                HardValidationError::InvalidUrl {
                    field,
                    value,
                    reason,
                }
                .into()
            }
            other => other.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r#"
benchmark:
  version: "5.5.1"
  checksums:
    x86_64: "32037e55c3dc8f360fe16b7fbb188d31387ea75980e48d8cf028330e3239c404"

source:
  primary: https://cdn.geekbench.com
  mirror: https://asset.bash.icu/https://cdn.geekbench.com
  use: mirror

network:
  connect_timeout_secs: 10
  request_timeout_secs: 600

workspace:
  dir: /tmp/benchpull-work

report:
  fetch_page: false
  page_url: https://browser.geekbench.com/cpu/benchmark_results.html
"#;

    #[test]
    fn test_valid_config() {
        let config = ConfigLoader::load_string(FULL_CONFIG).unwrap();
        assert_eq!(config.benchmark.version.as_str(), "5.5.1");
        assert_eq!(config.benchmark.checksums.len(), 1);
        assert_eq!(
            config.source.base_url().as_str(),
            "https://asset.bash.icu/https://cdn.geekbench.com"
        );
        assert_eq!(config.network.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.workspace_dir, PathBuf::from("/tmp/benchpull-work"));
        assert!(!config.report.fetch_page);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = ConfigLoader::load_string("").unwrap();
        let default = BenchmarkConfig::default();
        assert_eq!(config.benchmark.version, default.benchmark.version);
        assert_eq!(config.source.base_url(), default.source.base_url());
        assert_eq!(config.workspace_dir, default.workspace_dir);
        assert_eq!(config.network.request_timeout, default.network.request_timeout);
        assert_eq!(config.report.page_url, default.report.page_url);
    }

    #[test]
    fn test_defaults_applied() {
        let yaml = r#"
workspace:
  dir: ./scratch
"#;
        let config = ConfigLoader::load_string(yaml).unwrap();
        assert_eq!(config.benchmark.version.as_str(), DEFAULT_VERSION);
        assert_eq!(config.source.base_url().as_str(), DEFAULT_PRIMARY_URL);
        assert_eq!(config.network.connect_timeout, Duration::from_secs(30));
        assert!(config.report.fetch_page);
    }

    #[test]
    fn test_invalid_version() {
        let yaml = r#"
benchmark:
  version: "five"
"#;
        assert!(ConfigLoader::load_string(yaml).is_err());
    }

    #[test]
    fn test_invalid_checksum_override() {
        let yaml = r#"
benchmark:
  checksums:
    riscv64: "not-a-digest"
"#;
        let err = ConfigLoader::load_string(yaml).unwrap_err();
        assert!(err.to_string().contains("riscv64"));
    }

    #[test]
    fn test_unknown_architecture_key() {
        let yaml = r#"
benchmark:
  checksums:
    sparc64: "32037e55c3dc8f360fe16b7fbb188d31387ea75980e48d8cf028330e3239c404"
"#;
        let result = ConfigLoader::load_string(yaml);
        assert!(matches!(result, Err(PipelineError::ConfigParse { .. })));
    }

    #[test]
    fn test_mirror_selected_without_mirror() {
        let yaml = r#"
source:
  mirror: null
  use: mirror
"#;
        assert!(ConfigLoader::load_string(yaml).is_err());
    }

    #[test]
    fn test_invalid_primary_url() {
        let yaml = r#"
source:
  primary: cdn.geekbench.com
"#;
        let err = ConfigLoader::load_string(yaml).unwrap_err();
        assert!(err.to_string().contains("source.primary"));
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let yaml = r#"
network:
  connect_timeout_secs: 0
"#;
        assert!(ConfigLoader::load_string(yaml).is_err());

        let yaml = r#"
network:
  request_timeout_secs: 0
"#;
        assert!(ConfigLoader::load_string(yaml).is_err());
    }

    #[test]
    fn test_root_workspace_rejected() {
        for dir in ["/", ".", ".."] {
            let yaml = format!("workspace:\n  dir: \"{}\"\n", dir);
            assert!(ConfigLoader::load_string(&yaml).is_err(), "accepted {}", dir);
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
network:
  retries: 3
"#;
        assert!(ConfigLoader::load_string(yaml).is_err());
    }

    #[test]
    fn test_load_file_missing() {
        let result = ConfigLoader::load_file("/nonexistent/benchpull.yaml");
        assert!(matches!(result, Err(PipelineError::ConfigNotFound { .. })));
    }
}
