// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Manifest Builder Configuration
//
// Kubernetes-style configuration document for the builder and its CLI:
// - apiVersion overrides per kind (schema profile)
// - encoder options
// - default namespace applied to parsed manifests

use crate::domain::schema::SchemaProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_API_VERSION: &str = "kmanifest.io/v1";
pub const CONFIG_KIND: &str = "ManifestConfig";

/// Top-level configuration manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// API version (must be "kmanifest.io/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "ManifestConfig")
    pub kind: String,

    pub metadata: ConfigMetadata,

    pub spec: ManifestConfigSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestConfigSpec {
    /// apiVersion overrides, keyed by kind
    #[serde(default)]
    pub schema: SchemaProfile,

    #[serde(default)]
    pub encoder: EncoderConfig,

    /// Namespace filled into parsed namespaced manifests that carry none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_namespace: Option<String>,
}

/// Output options for [`ManifestEncoder`](crate::infrastructure::manifest_encoder::ManifestEncoder).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncoderConfig {
    /// Start every document with `---`, not only the ones after the first.
    #[serde(default)]
    pub explicit_document_start: bool,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            api_version: CONFIG_API_VERSION.to_string(),
            kind: CONFIG_KIND.to_string(),
            metadata: ConfigMetadata {
                name: "default".to_string(),
                labels: None,
            },
            spec: ManifestConfigSpec::default(),
        }
    }
}

impl ManifestConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. KMANIFEST_CONFIG_PATH environment variable
    /// 2. ./kmanifest.yaml (working directory)
    /// 3. ~/.kmanifest/config.yaml (user home)
    /// 4. /etc/kmanifest/config.yaml (system, Unix) or C:\ProgramData\kmanifest\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("KMANIFEST_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./kmanifest.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".kmanifest").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        let system_config = PathBuf::from("/etc/kmanifest/config.yaml");
        #[cfg(windows)]
        let system_config = PathBuf::from("C:\\ProgramData\\kmanifest\\config.yaml");

        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e))?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("KMANIFEST_DEFAULT_NAMESPACE") {
            if val.is_empty() {
                tracing::warn!("KMANIFEST_DEFAULT_NAMESPACE is set but empty. Ignoring.");
            } else {
                tracing::info!("Environment override: KMANIFEST_DEFAULT_NAMESPACE={}", val);
                self.spec.default_namespace = Some(val);
            }
        }

        if let Ok(val) = std::env::var("KMANIFEST_EXPLICIT_DOCUMENT_START") {
            match parse_bool(&val) {
                Some(flag) => {
                    tracing::info!("Environment override: KMANIFEST_EXPLICIT_DOCUMENT_START={}", flag);
                    self.spec.encoder.explicit_document_start = flag;
                }
                None => {
                    tracing::warn!(
                        "Invalid value for KMANIFEST_EXPLICIT_DOCUMENT_START: '{}'. Expected true/false. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != CONFIG_API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                CONFIG_API_VERSION
            );
        }

        if self.kind != CONFIG_KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, CONFIG_KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        for (kind, api_version) in self.spec.schema.overrides() {
            if api_version.trim().is_empty() {
                anyhow::bail!("spec.schema apiVersion for {} cannot be empty", kind);
            }
        }

        if let Some(namespace) = &self.spec.default_namespace {
            if namespace.is_empty() {
                anyhow::bail!("spec.defaultNamespace cannot be empty when set");
            }
        }

        Ok(())
    }

    pub fn schema(&self) -> &SchemaProfile {
        &self.spec.schema
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.spec.default_namespace.as_deref()
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kind::Kind;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ManifestConfig::default();
        assert_eq!(config.api_version, "kmanifest.io/v1");
        assert_eq!(config.kind, "ManifestConfig");
        assert!(config.spec.schema.overrides().is_empty());
        assert!(!config.spec.encoder.explicit_document_start);
        assert_eq!(config.default_namespace(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = ManifestConfig::default();
        config.metadata.name = "legacy-cluster".to_string();
        config.spec.schema = SchemaProfile::new().with_api_version(Kind::CronJob, "batch/v1beta1");
        config.spec.encoder.explicit_document_start = true;
        config.spec.default_namespace = Some("apps".to_string());

        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("defaultNamespace: apps"), "{yaml}");
        assert!(yaml.contains("explicitDocumentStart: true"));
        let parsed = ManifestConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.schema().api_version(Kind::CronJob), "batch/v1beta1");
    }

    #[test]
    fn test_parse_minimal_document() {
        let yaml = r#"
apiVersion: kmanifest.io/v1
kind: ManifestConfig
metadata:
  name: minimal
spec: {}
"#;
        let config = ManifestConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.metadata.name, "minimal");
        assert_eq!(config.spec, ManifestConfigSpec::default());
    }

    #[test]
    fn test_validation() {
        let mut config = ManifestConfig::default();
        assert!(config.validate().is_ok());

        config.api_version = "wrong/v1".to_string();
        assert!(config.validate().is_err());
        config.api_version = CONFIG_API_VERSION.to_string();

        config.kind = "NodeConfig".to_string();
        assert!(config.validate().is_err());
        config.kind = CONFIG_KIND.to_string();

        config.metadata.name = String::new();
        assert!(config.validate().is_err());
        config.metadata.name = "cfg".to_string();

        config.spec.default_namespace = Some(String::new());
        assert!(config.validate().is_err());
        config.spec.default_namespace = None;

        config.spec.schema = SchemaProfile::new().with_api_version(Kind::Pod, " ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_roundtrip_and_explicit_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kmanifest.yaml");
        let mut config = ManifestConfig::default();
        config.metadata.name = "from-file".to_string();
        config.to_yaml_file(&path).unwrap();

        let loaded = ManifestConfig::from_yaml_file(&path).unwrap();
        assert_eq!(loaded.metadata.name, "from-file");

        let explicit = ManifestConfig::load_or_default(Some(path)).unwrap();
        assert_eq!(explicit.metadata.name, "from-file");
    }

    #[test]
    fn test_explicit_path_must_exist_and_parse() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ManifestConfig::load_or_default(Some(dir.path().join("missing.yaml"))).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "apiVersion: [not, a, string").unwrap();
        assert!(ManifestConfig::load_or_default(Some(file.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
