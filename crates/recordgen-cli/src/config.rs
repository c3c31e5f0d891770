//! Configuration system for recordgen.
//!
//! Loads config from:
//! 1. Global: ~/.config/recordgen/config.toml
//! 2. Per-project: recordgen.toml in the working directory, or the file
//!    given with `--config` (overrides global)
//!
//! Command-line flags override both. Each layer only overrides the keys it
//! sets.
//!
//! Example recordgen.toml:
//! ```toml
//! emit = "java"
//! package = "com.acme.model"
//! out = "generated"
//!
//! [generate]
//! withers = true
//! nullability_marker = "org.jspecify.annotations.NonNull"
//!
//! [naming]
//! interface_prefix = "I"
//! module_record_suffix = "Impl"
//! ```

use anyhow::Context;
use recordgen::GenerateOptions;
use recordgen::naming::NamingConvention;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the per-project config file.
pub const PROJECT_CONFIG: &str = "recordgen.toml";

/// Generation switches.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    pub records: Option<bool>,
    pub withers: Option<bool>,
    pub builder_annotation: Option<bool>,
    pub nullability_marker: Option<String>,
}

/// Naming convention overrides.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    pub interface_prefix: Option<String>,
    pub module_record_suffix: Option<String>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RecordgenConfig {
    /// Emitter name.
    pub emit: Option<String>,
    pub package: Option<String>,
    /// Output directory; stdout when unset.
    pub out: Option<PathBuf>,
    pub generate: GenerateConfig,
    pub naming: NamingConfig,
}

impl RecordgenConfig {
    /// Load configuration for a project rooted at `root`.
    ///
    /// `explicit` replaces the per-project file and must exist.
    pub fn load(root: &Path, explicit: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_layers(Self::global_config_path().as_deref(), root, explicit)
    }

    fn load_layers(
        global: Option<&Path>,
        root: &Path,
        explicit: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = global {
            if let Some(global) = Self::load_file(global_path)? {
                tracing::debug!(path = %global_path.display(), "global config loaded");
                config = config.merge(global);
            }
        }

        let project = match explicit {
            Some(path) => Some(
                Self::load_file(path)?
                    .with_context(|| format!("config file {} not found", path.display()))?,
            ),
            None => Self::load_file(&root.join(PROJECT_CONFIG))?,
        };
        if let Some(project) = project {
            config = config.merge(project);
        }

        Ok(config)
    }

    /// Get the global config path.
    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("recordgen").join("config.toml"))
    }

    /// Load config from a file path. A missing file is not an error; a
    /// malformed one is.
    fn load_file(path: &Path) -> anyhow::Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        let config = toml::from_str(&content)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(Some(config))
    }

    /// Merge another config into this one. Keys set in `other` win.
    pub fn merge(self, other: Self) -> Self {
        Self {
            emit: other.emit.or(self.emit),
            package: other.package.or(self.package),
            out: other.out.or(self.out),
            generate: GenerateConfig {
                records: other.generate.records.or(self.generate.records),
                withers: other.generate.withers.or(self.generate.withers),
                builder_annotation: other
                    .generate
                    .builder_annotation
                    .or(self.generate.builder_annotation),
                nullability_marker: other
                    .generate
                    .nullability_marker
                    .or(self.generate.nullability_marker),
            },
            naming: NamingConfig {
                interface_prefix: other.naming.interface_prefix.or(self.naming.interface_prefix),
                module_record_suffix: other
                    .naming
                    .module_record_suffix
                    .or(self.naming.module_record_suffix),
            },
        }
    }

    /// Library options. Records are on unless switched off.
    pub fn options(&self) -> GenerateOptions {
        let defaults = NamingConvention::default();
        GenerateOptions {
            enable_records: self.generate.records.unwrap_or(true),
            enable_withers: self.generate.withers.unwrap_or(false),
            enable_builder_annotation: self.generate.builder_annotation.unwrap_or(false),
            nullability_marker: self.generate.nullability_marker.clone(),
            naming: NamingConvention {
                interface_prefix: self
                    .naming
                    .interface_prefix
                    .clone()
                    .unwrap_or(defaults.interface_prefix),
                module_record_suffix: self
                    .naming
                    .module_record_suffix
                    .clone()
                    .unwrap_or(defaults.module_record_suffix),
            },
        }
    }

    /// Emitter name, `java` unless configured.
    pub fn emitter(&self) -> &str {
        self.emit.as_deref().unwrap_or("java")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        let mut file = std::fs::File::create(path).unwrap();
        writeln!(file, "{contents}").unwrap();
    }

    #[test]
    fn test_default_config() {
        let config = RecordgenConfig::default();
        let options = config.options();
        assert!(options.enable_records);
        assert!(!options.enable_withers);
        assert_eq!(options.naming, NamingConvention::default());
        assert_eq!(config.emitter(), "java");
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        write(
            &dir.path().join(PROJECT_CONFIG),
            r#"
emit = "json"

[generate]
withers = true
"#,
        );

        let config = RecordgenConfig::load_layers(None, dir.path(), None).unwrap();
        assert_eq!(config.emitter(), "json");
        assert!(config.options().enable_withers);
        assert!(config.options().enable_records);
    }

    #[test]
    fn test_project_overrides_only_what_it_sets() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        write(
            &global,
            r#"
package = "com.acme"

[generate]
withers = true
nullability_marker = "com.acme.NonNull"

[naming]
interface_prefix = "Abstract"
"#,
        );
        write(
            &dir.path().join(PROJECT_CONFIG),
            r#"
[generate]
withers = false
"#,
        );

        let config = RecordgenConfig::load_layers(Some(&global), dir.path(), None).unwrap();
        assert_eq!(config.package.as_deref(), Some("com.acme"));
        let options = config.options();
        assert!(!options.enable_withers);
        assert_eq!(options.nullability_marker(), "com.acme.NonNull");
        assert_eq!(options.naming.interface_prefix, "Abstract");
        assert_eq!(options.naming.module_record_suffix, "Impl");
    }

    #[test]
    fn test_explicit_config_replaces_project_file() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join(PROJECT_CONFIG), "emit = \"json\"");
        let explicit = dir.path().join("other.toml");
        write(&explicit, "package = \"org.example\"");

        let config = RecordgenConfig::load_layers(None, dir.path(), Some(&explicit)).unwrap();
        assert_eq!(config.emit, None);
        assert_eq!(config.package.as_deref(), Some("org.example"));

        let missing = dir.path().join("missing.toml");
        assert!(RecordgenConfig::load_layers(None, dir.path(), Some(&missing)).is_err());
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join(PROJECT_CONFIG), "[generate]\nwithers = \"yes\"");
        let err = RecordgenConfig::load_layers(None, dir.path(), None).unwrap_err();
        assert!(format!("{err:#}").contains("invalid config"));

        write(&dir.path().join(PROJECT_CONFIG), "colour = \"blue\"");
        assert!(RecordgenConfig::load_layers(None, dir.path(), None).is_err());
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("nowhere.toml");
        let config = RecordgenConfig::load_layers(Some(&global), dir.path(), None).unwrap();
        assert_eq!(config, RecordgenConfig::default());
    }
}
