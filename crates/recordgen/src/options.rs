//! Generation options.

use crate::error::ConfigError;
use crate::naming::NamingConvention;
use serde::{Deserialize, Serialize};

/// Nullability marker used when none is configured.
pub const DEFAULT_NULLABILITY_MARKER: &str = "org.jspecify.annotations.NonNull";

/// The opaque builder decoration attached when enabled.
pub const BUILDER_ANNOTATION: &str = "io.soabase.recordbuilder.core.RecordBuilder";

/// Options for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Master switch. When off, the interface/record decomposition does not run.
    pub enable_records: bool,
    /// Emit the copy-with protocol for every record.
    pub enable_withers: bool,
    /// Decorate every record with [`BUILDER_ANNOTATION`].
    pub enable_builder_annotation: bool,
    /// Fully-qualified annotation replacing [`DEFAULT_NULLABILITY_MARKER`].
    pub nullability_marker: Option<String>,
    pub naming: NamingConvention,
}

impl GenerateOptions {
    /// Records enabled, everything else at its default.
    pub fn records() -> Self {
        Self {
            enable_records: true,
            ..Default::default()
        }
    }

    pub fn with_withers(mut self) -> Self {
        self.enable_withers = true;
        self
    }

    pub fn with_builder_annotation(mut self) -> Self {
        self.enable_builder_annotation = true;
        self
    }

    pub fn with_nullability_marker(mut self, marker: impl Into<String>) -> Self {
        self.nullability_marker = Some(marker.into());
        self
    }

    /// The marker substituted at every nullability annotation site.
    pub fn nullability_marker(&self) -> &str {
        self.nullability_marker
            .as_deref()
            .unwrap_or(DEFAULT_NULLABILITY_MARKER)
    }

    /// Reject malformed or contradictory options.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enable_records {
            if self.enable_withers {
                return Err(ConfigError::RequiresRecords {
                    option: "enable_withers",
                });
            }
            if self.enable_builder_annotation {
                return Err(ConfigError::RequiresRecords {
                    option: "enable_builder_annotation",
                });
            }
        }
        if let Some(marker) = &self.nullability_marker {
            if !is_qualified_name(marker) {
                return Err(ConfigError::MalformedMarker {
                    marker: marker.clone(),
                });
            }
        }
        self.naming.validate()
    }
}

/// `a.b.C`: at least two segments, each a Java identifier.
fn is_qualified_name(name: &str) -> bool {
    let segments: Vec<&str> = name.split('.').collect();
    segments.len() >= 2 && segments.iter().all(|s| is_java_identifier(s))
}

fn is_java_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        && !JAVA_KEYWORDS.contains(&s)
}

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];
