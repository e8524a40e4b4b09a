//! Generated file types and render reports.

use serde::{Deserialize, Serialize};

use stackforge_schema::ResourceType;

use crate::error::{RenderError, RenderResult};

/// IaC ecosystems a schema can be rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderTarget {
    Terraform,
    DockerCompose,
    AwsCdk,
    Kubernetes,
    Helm,
}

impl RenderTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderTarget::Terraform => "terraform",
            RenderTarget::DockerCompose => "docker-compose",
            RenderTarget::AwsCdk => "aws-cdk",
            RenderTarget::Kubernetes => "kubernetes",
            RenderTarget::Helm => "helm",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "terraform" => Some(RenderTarget::Terraform),
            "docker-compose" => Some(RenderTarget::DockerCompose),
            "aws-cdk" => Some(RenderTarget::AwsCdk),
            "kubernetes" => Some(RenderTarget::Kubernetes),
            "helm" => Some(RenderTarget::Helm),
            _ => None,
        }
    }

    /// Parse a target name, failing on anything outside the closed set.
    pub fn parse(s: &str) -> RenderResult<Self> {
        Self::from_str(s).ok_or_else(|| RenderError::UnsupportedTarget(s.to_string()))
    }

    pub fn all() -> Vec<Self> {
        vec![
            RenderTarget::Terraform,
            RenderTarget::DockerCompose,
            RenderTarget::AwsCdk,
            RenderTarget::Kubernetes,
            RenderTarget::Helm,
        ]
    }
}

impl std::fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Provenance of a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileSource {
    Template,
    AiEnhanced,
    AiGenerated,
}

/// Per-file validation detail, filled in by downstream checkers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileValidation {
    pub syntax_valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// One rendered output file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFile {
    /// Relative, target-specific path.
    pub path: String,
    pub content: String,
    pub description: String,
    pub source: FileSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<FileValidation>,
}

impl GeneratedFile {
    pub fn new(
        path: impl Into<String>,
        content: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            description: description.into(),
            source: FileSource::Template,
            resource_type: None,
            validation: None,
        }
    }

    pub fn with_resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    pub fn with_source(mut self, source: FileSource) -> Self {
        self.source = source;
        self
    }
}

/// Outcome of a render call: the file set plus non-fatal warnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOutput {
    pub files: Vec<GeneratedFile>,
    pub warnings: Vec<String>,
}

/// Post-render diagnostic report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub total_files: usize,
    pub valid_files: usize,
    pub invalid_files: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_roundtrip() {
        for target in RenderTarget::all() {
            assert_eq!(RenderTarget::from_str(target.as_str()), Some(target));
        }
    }

    #[test]
    fn test_unknown_target_is_fatal() {
        let err = RenderTarget::parse("cloudformation").unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedTarget(_)));
    }

    #[test]
    fn test_target_serde_names() {
        let json = serde_json::to_string(&RenderTarget::DockerCompose).unwrap();
        assert_eq!(json, r#""docker-compose""#);
        let json = serde_json::to_string(&RenderTarget::AwsCdk).unwrap();
        assert_eq!(json, r#""aws-cdk""#);
    }

    #[test]
    fn test_generated_file_builder() {
        let file = GeneratedFile::new("a/b.tf", "content", "desc")
            .with_resource_type(ResourceType::Database)
            .with_source(FileSource::AiEnhanced);
        assert_eq!(file.resource_type, Some(ResourceType::Database));
        assert_eq!(file.source, FileSource::AiEnhanced);
    }
}
