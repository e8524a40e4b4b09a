//! Helm target.
//!
//! Emits a chart skeleton under `helm/<project>/`: `Chart.yaml` and
//! `values.yaml` (serialized documents), plus deployment and service chart
//! templates. The chart sources use Go-template `{{ .Values.x }}` syntax,
//! which sits outside this engine's placeholder grammar so the render
//! validator never mistakes it for an unrendered variable.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use stackforge_schema::{naming, ComputeProperties, ResourceType};

use crate::context::RenderContext;
use crate::engine::TemplateEngine;
use crate::error::RenderResult;
use crate::files::{GeneratedFile, RenderTarget};
use crate::library::TemplateLibrary;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartManifest {
    api_version: String,
    name: String,
    description: String,
    #[serde(rename = "type")]
    chart_type: String,
    version: String,
    app_version: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartValues {
    replica_count: u64,
    image: ImageValues,
    service: ServiceValues,
    env: BTreeMap<String, String>,
    resources: ResourceValues,
    autoscaling: AutoscalingValues,
}

#[derive(Serialize)]
struct ImageValues {
    repository: String,
    tag: String,
    #[serde(rename = "pullPolicy")]
    pull_policy: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceValues {
    #[serde(rename = "type")]
    service_type: String,
    port: u16,
    target_port: u16,
}

#[derive(Serialize)]
struct ResourceValues {
    requests: BTreeMap<String, String>,
    limits: BTreeMap<String, String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AutoscalingValues {
    enabled: bool,
    min_replicas: u64,
    max_replicas: u64,
    target_cpu_utilization_percentage: u32,
}

pub(crate) const DEPLOYMENT_CHART: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: {{ include "chart.fullname" . }}
  labels:
    app.kubernetes.io/name: {{ .Chart.Name }}
spec:
  {{- if not .Values.autoscaling.enabled }}
  replicas: {{ .Values.replicaCount }}
  {{- end }}
  selector:
    matchLabels:
      app.kubernetes.io/name: {{ .Chart.Name }}
  template:
    metadata:
      labels:
        app.kubernetes.io/name: {{ .Chart.Name }}
    spec:
      containers:
        - name: {{ .Chart.Name }}
          image: "{{ .Values.image.repository }}:{{ .Values.image.tag }}"
          imagePullPolicy: {{ .Values.image.pullPolicy }}
          ports:
            - containerPort: {{ .Values.service.targetPort }}
          env:
            {{- range $key, $value := .Values.env }}
            - name: {{ $key }}
              value: {{ $value | quote }}
            {{- end }}
          resources:
            {{- toYaml .Values.resources | nindent 12 }}
"#;

const SERVICE_CHART: &str = r#"apiVersion: v1
kind: Service
metadata:
  name: {{ include "chart.fullname" . }}
  labels:
    app.kubernetes.io/name: {{ .Chart.Name }}
spec:
  type: {{ .Values.service.type }}
  ports:
    - port: {{ .Values.service.port }}
      targetPort: {{ .Values.service.targetPort }}
  selector:
    app.kubernetes.io/name: {{ .Chart.Name }}
"#;

pub(crate) fn render(
    ctx: &RenderContext,
    _engine: &TemplateEngine,
    library: &TemplateLibrary,
) -> RenderResult<(Vec<GeneratedFile>, Vec<String>)> {
    let mut warnings = Vec::new();

    for (name, resource) in ctx.ordered_resources() {
        if library.get(RenderTarget::Helm, resource.resource_type).is_none() {
            warn!(resource = %name, resource_type = %resource.resource_type, "No helm template; skipping resource");
            warnings.push(format!(
                "No helm template for resource '{}' of type '{}'; resource skipped",
                name, resource.resource_type
            ));
        }
    }

    let project = ctx.project_name();
    let chart_dir = format!("helm/{}", project);

    let chart = ChartManifest {
        api_version: "v2".to_string(),
        name: project.to_string(),
        description: if ctx.schema.project.description.is_empty() {
            format!("Helm chart for {}", project)
        } else {
            ctx.schema.project.description.clone()
        },
        chart_type: "application".to_string(),
        version: "0.1.0".to_string(),
        app_version: "0.1.0".to_string(),
    };

    let files = vec![
        GeneratedFile::new(
            format!("{}/Chart.yaml", chart_dir),
            serde_yaml::to_string(&chart)?,
            "Helm chart metadata",
        ),
        GeneratedFile::new(
            format!("{}/values.yaml", chart_dir),
            serde_yaml::to_string(&values(ctx))?,
            "Helm chart default values",
        ),
        GeneratedFile::new(
            format!("{}/templates/deployment.yaml", chart_dir),
            DEPLOYMENT_CHART,
            "Deployment chart template",
        )
        .with_resource_type(ResourceType::Compute),
        GeneratedFile::new(
            format!("{}/templates/service.yaml", chart_dir),
            SERVICE_CHART,
            "Service chart template",
        ),
    ];

    Ok((files, warnings))
}

/// Default values derived from the first compute resource; backing services
/// contribute env entries the way the kubernetes ConfigMap does.
fn values(ctx: &RenderContext) -> ChartValues {
    let computes = ctx.resources_of_type(ResourceType::Compute);
    let (replica_count, component) = computes
        .first()
        .map(|(name, resource)| {
            let props = ComputeProperties::from_properties(&resource.properties);
            (props.count, naming::kebab_case(name))
        })
        .unwrap_or((1, "app".to_string()));

    let mut env = BTreeMap::new();
    env.insert("APP_ENV".to_string(), ctx.environment().to_string());
    for (name, _) in ctx.resources_of_type(ResourceType::Database) {
        env.insert(
            format!("{}_HOST", naming::screaming_snake_case(name)),
            format!("{}-{}", ctx.project_name(), naming::kebab_case(name)),
        );
    }

    let mut requests = BTreeMap::new();
    requests.insert("cpu".to_string(), "100m".to_string());
    requests.insert("memory".to_string(), "128Mi".to_string());
    let mut limits = BTreeMap::new();
    limits.insert("cpu".to_string(), "500m".to_string());
    limits.insert("memory".to_string(), "512Mi".to_string());

    ChartValues {
        replica_count,
        image: ImageValues {
            repository: format!("{}/{}", ctx.project_name(), component),
            tag: "latest".to_string(),
            pull_policy: "IfNotPresent".to_string(),
        },
        service: ServiceValues {
            service_type: "ClusterIP".to_string(),
            port: 80,
            target_port: 8000,
        },
        env,
        resources: ResourceValues { requests, limits },
        autoscaling: AutoscalingValues {
            enabled: false,
            min_replicas: replica_count,
            max_replicas: 10,
            target_cpu_utilization_percentage: 70,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RenderOptions;
    use stackforge_schema::{
        InfrastructureSchema, ProjectMetadata, Provider, ResourceDefinition,
    };

    fn render_all(schema: &InfrastructureSchema) -> (Vec<GeneratedFile>, Vec<String>) {
        let options = RenderOptions::new(RenderTarget::Helm);
        let ctx = RenderContext::new(schema, &options).unwrap();
        render(&ctx, &TemplateEngine::new(), &TemplateLibrary::build()).unwrap()
    }

    #[test]
    fn test_chart_layout() {
        let schema = InfrastructureSchema::new(ProjectMetadata::new("acme-api")).with_resource(
            "api",
            ResourceDefinition::new(ResourceType::Compute, Provider::Aws)
                .with_property("count", 3),
        );

        let (files, warnings) = render_all(&schema);
        assert!(warnings.is_empty());

        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "helm/acme-api/Chart.yaml",
                "helm/acme-api/values.yaml",
                "helm/acme-api/templates/deployment.yaml",
                "helm/acme-api/templates/service.yaml"
            ]
        );

        let values = files.iter().find(|f| f.path.ends_with("values.yaml")).unwrap();
        assert!(values.content.contains("replicaCount: 3"));
        assert!(values.content.contains("repository: acme-api/api"));
    }

    #[test]
    fn test_backing_service_env() {
        let schema = InfrastructureSchema::new(ProjectMetadata::new("acme-api"))
            .with_resource(
                "db",
                ResourceDefinition::new(ResourceType::Database, Provider::Aws),
            )
            .with_resource(
                "api",
                ResourceDefinition::new(ResourceType::Compute, Provider::Aws),
            );

        let (files, warnings) = render_all(&schema);
        assert_eq!(warnings.len(), 1);

        let values = files.iter().find(|f| f.path.ends_with("values.yaml")).unwrap();
        assert!(values.content.contains("DB_HOST: acme-api-db"));
    }
}
