//! Kubernetes target.
//!
//! Compute resources become Deployments with a matching Service and
//! HorizontalPodAutoscaler; the project gets one Ingress, a ConfigMap
//! carrying non-secret configuration, and a Secret with placeholder values
//! only. Managed resource types (database, cache, ...) have no manifest
//! here and are skipped with a warning; their connection details still
//! surface through the ConfigMap and Secret.

use tracing::warn;

use stackforge_schema::{naming, ResourceType};

use crate::context::RenderContext;
use crate::engine::TemplateEngine;
use crate::files::{GeneratedFile, RenderTarget};
use crate::library::TemplateLibrary;

pub(crate) const COMPUTE_DEPLOYMENT: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: {{project_name}}-{{resource_name}}
  labels:
    app: {{project_name}}
    component: {{resource_name}}
spec:
  replicas: {{instance_count}}
  selector:
    matchLabels:
      app: {{project_name}}
      component: {{resource_name}}
  template:
    metadata:
      labels:
        app: {{project_name}}
        component: {{resource_name}}
    spec:
      containers:
        - name: {{resource_name}}
          image: {{project_name}}/{{resource_name}}:latest
          ports:
            - containerPort: 8000
          envFrom:
            - configMapRef:
                name: {{project_name}}-config
            - secretRef:
                name: {{project_name}}-secrets
          resources:
            requests:
              cpu: 100m
              memory: 128Mi
            limits:
              cpu: 500m
              memory: 512Mi
"#;

const COMPUTE_SERVICE: &str = r#"apiVersion: v1
kind: Service
metadata:
  name: {{project_name}}-{{resource_name}}
  labels:
    app: {{project_name}}
    component: {{resource_name}}
spec:
  selector:
    app: {{project_name}}
    component: {{resource_name}}
  ports:
    - port: 80
      targetPort: 8000
"#;

const COMPUTE_AUTOSCALER: &str = r#"apiVersion: autoscaling/v2
kind: HorizontalPodAutoscaler
metadata:
  name: {{project_name}}-{{resource_name}}
spec:
  scaleTargetRef:
    apiVersion: apps/v1
    kind: Deployment
    name: {{project_name}}-{{resource_name}}
  minReplicas: {{instance_count}}
  maxReplicas: 10
  metrics:
    - type: Resource
      resource:
        name: cpu
        target:
          type: Utilization
          averageUtilization: 70
"#;

pub(crate) fn render(
    ctx: &RenderContext,
    engine: &TemplateEngine,
    library: &TemplateLibrary,
) -> (Vec<GeneratedFile>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut deployments = Vec::new();
    let mut services = Vec::new();

    for (name, resource) in ctx.ordered_resources() {
        let Some(template) = library.get(RenderTarget::Kubernetes, resource.resource_type) else {
            warn!(resource = %name, resource_type = %resource.resource_type, "No kubernetes manifest; skipping resource");
            warnings.push(format!(
                "No kubernetes manifest for resource '{}' of type '{}'; resource skipped",
                name, resource.resource_type
            ));
            continue;
        };

        let vars = ctx.resource_variables(name, resource);
        deployments.push(engine.render(template, &vars));
        services.push(engine.render(COMPUTE_SERVICE, &vars));
        services.push(engine.render(COMPUTE_AUTOSCALER, &vars));
    }

    let deployment_content = if deployments.is_empty() {
        format!(
            "# No compute resources in the {} schema; nothing to deploy.\n",
            ctx.project_name()
        )
    } else {
        deployments.join("---\n")
    };

    let mut service_docs = services;
    service_docs.push(ingress(ctx));
    let service_content = service_docs.join("---\n");

    let files = vec![
        GeneratedFile::new(
            "k8s/deployment.yaml",
            deployment_content,
            "Deployments for compute resources",
        )
        .with_resource_type(ResourceType::Compute),
        GeneratedFile::new(
            "k8s/service.yaml",
            service_content,
            "Services, autoscalers and ingress",
        ),
        GeneratedFile::new("k8s/configmap.yaml", configmap(ctx), "Non-secret configuration"),
        GeneratedFile::new(
            "k8s/secret.yaml",
            secret(ctx),
            "Secret placeholders; replace values before applying",
        ),
    ];

    (files, warnings)
}

fn ingress(ctx: &RenderContext) -> String {
    let backend = ctx
        .resources_of_type(ResourceType::Compute)
        .first()
        .map(|(name, _)| format!("{}-{}", ctx.project_name(), naming::kebab_case(name)))
        .unwrap_or_else(|| ctx.project_name().to_string());

    format!(
        r#"apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: {project}
  labels:
    app: {project}
spec:
  rules:
    - http:
        paths:
          - path: /
            pathType: Prefix
            backend:
              service:
                name: {backend}
                port:
                  number: 80
"#,
        project = ctx.project_name(),
    )
}

fn configmap(ctx: &RenderContext) -> String {
    let mut data = vec![
        format!("  PROJECT_NAME: \"{}\"", ctx.project_name()),
        format!("  APP_ENV: \"{}\"", ctx.environment()),
    ];

    // Managed backing services are reachable by their in-cluster DNS names.
    for (name, _) in ctx.resources_of_type(ResourceType::Database) {
        data.push(format!(
            "  {}_HOST: \"{}-{}\"",
            naming::screaming_snake_case(name),
            ctx.project_name(),
            naming::kebab_case(name)
        ));
    }
    for (name, _) in ctx.resources_of_type(ResourceType::Cache) {
        data.push(format!(
            "  {}_HOST: \"{}-{}\"",
            naming::screaming_snake_case(name),
            ctx.project_name(),
            naming::kebab_case(name)
        ));
    }

    format!(
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: {project}-config\n  labels:\n    app: {project}\ndata:\n{data}\n",
        project = ctx.project_name(),
        data = data.join("\n"),
    )
}

fn secret(ctx: &RenderContext) -> String {
    let mut entries = Vec::new();
    for (name, _) in ctx.resources_of_type(ResourceType::Database) {
        entries.push(format!(
            "  {}_PASSWORD: \"change-me\"",
            naming::screaming_snake_case(name)
        ));
    }
    if entries.is_empty() {
        entries.push("  APP_SECRET: \"change-me\"".to_string());
    }

    format!(
        "apiVersion: v1\nkind: Secret\nmetadata:\n  name: {project}-secrets\n  labels:\n    app: {project}\ntype: Opaque\nstringData:\n{entries}\n",
        project = ctx.project_name(),
        entries = entries.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RenderOptions;
    use stackforge_schema::{
        InfrastructureSchema, ProjectMetadata, Provider, ResourceDefinition,
    };

    fn render_all(schema: &InfrastructureSchema) -> (Vec<GeneratedFile>, Vec<String>) {
        let options = RenderOptions::new(RenderTarget::Kubernetes);
        let ctx = RenderContext::new(schema, &options).unwrap();
        render(&ctx, &TemplateEngine::new(), &TemplateLibrary::build())
    }

    #[test]
    fn test_fixed_file_set() {
        let schema = InfrastructureSchema::new(ProjectMetadata::new("acme-api")).with_resource(
            "api",
            ResourceDefinition::new(ResourceType::Compute, Provider::Aws),
        );

        let (files, warnings) = render_all(&schema);
        assert!(warnings.is_empty());

        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "k8s/deployment.yaml",
                "k8s/service.yaml",
                "k8s/configmap.yaml",
                "k8s/secret.yaml"
            ]
        );
    }

    #[test]
    fn test_database_feeds_config_and_secret() {
        let schema = InfrastructureSchema::new(ProjectMetadata::new("acme-api"))
            .with_resource(
                "main-db",
                ResourceDefinition::new(ResourceType::Database, Provider::Aws),
            )
            .with_resource(
                "api",
                ResourceDefinition::new(ResourceType::Compute, Provider::Aws),
            );

        let (files, warnings) = render_all(&schema);
        // The database itself has no manifest.
        assert_eq!(warnings.len(), 1);

        let configmap = files.iter().find(|f| f.path.ends_with("configmap.yaml")).unwrap();
        assert!(configmap.content.contains("MAIN_DB_HOST: \"acme-api-main-db\""));

        let secret = files.iter().find(|f| f.path.ends_with("secret.yaml")).unwrap();
        assert!(secret.content.contains("MAIN_DB_PASSWORD: \"change-me\""));
        assert!(!secret.content.contains("APP_SECRET"));
    }

    #[test]
    fn test_no_compute_still_non_empty() {
        let schema = InfrastructureSchema::new(ProjectMetadata::new("acme-api")).with_resource(
            "bucket",
            ResourceDefinition::new(ResourceType::Storage, Provider::Aws),
        );

        let (files, _) = render_all(&schema);
        let deployment = files.iter().find(|f| f.path.ends_with("deployment.yaml")).unwrap();
        assert!(!deployment.content.trim().is_empty());
    }
}
