//! Docker Compose target.
//!
//! Each supported resource contributes a service fragment; fragments are
//! assembled into a single `docker-compose.yml` in dependency order, with
//! named volumes collected for stateful services. A generic application
//! `Dockerfile` and a root `.env.example` round out the file set.

use tracing::warn;

use stackforge_schema::{naming, CacheProperties, DatabaseProperties, ResourceType};

use crate::context::RenderContext;
use crate::engine::TemplateEngine;
use crate::files::{GeneratedFile, RenderTarget};
use crate::library::TemplateLibrary;

pub(crate) const DATABASE_COMPOSE: &str = r#"  {{resource_name}}:
    image: {{image}}
    restart: unless-stopped
    environment:
      POSTGRES_DB: {{project_name_snake}}
      POSTGRES_USER: ${{{resource_name_screaming}}_USER:-app}
      POSTGRES_PASSWORD: ${{{resource_name_screaming}}_PASSWORD:?set in .env}
    volumes:
      - {{resource_name_snake}}_data:/var/lib/postgresql/data{{depends_on}}
"#;

pub(crate) const COMPUTE_COMPOSE: &str = r#"  {{resource_name}}:
    build:
      context: .
      dockerfile: Dockerfile
    restart: unless-stopped
    environment:
      APP_ENV: {{environment}}
    ports:
      - "8000:8000"{{depends_on}}
"#;

pub(crate) const CACHE_COMPOSE: &str = r#"  {{resource_name}}:
    image: {{image}}
    restart: unless-stopped
    volumes:
      - {{resource_name_snake}}_data:/data{{depends_on}}
"#;

pub(crate) const QUEUE_COMPOSE: &str = r#"  {{resource_name}}:
    image: rabbitmq:3.13-management-alpine
    restart: unless-stopped
    environment:
      RABBITMQ_DEFAULT_USER: ${{{resource_name_screaming}}_USER:-app}
      RABBITMQ_DEFAULT_PASS: ${{{resource_name_screaming}}_PASSWORD:?set in .env}
    volumes:
      - {{resource_name_snake}}_data:/var/lib/rabbitmq{{depends_on}}
"#;

pub(crate) const STORAGE_COMPOSE: &str = r#"  {{resource_name}}:
    image: minio/minio:latest
    restart: unless-stopped
    command: server /data --console-address ":9001"
    environment:
      MINIO_ROOT_USER: ${{{resource_name_screaming}}_USER:-app}
      MINIO_ROOT_PASSWORD: ${{{resource_name_screaming}}_PASSWORD:?set in .env}
    volumes:
      - {{resource_name_snake}}_data:/data{{depends_on}}
"#;

const MONITORING_SERVICE: &str = r#"  monitoring:
    image: prom/prometheus:latest
    restart: unless-stopped
    ports:
      - "9090:9090"
    volumes:
      - monitoring_data:/prometheus
"#;

const DOCKERFILE: &str = r#"FROM node:20-slim AS build
WORKDIR /app
COPY package*.json ./
RUN npm ci
COPY . .
RUN npm run build

FROM node:20-slim
WORKDIR /app
ENV NODE_ENV=production
COPY --from=build /app/dist ./dist
COPY --from=build /app/node_modules ./node_modules
EXPOSE 8000
CMD ["node", "dist/index.js"]
"#;

/// Types that keep state and therefore need a named volume.
fn needs_volume(resource_type: ResourceType) -> bool {
    matches!(
        resource_type,
        ResourceType::Database | ResourceType::Cache | ResourceType::Queue | ResourceType::Storage
    )
}

fn service_image(resource: &stackforge_schema::ResourceDefinition) -> String {
    match resource.resource_type {
        ResourceType::Database => {
            let props = DatabaseProperties::from_properties(&resource.properties);
            match props.engine.as_str() {
                "mysql" => "mysql:8.4".to_string(),
                "mariadb" => "mariadb:11".to_string(),
                _ => "postgres:16-alpine".to_string(),
            }
        }
        ResourceType::Cache => {
            let props = CacheProperties::from_properties(&resource.properties);
            match props.engine.as_str() {
                "memcached" => "memcached:1.6-alpine".to_string(),
                _ => "redis:7-alpine".to_string(),
            }
        }
        _ => String::new(),
    }
}

fn depends_on_block(ctx: &RenderContext, name: &str, library: &TemplateLibrary) -> String {
    let deps: Vec<String> = ctx
        .graph()
        .dependencies_of(name)
        .iter()
        .filter(|dep| {
            // Only reference services that actually rendered.
            ctx.schema
                .resources
                .get(dep.as_str())
                .map(|r| library.get(RenderTarget::DockerCompose, r.resource_type).is_some())
                .unwrap_or(false)
        })
        .map(|dep| format!("      - {}", naming::kebab_case(dep)))
        .collect();

    if deps.is_empty() {
        String::new()
    } else {
        format!("\n    depends_on:\n{}", deps.join("\n"))
    }
}

pub(crate) fn render(
    ctx: &RenderContext,
    engine: &TemplateEngine,
    library: &TemplateLibrary,
) -> (Vec<GeneratedFile>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut services = Vec::new();
    let mut volumes = Vec::new();
    let mut secret_services = Vec::new();

    for (name, resource) in ctx.ordered_resources() {
        let Some(template) = library.get(RenderTarget::DockerCompose, resource.resource_type)
        else {
            warn!(resource = %name, resource_type = %resource.resource_type, "No docker-compose template; skipping resource");
            warnings.push(format!(
                "No docker-compose template for resource '{}' of type '{}'; resource skipped",
                name, resource.resource_type
            ));
            continue;
        };

        let mut vars = ctx.resource_variables(name, resource);
        vars.insert("image".to_string(), service_image(resource));
        vars.insert(
            "depends_on".to_string(),
            depends_on_block(ctx, name, library),
        );

        services.push(engine.render(template, &vars));

        if needs_volume(resource.resource_type) {
            volumes.push(format!("{}_data", naming::snake_case(name)));
        }
        // Cache images run credential-free; everything else stateful gets
        // a user/password pair in .env.
        if matches!(
            resource.resource_type,
            ResourceType::Database | ResourceType::Queue | ResourceType::Storage
        ) {
            secret_services.push(naming::screaming_snake_case(name));
        }
    }

    if ctx.options.include_monitoring {
        services.push(MONITORING_SERVICE.to_string());
        volumes.push("monitoring_data".to_string());
    }

    let header = if ctx.options.include_comments {
        format!(
            "# Docker Compose stack for {} ({})\n",
            ctx.project_name(),
            ctx.environment()
        )
    } else {
        String::new()
    };

    let mut compose = format!("{header}services:\n{}", services.join("\n"));
    if !volumes.is_empty() {
        compose.push_str("\nvolumes:\n");
        for volume in &volumes {
            compose.push_str(&format!("  {}:\n", volume));
        }
    }

    let mut env = format!(
        "# Environment template for {project}\n# Copy to .env and fill in secrets; never commit the result.\n\nAPP_ENV={environment}\n",
        project = ctx.project_name(),
        environment = ctx.environment(),
    );
    for service in &secret_services {
        env.push_str(&format!("{service}_USER=app\n{service}_PASSWORD=change-me\n"));
    }

    let files = vec![
        GeneratedFile::new(
            "docker-compose.yml",
            compose,
            "Docker Compose service definitions",
        ),
        GeneratedFile::new(".env.example", env, "Environment variable template"),
        GeneratedFile::new("Dockerfile", DOCKERFILE, "Application container image"),
    ];

    (files, warnings)
}
