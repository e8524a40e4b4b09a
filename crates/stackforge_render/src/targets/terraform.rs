//! Terraform target.
//!
//! Emits one `.tf` file per supported resource under `infra/terraform/`,
//! plus the scaffold files every Terraform root module needs: `main.tf`
//! (provider pins and common tags), `variables.tf`, `outputs.tf` and a
//! root-level `.env.example`. Resource bodies use the aws dialect; the
//! provider pin in `main.tf` follows the schema's dominant provider.

use tracing::warn;

use stackforge_schema::{naming, ResourceType};

use crate::context::RenderContext;
use crate::engine::TemplateEngine;
use crate::files::{GeneratedFile, RenderTarget};
use crate::library::TemplateLibrary;

pub(crate) const DATABASE_TF: &str = r#"{{header}}resource "aws_db_instance" "{{resource_name_snake}}" {
  identifier     = "{{project_name}}-{{resource_name}}-{{environment}}"
  engine         = "{{engine}}"
  instance_class = "db.{{instance_tier}}"

  allocated_storage = {{allocated_storage}}
  multi_az          = {{multi_az}}
  storage_encrypted = true

  username = var.{{resource_name_snake}}_username
  password = var.{{resource_name_snake}}_password

  skip_final_snapshot = var.environment != "production"

  tags = local.common_tags{{depends_on}}
}
"#;

pub(crate) const COMPUTE_TF: &str = r#"{{header}}resource "aws_instance" "{{resource_name_snake}}" {
  count         = {{instance_count}}
  ami           = data.aws_ami.al2023.id
  instance_type = "{{instance_type}}"

  tags = merge(local.common_tags, {
    Name = "{{project_name}}-{{resource_name}}-${count.index}"
  }){{depends_on}}
}
"#;

pub(crate) const CACHE_TF: &str = r#"{{header}}resource "aws_elasticache_cluster" "{{resource_name_snake}}" {
  cluster_id      = "{{project_name}}-{{resource_name}}"
  engine          = "{{engine}}"
  node_type       = "{{node_type}}"
  num_cache_nodes = {{num_nodes}}

  tags = local.common_tags{{depends_on}}
}
"#;

pub(crate) const STORAGE_TF: &str = r#"{{header}}resource "aws_s3_bucket" "{{resource_name_snake}}" {
  bucket = "{{project_name}}-{{resource_name}}-{{environment}}"

  tags = local.common_tags{{depends_on}}
}

resource "aws_s3_bucket_versioning" "{{resource_name_snake}}" {
  bucket = aws_s3_bucket.{{resource_name_snake}}.id

  versioning_configuration {
    status = {{versioning}} ? "Enabled" : "Suspended"
  }
}
"#;

pub(crate) const NETWORK_TF: &str = r#"{{header}}resource "aws_vpc" "{{resource_name_snake}}" {
  cidr_block           = "{{cidr_block}}"
  enable_dns_hostnames = true
  enable_dns_support   = true

  tags = merge(local.common_tags, {
    Name = "{{project_name}}-{{resource_name}}-vpc"
  }){{depends_on}}
}
"#;

pub(crate) const QUEUE_TF: &str = r#"{{header}}resource "aws_sqs_queue" "{{resource_name_snake}}" {
  name                       = "{{project_name}}-{{resource_name}}{{fifo_suffix}}"
  fifo_queue                 = {{fifo}}
  visibility_timeout_seconds = {{visibility_timeout}}

  tags = local.common_tags{{depends_on}}
}
"#;

pub(crate) const LOADBALANCER_TF: &str = r#"{{header}}resource "aws_lb" "{{resource_name_snake}}" {
  name               = "{{resource_name}}-{{environment}}"
  load_balancer_type = "{{lb_type}}"
  internal           = {{lb_internal}}
  subnets            = var.public_subnet_ids

  tags = local.common_tags{{depends_on}}
}
"#;

/// Terraform resource address for cross-file `depends_on` references.
fn terraform_address(name: &str, resource_type: ResourceType) -> Option<String> {
    let kind = match resource_type {
        ResourceType::Database => "aws_db_instance",
        ResourceType::Compute => "aws_instance",
        ResourceType::Cache => "aws_elasticache_cluster",
        ResourceType::Storage => "aws_s3_bucket",
        ResourceType::Network => "aws_vpc",
        ResourceType::Queue => "aws_sqs_queue",
        ResourceType::LoadBalancer => "aws_lb",
        ResourceType::Monitoring | ResourceType::Cdn => return None,
    };
    Some(format!("{}.{}", kind, naming::snake_case(name)))
}

fn depends_on_block(ctx: &RenderContext, name: &str) -> String {
    let addresses: Vec<String> = ctx
        .graph()
        .dependencies_of(name)
        .iter()
        .filter_map(|dep| {
            let resource = ctx.schema.resources.get(dep)?;
            terraform_address(dep, resource.resource_type)
        })
        .collect();

    if addresses.is_empty() {
        String::new()
    } else {
        format!("\n\n  depends_on = [{}]", addresses.join(", "))
    }
}

pub(crate) fn render(
    ctx: &RenderContext,
    engine: &TemplateEngine,
    library: &TemplateLibrary,
) -> (Vec<GeneratedFile>, Vec<String>) {
    let mut files = Vec::new();
    let mut warnings = Vec::new();

    for (name, resource) in ctx.ordered_resources() {
        let Some(template) = library.get(RenderTarget::Terraform, resource.resource_type) else {
            warn!(resource = %name, resource_type = %resource.resource_type, "No terraform template; skipping resource");
            warnings.push(format!(
                "No terraform template for resource '{}' of type '{}'; resource skipped",
                name, resource.resource_type
            ));
            continue;
        };

        let mut vars = ctx.resource_variables(name, resource);
        vars.insert(
            "header".to_string(),
            if ctx.options.include_comments {
                format!(
                    "# {}: {} resource for {}\n\n",
                    name, resource.resource_type, ctx.project_name()
                )
            } else {
                String::new()
            },
        );
        vars.insert("depends_on".to_string(), depends_on_block(ctx, name));

        files.push(
            GeneratedFile::new(
                format!("infra/terraform/{}.tf", name),
                engine.render(template, &vars),
                format!("Terraform definition for '{}'", name),
            )
            .with_resource_type(resource.resource_type),
        );
    }

    files.push(main_tf(ctx));
    files.push(variables_tf(ctx));
    files.push(outputs_tf(ctx));
    if ctx.options.include_monitoring {
        files.push(monitoring_tf(ctx));
    }
    files.push(env_example(ctx));

    (files, warnings)
}

fn main_tf(ctx: &RenderContext) -> GeneratedFile {
    let (provider_pin, provider_block) = match ctx.provider().terraform_provider() {
        "azurerm" => (
            "    azurerm = {\n      source  = \"hashicorp/azurerm\"\n      version = \"~> 3.0\"\n    }",
            "provider \"azurerm\" {\n  features {}\n}".to_string(),
        ),
        "google" => (
            "    google = {\n      source  = \"hashicorp/google\"\n      version = \"~> 5.0\"\n    }",
            "provider \"google\" {\n  region = var.region\n}".to_string(),
        ),
        _ => (
            "    aws = {\n      source  = \"hashicorp/aws\"\n      version = \"~> 5.0\"\n    }",
            "provider \"aws\" {\n  region = var.region\n\n  default_tags {\n    tags = local.common_tags\n  }\n}"
                .to_string(),
        ),
    };

    let tag_lines: Vec<String> = ctx
        .tags()
        .iter()
        .map(|(key, value)| format!("    {} = \"{}\"", key, value))
        .collect();

    let ami_data = if ctx.provider().terraform_provider() == "aws"
        && !ctx.resources_of_type(ResourceType::Compute).is_empty()
    {
        "\ndata \"aws_ami\" \"al2023\" {\n  most_recent = true\n  owners      = [\"amazon\"]\n\n  filter {\n    name   = \"name\"\n    values = [\"al2023-ami-*-x86_64\"]\n  }\n}\n"
    } else {
        ""
    };

    let content = format!(
        "# Root Terraform configuration for {project}\n\nterraform {{\n  required_version = \">= 1.6.0\"\n\n  required_providers {{\n{pin}\n  }}\n}}\n\n{provider}\n\nlocals {{\n  common_tags = {{\n{tags}\n  }}\n}}\n{ami}",
        project = ctx.project_name(),
        pin = provider_pin,
        provider = provider_block,
        tags = tag_lines.join("\n"),
        ami = ami_data,
    );

    GeneratedFile::new(
        "infra/terraform/main.tf",
        content,
        "Terraform root module: provider pins and common tags",
    )
}

fn variables_tf(ctx: &RenderContext) -> GeneratedFile {
    let mut content = format!(
        r#"# Input variables for {project}

variable "region" {{
  description = "Cloud provider region"
  type        = string
  default     = "{region}"
}}

variable "environment" {{
  description = "Deployment environment"
  type        = string
  default     = "{environment}"

  validation {{
    condition     = contains(["development", "staging", "production"], var.environment)
    error_message = "Environment must be development, staging, or production."
  }}
}}
"#,
        project = ctx.project_name(),
        region = ctx.region(),
        environment = ctx.environment(),
    );

    for (name, _) in ctx.resources_of_type(ResourceType::Database) {
        let snake = naming::snake_case(name);
        content.push_str(&format!(
            r#"
variable "{snake}_username" {{
  description = "Master username for '{name}'"
  type        = string
  default     = "app"
}}

variable "{snake}_password" {{
  description = "Master password for '{name}'"
  type        = string
  sensitive   = true
}}
"#,
        ));
    }

    if !ctx.resources_of_type(ResourceType::LoadBalancer).is_empty() {
        content.push_str(
            r#"
variable "public_subnet_ids" {
  description = "Subnets the load balancer attaches to"
  type        = list(string)
  default     = []
}
"#,
        );
    }

    GeneratedFile::new(
        "infra/terraform/variables.tf",
        content,
        "Terraform input variables",
    )
}

fn outputs_tf(ctx: &RenderContext) -> GeneratedFile {
    let mut content = format!(
        "# Output values for {project}\n\noutput \"environment\" {{\n  description = \"The deployment environment\"\n  value       = var.environment\n}}\n",
        project = ctx.project_name(),
    );

    for (name, resource) in ctx.ordered_resources() {
        let snake = naming::snake_case(name);
        let output = match resource.resource_type {
            ResourceType::Database => Some((
                format!("{snake}_endpoint"),
                format!("aws_db_instance.{snake}.endpoint"),
            )),
            ResourceType::Compute => Some((
                format!("{snake}_instance_ids"),
                format!("aws_instance.{snake}[*].id"),
            )),
            ResourceType::Cache => Some((
                format!("{snake}_nodes"),
                format!("aws_elasticache_cluster.{snake}.cache_nodes"),
            )),
            ResourceType::Storage => Some((
                format!("{snake}_bucket"),
                format!("aws_s3_bucket.{snake}.bucket"),
            )),
            ResourceType::Network => Some((format!("{snake}_vpc_id"), format!("aws_vpc.{snake}.id"))),
            ResourceType::Queue => Some((
                format!("{snake}_queue_url"),
                format!("aws_sqs_queue.{snake}.url"),
            )),
            ResourceType::LoadBalancer => Some((
                format!("{snake}_dns_name"),
                format!("aws_lb.{snake}.dns_name"),
            )),
            ResourceType::Monitoring | ResourceType::Cdn => None,
        };

        if let Some((output_name, value)) = output {
            content.push_str(&format!(
                "\noutput \"{output_name}\" {{\n  value = {value}\n}}\n"
            ));
        }
    }

    GeneratedFile::new(
        "infra/terraform/outputs.tf",
        content,
        "Terraform output values",
    )
}

fn monitoring_tf(ctx: &RenderContext) -> GeneratedFile {
    let content = format!(
        r#"# Monitoring resources for {project}

resource "aws_sns_topic" "alerts" {{
  name = "{project}-{environment}-alerts"

  tags = local.common_tags
}}

resource "aws_cloudwatch_metric_alarm" "high_cpu" {{
  alarm_name          = "{project}-{environment}-high-cpu"
  comparison_operator = "GreaterThanThreshold"
  evaluation_periods  = 3
  metric_name         = "CPUUtilization"
  namespace           = "AWS/EC2"
  period              = 300
  statistic           = "Average"
  threshold           = 80
  alarm_actions       = [aws_sns_topic.alerts.arn]

  tags = local.common_tags
}}
"#,
        project = ctx.project_name(),
        environment = ctx.environment(),
    );

    GeneratedFile::new(
        "infra/terraform/monitoring.tf",
        content,
        "CloudWatch alarms and alert topic",
    )
}

fn env_example(ctx: &RenderContext) -> GeneratedFile {
    let mut content = format!(
        "# Environment template for {project}\n# Copy to .env and fill in secrets; never commit the result.\n\nTF_VAR_region={region}\nTF_VAR_environment={environment}\n",
        project = ctx.project_name(),
        region = ctx.region(),
        environment = ctx.environment(),
    );

    for (name, _) in ctx.resources_of_type(ResourceType::Database) {
        let snake = naming::snake_case(name);
        content.push_str(&format!(
            "TF_VAR_{snake}_username=app\nTF_VAR_{snake}_password=change-me\n"
        ));
    }

    GeneratedFile::new(".env.example", content, "Environment variable template")
}
