//! AWS CDK target.
//!
//! Resources are grouped into two TypeScript stacks: stateful resources
//! (database, cache, storage) land in the database stack, request-path
//! resources (network, compute, queue, loadbalancer) in the api stack. The
//! app entrypoint wires stack dependency order from the schema's edges, and
//! `package.json` is the generated project's manifest.

use serde_json::json;
use tracing::warn;

use stackforge_schema::{
    naming, CacheProperties, ComputeProperties, DatabaseProperties, NetworkProperties,
    QueueProperties, ResourceDefinition, ResourceType, StorageProperties,
};

use crate::context::RenderContext;
use crate::engine::TemplateEngine;
use crate::error::RenderResult;
use crate::files::GeneratedFile;
use crate::library::TemplateLibrary;

/// Stack a resource type belongs to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackKind {
    Database,
    Api,
}

fn stack_for(resource_type: ResourceType) -> Option<StackKind> {
    match resource_type {
        ResourceType::Database | ResourceType::Cache | ResourceType::Storage => {
            Some(StackKind::Database)
        }
        ResourceType::Compute
        | ResourceType::Network
        | ResourceType::Queue
        | ResourceType::LoadBalancer => Some(StackKind::Api),
        ResourceType::Monitoring | ResourceType::Cdn => None,
    }
}

fn construct_snippet(name: &str, resource: &ResourceDefinition) -> String {
    let pascal = naming::pascal_case(name);
    match resource.resource_type {
        ResourceType::Database => {
            let props = DatabaseProperties::from_properties(&resource.properties);
            format!(
                r#"    const {pascal}Instance = new rds.DatabaseInstance(this, '{pascal}', {{
      engine: rds.DatabaseInstanceEngine.postgres({{ version: rds.PostgresEngineVersion.VER_16 }}),
      instanceType: ec2.InstanceType.of(ec2.InstanceClass.T3, ec2.InstanceSize.{size}),
      allocatedStorage: {storage},
      multiAz: {multi_az},
      vpc: props.vpc,
    }});
"#,
                size = props.instance_size.to_uppercase(),
                storage = props.allocated_storage_gb as i64,
                multi_az = props.multi_az,
            )
        }
        ResourceType::Cache => {
            let props = CacheProperties::from_properties(&resource.properties);
            format!(
                r#"    new elasticache.CfnCacheCluster(this, '{pascal}', {{
      engine: '{engine}',
      cacheNodeType: '{node_type}',
      numCacheNodes: {num_nodes},
    }});
"#,
                engine = props.engine,
                node_type = props.node_type,
                num_nodes = props.num_nodes,
            )
        }
        ResourceType::Storage => {
            let props = StorageProperties::from_properties(&resource.properties);
            format!(
                r#"    new s3.Bucket(this, '{pascal}', {{
      versioned: {versioned},
      encryption: s3.BucketEncryption.S3_MANAGED,
    }});
"#,
                versioned = props.versioning,
            )
        }
        ResourceType::Compute => {
            let props = ComputeProperties::from_properties(&resource.properties);
            format!(
                r#"    new ec2.Instance(this, '{pascal}', {{
      instanceType: new ec2.InstanceType('{instance_type}'),
      machineImage: ec2.MachineImage.latestAmazonLinux2023(),
      vpc: this.vpc,
    }});
"#,
                instance_type = props.instance_type,
            )
        }
        ResourceType::Network => {
            let props = NetworkProperties::from_properties(&resource.properties);
            format!(
                r#"    this.vpc = new ec2.Vpc(this, '{pascal}', {{
      ipAddresses: ec2.IpAddresses.cidr('{cidr}'),
      maxAzs: 2,
    }});
"#,
                cidr = props.cidr_block,
            )
        }
        ResourceType::Queue => {
            let props = QueueProperties::from_properties(&resource.properties);
            format!(
                r#"    new sqs.Queue(this, '{pascal}', {{
      fifo: {fifo},
      visibilityTimeout: cdk.Duration.seconds({timeout}),
    }});
"#,
                fifo = props.fifo,
                timeout = props.visibility_timeout_secs,
            )
        }
        ResourceType::LoadBalancer => format!(
            r#"    new elbv2.ApplicationLoadBalancer(this, '{pascal}', {{
      vpc: this.vpc,
      internetFacing: true,
    }});
"#,
        ),
        ResourceType::Monitoring | ResourceType::Cdn => String::new(),
    }
}

pub(crate) fn render(
    ctx: &RenderContext,
    _engine: &TemplateEngine,
    _library: &TemplateLibrary,
) -> RenderResult<(Vec<GeneratedFile>, Vec<String>)> {
    let mut warnings = Vec::new();
    let mut database_snippets = Vec::new();
    let mut api_snippets = Vec::new();

    for (name, resource) in ctx.ordered_resources() {
        match stack_for(resource.resource_type) {
            Some(StackKind::Database) => database_snippets.push(construct_snippet(name, resource)),
            Some(StackKind::Api) => api_snippets.push(construct_snippet(name, resource)),
            None => {
                warn!(resource = %name, resource_type = %resource.resource_type, "No aws-cdk construct; skipping resource");
                warnings.push(format!(
                    "No aws-cdk construct for resource '{}' of type '{}'; resource skipped",
                    name, resource.resource_type
                ));
            }
        }
    }

    let project = ctx.project_name();
    let pascal = ctx.project_pascal();

    let files = vec![
        database_stack(ctx, &pascal, &database_snippets),
        api_stack(ctx, &pascal, &api_snippets),
        app_entrypoint(ctx, &pascal),
        manifest(project)?,
    ];

    Ok((files, warnings))
}

fn database_stack(ctx: &RenderContext, pascal: &str, snippets: &[String]) -> GeneratedFile {
    let body = if snippets.is_empty() {
        "    // No stateful resources defined in the schema.\n".to_string()
    } else {
        snippets.join("\n")
    };

    let content = format!(
        r#"import * as cdk from 'aws-cdk-lib';
import * as ec2 from 'aws-cdk-lib/aws-ec2';
import * as rds from 'aws-cdk-lib/aws-rds';
import * as s3 from 'aws-cdk-lib/aws-s3';
import * as elasticache from 'aws-cdk-lib/aws-elasticache';
import {{ Construct }} from 'constructs';

export interface {pascal}DatabaseStackProps extends cdk.StackProps {{
  vpc: ec2.IVpc;
}}

export class {pascal}DatabaseStack extends cdk.Stack {{
  constructor(scope: Construct, id: string, props: {pascal}DatabaseStackProps) {{
    super(scope, id, props);

{body}  }}
}}
"#,
    );

    GeneratedFile::new(
        format!("lib/stacks/{}-database-stack.ts", ctx.project_name()),
        content,
        "CDK stack for stateful resources",
    )
}

fn api_stack(ctx: &RenderContext, pascal: &str, snippets: &[String]) -> GeneratedFile {
    let body = if snippets.is_empty() {
        "    // No request-path resources defined in the schema.\n".to_string()
    } else {
        snippets.join("\n")
    };

    let content = format!(
        r#"import * as cdk from 'aws-cdk-lib';
import * as ec2 from 'aws-cdk-lib/aws-ec2';
import * as sqs from 'aws-cdk-lib/aws-sqs';
import * as elbv2 from 'aws-cdk-lib/aws-elasticloadbalancingv2';
import {{ Construct }} from 'constructs';

export class {pascal}ApiStack extends cdk.Stack {{
  public vpc: ec2.IVpc;

  constructor(scope: Construct, id: string, props?: cdk.StackProps) {{
    super(scope, id, props);

    this.vpc = ec2.Vpc.fromLookup(this, 'DefaultVpc', {{ isDefault: true }});

{body}  }}
}}
"#,
    );

    GeneratedFile::new(
        format!("lib/stacks/{}-api-stack.ts", ctx.project_name()),
        content,
        "CDK stack for request-path resources",
    )
}

/// The api stack depends on the database stack when any of its resources
/// declares a dependency on a stateful resource.
fn api_depends_on_database(ctx: &RenderContext) -> bool {
    ctx.ordered_resources().any(|(name, resource)| {
        stack_for(resource.resource_type) == Some(StackKind::Api)
            && ctx.graph().dependencies_of(name).iter().any(|dep| {
                ctx.schema
                    .resources
                    .get(dep)
                    .and_then(|r| stack_for(r.resource_type))
                    == Some(StackKind::Database)
            })
    })
}

fn app_entrypoint(ctx: &RenderContext, pascal: &str) -> GeneratedFile {
    let dependency_wiring = if api_depends_on_database(ctx) {
        "\napiStack.addDependency(databaseStack);\n"
    } else {
        "\n"
    };

    let content = format!(
        r#"#!/usr/bin/env node
import * as cdk from 'aws-cdk-lib';
import {{ {pascal}ApiStack }} from '../lib/stacks/{project}-api-stack';
import {{ {pascal}DatabaseStack }} from '../lib/stacks/{project}-database-stack';

const app = new cdk.App();

const apiStack = new {pascal}ApiStack(app, '{pascal}ApiStack', {{
  env: {{ region: '{region}' }},
}});

const databaseStack = new {pascal}DatabaseStack(app, '{pascal}DatabaseStack', {{
  env: {{ region: '{region}' }},
  vpc: apiStack.vpc,
}});
{wiring}"#,
        project = ctx.project_name(),
        region = ctx.region(),
        wiring = dependency_wiring,
    );

    GeneratedFile::new("bin/app.ts", content, "CDK app entrypoint")
}

fn manifest(project: &str) -> RenderResult<GeneratedFile> {
    let manifest = json!({
        "name": project,
        "version": "0.1.0",
        "private": true,
        "bin": { "app": "bin/app.js" },
        "scripts": {
            "build": "tsc",
            "cdk": "cdk",
            "deploy": "cdk deploy --all"
        },
        "dependencies": {
            "aws-cdk-lib": "^2.150.0",
            "constructs": "^10.3.0"
        },
        "devDependencies": {
            "aws-cdk": "^2.150.0",
            "ts-node": "^10.9.0",
            "typescript": "^5.5.0"
        }
    });

    let mut content = serde_json::to_string_pretty(&manifest)?;
    content.push('\n');

    Ok(GeneratedFile::new(
        "package.json",
        content,
        "CDK project manifest",
    ))
}
