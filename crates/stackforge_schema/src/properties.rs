//! Typed views over the open `properties` bag of a resource.
//!
//! The AI layer fills `properties` with whatever keys it sees fit. Each view
//! here reads the keys a resource type recognizes, applies explicit defaults
//! for anything missing, and tolerates loosely typed values (numbers encoded
//! as strings, booleans as strings). Unknown keys are ignored; renderers and
//! the cost calculator only ever work from these views.

use std::collections::BTreeMap;

use serde_json::Value;

type Properties = BTreeMap<String, Value>;

/// Read the first present key as a string.
fn string_prop(props: &Properties, keys: &[&str], default: &str) -> String {
    for key in keys {
        match props.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => return s.clone(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    default.to_string()
}

/// Read the first present key as a float, accepting numeric strings.
fn number_prop(props: &Properties, keys: &[&str], default: f64) -> f64 {
    for key in keys {
        match props.get(*key) {
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_f64() {
                    return v;
                }
            }
            Some(Value::String(s)) => {
                if let Ok(v) = s.trim().parse::<f64>() {
                    return v;
                }
            }
            _ => {}
        }
    }
    default
}

/// Read the first present key as an unsigned count.
fn count_prop(props: &Properties, keys: &[&str], default: u64) -> u64 {
    let value = number_prop(props, keys, default as f64);
    if value.is_finite() && value >= 0.0 {
        value.round() as u64
    } else {
        default
    }
}

/// Read the first present key as a bool, accepting "true"/"false" strings.
fn bool_prop(props: &Properties, keys: &[&str], default: bool) -> bool {
    for key in keys {
        match props.get(*key) {
            Some(Value::Bool(b)) => return *b,
            Some(Value::String(s)) => match s.to_lowercase().as_str() {
                "true" => return true,
                "false" => return false,
                _ => {}
            },
            _ => {}
        }
    }
    default
}

/// Typed view for `database` resources.
#[derive(Debug, Clone)]
pub struct DatabaseProperties {
    pub engine: String,
    pub instance_class: String,
    pub instance_size: String,
    pub allocated_storage_gb: f64,
    pub multi_az: bool,
}

impl DatabaseProperties {
    pub fn from_properties(props: &Properties) -> Self {
        Self {
            engine: string_prop(props, &["engine"], "postgres"),
            instance_class: string_prop(props, &["instanceClass"], "t3"),
            instance_size: string_prop(props, &["instanceSize"], "micro"),
            allocated_storage_gb: number_prop(
                props,
                &["allocatedStorage", "storage", "storageGb"],
                20.0,
            ),
            multi_az: bool_prop(props, &["multiAz"], false),
        }
    }

    /// Combined class and size, e.g. `t3.micro`.
    pub fn instance_tier(&self) -> String {
        format!("{}.{}", self.instance_class, self.instance_size)
    }
}

/// Declared sub-type of a `compute` resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeKind {
    Instance,
    Serverless,
    Container,
}

impl ComputeKind {
    fn from_properties(props: &Properties) -> Self {
        match string_prop(props, &["computeType"], "instance").to_lowercase().as_str() {
            "serverless" | "function" | "lambda" => ComputeKind::Serverless,
            "container" | "fargate" => ComputeKind::Container,
            _ => ComputeKind::Instance,
        }
    }
}

/// Typed view for `compute` resources.
#[derive(Debug, Clone)]
pub struct ComputeProperties {
    pub kind: ComputeKind,
    pub instance_type: String,
    pub count: u64,
    /// Serverless: requests per month.
    pub estimated_requests: f64,
    /// Serverless: average invocation duration.
    pub avg_duration_ms: f64,
    /// Serverless: allocated memory.
    pub memory_mb: f64,
    /// Container: vCPU per task.
    pub cpu: f64,
    /// Container: memory per task.
    pub memory_gb: f64,
}

impl ComputeProperties {
    pub fn from_properties(props: &Properties) -> Self {
        Self {
            kind: ComputeKind::from_properties(props),
            instance_type: string_prop(props, &["instanceType"], "t3.micro"),
            count: count_prop(props, &["count", "instances"], 1).max(1),
            estimated_requests: number_prop(props, &["estimatedRequests"], 1_000_000.0),
            avg_duration_ms: number_prop(props, &["avgDurationMs"], 100.0),
            memory_mb: number_prop(props, &["memoryMb", "memory"], 128.0),
            cpu: number_prop(props, &["cpu", "vcpu"], 0.25),
            memory_gb: number_prop(props, &["memoryGb"], 0.5),
        }
    }
}

/// Typed view for `cache` resources.
#[derive(Debug, Clone)]
pub struct CacheProperties {
    pub engine: String,
    pub node_type: String,
    pub num_nodes: u64,
}

impl CacheProperties {
    pub fn from_properties(props: &Properties) -> Self {
        Self {
            engine: string_prop(props, &["engine"], "redis"),
            node_type: string_prop(props, &["nodeType", "instanceType"], "cache.t3.micro"),
            num_nodes: count_prop(props, &["numNodes", "nodes"], 1).max(1),
        }
    }
}

/// Typed view for `storage` resources.
#[derive(Debug, Clone)]
pub struct StorageProperties {
    pub size_gb: f64,
    pub versioning: bool,
}

impl StorageProperties {
    pub fn from_properties(props: &Properties) -> Self {
        Self {
            size_gb: number_prop(props, &["sizeGb", "size", "storage"], 50.0),
            versioning: bool_prop(props, &["versioning"], false),
        }
    }
}

/// Typed view for `network` resources.
#[derive(Debug, Clone)]
pub struct NetworkProperties {
    pub cidr_block: String,
}

impl NetworkProperties {
    pub fn from_properties(props: &Properties) -> Self {
        Self {
            cidr_block: string_prop(props, &["cidrBlock", "cidr"], "10.0.0.0/16"),
        }
    }
}

/// Typed view for `queue` resources.
#[derive(Debug, Clone)]
pub struct QueueProperties {
    pub fifo: bool,
    pub visibility_timeout_secs: u64,
}

impl QueueProperties {
    pub fn from_properties(props: &Properties) -> Self {
        Self {
            fifo: bool_prop(props, &["fifo"], false),
            visibility_timeout_secs: count_prop(props, &["visibilityTimeout"], 30),
        }
    }
}

/// Typed view for `loadbalancer` resources.
#[derive(Debug, Clone)]
pub struct LoadBalancerProperties {
    pub lb_type: String,
    pub internal: bool,
}

impl LoadBalancerProperties {
    pub fn from_properties(props: &Properties) -> Self {
        Self {
            lb_type: string_prop(props, &["lbType", "type"], "application"),
            internal: bool_prop(props, &["internal"], false),
        }
    }
}
