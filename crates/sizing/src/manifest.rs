//! Deployment manifest synthesis.
//!
//! A manifest is two Kubernetes objects rendered as YAML documents: the
//! workload (`apps/v1` Deployment) and its cluster-internal Service. Both are
//! built as typed `k8s-openapi` objects first, so the text is always
//! syntactically valid, and maps are ordered so the output is byte-stable.

use std::collections::BTreeMap;
use std::fmt;

use api_types::DeploymentRequest;
use api_types::GpuAllocation;
use api_types::PriorityClass;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::apps::v1::DeploymentSpec;
use k8s_openapi::api::core::v1::Container;
use k8s_openapi::api::core::v1::ContainerPort;
use k8s_openapi::api::core::v1::EnvVar;
use k8s_openapi::api::core::v1::HTTPGetAction;
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::api::core::v1::PodTemplateSpec;
use k8s_openapi::api::core::v1::Probe;
use k8s_openapi::api::core::v1::ResourceRequirements;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::core::v1::ServicePort;
use k8s_openapi::api::core::v1::ServiceSpec;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use serde::Serialize;
use tracing::debug;

use crate::resources::ResourceReservation;

/// Domain prefix for platform labels, annotations and node labels.
pub const RAPT_DOMAIN: &str = "rapt.ai";
/// Identity used when the request has no service name.
pub const PLACEHOLDER_SERVICE_NAME: &str = "my-service";
const PLACEHOLDER_MODEL_LABEL: &str = "unspecified";

/// Separator between the workload and network-exposure documents.
pub const DOCUMENT_DELIMITER: &str = "---\n";

const GPU_RESOURCE_NAME: &str = "nvidia.com/gpu";
const GPU_MEMORY_UTILIZATION: &str = "0.9";
const HEALTH_PATH: &str = "/health";
const PORT_NAME: &str = "http";
const PROTOCOL_TCP: &str = "TCP";
const SERVICE_TYPE_CLUSTER_IP: &str = "ClusterIP";

const LIVENESS_INITIAL_DELAY_SECONDS: i32 = 60;
const LIVENESS_PERIOD_SECONDS: i32 = 10;
const READINESS_INITIAL_DELAY_SECONDS: i32 = 30;
const READINESS_PERIOD_SECONDS: i32 = 5;

/// Rendered manifest text: the workload document, a `---` line, then the
/// service document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDocument {
    text: String,
    workload_len: usize,
}

impl ManifestDocument {
    fn new(workload: String, network_exposure: String) -> Self {
        let workload_len = workload.len();
        let mut text = workload;
        text.push_str(DOCUMENT_DELIMITER);
        text.push_str(&network_exposure);
        Self { text, workload_len }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The Deployment document.
    pub fn workload(&self) -> &str {
        &self.text[..self.workload_len]
    }

    /// The Service document.
    pub fn network_exposure(&self) -> &str {
        &self.text[self.workload_len + DOCUMENT_DELIMITER.len()..]
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for ManifestDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for ManifestDocument {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

/// Name used for the Deployment, Service, container and `app` label.
pub fn service_identity(request: &DeploymentRequest) -> &str {
    let name = request.service_name.trim();
    if name.is_empty() {
        PLACEHOLDER_SERVICE_NAME
    } else {
        name
    }
}

/// In-cluster URL of the service exposed by the manifest.
pub fn service_endpoint(request: &DeploymentRequest) -> String {
    format!(
        "http://{}.{}.svc.cluster.local:{}",
        service_identity(request),
        request.namespace,
        request.port
    )
}

/// Priority class referenced by the pod, if any. Only manual deployments at
/// premium or spot priority carry one.
pub fn priority_class_name(request: &DeploymentRequest) -> Option<String> {
    if !request.is_manual() {
        return None;
    }
    match request.priority_class {
        PriorityClass::Premium | PriorityClass::Spot => {
            Some(format!("rapt-{}", request.priority_class))
        }
        PriorityClass::Standard => None,
    }
}

/// Preferred data center of a manual request; `None` in automatic mode or
/// when left blank.
fn preferred_data_center(request: &DeploymentRequest) -> Option<&str> {
    let dc = request.preferred_data_center.trim();
    (request.is_manual() && !dc.is_empty()).then_some(dc)
}

fn domain_key(name: &str) -> String {
    format!("{RAPT_DOMAIN}/{name}")
}

fn app_labels(request: &DeploymentRequest) -> BTreeMap<String, String> {
    BTreeMap::from([("app".to_string(), service_identity(request).to_string())])
}

fn env_var(name: &str, value: impl Into<String>) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.into()),
        value_from: None,
    }
}

fn health_probe(port: i32, initial_delay_seconds: i32, period_seconds: i32) -> Probe {
    Probe {
        http_get: Some(HTTPGetAction {
            host: None,
            http_headers: None,
            path: Some(HEALTH_PATH.to_string()),
            port: IntOrString::Int(port),
            scheme: None,
        }),
        initial_delay_seconds: Some(initial_delay_seconds),
        period_seconds: Some(period_seconds),
        ..Default::default()
    }
}

fn container_resources(allocation: &GpuAllocation) -> ResourceRequirements {
    let reservation = ResourceReservation::for_allocation(allocation);
    let gpus = Quantity(allocation.gpu_count().to_string());
    let memory = Quantity(format!("{}Gi", reservation.memory_gb));

    ResourceRequirements {
        requests: Some(BTreeMap::from([
            (GPU_RESOURCE_NAME.to_string(), gpus.clone()),
            ("memory".to_string(), memory.clone()),
            (
                "cpu".to_string(),
                Quantity(reservation.cpu_cores.to_string()),
            ),
        ])),
        limits: Some(BTreeMap::from([
            (GPU_RESOURCE_NAME.to_string(), gpus),
            ("memory".to_string(), memory),
        ])),
        ..Default::default()
    }
}

fn workload_container(request: &DeploymentRequest, allocation: &GpuAllocation) -> Container {
    Container {
        name: service_identity(request).to_string(),
        image: Some(request.container_image.clone()),
        ports: Some(vec![ContainerPort {
            container_port: request.port,
            name: Some(PORT_NAME.to_string()),
            protocol: Some(PROTOCOL_TCP.to_string()),
            ..Default::default()
        }]),
        env: Some(vec![
            env_var("MODEL_NAME", request.model_name.as_str()),
            env_var("MAX_MODEL_LEN", request.sequence_length.to_string()),
            env_var("GPU_MEMORY_UTILIZATION", GPU_MEMORY_UTILIZATION),
            env_var("TENSOR_PARALLEL_SIZE", allocation.gpu_count().to_string()),
            env_var("TEMPERATURE", request.temperature.to_string()),
            env_var("TOP_P", request.top_p.to_string()),
        ]),
        resources: Some(container_resources(allocation)),
        liveness_probe: Some(health_probe(
            request.port,
            LIVENESS_INITIAL_DELAY_SECONDS,
            LIVENESS_PERIOD_SECONDS,
        )),
        readiness_probe: Some(health_probe(
            request.port,
            READINESS_INITIAL_DELAY_SECONDS,
            READINESS_PERIOD_SECONDS,
        )),
        ..Default::default()
    }
}

/// Build the workload object for a request and a resolved allocation.
pub fn build_deployment(request: &DeploymentRequest, allocation: &GpuAllocation) -> Deployment {
    let name = service_identity(request).to_string();
    let data_center = preferred_data_center(request);

    let mut metadata_labels = app_labels(request);
    metadata_labels.insert("managed-by".to_string(), RAPT_DOMAIN.to_string());
    metadata_labels.insert("deployment-mode".to_string(), request.mode.to_string());
    let model_label = match request.model_name.trim() {
        "" => PLACEHOLDER_MODEL_LABEL,
        model => model,
    };
    metadata_labels.insert("model".to_string(), model_label.to_string());

    let mut pod_labels = app_labels(request);
    pod_labels.insert("gpu-type".to_string(), allocation.gpu_type().to_string());
    pod_labels.insert(
        "priority".to_string(),
        request.effective_priority().to_string(),
    );

    let mut annotations = BTreeMap::from([
        (domain_key("batch-size"), request.batch_size.to_string()),
        (domain_key("seq-len"), request.sequence_length.to_string()),
        (domain_key("max-tokens"), request.max_tokens.to_string()),
        (
            domain_key("gpu-mode"),
            allocation.sharing_mode().to_string(),
        ),
    ]);
    let mut node_selector = BTreeMap::from([(
        domain_key("gpu-type"),
        allocation.gpu_type().to_string(),
    )]);
    if let Some(dc) = data_center {
        annotations.insert(domain_key("preferred-dc"), dc.to_string());
        node_selector.insert(domain_key("datacenter"), dc.to_string());
    }

    Deployment {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: Some(request.namespace.clone()),
            labels: Some(metadata_labels),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(request.replica_count),
            selector: LabelSelector {
                match_labels: Some(app_labels(request)),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(pod_labels),
                    annotations: Some(annotations),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    priority_class_name: priority_class_name(request),
                    node_selector: Some(node_selector),
                    containers: vec![workload_container(request, allocation)],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Build the cluster-internal Service selecting the workload by its `app`
/// label.
pub fn build_service(request: &DeploymentRequest) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(service_identity(request).to_string()),
            namespace: Some(request.namespace.clone()),
            labels: Some(app_labels(request)),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            type_: Some(SERVICE_TYPE_CLUSTER_IP.to_string()),
            ports: Some(vec![ServicePort {
                port: request.port,
                target_port: Some(IntOrString::Int(request.port)),
                protocol: Some(PROTOCOL_TCP.to_string()),
                name: Some(PORT_NAME.to_string()),
                ..Default::default()
            }]),
            selector: Some(app_labels(request)),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn to_yaml<T: Serialize>(object: &T) -> String {
    // Only string-keyed maps and plain scalars reach the serializer.
    serde_yaml::to_string(object).expect("Kubernetes objects serialize to YAML")
}

/// Render the manifest for a request and allocation. Pure and total.
pub fn synthesize(request: &DeploymentRequest, allocation: &GpuAllocation) -> ManifestDocument {
    let deployment = build_deployment(request, allocation);
    let service = build_service(request);

    debug!(
        service = service_identity(request),
        namespace = %request.namespace,
        %allocation,
        "synthesized deployment manifest"
    );

    ManifestDocument::new(to_yaml(&deployment), to_yaml(&service))
}
