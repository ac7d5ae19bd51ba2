//! Integration tests for the planner HTTP API

use api_types::GpuAllocation;
use api_types::GpuType;
use api_types::SharingMode;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use planner::api::routes;
use poem::http::StatusCode;
use poem::test::TestClient;
use serde_json::json;
use similar_asserts::assert_eq;

#[tokio::test]
async fn healthz_reports_ok() {
    let client = TestClient::new(routes());

    let resp = client.get("/healthz").send().await;
    resp.assert_status_is_ok();
    let body: serde_json::Value = resp.json().await.value().deserialize();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].as_str().is_some());
}

#[tokio::test]
async fn estimate_returns_allocation_and_breakdown() {
    let client = TestClient::new(routes());

    let resp = client
        .post("/v1/estimate")
        .body_json(&json!({ "modelParams": "70B", "batchSize": "1", "sequenceLength": 512 }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let body: serde_json::Value = resp.json().await.value().deserialize();
    let allocation: GpuAllocation = serde_json::from_value(body["allocation"].clone()).unwrap();
    assert_eq!(
        allocation,
        GpuAllocation::new(GpuType::H100, 2, SharingMode::Full)
    );
    assert_eq!(body["memoryEstimate"]["modelGb"], 140.0);
    assert_eq!(body["memoryEstimate"]["overheadGb"], 4.0);
    assert_eq!(body["reservation"]["cpuCores"], 16);
}

#[tokio::test]
async fn estimate_sizes_from_model_name_when_params_missing() {
    let client = TestClient::new(routes());

    let resp = client
        .post("/v1/estimate")
        .body_json(&json!({ "modelName": "meta-llama/Llama-2-70b-chat-hf" }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let body: serde_json::Value = resp.json().await.value().deserialize();
    assert_eq!(body["memoryEstimate"]["modelGb"], 140.0);
    assert_eq!(body["allocation"]["gpuType"], "H100");
    assert_eq!(body["allocation"]["gpuCount"], 2);
}

#[tokio::test]
async fn estimate_ignores_manual_mode() {
    let client = TestClient::new(routes());

    let resp = client
        .post("/v1/estimate")
        .body_json(&json!({ "modelParams": "1B", "mode": "manual", "gpuType": "H100", "gpuCount": 8 }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let body: serde_json::Value = resp.json().await.value().deserialize();
    assert_eq!(body["allocation"]["gpuType"], "T4");
    assert_eq!(body["allocation"]["gpuCount"], 1);
}

#[tokio::test]
async fn manifest_is_yaml_text() {
    let client = TestClient::new(routes());

    let resp = client
        .post("/v1/manifest")
        .body_json(&json!({
            "serviceName": "chat",
            "mode": "manual",
            "gpuType": "a100",
            "gpuCount": "2",
            "priority": "premium",
        }))
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.assert_content_type("application/yaml");

    let text = resp.0.into_body().into_string().await.unwrap();
    let (workload, _) = text.split_once("\n---\n").unwrap();
    let deployment: Deployment = serde_yaml::from_str(workload).unwrap();
    assert_eq!(deployment.metadata.name.as_deref(), Some("chat"));
    let pod = deployment.spec.unwrap().template.spec.unwrap();
    assert_eq!(pod.priority_class_name.as_deref(), Some("rapt-premium"));
    assert_eq!(pod.node_selector.unwrap()["rapt.ai/gpu-type"], "A100");
}

#[tokio::test]
async fn manifest_renders_supplied_allocation() {
    let client = TestClient::new(routes());

    let resp = client
        .post("/v1/manifest")
        .body_json(&json!({
            "serviceName": "chat",
            "modelParams": "70B",
            "priority": "spot",
            "allocation": { "gpuType": "a10", "gpuCount": "3", "sharingMode": "mig" },
        }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let text = resp.0.into_body().into_string().await.unwrap();
    let (workload, _) = text.split_once("\n---\n").unwrap();
    let deployment: Deployment = serde_yaml::from_str(workload).unwrap();
    assert_eq!(
        deployment.metadata.labels.unwrap()["deployment-mode"],
        "auto"
    );
    let template = deployment.spec.unwrap().template;
    let annotations = template.metadata.unwrap().annotations.unwrap();
    assert_eq!(annotations["rapt.ai/gpu-mode"], "fractional");
    let pod = template.spec.unwrap();
    assert_eq!(pod.priority_class_name, None);
    assert_eq!(pod.node_selector.unwrap()["rapt.ai/gpu-type"], "A10");
    let requests = pod.containers[0]
        .resources
        .as_ref()
        .unwrap()
        .requests
        .clone()
        .unwrap();
    assert_eq!(requests["nvidia.com/gpu"], Quantity("3".to_string()));
    // 24 GB x 3 x 1.2 = 86.4
    assert_eq!(requests["memory"], Quantity("87Gi".to_string()));
}

#[tokio::test]
async fn catalog_lists_choices() {
    let client = TestClient::new(routes());

    let resp = client.get("/v1/catalog").send().await;
    resp.assert_status_is_ok();

    let body: serde_json::Value = resp.json().await.value().deserialize();
    assert_eq!(body["gpuTypes"].as_array().unwrap().len(), 6);
    assert_eq!(body["gpuTypes"][1]["name"], "A100");
    assert_eq!(body["gpuTypes"][1]["memoryGb"], 40);
    assert_eq!(body["sharingModes"][1]["label"], "Fractional (MIG)");
    assert_eq!(body["priorityClasses"][0]["description"], "Highest priority, non-preemptible");
    assert_eq!(body["dataCenters"][0], "us-east-1");
    assert_eq!(body["maxManualGpuCount"], 8);
}

#[tokio::test]
async fn plan_returns_endpoint_and_manifest() {
    let client = TestClient::new(routes());

    let resp = client
        .post("/v1/plan")
        .body_json(&json!({ "serviceName": "chat", "namespace": "ml", "port": "9000" }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let body: serde_json::Value = resp.json().await.value().deserialize();
    assert_eq!(body["serviceName"], "chat");
    assert_eq!(body["mode"], "auto");
    assert_eq!(body["priority"], "standard");
    assert_eq!(body["endpoint"], "http://chat.ml.svc.cluster.local:9000");
    assert!(body["manifest"]
        .as_str()
        .unwrap()
        .contains("containerPort: 9000"));
}

#[tokio::test]
async fn empty_body_object_is_default_request() {
    let client = TestClient::new(routes());

    let resp = client.post("/v1/plan").body_json(&json!({})).send().await;
    resp.assert_status_is_ok();

    let body: serde_json::Value = resp.json().await.value().deserialize();
    assert_eq!(body["serviceName"], "my-service");
    assert_eq!(body["allocation"]["gpuType"], "T4");
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let client = TestClient::new(routes());

    let resp = client
        .post("/v1/estimate")
        .content_type("application/json")
        .body("{ not json")
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
}
