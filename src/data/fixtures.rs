//! Mock orchestrator responses shared by the unit tests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};

pub const PACKAGE_METADATA: &str = r#"{
    "name": "framework-1",
    "version": "0.1.0",
    "images": {
        "icon-small": "icon-service-default-small.png",
        "icon-medium": "icon-service-default-medium.png",
        "icon-large": "icon-service-default-large.png",
        "screenshots": ["screenshot-1.png"]
    }
}"#;

pub fn encoded_metadata() -> String {
    STANDARD.encode(PACKAGE_METADATA)
}

fn framework(extra: Value) -> Value {
    let mut app = json!({
        "id": "/framework-1",
        "tasksRunning": 1,
        "tasksHealthy": 0,
        "tasksUnhealthy": 0,
        "healthChecks": [{"protocol": "HTTP", "path": "/"}],
        "labels": {"DCOS_PACKAGE_FRAMEWORK_NAME": "Framework 1"}
    });
    if let (Some(app), Some(extra)) = (app.as_object_mut(), extra.as_object()) {
        for (key, value) in extra {
            app.insert(key.clone(), value.clone());
        }
    }
    app
}

pub fn no_health_checks() -> Value {
    json!({
        "groups": [{
            "id": "/nested",
            "groups": [],
            "apps": [{"id": "/nested/plain", "tasksRunning": 2, "tasksHealthy": 2}]
        }],
        "apps": [framework(json!({"healthChecks": [], "tasksHealthy": 1}))]
    })
}

pub fn no_running_tasks() -> Value {
    json!({"apps": [framework(json!({"tasksRunning": 0}))]})
}

pub fn only_unhealthy() -> Value {
    json!({"apps": [framework(json!({"tasksUnhealthy": 1}))]})
}

pub fn healthy_and_unhealthy() -> Value {
    json!({"apps": [framework(json!({"tasksRunning": 2, "tasksHealthy": 1, "tasksUnhealthy": 1}))]})
}

pub fn healthy() -> Value {
    json!({"apps": [framework(json!({"tasksHealthy": 1}))]})
}

pub fn with_version() -> Value {
    json!({
        "apps": [framework(json!({
            "version": "2015-05-28T21:21:41.462Z",
            "labels": {
                "DCOS_PACKAGE_FRAMEWORK_NAME": "Framework 1",
                "DCOS_PACKAGE_VERSION": "0.1.0"
            }
        }))]
    })
}

pub fn without_version() -> Value {
    json!({"apps": [framework(json!({}))]})
}

pub fn with_metadata() -> Value {
    json!({
        "apps": [framework(json!({
            "labels": {
                "DCOS_PACKAGE_FRAMEWORK_NAME": "Framework 1",
                "DCOS_PACKAGE_METADATA": encoded_metadata()
            }
        }))]
    })
}

pub fn deployments() -> Value {
    json!([
        {
            "id": "5ed4c0c5-9ff8-4a6f-a0cd-f57f59a34b43",
            "version": "2015-09-29T15:59:51.164Z",
            "affectedApps": ["/framework-1"],
            "currentStep": 1,
            "totalSteps": 1
        },
        {"id": "deployment-id"}
    ])
}
