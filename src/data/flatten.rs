//! Flattening of the nested group tree into a service map.

use std::collections::BTreeMap;

use svcwatch_types::{AppRecord, GroupNode};
use tracing::warn;

use crate::config::{EngineConfig, LabelKeys};
use crate::error::IngestError;

/// Normalize a service name into its index key.
pub fn service_key(name: &str) -> String {
    name.to_lowercase()
}

/// The name a service is known by: its framework label, else its id.
pub fn service_name<'a>(app: &'a AppRecord, labels: &LabelKeys) -> &'a str {
    app.label(&labels.framework_name).unwrap_or(&app.id)
}

/// Flatten a group tree into a map of service key to application.
///
/// Sub-groups are visited before a group's own applications. The returned
/// map also holds the synthetic platform record, whose `tasks_running` is
/// the number of applications found in the tree.
pub fn flatten(
    root: &GroupNode,
    config: &EngineConfig,
) -> Result<BTreeMap<String, AppRecord>, IngestError> {
    let mut apps = BTreeMap::new();
    collect(root, &config.labels, &mut apps)?;

    let app_count = apps.len();
    let platform_key = service_key(&config.platform_id);
    if let Some(shadowed) = apps.remove(&platform_key) {
        warn!(app = %shadowed.id, service = %platform_key, "Application shadowed by platform entry");
    }
    apps.insert(platform_key, platform_record(&config.platform_id, app_count));

    Ok(apps)
}

fn collect(
    group: &GroupNode,
    labels: &LabelKeys,
    apps: &mut BTreeMap<String, AppRecord>,
) -> Result<(), IngestError> {
    for child in &group.groups {
        collect(child, labels, apps)?;
    }

    for app in &group.apps {
        if app.id.trim().is_empty() {
            return Err(IngestError::EmptyAppId {
                path: group.id.clone(),
            });
        }

        let name = service_key(service_name(app, labels));
        if let Some(existing) = apps.get(&name) {
            return Err(IngestError::DuplicateService {
                name,
                first: existing.id.clone(),
                second: app.id.clone(),
            });
        }
        apps.insert(name, app.clone());
    }

    Ok(())
}

pub(crate) fn platform_record(platform_id: &str, app_count: usize) -> AppRecord {
    AppRecord {
        id: format!("/{}", platform_id),
        tasks_running: app_count as u64,
        ..Default::default()
    }
}
