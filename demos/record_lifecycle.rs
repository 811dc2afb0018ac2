//! Walk a group record through a deploy and a remove.
//!
//! Runs against the in-memory object client, so it needs no cluster.
//!
//! Usage:
//!   cargo run --example record_lifecycle
//!   KUBEDRIVER_CONFIG=./kubedriver_config.yml cargo run --example record_lifecycle

use kubedriver::{
    ConfigMapRecordPersistence, DriverConfig, GroupRecord, MemoryApiController,
    ObjectConfiguration, ObjectRecord, ObjectStates, RecordPersistence, RequestRecord,
};
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug shows every storage round trip
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = DriverConfig::load_layered(&["./kubedriver_config.yml"])?;
    let client = Arc::new(MemoryApiController::with_default_namespace(
        config.default_namespace.clone(),
    ));
    let records = ConfigMapRecordPersistence::new(client, config.persistence.clone());

    let service = ObjectConfiguration::new(json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": {"name": "web"},
        "spec": {"ports": [{"port": 80}]}
    }))?;

    // deploy
    let mut group = GroupRecord::new("demo-group");
    let deploy = RequestRecord::generate("Deploy");
    let deploy_uid = deploy.uid.clone();
    group.add_request(deploy)?;
    group.add_object(ObjectRecord::create_requested(service));
    records.create(&group).await?;
    tracing::info!(name = %records.storage_name(group.uid()), "group stored");

    group.objects_mut()[0].set_state(ObjectStates::CREATED);
    if let Some(request) = group.request_mut(&deploy_uid) {
        request.complete();
    }
    records.update(&group).await?;

    // remove
    let mut group = records.get("demo-group").await?;
    let remove = RequestRecord::generate("Remove");
    let remove_uid = remove.uid.clone();
    group.add_request(remove)?;
    group.objects_mut()[0].set_state(ObjectStates::DELETE_REQUESTED);
    records.update(&group).await?;

    group.remove_object("v1", "Service", "web");
    if let Some(request) = group.request_mut(&remove_uid) {
        request.complete();
    }
    records.update(&group).await?;

    let group = records.get("demo-group").await?;
    println!("{}", group);

    records.delete("demo-group").await?;
    Ok(())
}
