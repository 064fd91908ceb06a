// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Run Capsule - Demonstrates the full capsule execution lifecycle.
//!
//! This example shows:
//! - Client construction from environment variables
//! - Fetching a capsule
//! - Starting a computation and waiting for it to finish
//! - Capturing the results as a new data asset
//!
//! Run with: cargo run -p tidelab-examples --bin run_capsule

use std::env;

use tidelab::{
    ComputationSource, DataAssetParams, RunParams, Source, Tidelab, WaitOptions,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Reads TIDELAB_DOMAIN and TIDELAB_TOKEN.
    let client = Tidelab::from_env()?;

    let capsule_id = env::var("CAPSULE_ID")?;
    let capsule = client.capsules.get(&capsule_id).await?;
    info!(capsule_id = %capsule.id, name = %capsule.name, "fetched capsule");

    let computation = client
        .computations
        .run(RunParams::capsule(&capsule.id))
        .await?;
    info!(computation_id = %computation.id, "computation started");

    let computation = client
        .computations
        .wait_until_completed(&computation, WaitOptions::default())
        .await?;
    info!(
        computation_id = %computation.id,
        end_status = ?computation.end_status,
        "computation finished"
    );

    // Capture the run's results as a data asset.
    let data_asset_params = DataAssetParams::new(
        "My Result",
        vec!["my".to_string(), "result".to_string()],
        "my-result",
    )
    .with_description("Computation result")
    .with_source(Source::computation(ComputationSource::new(&computation.id)));

    let data_asset = client.data_assets.create(data_asset_params).await?;
    let data_asset = client
        .data_assets
        .wait_until_ready(&data_asset, WaitOptions::default())
        .await?;
    info!(
        data_asset_id = %data_asset.id,
        state = ?data_asset.state,
        "result data asset ready"
    );

    Ok(())
}
