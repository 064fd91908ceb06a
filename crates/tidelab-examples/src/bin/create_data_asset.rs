// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Create Data Asset - Imports an S3 bucket as a new data asset.
//!
//! This example shows:
//! - Client construction from environment variables
//! - Describing an external AWS S3 source
//! - Creating a data asset and waiting for it to become ready
//!
//! Run with: cargo run -p tidelab-examples --bin create_data_asset

use std::env;

use tidelab::{AwsS3Source, DataAssetParams, Source, Tidelab, WaitOptions};
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

    let mut source = AwsS3Source::new(env::var("S3_BUCKET")?);
    if let Ok(prefix) = env::var("S3_BUCKET_PREFIX") {
        source = source.with_prefix(prefix);
    }
    if matches!(
        env::var("S3_BUCKET_PUBLIC").as_deref(),
        Ok("true") | Ok("1")
    ) {
        source = source.with_public(true);
    }

    let data_asset_params = DataAssetParams::new(
        "Dataset From Bucket",
        vec!["my".to_string(), "data".to_string()],
        "my-data",
    )
    .with_description("S3 bucket import")
    .with_source(Source::aws(source));

    let data_asset = client.data_assets.create(data_asset_params).await?;
    info!(data_asset_id = %data_asset.id, "data asset created");

    let data_asset = client
        .data_assets
        .wait_until_ready(&data_asset, WaitOptions::default())
        .await?;
    info!(
        data_asset_id = %data_asset.id,
        state = ?data_asset.state,
        "data asset ready"
    );

    Ok(())
}
