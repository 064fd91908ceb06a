// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Search Data Assets - Walks a full search result set page by page.
//!
//! This example shows:
//! - Building search params with the fluent builders
//! - Streaming every match with `search_iter`, cursor handling included
//!
//! Run with: cargo run -p tidelab-examples --bin search_data_assets

use std::env;

use futures::{TryStreamExt, pin_mut};
use tidelab::{DataAssetSearchParams, DataAssetSortBy, DataAssetType, SortOrder, Tidelab};
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

    let mut params = DataAssetSearchParams::new()
        .with_asset_type(DataAssetType::Dataset)
        .with_sort(DataAssetSortBy::Created, SortOrder::Descending)
        .with_limit(50);
    if let Ok(query) = env::var("SEARCH_QUERY") {
        params = params.with_query(query);
    }

    let results = client.data_assets.search_iter(params);
    pin_mut!(results);

    let mut total = 0usize;
    while let Some(data_asset) = results.try_next().await? {
        total += 1;
        info!(
            data_asset_id = %data_asset.id,
            name = %data_asset.name,
            created = %data_asset.created,
            "match"
        );
    }
    info!(total, "search finished");

    Ok(())
}
