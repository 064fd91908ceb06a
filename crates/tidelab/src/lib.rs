// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Tidelab SDK - Typed client for the Tidelab computational research platform.
//!
//! This crate wraps the platform's REST API with typed records and one
//! resource client per API family. A single [`Tidelab`] client owns the
//! HTTP session and exposes the resource clients as fields.
//!
//! # Features
//!
//! - **Capsules & Pipelines**: retrieve, search, archive, attach and detach
//!   data assets, manage permissions
//! - **Computations**: start capsule and pipeline runs, poll until they
//!   finish, list and download results
//! - **Data Assets**: create from S3/GCP buckets or computation results,
//!   poll until ready, update, search, transfer
//! - **Search Streams**: cursor-following lazy streams over paginated
//!   search results
//! - **Typed Errors**: every failed response classified by status code,
//!   carrying the server's diagnostic payload
//!
//! # Quick Start
//!
//! ```ignore
//! use tidelab::{ComputationSource, DataAssetParams, RunParams, Source, Tidelab, WaitOptions};
//!
//! #[tokio::main]
//! async fn main() -> tidelab::Result<()> {
//!     let client = Tidelab::from_env()?;
//!
//!     // Start a capsule run and wait for it to finish.
//!     let computation = client
//!         .computations
//!         .run(RunParams::capsule("capsule-id").with_parameters(vec!["10".into()]))
//!         .await?;
//!     let computation = client
//!         .computations
//!         .wait_until_completed(&computation, WaitOptions::default())
//!         .await?;
//!
//!     // Capture its results as a data asset.
//!     let data_asset = client
//!         .data_assets
//!         .create(
//!             DataAssetParams::new("run results", vec!["results".into()], "results")
//!                 .with_source(Source::computation(ComputationSource::new(&computation.id))),
//!         )
//!         .await?;
//!     let data_asset = client
//!         .data_assets
//!         .wait_until_ready(&data_asset, WaitOptions::default())
//!         .await?;
//!
//!     println!("data asset {} is {:?}", data_asset.id, data_asset.state);
//!     Ok(())
//! }
//! ```
//!
//! # Search Pagination
//!
//! Search endpoints return one page per call. The `search_iter` methods
//! follow `next_token` cursors for you and yield one resource at a time:
//!
//! ```ignore
//! use futures::TryStreamExt;
//! use tidelab::DataAssetSearchParams;
//!
//! let mut results = client
//!     .data_assets
//!     .search_iter(DataAssetSearchParams::new().with_query("tag:genomics"));
//! futures::pin_mut!(results);
//! while let Some(data_asset) = results.try_next().await? {
//!     println!("{}", data_asset.name);
//! }
//! ```
//!
//! # Configuration
//!
//! ## Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `TIDELAB_DOMAIN` | Yes | - | Deployment URL |
//! | `TIDELAB_TOKEN` | Yes | - | API access token |
//! | `TIDELAB_RETRIES` | No | `0` | Transport retry count |
//! | `TIDELAB_AGENT_ID` | No | - | Agent identifier |
//!
//! ## Programmatic Configuration
//!
//! ```ignore
//! use tidelab::{ClientConfig, Tidelab};
//!
//! let config = ClientConfig::new("https://acme.tidelab.com", token)
//!     .with_retries(3)
//!     .with_agent_id("agent-7");
//!
//! let client = Tidelab::new(config)?;
//! ```

mod capsules;
mod client;
mod components;
mod computations;
mod custom_metadata;
mod data_assets;
mod error;
mod http;
mod poll;
mod search;

// Entry points
pub use client::{ClientConfig, Tidelab};
pub use error::{ApiError, Error, Result};

// Polling
pub use poll::{MIN_POLLING_INTERVAL, WaitOptions};

// Shared records
pub use components::{
    DownloadFileUrl, EveryoneRole, FileUrls, FilterValue, Folder, FolderItem, GroupPermissions,
    GroupRole, ListFolderParams, Ownership, Permissions, SearchFilter, SearchFilterRange,
    SortOrder, UserPermissions, UserRole,
};

// Capsules and pipelines
pub use capsules::{
    AppPanel, Capsule, CapsuleSearchParams, CapsuleSearchResults, CapsuleSortBy, CapsuleStatus,
    Capsules, OriginalCapsuleInfo,
};

// Computations
pub use computations::{
    Computation, ComputationEndStatus, ComputationState, Computations, DataAssetsRunParam,
    InputDataAsset, NamedRunParam, Param, PipelineProcess, PipelineProcessParams, RunParams,
};

// Data assets
pub use data_assets::{
    AppParameter, AwsS3Source, AwsS3Target, CloudWorkstationSource, ComputationSource,
    ContainedDataAsset, DataAsset, DataAssetAttachParams, DataAssetAttachResults, DataAssetOrigin,
    DataAssetParams, DataAssetSearchOrigin, DataAssetSearchParams, DataAssetSearchResults,
    DataAssetSortBy, DataAssetState, DataAssetType, DataAssetUpdateParams, DataAssets,
    GcpCloudStorageSource, Provenance, ResultsInfo, Source, SourceBucket, Target,
    TransferDataParams,
};

// Custom metadata schema
pub use custom_metadata::{
    AllowedValues, CustomMetadata, CustomMetadataField, CustomMetadataFieldRange,
    CustomMetadataFieldType, CustomMetadataSchema,
};
