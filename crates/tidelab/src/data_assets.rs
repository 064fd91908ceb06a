// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Data asset records and operations.
//!
//! Data assets are versioned, immutable collections of files used as inputs
//! and outputs of computations. Internal assets are stored on the platform;
//! external assets reference files in S3 or GCP buckets without copying them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::components::{
    FileUrls, Folder, ListFolderParams, Ownership, Permissions, SearchFilter, SortOrder,
};
use crate::computations::{Param, PipelineProcess};
use crate::error::Result;
use crate::http::HttpSession;
use crate::poll::{WaitOptions, wait_until_terminal};
use crate::search::{Page, PageRequest, paginate};

// ============================================================================
// Records
// ============================================================================

/// Kind of content a data asset holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataAssetType {
    Dataset,
    Result,
    Combined,
    Model,
}

/// State of a data asset during creation and afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataAssetState {
    Draft,
    Ready,
    Failed,
}

impl DataAssetState {
    /// Whether creation has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DataAssetState::Ready | DataAssetState::Failed)
    }
}

/// Provenance of a result data asset.
///
/// Only one of `capsule` and `computation` is populated, depending on how the
/// result was captured.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Provenance {
    /// Commit hash of the capsule code at execution time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    /// Script the data asset was created by.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_script: Option<String>,
    /// Docker image used to create the data asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    /// Capsule the data asset was created from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capsule: Option<String>,
    /// Data assets used as inputs to create this one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_assets: Option<Vec<String>>,
    /// Computation the data asset was created from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computation: Option<String>,
}

/// Where a data asset's files originate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataAssetOrigin {
    Local,
    Aws,
    Gcp,
}

/// Bucket a data asset was created from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceBucket {
    pub origin: DataAssetOrigin,
    /// Bucket the data asset was created from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// Folder within the bucket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Whether the files stay in external storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external: Option<bool>,
}

/// App panel parameter used to generate a result data asset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppParameter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Execution details for data assets created from exported capsule or
/// pipeline results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsInfo {
    /// Capsule that was executed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capsule_id: Option<String>,
    /// Pipeline that was executed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<String>,
    /// Capsule or pipeline release version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Commit hash of the code at execution time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    /// Script that was executed, relative to the capsule folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_script: Option<String>,
    /// Data assets used during the run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_assets: Option<Vec<String>>,
    /// Run parameters used for the execution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Param>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nextflow_profile: Option<String>,
    /// Pipeline process details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processes: Option<Vec<PipelineProcess>>,
}

/// Data asset contained in a combined data asset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainedDataAsset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Mount path of the contained data asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount: Option<String>,
    /// Size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// A data asset and its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataAsset {
    pub id: String,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Display name.
    pub name: String,
    /// Default mount folder.
    pub mount: String,
    /// Creation state; server-owned, only ever observed here.
    pub state: DataAssetState,
    #[serde(rename = "type")]
    pub asset_type: DataAssetType,
    /// Time the data asset was last used.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub last_used: DateTime<Utc>,
    /// Number of files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<u64>,
    /// Total size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Keywords for searching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Provenance, for result data assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    /// Bucket the data asset was created from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_bucket: Option<SourceBucket>,
    /// Admin-defined custom fields with user-set values; the schema is owned
    /// by the deployment, so values pass through as open JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<HashMap<String, serde_json::Value>>,
    /// App panel parameters used to generate a result data asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_parameters: Option<Vec<AppParameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nextflow_profile: Option<String>,
    /// Contained data assets, for combined data assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contained_data_assets: Option<Vec<ContainedDataAsset>>,
    /// Time the files were last transferred to a different storage location.
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_transferred: Option<DateTime<Utc>>,
    /// Error from the last transfer attempt, if it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_error: Option<String>,
    /// Why creation failed, when `state` is `Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Metadata updates for an existing data asset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataAssetUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Keywords for searching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Default mount folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount: Option<String>,
    /// Custom metadata values, per the deployment's admin-defined fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<HashMap<String, serde_json::Value>>,
}

impl DataAssetUpdateParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = Some(mount.into());
        self
    }

    pub fn with_custom_metadata(
        mut self,
        custom_metadata: HashMap<String, serde_json::Value>,
    ) -> Self {
        self.custom_metadata = Some(custom_metadata);
        self
    }
}

/// AWS S3 source for creating a data asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsS3Source {
    /// Bucket to create the data asset from.
    pub bucket: String,
    /// Custom S3 endpoint where the bucket is stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_name: Option<String>,
    /// Folder within the bucket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Leave the files in the source bucket instead of copying them in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_on_external_storage: Option<bool>,
    /// Access the source bucket without credentials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    /// Create from the deployment's internal input bucket; every property
    /// except `prefix` is ignored. Admin only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_input_bucket: Option<bool>,
}

impl AwsS3Source {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            endpoint_name: None,
            prefix: None,
            keep_on_external_storage: None,
            public: None,
            use_input_bucket: None,
        }
    }

    pub fn with_endpoint_name(mut self, endpoint_name: impl Into<String>) -> Self {
        self.endpoint_name = Some(endpoint_name.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_keep_on_external_storage(mut self, keep: bool) -> Self {
        self.keep_on_external_storage = Some(keep);
        self
    }

    pub fn with_public(mut self, public: bool) -> Self {
        self.public = Some(public);
        self
    }

    pub fn with_use_input_bucket(mut self, use_input_bucket: bool) -> Self {
        self.use_input_bucket = Some(use_input_bucket);
        self
    }
}

/// GCP Cloud Storage source for creating a data asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcpCloudStorageSource {
    /// Bucket to create the data asset from.
    pub bucket: String,
    /// GCP client id for authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// GCP client secret for authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Folder within the bucket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl GcpCloudStorageSource {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            client_id: None,
            client_secret: None,
            prefix: None,
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

/// Computation results source for creating a result data asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationSource {
    /// Computation to capture results from.
    pub id: String,
    /// Results path within the computation; empty captures all result files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ComputationSource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Cloud workstation session source for creating a data asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudWorkstationSource {
    /// Computation id of the cloud workstation session.
    pub id: String,
    /// Path within the workstation to create the data asset from.
    pub path: String,
    /// Script that was executed, relative to the capsule folder; when set,
    /// the created data asset is of type `Result`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_script: Option<String>,
}

impl CloudWorkstationSource {
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            run_script: None,
        }
    }

    pub fn with_run_script(mut self, run_script: impl Into<String>) -> Self {
        self.run_script = Some(run_script.into());
        self
    }
}

/// Source a data asset is created from; exactly one variant field is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Source {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsS3Source>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcp: Option<GcpCloudStorageSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computation: Option<ComputationSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_workstation: Option<CloudWorkstationSource>,
}

impl Source {
    pub fn aws(source: AwsS3Source) -> Self {
        Self {
            aws: Some(source),
            ..Default::default()
        }
    }

    pub fn gcp(source: GcpCloudStorageSource) -> Self {
        Self {
            gcp: Some(source),
            ..Default::default()
        }
    }

    pub fn computation(source: ComputationSource) -> Self {
        Self {
            computation: Some(source),
            ..Default::default()
        }
    }

    pub fn cloud_workstation(source: CloudWorkstationSource) -> Self {
        Self {
            cloud_workstation: Some(source),
            ..Default::default()
        }
    }
}

/// AWS S3 target for external data asset storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsS3Target {
    /// Bucket where the data asset will be stored.
    pub bucket: String,
    /// Custom S3 endpoint where the bucket is stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_name: Option<String>,
    /// Folder within the bucket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl AwsS3Target {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            endpoint_name: None,
            prefix: None,
        }
    }

    pub fn with_endpoint_name(mut self, endpoint_name: impl Into<String>) -> Self {
        self.endpoint_name = Some(endpoint_name.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

/// Storage target for an external data asset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Target {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsS3Target>,
}

impl Target {
    pub fn aws(target: AwsS3Target) -> Self {
        Self { aws: Some(target) }
    }
}

/// Parameters for creating a data asset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataAssetParams {
    /// Display name.
    pub name: String,
    /// Keywords for searching.
    pub tags: Vec<String>,
    /// Default mount folder.
    pub mount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Where the files come from; omitted for combined data assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    /// External storage target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    /// Custom metadata values, per the deployment's admin-defined fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<HashMap<String, serde_json::Value>>,
    /// Data assets to combine into a combined data asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_asset_ids: Option<Vec<String>>,
    /// Execution details, for data assets created from external results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_info: Option<ResultsInfo>,
}

impl DataAssetParams {
    pub fn new(name: impl Into<String>, tags: Vec<String>, mount: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags,
            mount: mount.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_custom_metadata(
        mut self,
        custom_metadata: HashMap<String, serde_json::Value>,
    ) -> Self {
        self.custom_metadata = Some(custom_metadata);
        self
    }

    pub fn with_data_asset_ids(mut self, data_asset_ids: Vec<String>) -> Self {
        self.data_asset_ids = Some(data_asset_ids);
        self
    }

    pub fn with_results_info(mut self, results_info: ResultsInfo) -> Self {
        self.results_info = Some(results_info);
        self
    }
}

/// Data asset to attach to a capsule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataAssetAttachParams {
    pub id: String,
    /// Mount path for the attached data asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount: Option<String>,
}

impl DataAssetAttachParams {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mount: None,
        }
    }

    pub fn with_mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = Some(mount.into());
        self
    }
}

/// Outcome of attaching one data asset to a capsule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataAssetAttachResults {
    pub id: String,
    /// State of the data asset mount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_state: Option<String>,
    /// Job running the attachment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// Whether the data asset is external.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external: Option<bool>,
    /// Whether the data asset is ready for use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready: Option<bool>,
    /// Path the data asset is mounted at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount: Option<String>,
}

/// Fields available for sorting data asset search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataAssetSortBy {
    Created,
    Type,
    Name,
    Size,
}

/// Origin filter for data asset searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataAssetSearchOrigin {
    Internal,
    External,
}

/// Parameters for searching data assets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataAssetSearchParams {
    /// Search expression supporting free text and `field:value` terms over
    /// `name`, `tag`, `run_script`, `commit_id`, and `contained_data_id`.
    /// Repeating a field means OR, mixing fields means AND, and quotes match
    /// an exact phrase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Cursor from the previous page of results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    /// Starting index for results; ignored when `next_token` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Number of items per page, up to 1000.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<DataAssetSortBy>,
    /// Sort direction; the server requires it alongside `sort_field`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<DataAssetType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership: Option<Ownership>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<DataAssetSearchOrigin>,
    /// Restrict to favorites.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    /// Restrict to archived data assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    /// Field-level filters applied in addition to `query`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<SearchFilter>>,
}

impl DataAssetSearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_next_token(mut self, next_token: impl Into<String>) -> Self {
        self.next_token = Some(next_token.into());
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_sort(mut self, sort_field: DataAssetSortBy, sort_order: SortOrder) -> Self {
        self.sort_field = Some(sort_field);
        self.sort_order = Some(sort_order);
        self
    }

    pub fn with_asset_type(mut self, asset_type: DataAssetType) -> Self {
        self.asset_type = Some(asset_type);
        self
    }

    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = Some(ownership);
        self
    }

    pub fn with_origin(mut self, origin: DataAssetSearchOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = Some(favorite);
        self
    }

    pub fn with_archived(mut self, archived: bool) -> Self {
        self.archived = Some(archived);
        self
    }

    pub fn with_filters(mut self, filters: Vec<SearchFilter>) -> Self {
        self.filters = Some(filters);
        self
    }
}

impl PageRequest for DataAssetSearchParams {
    fn set_next_token(&mut self, token: String) {
        self.next_token = Some(token);
    }
}

/// One page of data asset search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataAssetSearchResults {
    /// Whether more results are available beyond this page.
    pub has_more: bool,
    pub results: Vec<DataAsset>,
    /// Cursor for the next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl Page for DataAssetSearchResults {
    type Item = DataAsset;

    fn into_parts(self) -> (Vec<DataAsset>, bool, Option<String>) {
        (self.results, self.has_more, self.next_token)
    }
}

/// Parameters for transferring a data asset's files to different storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferDataParams {
    pub target: Target,
    /// Transfer even when release pipelines use the data asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

impl TransferDataParams {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            force: None,
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = Some(force);
        self
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client for data asset operations.
#[derive(Debug, Clone)]
pub struct DataAssets {
    session: HttpSession,
}

impl DataAssets {
    pub(crate) fn new(session: HttpSession) -> Self {
        Self { session }
    }

    /// Create a data asset from an S3 or GCP bucket, computation results, a
    /// cloud workstation, or existing data assets.
    ///
    /// The server acknowledges the request before creation finishes, so the
    /// returned record is typically still `Draft`; follow up with
    /// [`wait_until_ready`](Self::wait_until_ready).
    #[instrument(skip(self, data_asset_params), fields(name = %data_asset_params.name))]
    pub async fn create(&self, data_asset_params: DataAssetParams) -> Result<DataAsset> {
        let data_asset: DataAsset = self
            .session
            .post_json("data_assets", &data_asset_params)
            .await?;
        info!(data_asset_id = %data_asset.id, "data asset created");
        Ok(data_asset)
    }

    /// Retrieve a data asset by id.
    #[instrument(skip(self), fields(data_asset_id = %data_asset_id))]
    pub async fn get(&self, data_asset_id: &str) -> Result<DataAsset> {
        self.session
            .get_json(&format!("data_assets/{data_asset_id}"))
            .await
    }

    /// Poll a data asset until it reaches `Ready` or `Failed`.
    ///
    /// Returns the final record. Fails with
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the
    /// options are out of contract and with
    /// [`Error::Timeout`](crate::Error::Timeout) once a configured deadline
    /// passes.
    #[instrument(skip(self, data_asset), fields(data_asset_id = %data_asset.id))]
    pub async fn wait_until_ready(
        &self,
        data_asset: &DataAsset,
        options: WaitOptions,
    ) -> Result<DataAsset> {
        wait_until_terminal(
            &data_asset.id,
            options,
            |current: &DataAsset| current.state.is_terminal(),
            || self.get(&data_asset.id),
        )
        .await
    }

    /// Update name, description, tags, mount folder, or custom metadata.
    #[instrument(skip(self, update_params), fields(data_asset_id = %data_asset_id))]
    pub async fn update_metadata(
        &self,
        data_asset_id: &str,
        update_params: DataAssetUpdateParams,
    ) -> Result<DataAsset> {
        self.session
            .put_json(&format!("data_assets/{data_asset_id}"), &update_params)
            .await
    }

    /// Delete a data asset permanently.
    #[instrument(skip(self), fields(data_asset_id = %data_asset_id))]
    pub async fn delete(&self, data_asset_id: &str) -> Result<()> {
        self.session
            .delete_empty(&format!("data_assets/{data_asset_id}"))
            .await
    }

    /// Archive or unarchive a data asset.
    #[instrument(skip(self), fields(data_asset_id = %data_asset_id))]
    pub async fn archive(&self, data_asset_id: &str, archive: bool) -> Result<()> {
        self.session
            .patch_empty_query(
                &format!("data_assets/{data_asset_id}/archive"),
                &[("archive", archive)],
            )
            .await
    }

    /// Set user, group, and everyone-level permissions on a data asset.
    #[instrument(skip(self, permissions), fields(data_asset_id = %data_asset_id))]
    pub async fn update_permissions(
        &self,
        data_asset_id: &str,
        permissions: Permissions,
    ) -> Result<()> {
        self.session
            .post_empty(
                &format!("data_assets/{data_asset_id}/permissions"),
                &permissions,
            )
            .await
    }

    /// One page of search results.
    #[instrument(skip(self, search_params))]
    pub async fn search(
        &self,
        search_params: DataAssetSearchParams,
    ) -> Result<DataAssetSearchResults> {
        self.session.post_json("data_assets/search", &search_params).await
    }

    /// Stream over all data assets matching the search, following
    /// `next_token` cursors across pages. Pages are fetched as the stream is
    /// consumed.
    pub fn search_iter(
        &self,
        search_params: DataAssetSearchParams,
    ) -> impl Stream<Item = Result<DataAsset>> {
        let client = self.clone();
        paginate(search_params, move |params| {
            let client = client.clone();
            async move { client.search(params).await }
        })
    }

    /// List files of an internal data asset under `path`; pass an empty path
    /// for the root level.
    #[instrument(skip(self), fields(data_asset_id = %data_asset_id))]
    pub async fn list_files(&self, data_asset_id: &str, path: &str) -> Result<Folder> {
        let body = ListFolderParams {
            path: path.to_string(),
        };
        self.session
            .post_json(&format!("data_assets/{data_asset_id}/files"), &body)
            .await
    }

    /// View and download URLs for one file of an internal data asset.
    #[instrument(skip(self), fields(data_asset_id = %data_asset_id, path = %path))]
    pub async fn file_urls(&self, data_asset_id: &str, path: &str) -> Result<FileUrls> {
        self.session
            .get_json_query(
                &format!("data_assets/{data_asset_id}/files/urls"),
                &[("path", path)],
            )
            .await
    }

    /// Transfer a data asset's files to a different S3 storage location.
    /// Internal assets become external; provenance is kept for result
    /// assets. Admin only.
    #[instrument(skip(self, transfer_params), fields(data_asset_id = %data_asset_id))]
    pub async fn transfer(
        &self,
        data_asset_id: &str,
        transfer_params: TransferDataParams,
    ) -> Result<()> {
        self.session
            .post_empty(
                &format!("data_assets/{data_asset_id}/transfer"),
                &transfer_params,
            )
            .await
    }
}
