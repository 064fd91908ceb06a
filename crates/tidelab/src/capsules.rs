// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Capsule and pipeline records and operations.
//!
//! Capsules and pipelines expose the same API shape under different route
//! prefixes, so one [`Capsules`] client serves both families; [`Tidelab`]
//! instantiates it once per route.
//!
//! [`Tidelab`]: crate::Tidelab

use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::components::{Ownership, Permissions, SearchFilter, SortOrder};
use crate::computations::{Computation, Param};
use crate::data_assets::{DataAssetAttachParams, DataAssetAttachResults};
use crate::error::Result;
use crate::http::HttpSession;
use crate::search::{Page, PageRequest, paginate};

// ============================================================================
// Records
// ============================================================================

/// Publication status of a capsule or pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapsuleStatus {
    #[serde(rename = "non-published")]
    NonPublished,
    Submitted,
    Publishing,
    Published,
    Verified,
}

/// The published capsule a capsule was duplicated from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OriginalCapsuleInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major_version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minor_version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
}

/// A capsule or pipeline.
///
/// The `article` and `submission` payloads follow publication workflows whose
/// schema the server owns; they are passed through as open JSON values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capsule {
    pub id: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    pub name: String,
    pub status: CapsuleStatus,
    /// Email address of the owner.
    pub owner: String,
    /// URL slug of the capsule.
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloned_from_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Research field of the capsule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_capsule: Option<OriginalCapsuleInfo>,
    /// Id of the published release of this capsule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_capsule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<serde_json::Value>>,
}

/// App panel schema of a capsule, listing the run parameters it exposes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppPanel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Param>>,
}

/// Fields available for sorting capsule search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapsuleSortBy {
    Created,
    Name,
    Slug,
}

/// Parameters for searching capsules or pipelines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapsuleSearchParams {
    /// Free-text search expression.
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
    pub sort_field: Option<CapsuleSortBy>,
    /// Sort direction; the server requires it alongside `sort_field`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership: Option<Ownership>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CapsuleStatus>,
    /// Restrict to favorites.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    /// Restrict to archived capsules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    /// Field-level filters applied in addition to `query`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<SearchFilter>>,
}

impl CapsuleSearchParams {
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

    pub fn with_sort(mut self, sort_field: CapsuleSortBy, sort_order: SortOrder) -> Self {
        self.sort_field = Some(sort_field);
        self.sort_order = Some(sort_order);
        self
    }

    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = Some(ownership);
        self
    }

    pub fn with_status(mut self, status: CapsuleStatus) -> Self {
        self.status = Some(status);
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

impl PageRequest for CapsuleSearchParams {
    fn set_next_token(&mut self, token: String) {
        self.next_token = Some(token);
    }
}

/// One page of capsule search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapsuleSearchResults {
    /// Whether more results are available beyond this page.
    pub has_more: bool,
    pub results: Vec<Capsule>,
    /// Cursor for the next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl Page for CapsuleSearchResults {
    type Item = Capsule;

    fn into_parts(self) -> (Vec<Capsule>, bool, Option<String>) {
        (self.results, self.has_more, self.next_token)
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client for one capsule family, bound to its route prefix.
#[derive(Debug, Clone)]
pub struct Capsules {
    session: HttpSession,
    route: &'static str,
}

impl Capsules {
    pub(crate) fn new(session: HttpSession, route: &'static str) -> Self {
        Self { session, route }
    }

    /// Retrieve a capsule by id.
    #[instrument(skip(self), fields(route = %self.route, capsule_id = %capsule_id))]
    pub async fn get(&self, capsule_id: &str) -> Result<Capsule> {
        self.session
            .get_json(&format!("{}/{capsule_id}", self.route))
            .await
    }

    /// Delete a capsule permanently.
    #[instrument(skip(self), fields(route = %self.route, capsule_id = %capsule_id))]
    pub async fn delete(&self, capsule_id: &str) -> Result<()> {
        self.session
            .delete_empty(&format!("{}/{capsule_id}", self.route))
            .await
    }

    /// Archive or unarchive a capsule.
    #[instrument(skip(self), fields(route = %self.route, capsule_id = %capsule_id))]
    pub async fn archive(&self, capsule_id: &str, archive: bool) -> Result<()> {
        self.session
            .patch_empty_query(
                &format!("{}/{capsule_id}/archive", self.route),
                &[("archive", archive)],
            )
            .await
    }

    /// App panel schema of a capsule.
    #[instrument(skip(self), fields(route = %self.route, capsule_id = %capsule_id))]
    pub async fn app_panel(&self, capsule_id: &str) -> Result<AppPanel> {
        self.session
            .get_json(&format!("{}/{capsule_id}/app_panel", self.route))
            .await
    }

    /// One page of search results.
    #[instrument(skip(self, search_params), fields(route = %self.route))]
    pub async fn search(&self, search_params: CapsuleSearchParams) -> Result<CapsuleSearchResults> {
        self.session
            .post_json(&format!("{}/search", self.route), &search_params)
            .await
    }

    /// Stream over all capsules matching the search, following `next_token`
    /// cursors across pages. Pages are fetched as the stream is consumed.
    pub fn search_iter(
        &self,
        search_params: CapsuleSearchParams,
    ) -> impl Stream<Item = Result<Capsule>> {
        let client = self.clone();
        paginate(search_params, move |params| {
            let client = client.clone();
            async move { client.search(params).await }
        })
    }

    /// Computations run from a capsule.
    #[instrument(skip(self), fields(route = %self.route, capsule_id = %capsule_id))]
    pub async fn list_computations(&self, capsule_id: &str) -> Result<Vec<Computation>> {
        self.session
            .get_json(&format!("{}/{capsule_id}/computations", self.route))
            .await
    }

    /// Attach data assets to a capsule; each result reports the mount state
    /// of one attachment.
    #[instrument(skip(self, attach_params), fields(route = %self.route, capsule_id = %capsule_id))]
    pub async fn attach_data_assets(
        &self,
        capsule_id: &str,
        attach_params: &[DataAssetAttachParams],
    ) -> Result<Vec<DataAssetAttachResults>> {
        self.session
            .post_json(
                &format!("{}/{capsule_id}/data_assets", self.route),
                attach_params,
            )
            .await
    }

    /// Detach data assets from a capsule.
    #[instrument(skip(self, data_asset_ids), fields(route = %self.route, capsule_id = %capsule_id))]
    pub async fn detach_data_assets(
        &self,
        capsule_id: &str,
        data_asset_ids: &[String],
    ) -> Result<()> {
        // The detach route carries a trailing slash.
        self.session
            .delete_empty_json(
                &format!("{}/{capsule_id}/data_assets/", self.route),
                data_asset_ids,
            )
            .await
    }

    /// Set user, group, and everyone-level permissions on a capsule.
    #[instrument(skip(self, permissions), fields(route = %self.route, capsule_id = %capsule_id))]
    pub async fn update_permissions(
        &self,
        capsule_id: &str,
        permissions: Permissions,
    ) -> Result<()> {
        self.session
            .post_empty(
                &format!("{}/{capsule_id}/permissions", self.route),
                &permissions,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capsule_status_uses_the_hyphenated_wire_form() {
        let status: CapsuleStatus = serde_json::from_str(r#""non-published""#).unwrap();
        assert_eq!(status, CapsuleStatus::NonPublished);
        assert_eq!(
            serde_json::to_string(&CapsuleStatus::NonPublished).unwrap(),
            r#""non-published""#
        );
    }

    #[test]
    fn search_params_serialize_only_the_set_fields() {
        let params = CapsuleSearchParams::new()
            .with_query("rna-seq")
            .with_sort(CapsuleSortBy::Name, SortOrder::Ascending);
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "query": "rna-seq",
                "sort_field": "name",
                "sort_order": "asc",
            })
        );
    }
}
