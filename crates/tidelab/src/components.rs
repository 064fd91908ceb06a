// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Records shared across resource families: permissions, search filters,
//! folder listings, and signed file URLs.

use serde::{Deserialize, Serialize};

// ============================================================================
// Permissions
// ============================================================================

/// Role granted to an individual user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Owner,
    Editor,
    Viewer,
}

/// Access granted to an individual user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPermissions {
    pub email: String,
    pub role: UserRole,
}

/// Role granted to a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRole {
    Owner,
    Editor,
    Viewer,
    Discoverable,
}

/// Access granted to a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupPermissions {
    pub group: String,
    pub role: GroupRole,
}

/// Access granted to everyone on the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EveryoneRole {
    Viewer,
    Discoverable,
    None,
}

/// Permission set for a capsule, pipeline, or data asset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<UserPermissions>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupPermissions>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub everyone: Option<EveryoneRole>,
    /// Also share the data assets attached to the shared resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_assets: Option<bool>,
}

// ============================================================================
// Search
// ============================================================================

/// Ownership filter for search operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    /// Resources created by the caller.
    Created,
    /// Resources shared with the caller.
    Shared,
}

/// Sort direction for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

/// Inclusive numeric bounds for a range filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SearchFilterRange {
    pub min: f64,
    pub max: f64,
}

/// A filter value; the platform accepts strings and numbers interchangeably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    Number(f64),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value)
    }
}

/// Field-level filter applied on top of the free-text query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchFilter {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<FilterValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<SearchFilterRange>,
    /// Match resources where the filter does not hold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<bool>,
}

impl SearchFilter {
    /// Filter on a single field value.
    pub fn new(key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            values: None,
            range: None,
            exclude: None,
        }
    }
}

// ============================================================================
// Folder Listings
// ============================================================================

/// One entry of a result or data-asset folder listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderItem {
    pub name: String,
    pub path: String,
    /// Entry kind as reported by the platform, usually `file` or `folder`.
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Contents of one folder level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub items: Vec<FolderItem>,
}

/// Request body for folder listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFolderParams {
    /// Path relative to the folder root; empty lists the root level.
    pub path: String,
}

/// A pre-signed download URL for a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadFileUrl {
    pub url: String,
}

/// Pre-signed view and download URLs for a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUrls {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_url: Option<String>,
}
