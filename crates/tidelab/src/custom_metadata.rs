// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Custom metadata schema records and operations.
//!
//! Deployment admins define custom metadata fields; the values for those
//! fields live on the resources themselves as open key-value payloads. This
//! module exposes the schema so callers can validate values before setting
//! them.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::http::HttpSession;

// ============================================================================
// Records
// ============================================================================

/// Value type of a custom metadata field. Dates are carried as unix epoch
/// seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomMetadataFieldType {
    String,
    Number,
    Date,
}

/// Bounds on a numeric custom metadata field; either side may be open.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CustomMetadataFieldRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Allowed values of a custom metadata field; all strings or all numbers,
/// never mixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllowedValues {
    Text(Vec<String>),
    Numbers(Vec<f64>),
}

/// One admin-defined custom metadata field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomMetadataField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: CustomMetadataFieldType,
    /// Bounds for number fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<CustomMetadataFieldRange>,
    /// Closed set of permitted values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<AllowedValues>,
    /// Whether several values may be set at once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,
    /// Display units for number fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// Category the field is grouped under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// The deployment's custom metadata schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<CustomMetadataField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

// ============================================================================
// Client
// ============================================================================

/// Client for the custom metadata schema.
#[derive(Debug, Clone)]
pub struct CustomMetadataSchema {
    session: HttpSession,
}

impl CustomMetadataSchema {
    pub(crate) fn new(session: HttpSession) -> Self {
        Self { session }
    }

    /// Retrieve the deployment's custom metadata schema.
    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<CustomMetadata> {
        self.session.get_json("custom_metadata").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_values_decode_as_text_or_numbers() {
        let field: CustomMetadataField = serde_json::from_value(serde_json::json!({
            "name": "species",
            "type": "string",
            "allowed_values": ["mouse", "zebrafish"],
        }))
        .unwrap();
        assert_eq!(
            field.allowed_values,
            Some(AllowedValues::Text(vec![
                "mouse".into(),
                "zebrafish".into()
            ]))
        );

        let field: CustomMetadataField = serde_json::from_value(serde_json::json!({
            "name": "replicates",
            "type": "number",
            "allowed_values": [1.0, 2.0, 3.0],
        }))
        .unwrap();
        assert_eq!(
            field.allowed_values,
            Some(AllowedValues::Numbers(vec![1.0, 2.0, 3.0]))
        );
    }
}
