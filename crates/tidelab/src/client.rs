// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Entry-point client and its configuration.

use std::env;
use std::fmt;

use crate::capsules::Capsules;
use crate::computations::Computations;
use crate::custom_metadata::CustomMetadataSchema;
use crate::data_assets::DataAssets;
use crate::error::{Error, Result};
use crate::http::HttpSession;

/// Configuration for a [`Tidelab`] client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Deployment URL, e.g. `https://acme.tidelab.com`.
    pub domain: String,
    /// API access token.
    pub token: String,
    /// Additional send attempts after a connection or timeout failure
    /// (default: 0).
    pub retries: u32,
    /// Identifier reported when an automated agent calls the API on behalf
    /// of a user.
    pub agent_id: Option<String>,
}

impl ClientConfig {
    /// Create a configuration with the given deployment URL and token.
    pub fn new(domain: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            token: token.into(),
            retries: 0,
            agent_id: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Required Environment Variables
    /// - `TIDELAB_DOMAIN` - Deployment URL
    /// - `TIDELAB_TOKEN` - API access token
    ///
    /// # Optional Environment Variables
    /// - `TIDELAB_RETRIES` - Transport retry count (default: 0)
    /// - `TIDELAB_AGENT_ID` - Agent identifier
    pub fn from_env() -> Result<Self> {
        let domain = env::var("TIDELAB_DOMAIN")
            .map_err(|_| Error::Config("TIDELAB_DOMAIN is required".to_string()))?;

        let token = env::var("TIDELAB_TOKEN")
            .map_err(|_| Error::Config("TIDELAB_TOKEN is required".to_string()))?;

        let retries = env::var("TIDELAB_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let agent_id = env::var("TIDELAB_AGENT_ID").ok();

        Ok(Self {
            domain,
            token,
            retries,
            agent_id,
        })
    }

    /// Set the transport retry count.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the agent identifier.
    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("domain", &self.domain)
            .field("retries", &self.retries)
            .field("agent_id", &self.agent_id)
            .finish_non_exhaustive()
    }
}

/// Tidelab API client.
///
/// One client owns a configured HTTP session and exposes a resource client
/// per family. Cloning is cheap; all clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Tidelab {
    /// Capsule operations.
    pub capsules: Capsules,
    /// Pipeline operations; the same surface as capsules under another
    /// route.
    pub pipelines: Capsules,
    /// Computation operations.
    pub computations: Computations,
    /// Data asset operations.
    pub data_assets: DataAssets,
    /// Custom metadata schema operations.
    pub custom_metadata: CustomMetadataSchema,
}

impl Tidelab {
    /// Create a client from a configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let session = HttpSession::new(&config)?;
        Ok(Self {
            capsules: Capsules::new(session.clone(), "capsules"),
            pipelines: Capsules::new(session.clone(), "pipelines"),
            computations: Computations::new(session.clone()),
            data_assets: DataAssets::new(session.clone()),
            custom_metadata: CustomMetadataSchema::new(session),
        })
    }

    /// Create a client from environment variables.
    ///
    /// See [`ClientConfig::from_env`] for required and optional environment
    /// variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }
}
