// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Computation records and operations.
//!
//! A computation is one run of a capsule or pipeline. The server owns its
//! state; the client starts runs, observes state, and fetches results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::components::{DownloadFileUrl, Folder, ListFolderParams};
use crate::error::Result;
use crate::http::HttpSession;
use crate::poll::{WaitOptions, wait_until_terminal};

// ============================================================================
// Records
// ============================================================================

/// State of a computation during its execution lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputationState {
    Initializing,
    Running,
    Finalizing,
    Completed,
    Failed,
}

impl ComputationState {
    /// Whether this state ends the lifecycle. Exactly `Completed` and
    /// `Failed` are terminal; there is no partial-success end state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ComputationState::Completed | ComputationState::Failed)
    }
}

/// Final status of a computation once it has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputationEndStatus {
    Succeeded,
    Failed,
    Stopped,
}

/// Run parameter with its display name and value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Param {
    /// Parameter label as shown in the app panel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Internal parameter name identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_name: Option<String>,
    /// Parameter value as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// One process of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineProcess {
    /// Process name as it appears in the pipeline definition.
    pub name: String,
    /// Capsule executed by this process.
    pub capsule_id: String,
    /// Capsule release version, when the process runs a released capsule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Whether the capsule is a public app.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    /// Run parameters of this process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Param>>,
}

/// Data asset attached to a computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputDataAsset {
    pub id: String,
    /// Mount path of the attached data asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount: Option<String>,
}

/// One run of a capsule or pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Computation {
    pub id: String,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Display name.
    pub name: String,
    /// Total run time in seconds.
    pub run_time: u64,
    /// Current lifecycle state; server-owned, only ever observed here.
    pub state: ComputationState,
    /// Whether this computation is a cloud workstation session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_workstation: Option<bool>,
    /// Data assets attached to this computation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_assets: Option<Vec<InputDataAsset>>,
    /// Run parameters used for this computation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Param>>,
    /// Nextflow profile used, for pipeline computations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nextflow_profile: Option<String>,
    /// Pipeline process details, for pipeline computations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processes: Option<Vec<PipelineProcess>>,
    /// Final status, present once the computation completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_status: Option<ComputationEndStatus>,
    /// Process exit code; zero for success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Whether the computation produced result files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_results: Option<bool>,
}

/// Data asset to attach when starting a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataAssetsRunParam {
    pub id: String,
    /// Mount path where the data asset will be accessible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount: Option<String>,
}

impl DataAssetsRunParam {
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

/// Run parameter addressed by its internal name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRunParam {
    pub param_name: String,
    pub value: String,
}

impl NamedRunParam {
    pub fn new(param_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            param_name: param_name.into(),
            value: value.into(),
        }
    }
}

/// Parameters for one process of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineProcessParams {
    /// Process name as it appears in the pipeline definition.
    pub name: String,
    /// Ordered parameter values for this process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
    /// Named parameters for this process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_parameters: Option<Vec<NamedRunParam>>,
}

impl PipelineProcessParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: None,
            named_parameters: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<String>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_named_parameters(mut self, named_parameters: Vec<NamedRunParam>) -> Self {
        self.named_parameters = Some(named_parameters);
        self
    }
}

/// Parameters for starting a run of a capsule or pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunParams {
    /// Capsule to run; required for capsule runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capsule_id: Option<String>,
    /// Pipeline to run; required for pipeline runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<String>,
    /// Specific released version to run; defaults to the latest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Previous computation to resume from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_run_id: Option<String>,
    /// Nextflow profile, for pipeline runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nextflow_profile: Option<String>,
    /// Data assets to attach, with their mount paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_assets: Option<Vec<DataAssetsRunParam>>,
    /// Ordered parameter values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
    /// Parameters addressed by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_parameters: Option<Vec<NamedRunParam>>,
    /// Per-process parameters, for pipeline runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processes: Option<Vec<PipelineProcessParams>>,
}

impl RunParams {
    /// Parameters for running a capsule.
    pub fn capsule(capsule_id: impl Into<String>) -> Self {
        Self {
            capsule_id: Some(capsule_id.into()),
            ..Default::default()
        }
    }

    /// Parameters for running a pipeline.
    pub fn pipeline(pipeline_id: impl Into<String>) -> Self {
        Self {
            pipeline_id: Some(pipeline_id.into()),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_resume_run_id(mut self, resume_run_id: impl Into<String>) -> Self {
        self.resume_run_id = Some(resume_run_id.into());
        self
    }

    pub fn with_nextflow_profile(mut self, nextflow_profile: impl Into<String>) -> Self {
        self.nextflow_profile = Some(nextflow_profile.into());
        self
    }

    pub fn with_data_assets(mut self, data_assets: Vec<DataAssetsRunParam>) -> Self {
        self.data_assets = Some(data_assets);
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<String>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_named_parameters(mut self, named_parameters: Vec<NamedRunParam>) -> Self {
        self.named_parameters = Some(named_parameters);
        self
    }

    pub fn with_processes(mut self, processes: Vec<PipelineProcessParams>) -> Self {
        self.processes = Some(processes);
        self
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client for computation operations.
#[derive(Debug, Clone)]
pub struct Computations {
    session: HttpSession,
}

impl Computations {
    pub(crate) fn new(session: HttpSession) -> Self {
        Self { session }
    }

    /// Retrieve a computation by id.
    #[instrument(skip(self), fields(computation_id = %computation_id))]
    pub async fn get(&self, computation_id: &str) -> Result<Computation> {
        self.session
            .get_json(&format!("computations/{computation_id}"))
            .await
    }

    /// Start a run of a capsule or pipeline.
    ///
    /// The returned computation is in a non-terminal state; follow up with
    /// [`wait_until_completed`](Self::wait_until_completed) to observe the
    /// outcome.
    #[instrument(skip(self, run_params))]
    pub async fn run(&self, run_params: RunParams) -> Result<Computation> {
        let computation: Computation = self.session.post_json("computations", &run_params).await?;
        info!(computation_id = %computation.id, "computation started");
        Ok(computation)
    }

    /// Poll a computation until it reaches `Completed` or `Failed`.
    ///
    /// Returns the final record. Fails with
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the
    /// options are out of contract and with
    /// [`Error::Timeout`](crate::Error::Timeout) once a configured deadline
    /// passes.
    #[instrument(skip(self, computation), fields(computation_id = %computation.id))]
    pub async fn wait_until_completed(
        &self,
        computation: &Computation,
        options: WaitOptions,
    ) -> Result<Computation> {
        wait_until_terminal(
            &computation.id,
            options,
            |current: &Computation| current.state.is_terminal(),
            || self.get(&computation.id),
        )
        .await
    }

    /// List result files of a computation under `path`; pass an empty path
    /// for the root level.
    #[instrument(skip(self), fields(computation_id = %computation_id))]
    pub async fn list_results(&self, computation_id: &str, path: &str) -> Result<Folder> {
        let body = ListFolderParams {
            path: path.to_string(),
        };
        self.session
            .post_json(&format!("computations/{computation_id}/results"), &body)
            .await
    }

    /// Pre-signed download URL for one result file.
    #[instrument(skip(self), fields(computation_id = %computation_id, path = %path))]
    pub async fn result_download_url(
        &self,
        computation_id: &str,
        path: &str,
    ) -> Result<DownloadFileUrl> {
        self.session
            .get_json_query(
                &format!("computations/{computation_id}/results/download_url"),
                &[("path", path)],
            )
            .await
    }

    /// Rename a computation.
    #[instrument(skip(self), fields(computation_id = %computation_id, name = %name))]
    pub async fn rename(&self, computation_id: &str, name: &str) -> Result<()> {
        self.session
            .patch_empty_query(&format!("computations/{computation_id}"), &[("name", name)])
            .await
    }

    /// Delete a computation permanently.
    #[instrument(skip(self), fields(computation_id = %computation_id))]
    pub async fn delete(&self, computation_id: &str) -> Result<()> {
        self.session
            .delete_empty(&format!("computations/{computation_id}"))
            .await
    }
}
