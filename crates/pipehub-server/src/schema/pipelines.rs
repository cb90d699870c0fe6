//! Response bodies for the pipeline routes.

use serde::Serialize;

use pipehub_storage::{CreateOutcome, PipelineSummary};

/// `POST /pipelines/add` response.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineCreatedResponse {
    /// Uid the pipeline is stored under (the existing one when the
    /// structure was already known).
    pub uid: String,
    pub already_existed: bool,
}

impl From<CreateOutcome> for PipelineCreatedResponse {
    fn from(outcome: CreateOutcome) -> Self {
        PipelineCreatedResponse {
            uid: outcome.uid,
            already_existed: outcome.already_existed,
        }
    }
}

/// `GET /pipelines/{uid}/image` response.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineImageResponse {
    pub uid: String,
    pub image_url: String,
}

/// `GET /pipelines` response.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineListResponse {
    pub pipelines: Vec<PipelineSummary>,
}

/// `DELETE /pipelines/{uid}` response.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineDeletedResponse {
    pub deleted: bool,
}
