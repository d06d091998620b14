//! Pipeline error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("media error: {0}")]
    Media(#[from] emoscope_media::MediaError),

    #[error("model error: {0}")]
    Model(#[from] emoscope_models::ModelError),

    #[error("no frame produced any observation; nothing to analyze")]
    EmptyResult,
}

pub type PipelineResult<T> = Result<T, PipelineError>;
