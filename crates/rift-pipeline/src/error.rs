//! Pipeline failure taxonomy.

use rift_keys::KeyError;
use thiserror::Error as ThisError;

/// Everything a pipeline call can fail with.
///
/// `Key` failures are caller defects (bad query shape, identity-less
/// record) and surface synchronously before any I/O. `Upstream` wraps
/// whatever the record source failed with; the pipeline does not interpret
/// it beyond passing it along.
#[derive(Debug, ThisError)]
pub enum PipelineError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("upstream source failure: {0:#}")]
    Upstream(anyhow::Error),
}

impl PipelineError {
    pub fn is_upstream(&self) -> bool {
        matches!(self, PipelineError::Upstream(_))
    }
}

impl From<anyhow::Error> for PipelineError {
    fn from(err: anyhow::Error) -> Self {
        PipelineError::Upstream(err)
    }
}
