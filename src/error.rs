use thiserror::Error;

use wisp_fluids::error::{BackendError, SimulationError};
use wisp_io::{DecodingError, EncodingError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("failed to write frames: {0}")]
    Encoding(#[from] EncodingError),
    #[error("failed to read recording: {0}")]
    Decoding(#[from] DecodingError),
    #[error(transparent)]
    Progress(#[from] indicatif::style::TemplateError),
}
