use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SortError {
    #[error("scratch buffer too small: {required} elements required, {provided} provided")]
    ScratchTooSmall { required: usize, provided: usize },
    #[error("failed to allocate the scratch buffer: {0}")]
    ScratchAlloc(#[from] TryReserveError),
}
