use thiserror::Error;

use crate::model::ErrorDetailsError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    ErrorDetails(#[from] ErrorDetailsError),
}
