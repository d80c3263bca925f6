use crate::filter::FilterId;
use thiserror::Error;

/// errors of structural model operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterModelError {
    #[error("filter {id} is not in the model")]
    NotInModel { id: FilterId },
    #[error("filter {id} is already in the model")]
    AlreadyInModel { id: FilterId },
}
