//! World lifecycle and command errors.

use mudworld_domain::UserId;
use thiserror::Error;

use super::loader::LoadError;
use crate::infrastructure::error::InfraError;
use crate::persistence::PersistenceError;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("World data is invalid: {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    Infra(#[from] InfraError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("User {0} already has a character")]
    PlayerExists(UserId),

    #[error("User {0} has no character")]
    PlayerNotFound(UserId),

    #[error("The world has already been shut down")]
    AlreadyShutDown,
}
