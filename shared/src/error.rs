use thiserror::Error;

/// Closed failure taxonomy shared by the backend boundary and the page
/// controllers. Gate decisions convert lookup failures into safe denial
/// rather than surfacing `RemoteFailure` to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("insufficient role: {role} is not allowed here")]
    InsufficientRole { role: crate::Role },
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("remote call failed: {message}")]
    RemoteFailure { message: String },
}

impl Error {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Error::RemoteFailure {
            message: message.into(),
        }
    }
}
