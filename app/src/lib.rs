//! Headless page controllers.
//!
//! Each page on the site runs the same preamble: establish the session,
//! resolve the caller's role, gate, then fetch and shape the page's
//! data. The controllers here return view models and typed errors; what
//! the rendering layer does with a `Redirect` or an `Error` is its own
//! business.

pub mod nav;
pub mod pages;
pub mod session;

pub use session::{establish, Session, SessionConfig};

/// Where a denied page load should send the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Login,
    Home,
}

/// Failure of a protected page load or action: either the gate said no
/// and the visitor should be sent elsewhere, or a backend call failed
/// and the page should report it. Replaces the original's blocking
/// alerts with a value the rendering layer can test against.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("access denied, redirect to {0:?}")]
    Denied(Redirect),
    #[error(transparent)]
    Backend(newsroom_shared::Error),
}

impl From<newsroom_shared::Error> for PageError {
    fn from(error: newsroom_shared::Error) -> Self {
        PageError::Backend(error)
    }
}

impl From<Redirect> for PageError {
    fn from(redirect: Redirect) -> Self {
        PageError::Denied(redirect)
    }
}
