//! Error types for the mock group admin.

use lagwatch_admin::GroupAdminError;
use thiserror::Error;

/// Errors produced by the mock group admin.
#[derive(Clone, Debug, Error)]
pub enum Error {
    /// A test scripted this operation to fail.
    #[error("injected {0} failure")]
    Injected(&'static str),
}

impl GroupAdminError for Error {}
