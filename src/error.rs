use thiserror::Error;

use crate::parse::ParseError;
use crate::{CompileError, LibraryError, SettingsError};

/// Unified error type covering parsing, compilation, settings and rule
/// discovery.
///
/// Returned by [`RuleLibrary::open()`](crate::RuleLibrary::open).
#[derive(Debug, Error)]
pub enum InvFilterError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Library(#[from] LibraryError),
}
