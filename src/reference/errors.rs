use super::{FlagConflict, Symbol};
use crate::jvm::{self, BinaryName};
use std::fmt;

/// Requirements on the same symbol which contradict each other
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    pub symbol: Symbol,
    pub conflict: FlagConflict,
}

impl fmt::Display for MergeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is {}", self.symbol, self.conflict)
    }
}

impl std::error::Error for MergeConflict {}

/// Why references could not be extracted from a module
#[derive(Debug)]
pub struct ExtractionError {
    /// Helper class being processed when extraction failed
    pub class: BinaryName,
    pub kind: ExtractionErrorKind,
}

#[derive(Debug)]
pub enum ExtractionErrorKind {
    /// The helper class file could not be read
    MalformedClass(jvm::Error),

    /// The class is an entry point or is used by a helper, but the module doesn't provide it
    MissingHelper,

    /// The helper was registered under one name but its class file declares another
    NameMismatch(BinaryName),

    Conflict(MergeConflict),
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExtractionErrorKind::MalformedClass(err) => {
                write!(f, "malformed helper class {}: {}", self.class, err)
            }
            ExtractionErrorKind::MissingHelper => {
                write!(f, "helper class {} is not provided", self.class)
            }
            ExtractionErrorKind::NameMismatch(found) => write!(
                f,
                "helper class {} was registered as {}",
                found, self.class
            ),
            ExtractionErrorKind::Conflict(conflict) => {
                write!(f, "conflicting references in {}: {}", self.class, conflict)
            }
        }
    }
}

impl std::error::Error for ExtractionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ExtractionErrorKind::MalformedClass(err) => Some(err),
            ExtractionErrorKind::Conflict(conflict) => Some(conflict),
            _ => None,
        }
    }
}
