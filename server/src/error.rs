use fruitstand_common::catalog::CatalogError;

use crate::ledger::LedgerError;

#[derive(Debug, thiserror::Error)]
pub enum StandError {
    #[error(transparent)]
    UnknownFruit(#[from] CatalogError),
    #[error(transparent)]
    Storage(#[from] LedgerError),
    /// A multi-line purchase failed after some lines were already saved.
    /// Saved lines are not rolled back.
    #[error("purchase failed after {committed} of {requested} lines were saved: {source}")]
    PartialWrite {
        committed: usize,
        requested: usize,
        #[source]
        source: Box<StandError>,
    },
}

impl StandError {
    /// Short name of the underlying failure, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StandError::UnknownFruit(_) => "unknown_fruit",
            StandError::Storage(_) => "storage",
            StandError::PartialWrite { source, .. } => source.kind(),
        }
    }

    /// Lines saved before the failure.
    pub fn committed(&self) -> usize {
        match self {
            StandError::PartialWrite { committed, .. } => *committed,
            _ => 0,
        }
    }
}
