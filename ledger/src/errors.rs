//! Ledger error taxonomy.
//!
//! Every fallible entry point returns [`LedgerError`]. Variants carry enough
//! detail for a transport layer to render a useful message, and
//! [`LedgerError::kind`] collapses them into the coarse classes callers
//! branch on.

use thiserror::Error;

use crate::payout::PayoutError;
use crate::types::Address;

/// Coarse classification of a [`LedgerError`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Malformed input: empty project fields, non-positive amounts.
    Validation,
    /// Project id outside `1..=project_count`.
    NotFound,
    /// Admin-only operation invoked by a non-admin caller.
    Authorization,
    /// Operation illegal in the current ledger/project state.
    State,
    /// Checked arithmetic rejected an overflowing computation.
    Arithmetic,
    /// The external payout step failed; all staged mutations were rolled back.
    Payout,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("project {field} must be non-empty")]
    EmptyProjectField { field: &'static str },

    #[error("amount must be positive, got {amount}")]
    NonPositiveAmount { amount: i128 },

    #[error("project {id} not found")]
    ProjectNotFound { id: u64 },

    #[error("{caller} is not the ledger admin")]
    NotAuthorized { caller: Address },

    #[error("project {id} is settled and accepts no further activity")]
    ProjectSettled { id: u64 },

    #[error("matching pool is empty")]
    EmptyMatchingPool,

    #[error("matching amount {needed} exceeds pool balance {available}")]
    InsufficientPool { needed: i128, available: i128 },

    #[error("arithmetic overflow computing {context}")]
    ArithmeticOverflow { context: &'static str },

    #[error("payout of {amount} to {creator} failed")]
    PayoutFailed {
        creator: Address,
        amount: i128,
        #[source]
        source: PayoutError,
    },
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyProjectField { .. } | Self::NonPositiveAmount { .. } => ErrorKind::Validation,
            Self::ProjectNotFound { .. } => ErrorKind::NotFound,
            Self::NotAuthorized { .. } => ErrorKind::Authorization,
            Self::ProjectSettled { .. } | Self::EmptyMatchingPool | Self::InsufficientPool { .. } => {
                ErrorKind::State
            }
            Self::ArithmeticOverflow { .. } => ErrorKind::Arithmetic,
            Self::PayoutFailed { .. } => ErrorKind::Payout,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
