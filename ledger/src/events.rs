//! Canonical audit events emitted by the ledger.
//!
//! One event is recorded per successful mutation. The journal is the durable
//! feed external indexers and UIs consume; implementing those consumers is
//! out of scope here, so the ledger only appends and exposes read accessors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Address;

/// All event kinds the ledger records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A new project was registered.
    ProjectCreated {
        project_id: u64,
        name: String,
        creator: Address,
    },
    /// A contribution was credited to a project.
    ContributionMade {
        project_id: u64,
        contributor: Address,
        amount: i128,
    },
    /// The admin topped up the matching pool; `pool` is the balance after.
    MatchingPoolFunded { amount: i128, pool: i128 },
    /// A project was settled and its match paid out.
    MatchingFundsDistributed {
        project_id: u64,
        matching_amount: i128,
    },
}

impl LedgerEvent {
    /// Short identifier string suitable for storage by an indexer.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProjectCreated { .. } => "project_created",
            Self::ContributionMade { .. } => "contribution_made",
            Self::MatchingPoolFunded { .. } => "matching_pool_funded",
            Self::MatchingFundsDistributed { .. } => "matching_funds_distributed",
        }
    }

    /// The project this event concerns, when it concerns one.
    pub fn project_id(&self) -> Option<u64> {
        match self {
            Self::ProjectCreated { project_id, .. }
            | Self::ContributionMade { project_id, .. }
            | Self::MatchingFundsDistributed { project_id, .. } => Some(*project_id),
            Self::MatchingPoolFunded { .. } => None,
        }
    }
}

/// A journal entry: the event plus its position and wall-clock stamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// 1-based, strictly increasing append order.
    pub seq: u64,
    pub recorded_at: DateTime<Utc>,
    pub event: LedgerEvent,
}
