//! # Types
//!
//! Shared data structures used across all modules of the ledger.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Project` is internally stored as two separate entries:
//!
//! - [`ProjectConfig`] — written once at creation; never mutated.
//! - [`ProjectState`] — written on every contribution and on settlement.
//!
//! The public API exposes the reconstructed [`Project`] struct for convenience.
//!
//! ### Status as a Finite-State Machine
//!
//! [`ProjectStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Active ──► Settled
//! ```
//!
//! `Active` is the initial status; `Settled` is terminal. A settled project
//! rejects further contributions and distributions. The only backward write
//! is the internal payout-rollback path, which restores the exact pre-payout
//! state when the external transfer fails.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque caller identity supplied by the transport layer.
///
/// The ledger never interprets the contents; it only compares and hashes them.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

/// Lifecycle status of a project.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Accepting contributions and eligible for matching.
    Active,
    /// Funds paid out; no further activity accepted.
    Settled,
}

/// Immutable project configuration, written once at creation.
///
/// Stored separately from mutable state so that the high-frequency writes
/// (contributions) touch only the small [`ProjectState`] entry.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub creator: Address,
}

/// Mutable project state, updated on contributions and settlement.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    pub total_funding: i128,
    pub contributor_count: u32,
    pub status: ProjectStatus,
}

/// Full representation of a funding project.
///
/// Used as the public API return type; reconstructed internally from
/// the split `ProjectConfig` + `ProjectState` storage entries.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier (auto-incremented, starting at 1).
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Address that created the project and receives funds at settlement.
    pub creator: Address,
    /// Sum of all contributions received so far.
    pub total_funding: i128,
    /// Number of distinct contributing addresses.
    pub contributor_count: u32,
    /// Current lifecycle status.
    pub status: ProjectStatus,
}

impl Project {
    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }
}

/// Cumulative contribution of one address to one project.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContributionRecord {
    pub contributor: Address,
    pub amount: i128,
}

/// Receipt returned by a successful distribution.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub project_id: u64,
    /// Share of the matching pool allocated to the project.
    pub matching_amount: i128,
    /// Direct contributions plus the match, as transferred to the creator.
    pub total_paid: i128,
}
