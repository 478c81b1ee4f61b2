//! # Storage
//!
//! In-memory ledger state and typed helpers over it.
//!
//! | Entry                | Type                      | Description                          |
//! |----------------------|---------------------------|--------------------------------------|
//! | `project_count`      | `u64`                     | Auto-increment project ID counter    |
//! | `matching_pool`      | `i128`                    | Shared pool balance (never negative) |
//! | `configs`            | `id → ProjectConfig`      | Immutable project configuration      |
//! | `states`             | `id → ProjectState`       | Mutable project state                |
//! | `books`              | `id → ContributionBook`   | Per-project contribution records     |
//! | `journal`            | `Vec<EventRecord>`        | Append-only audit events             |
//!
//! ## Why split Config and State?
//!
//! Contributions are the high-frequency write. Splitting the project into an
//! immutable config entry and a small mutable state entry keeps that write
//! path to a load/mutate/save of a three-field struct, while the public API
//! stays clean via the reconstructed [`Project`] return type.
//!
//! Projects are keyed in `BTreeMap`s so the matching engine iterates them in
//! id order; the aggregate quadratic score is the same either way, but the
//! deterministic order keeps overflow failures reproducible.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;

use crate::errors::{LedgerError, Result};
use crate::events::{EventRecord, LedgerEvent};
use crate::types::{Address, ContributionRecord, Project, ProjectConfig, ProjectState, ProjectStatus};

// ── Contribution book ────────────────────────────────────────────────

/// Ordered per-project contribution records with an O(1) per-address index.
///
/// The list preserves first-contribution order for score iteration; the index
/// maps an address to its position so repeat contributions avoid a linear
/// scan. Invariant: the index and list agree, and no address appears twice.
#[derive(Clone, Debug, Default)]
pub(crate) struct ContributionBook {
    records: Vec<ContributionRecord>,
    index: HashMap<Address, usize>,
}

impl ContributionBook {
    /// Cumulative amount contributed by `address` (0 when absent).
    pub(crate) fn amount_of(&self, address: &Address) -> i128 {
        self.index
            .get(address)
            .map(|&pos| self.records[pos].amount)
            .unwrap_or(0)
    }

    /// Credit `amount` to `contributor`. Returns `true` when this is the
    /// address's first contribution to the project.
    ///
    /// The per-record sum cannot overflow here: the caller has already
    /// checked the project-wide total, which bounds every record.
    pub(crate) fn credit(&mut self, contributor: &Address, amount: i128) -> bool {
        match self.index.get(contributor) {
            Some(&pos) => {
                self.records[pos].amount += amount;
                false
            }
            None => {
                self.index.insert(contributor.clone(), self.records.len());
                self.records.push(ContributionRecord {
                    contributor: contributor.clone(),
                    amount,
                });
                true
            }
        }
    }

    pub(crate) fn records(&self) -> &[ContributionRecord] {
        &self.records
    }
}

// ── Ledger store ─────────────────────────────────────────────────────

/// The process-wide ledger state. One instance lives behind the
/// `QuadraticLedger` lock; every operation reads and writes through these
/// helpers so the representation stays in one place.
#[derive(Debug, Default)]
pub(crate) struct LedgerStore {
    project_count: u64,
    matching_pool: i128,
    configs: BTreeMap<u64, ProjectConfig>,
    states: BTreeMap<u64, ProjectState>,
    books: BTreeMap<u64, ContributionBook>,
    journal: Vec<EventRecord>,
}

impl LedgerStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    // ── Project records ──────────────────────────────────────────────

    /// Allocate the next sequential project id. Ids start at 1, so a valid id
    /// is exactly `1..=project_count`.
    pub(crate) fn next_project_id(&mut self) -> u64 {
        self.project_count += 1;
        self.project_count
    }

    pub(crate) fn project_count(&self) -> u64 {
        self.project_count
    }

    /// Save both the immutable config and initial mutable state for a new
    /// project, plus its empty contribution book.
    pub(crate) fn save_project(&mut self, project: &Project) {
        let config = ProjectConfig {
            id: project.id,
            name: project.name.clone(),
            description: project.description.clone(),
            creator: project.creator.clone(),
        };
        let state = ProjectState {
            total_funding: project.total_funding,
            contributor_count: project.contributor_count,
            status: project.status.clone(),
        };
        self.configs.insert(project.id, config);
        self.states.insert(project.id, state);
        self.books.insert(project.id, ContributionBook::default());
    }

    /// Load the full [`Project`] by combining config and state.
    pub(crate) fn load_project(&self, id: u64) -> Result<Project> {
        let config = self.load_project_config(id)?;
        let state = self.load_project_state(id)?;
        Ok(Project {
            id: config.id,
            name: config.name.clone(),
            description: config.description.clone(),
            creator: config.creator.clone(),
            total_funding: state.total_funding,
            contributor_count: state.contributor_count,
            status: state.status,
        })
    }

    /// Load only the immutable project configuration.
    pub(crate) fn load_project_config(&self, id: u64) -> Result<&ProjectConfig> {
        self.configs
            .get(&id)
            .ok_or(LedgerError::ProjectNotFound { id })
    }

    /// Load only the mutable project state.
    pub(crate) fn load_project_state(&self, id: u64) -> Result<ProjectState> {
        self.states
            .get(&id)
            .cloned()
            .ok_or(LedgerError::ProjectNotFound { id })
    }

    /// Save only the mutable project state (the contribution/settlement
    /// write path).
    pub(crate) fn save_project_state(&mut self, id: u64, state: &ProjectState) {
        self.states.insert(id, state.clone());
    }

    pub(crate) fn book(&self, id: u64) -> Result<&ContributionBook> {
        self.books.get(&id).ok_or(LedgerError::ProjectNotFound { id })
    }

    pub(crate) fn book_mut(&mut self, id: u64) -> Result<&mut ContributionBook> {
        self.books
            .get_mut(&id)
            .ok_or(LedgerError::ProjectNotFound { id })
    }

    /// Projects that count toward the aggregate quadratic score: active and
    /// holding at least one contribution.
    pub(crate) fn scored_projects(
        &self,
    ) -> impl Iterator<Item = (&ProjectState, &ContributionBook)> + '_ {
        self.states
            .iter()
            .filter(|(_, state)| state.status == ProjectStatus::Active && state.contributor_count > 0)
            .filter_map(|(id, state)| self.books.get(id).map(|book| (state, book)))
    }

    // ── Matching pool ────────────────────────────────────────────────

    pub(crate) fn matching_pool(&self) -> i128 {
        self.matching_pool
    }

    pub(crate) fn set_matching_pool(&mut self, value: i128) {
        debug_assert!(value >= 0, "matching pool driven negative: {value}");
        self.matching_pool = value;
    }

    // ── Audit journal ────────────────────────────────────────────────

    /// Append an event. Called only after the mutation it describes has been
    /// fully applied.
    pub(crate) fn record_event(&mut self, event: LedgerEvent) {
        let seq = self.journal.len() as u64 + 1;
        self.journal.push(EventRecord {
            seq,
            recorded_at: Utc::now(),
            event,
        });
    }

    pub(crate) fn events(&self) -> Vec<EventRecord> {
        self.journal.clone()
    }

    pub(crate) fn events_for_project(&self, id: u64) -> Vec<EventRecord> {
        self.journal
            .iter()
            .filter(|record| record.event.project_id() == Some(id))
            .cloned()
            .collect()
    }
}
