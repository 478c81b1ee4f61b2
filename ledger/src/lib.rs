//! # QF Ledger
//!
//! A quadratic-funding matching ledger: pooled contributions flow to
//! independently created projects, and a shared matching pool is allocated
//! among them by a formula that rewards breadth of support over
//! concentration of capital.
//!
//! The crate exposes the single handle [`QuadraticLedger`] whose entry points
//! cover the full lifecycle:
//!
//! | Phase        | Entry Point(s)                                    |
//! |--------------|---------------------------------------------------|
//! | Bootstrap    | [`QuadraticLedger::new`], [`QuadraticLedger::from_config`] |
//! | Registration | [`QuadraticLedger::create_project`]               |
//! | Funding      | [`QuadraticLedger::contribute`], [`QuadraticLedger::add_matching_pool`] |
//! | Settlement   | [`QuadraticLedger::distribute_matching_funds`]    |
//! | Queries      | `calculate_quadratic_match`, `get_project`, `get_user_contribution`, `get_project_contributors`, journal accessors |
//!
//! ## Architecture
//!
//! Authorization is fully delegated to [`auth`]. Storage access is fully
//! delegated to [`storage`]. Score computation is fully delegated to
//! [`matching`]. This file contains **only** the public entry points, the
//! serialization boundary, and event emissions — no business math lives here
//! directly.
//!
//! ## Concurrency
//!
//! All state sits behind one `RwLock`: mutating operations hold the write
//! lock for their whole body (including the external payout call, so a failed
//! payout rolls back before anyone can observe the staged state), and
//! read-only operations see a consistent snapshot under the read lock. The
//! transport layer embedding this crate is expected to call in from any
//! thread; no operation suspends internally.

mod auth;
pub mod config;
mod errors;
mod events;
mod math;
mod matching;
mod payout;
mod storage;
mod types;

#[cfg(test)]
mod test_ledger;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

pub use config::{ConfigError, LedgerConfig};
pub use errors::{ErrorKind, LedgerError, Result};
pub use events::{EventRecord, LedgerEvent};
pub use math::floor_sqrt;
pub use payout::{MemoryTreasury, PayoutError, PayoutSink};
pub use types::{Address, ContributionRecord, Project, ProjectStatus, Settlement};

use storage::LedgerStore;
use types::ProjectState;

struct Inner {
    store: LedgerStore,
    sink: Box<dyn PayoutSink>,
}

/// The funding ledger: project registry, contribution accounting, matching
/// pool, and settlement — one shared, serially-consistent state machine.
pub struct QuadraticLedger {
    admin: Address,
    inner: RwLock<Inner>,
}

impl QuadraticLedger {
    // ─────────────────────────────────────────────────────────
    // Bootstrap
    // ─────────────────────────────────────────────────────────

    /// Initialise an empty ledger. `admin` (the initializing identity) is the
    /// only address that may fund the pool or distribute; it is fixed for the
    /// lifetime of the ledger.
    pub fn new(admin: Address, sink: Box<dyn PayoutSink>) -> Self {
        info!("ledger initialised — admin: {admin}");
        Self {
            admin,
            inner: RwLock::new(Inner {
                store: LedgerStore::new(),
                sink,
            }),
        }
    }

    /// Initialise from a [`LedgerConfig`], seeding the matching pool.
    pub fn from_config(config: LedgerConfig, sink: Box<dyn PayoutSink>) -> Self {
        let ledger = Self::new(config.admin, sink);
        if config.initial_pool > 0 {
            let mut guard = ledger.write();
            guard.store.set_matching_pool(config.initial_pool);
        }
        ledger
    }

    // ─────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────

    /// Register a new funding project. Any caller may create one; the caller
    /// becomes the project's creator and receives its funds at settlement.
    pub fn create_project(&self, caller: &Address, name: &str, description: &str) -> Result<Project> {
        if name.is_empty() {
            return Err(LedgerError::EmptyProjectField { field: "name" });
        }
        if description.is_empty() {
            return Err(LedgerError::EmptyProjectField { field: "description" });
        }

        let mut guard = self.write();
        let store = &mut guard.store;

        let id = store.next_project_id();
        let project = Project {
            id,
            name: name.to_owned(),
            description: description.to_owned(),
            creator: caller.clone(),
            total_funding: 0,
            contributor_count: 0,
            status: ProjectStatus::Active,
        };
        store.save_project(&project);
        store.record_event(LedgerEvent::ProjectCreated {
            project_id: id,
            name: name.to_owned(),
            creator: caller.clone(),
        });
        info!("project {id} created by {caller}");
        Ok(project)
    }

    // ─────────────────────────────────────────────────────────
    // Funding
    // ─────────────────────────────────────────────────────────

    /// Credit `amount` from `contributor` to a project.
    ///
    /// First-time contributors get a new ordered record; repeat contributors
    /// accumulate onto their existing one via the O(1) address index.
    pub fn contribute(&self, project_id: u64, contributor: &Address, amount: i128) -> Result<()> {
        let mut guard = self.write();
        let store = &mut guard.store;

        let mut state = store.load_project_state(project_id)?;
        if state.status != ProjectStatus::Active {
            return Err(LedgerError::ProjectSettled { id: project_id });
        }
        if amount <= 0 {
            return Err(LedgerError::NonPositiveAmount { amount });
        }
        let new_total = math::add_checked(state.total_funding, amount, "total_funding")?;

        // All preconditions hold; mutate.
        let first_time = store.book_mut(project_id)?.credit(contributor, amount);
        state.total_funding = new_total;
        if first_time {
            state.contributor_count += 1;
        }
        store.save_project_state(project_id, &state);
        store.record_event(LedgerEvent::ContributionMade {
            project_id,
            contributor: contributor.clone(),
            amount,
        });
        info!("contribution of {amount} to project {project_id} from {contributor}");
        Ok(())
    }

    /// Admin-only: add `amount` to the matching pool. Returns the new pool
    /// balance.
    pub fn add_matching_pool(&self, caller: &Address, amount: i128) -> Result<i128> {
        auth::require_admin(&self.admin, caller)?;
        if amount <= 0 {
            return Err(LedgerError::NonPositiveAmount { amount });
        }

        let mut guard = self.write();
        let store = &mut guard.store;

        let pool = math::add_checked(store.matching_pool(), amount, "matching_pool")?;
        store.set_matching_pool(pool);
        store.record_event(LedgerEvent::MatchingPoolFunded { amount, pool });
        info!("matching pool funded with {amount}, balance now {pool}");
        Ok(pool)
    }

    // ─────────────────────────────────────────────────────────
    // Settlement
    // ─────────────────────────────────────────────────────────

    /// Admin-only: settle a project. Recomputes the quadratic match, debits
    /// the pool, marks the project terminal, then pays
    /// `total_funding + matching_amount` to the creator.
    ///
    /// The terminal flag is committed *before* the payout so a reentrant or
    /// concurrent distribution of the same project is rejected by the status
    /// precondition. A failed payout rolls the pool debit and the flag back
    /// inside the same critical section; the operation then fails as a whole.
    pub fn distribute_matching_funds(&self, caller: &Address, project_id: u64) -> Result<Settlement> {
        auth::require_admin(&self.admin, caller)?;

        let mut guard = self.write();
        let Inner { store, sink } = &mut *guard;

        let prior_state = store.load_project_state(project_id)?;
        if prior_state.status != ProjectStatus::Active {
            return Err(LedgerError::ProjectSettled { id: project_id });
        }
        let prior_pool = store.matching_pool();
        if prior_pool <= 0 {
            return Err(LedgerError::EmptyMatchingPool);
        }

        let matching_amount = matching::calculate_quadratic_match(store, project_id)?;
        if matching_amount > prior_pool {
            return Err(LedgerError::InsufficientPool {
                needed: matching_amount,
                available: prior_pool,
            });
        }
        let total_paid =
            math::add_checked(prior_state.total_funding, matching_amount, "total_paid")?;
        let creator = store.load_project_config(project_id)?.creator.clone();

        // Stage the state transition before the external transfer.
        store.set_matching_pool(prior_pool - matching_amount);
        let settled = ProjectState {
            status: ProjectStatus::Settled,
            ..prior_state.clone()
        };
        store.save_project_state(project_id, &settled);

        if let Err(source) = sink.transfer(&creator, total_paid) {
            // Undo the debit and the terminal flag; nothing was observable
            // outside the lock.
            store.set_matching_pool(prior_pool);
            store.save_project_state(project_id, &prior_state);
            warn!("payout for project {project_id} failed, distribution rolled back: {source}");
            return Err(LedgerError::PayoutFailed {
                creator,
                amount: total_paid,
                source,
            });
        }

        store.record_event(LedgerEvent::MatchingFundsDistributed {
            project_id,
            matching_amount,
        });
        info!("project {project_id} settled — match {matching_amount}, paid {total_paid} to {creator}");
        Ok(Settlement {
            project_id,
            matching_amount,
            total_paid,
        })
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// The project's current projected share of the matching pool.
    /// Deterministic and side-effect free.
    pub fn calculate_quadratic_match(&self, project_id: u64) -> Result<i128> {
        let guard = self.read();
        matching::calculate_quadratic_match(&guard.store, project_id)
    }

    /// The project's raw quadratic score (clamped at zero).
    pub fn quadratic_score(&self, project_id: u64) -> Result<i128> {
        let guard = self.read();
        let state = guard.store.load_project_state(project_id)?;
        matching::quadratic_score(guard.store.book(project_id)?, state.total_funding)
    }

    /// Aggregate score of all active projects with contributors.
    pub fn total_quadratic_score(&self) -> Result<i128> {
        let guard = self.read();
        matching::total_quadratic_score(&guard.store)
    }

    /// Retrieve a project by its ID.
    pub fn get_project(&self, project_id: u64) -> Result<Project> {
        self.read().store.load_project(project_id)
    }

    /// Cumulative contribution of `address` to a project (0 when absent).
    pub fn get_user_contribution(&self, project_id: u64, address: &Address) -> Result<i128> {
        let guard = self.read();
        Ok(guard.store.book(project_id)?.amount_of(address))
    }

    /// All contribution records for a project, in first-contribution order.
    pub fn get_project_contributors(&self, project_id: u64) -> Result<Vec<ContributionRecord>> {
        let guard = self.read();
        Ok(guard.store.book(project_id)?.records().to_vec())
    }

    pub fn project_count(&self) -> u64 {
        self.read().store.project_count()
    }

    pub fn matching_pool(&self) -> i128 {
        self.read().store.matching_pool()
    }

    pub fn admin(&self) -> &Address {
        &self.admin
    }

    /// The full audit journal, in append order.
    pub fn events(&self) -> Vec<EventRecord> {
        self.read().store.events()
    }

    /// Journal entries concerning one project, in append order.
    pub fn events_for_project(&self, project_id: u64) -> Vec<EventRecord> {
        self.read().store.events_for_project(project_id)
    }

    // ─────────────────────────────────────────────────────────
    // Lock plumbing
    // ─────────────────────────────────────────────────────────

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("ledger lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("ledger lock poisoned")
    }
}
