//! # Matching engine
//!
//! Quadratic-funding score and pool proration.
//!
//! For a project with cumulative per-address contributions `c_1 .. c_n`:
//!
//! ```text
//! quadratic_score = (Σ floor_sqrt(c_i))² − Σ c_i
//! match           = floor(quadratic_score × pool / Σ scores of active funded projects)
//! ```
//!
//! The score is mathematically non-negative for exact square roots, but floor
//! rounding can push it below zero when a project has few, large
//! contributions. Policy: clamp to zero rather than fail the call.
//!
//! Every multiplication and the aggregate sum use checked arithmetic; an
//! overflow surfaces as [`crate::LedgerError::ArithmeticOverflow`] instead of
//! wrapping. All functions here are pure reads over the store: repeated calls
//! against unchanged state return identical results.

use crate::errors::Result;
use crate::math::{add_checked, floor_sqrt, mul_checked};
use crate::storage::{ContributionBook, LedgerStore};

/// Raw quadratic score of one project, clamped at zero.
pub(crate) fn quadratic_score(book: &ContributionBook, total_funding: i128) -> Result<i128> {
    let mut sum_of_roots: i128 = 0;
    for record in book.records() {
        sum_of_roots = add_checked(sum_of_roots, floor_sqrt(record.amount), "sum_of_roots")?;
    }
    let square = mul_checked(sum_of_roots, sum_of_roots, "quadratic_score")?;
    // Floor-rounded roots can make the square fall short of total_funding;
    // the subtraction itself cannot overflow because both operands are >= 0.
    Ok((square - total_funding).max(0))
}

/// Sum of [`quadratic_score`] over every active project with contributors.
pub(crate) fn total_quadratic_score(store: &LedgerStore) -> Result<i128> {
    let mut total: i128 = 0;
    for (state, book) in store.scored_projects() {
        let score = quadratic_score(book, state.total_funding)?;
        total = add_checked(total, score, "total_quadratic_score")?;
    }
    Ok(total)
}

/// The project's current share of the matching pool.
///
/// Zero when the project has no contributors or no active project has a
/// positive score. The result never exceeds the pool: the project's score is
/// one term of the denominator sum, so the ratio is at most 1 before the
/// floor.
pub(crate) fn calculate_quadratic_match(store: &LedgerStore, project_id: u64) -> Result<i128> {
    let state = store.load_project_state(project_id)?;
    if state.contributor_count == 0 {
        return Ok(0);
    }
    let book = store.book(project_id)?;
    let score = quadratic_score(book, state.total_funding)?;
    let total = total_quadratic_score(store)?;
    if total == 0 {
        return Ok(0);
    }
    let product = mul_checked(score, store.matching_pool(), "matching_amount")?;
    Ok(product / total)
}
