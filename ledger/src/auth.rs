//! Access control.
//!
//! The ledger has exactly one privileged identity: the admin address fixed
//! when the ledger is constructed. Funding the matching pool and triggering
//! settlement require it. There is deliberately no admin-transfer operation;
//! the single fixed capability is the trust model, not an omission.

use crate::errors::{LedgerError, Result};
use crate::types::Address;

/// Fail with [`LedgerError::NotAuthorized`] unless `caller` is the admin.
pub(crate) fn require_admin(admin: &Address, caller: &Address) -> Result<()> {
    if caller != admin {
        return Err(LedgerError::NotAuthorized {
            caller: caller.clone(),
        });
    }
    Ok(())
}
