//! Role checks relative to a loan.
//!
//! These only compare identities; callers are expected to have run
//! `require_auth()` on the acting address first.

use soroban_sdk::Address;

use crate::types::{ContractError, Loan};

pub fn require_borrower(loan: &Loan, caller: &Address) -> Result<(), ContractError> {
    if loan.borrower != *caller {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

/// A borrower may not underwrite their own loan.
pub fn require_not_borrower_guarantor(loan: &Loan, caller: &Address) -> Result<(), ContractError> {
    if loan.borrower == *caller {
        return Err(ContractError::SelfDealing);
    }
    Ok(())
}

/// A borrower may not fund their own loan.
pub fn require_not_borrower_lender(loan: &Loan, caller: &Address) -> Result<(), ContractError> {
    if loan.borrower == *caller {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

pub fn require_lender(loan: &Loan, caller: &Address) -> Result<(), ContractError> {
    match &loan.lender {
        Some(lender) if lender == caller => Ok(()),
        _ => Err(ContractError::Unauthorized),
    }
}
