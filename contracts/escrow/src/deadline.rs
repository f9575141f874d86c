//! Repayment window tracking for funded loans.

use crate::types::{ContractError, Loan};

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Ledger timestamp after which a funded loan is overdue.
pub fn repayment_deadline(loan: &Loan) -> Result<u64, ContractError> {
    if !loan.is_funded {
        return Err(ContractError::LoanNotFunded);
    }
    loan.duration_days
        .checked_mul(SECONDS_PER_DAY)
        .and_then(|window| loan.funded_at.checked_add(window))
        .ok_or(ContractError::Overflow)
}

/// True once `now` is strictly past the repayment deadline.
pub fn is_overdue(loan: &Loan, now: u64) -> Result<bool, ContractError> {
    Ok(now > repayment_deadline(loan)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::{Address, Env};

    fn loan(env: &Env, duration_days: u64, funded_at: Option<u64>) -> Loan {
        Loan {
            id: 7,
            borrower: Address::generate(env),
            principal: 100,
            loan_interest_rate: 5,
            duration_days,
            lender: funded_at.map(|_| Address::generate(env)),
            has_accepted_guarantee: true,
            is_funded: funded_at.is_some(),
            exists: true,
            funded_at: funded_at.unwrap_or(0),
            created_at: 0,
            guarantor: None,
        }
    }

    #[test]
    fn deadline_counts_whole_days_from_funding() {
        let env = Env::default();
        let l = loan(&env, 31, Some(1_000));
        assert_eq!(repayment_deadline(&l).unwrap(), 1_000 + 31 * SECONDS_PER_DAY);
    }

    #[test]
    fn overdue_only_after_deadline_passes() {
        let env = Env::default();
        let l = loan(&env, 1, Some(500));
        let deadline = 500 + SECONDS_PER_DAY;
        assert!(!is_overdue(&l, 500).unwrap());
        assert!(!is_overdue(&l, deadline).unwrap());
        assert!(is_overdue(&l, deadline + 1).unwrap());
    }

    #[test]
    fn unfunded_loan_has_no_deadline() {
        let env = Env::default();
        let l = loan(&env, 31, None);
        assert_eq!(repayment_deadline(&l), Err(ContractError::LoanNotFunded));
        assert_eq!(is_overdue(&l, u64::MAX), Err(ContractError::LoanNotFunded));
    }

    #[test]
    fn absurd_duration_overflows() {
        let env = Env::default();
        let l = loan(&env, u64::MAX, Some(1));
        assert_eq!(repayment_deadline(&l), Err(ContractError::Overflow));
    }
}
