//! Settlement arithmetic: floor-division interest and the lender/guarantor split.
//!
//! All amounts are token base units. Interest is an integer percent of principal,
//! truncated toward zero, so small principals at low rates can earn nothing.

use crate::types::{ContractError, Guarantee, Loan, Payout};

const PERCENT_DENOMINATOR: i128 = 100;

/// `floor(principal * rate_percent / 100)`.
pub fn interest(principal: i128, rate_percent: u32) -> Result<i128, ContractError> {
    principal
        .checked_mul(i128::from(rate_percent))
        .map(|scaled| scaled / PERCENT_DENOMINATOR)
        .ok_or(ContractError::Overflow)
}

/// Full repayment owed by the borrower: principal plus both interest components.
pub fn required_repayment(
    principal: i128,
    loan_interest_rate: u32,
    guarantee_interest_rate: u32,
) -> Result<i128, ContractError> {
    let guarantor_yield = interest(principal, guarantee_interest_rate)?;
    let lender_yield = interest(principal, loan_interest_rate)?;
    principal
        .checked_add(guarantor_yield)
        .and_then(|v| v.checked_add(lender_yield))
        .ok_or(ContractError::Overflow)
}

/// Split a settlement between lender and guarantor.
///
/// `required + deposit_amount == to_lender + to_guarantor` holds for every result.
pub fn payout(loan: &Loan, guarantee: &Guarantee) -> Result<Payout, ContractError> {
    let lender_yield = interest(loan.principal, loan.loan_interest_rate)?;
    let guarantor_yield = interest(loan.principal, guarantee.guarantee_interest_rate)?;

    let required = required_repayment(
        loan.principal,
        loan.loan_interest_rate,
        guarantee.guarantee_interest_rate,
    )?;
    let to_lender = loan
        .principal
        .checked_add(lender_yield)
        .ok_or(ContractError::Overflow)?;
    let to_guarantor = guarantee
        .deposit_amount
        .checked_add(guarantor_yield)
        .ok_or(ContractError::Overflow)?;

    Ok(Payout {
        required,
        to_lender,
        to_guarantor,
    })
}
