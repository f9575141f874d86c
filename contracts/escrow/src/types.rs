//! Core data types for the Escrow contract.

use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GuaranteeStatus {
    WaitingForHandling = 0,
    Accepted = 1,
}

#[soroban_sdk::contracterror]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    Unauthorized = 1,
    SelfDealing = 2,
    LoanNotFound = 3,
    GuaranteeNotFound = 4,
    GuaranteeExists = 5,
    LenderExists = 6,
    InvalidAmount = 7,
    InvalidDuration = 8,
    InvalidInterestRate = 9,
    InsufficientFunds = 10,
    GuaranteeNotAccepted = 11,
    LoanNotFunded = 12,
    NotInitialized = 13,
    AlreadyInitialized = 14,
    Reentrancy = 15,
    Overflow = 16,
}

/// Underwriting posted by a guarantor for a single loan.
///
/// Stored in its own slot keyed by the loan id; at most one per loan.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Guarantee {
    pub guarantor: Address,
    pub guarantee_interest_rate: u32,
    /// Collateral held by the escrow; equals the loan principal at underwriting.
    pub deposit_amount: i128,
    pub status: GuaranteeStatus,
    pub exists: bool,
}

/// Stored loan record.
///
/// Settled loans are kept as tombstones (`exists == false`) so ids stay stable.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Loan {
    pub id: u64,
    pub borrower: Address,
    pub principal: i128,
    /// Percent of principal owed to the lender on settlement.
    pub loan_interest_rate: u32,
    pub duration_days: u64,
    pub lender: Option<Address>,
    pub has_accepted_guarantee: bool,
    pub is_funded: bool,
    pub exists: bool,
    /// Ledger timestamp of funding. Zero until `is_funded` is set.
    pub funded_at: u64,
    pub created_at: u64,
    /// Guarantor currently occupying this loan's guarantee slot.
    pub guarantor: Option<Address>,
}

/// Lender-facing summary returned by `get_loans_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanInfo {
    pub loans_count: u64,
    pub has_accepted_guarantee: bool,
    /// Yield owed to the lender, `floor(principal * loan_interest_rate / 100)`.
    pub interest_amount: i128,
    pub guarantor: Option<Address>,
}

/// Amounts moved by a settlement.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Payout {
    pub required: i128,
    pub to_lender: i128,
    pub to_guarantor: i128,
}
