//! Event types and topic constants for the Escrow contract.
//! Stable event schemas for indexing and analytics.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::types::GuaranteeStatus;

/// Emitted when a borrower opens a loan request.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanRequestedEvent {
    pub loan_id: u64,
    pub borrower: Address,
    pub principal: i128,
    pub duration_days: u64,
    pub loan_interest_rate: u32,
}

/// Emitted on every guarantee lifecycle step (provided, accepted, rejected).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GuaranteeEvent {
    pub event_type: Symbol,
    pub loan_id: u64,
    pub guarantor: Address,
    pub guarantee_interest_rate: u32,
    pub deposit_amount: i128,
    pub status: GuaranteeStatus,
}

/// Emitted when a lender funds a loan.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanFundedEvent {
    pub loan_id: u64,
    pub lender: Address,
    pub borrower: Address,
    pub amount: i128,
    pub funded_at: u64,
}

/// Emitted when a loan is repaid and both records are closed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SettlementEvent {
    pub loan_id: u64,
    pub borrower: Address,
    pub lender: Address,
    pub guarantor: Address,
    pub repaid: i128,
    pub to_lender: i128,
    pub to_guarantor: i128,
    pub timestamp: u64,
}

/// Emitted when the lender observes a missed repayment deadline.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OverdueEvent {
    pub loan_id: u64,
    pub lender: Address,
    pub deadline: u64,
    pub observed_at: u64,
}

pub fn publish_loan_requested(env: &Env, event: LoanRequestedEvent) {
    env.events()
        .publish((symbol_short!("escrow"), symbol_short!("requested")), event);
}

/// Publish a guarantee lifecycle event under `("escrow", event.event_type)`.
pub fn publish_guarantee_event(env: &Env, event: GuaranteeEvent) {
    env.events()
        .publish((symbol_short!("escrow"), event.event_type.clone()), event);
}

pub fn publish_loan_funded(env: &Env, event: LoanFundedEvent) {
    env.events()
        .publish((symbol_short!("escrow"), symbol_short!("funded")), event);
}

pub fn publish_settlement(env: &Env, event: SettlementEvent) {
    env.events()
        .publish((symbol_short!("escrow"), symbol_short!("settled")), event);
}

pub fn publish_overdue(env: &Env, event: OverdueEvent) {
    env.events()
        .publish((symbol_short!("escrow"), symbol_short!("overdue")), event);
}
