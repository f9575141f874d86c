//! Loan and guarantee registry storage, counters and configuration.
//!
//! Loans live in persistent storage keyed by their dense id; a loan's guarantee
//! slot lives next to it under the same id. Counters, the settlement token and
//! the reentrancy flag live in instance storage.

use soroban_sdk::{contracttype, Address, Env, Symbol};

use crate::types::{ContractError, Guarantee, Loan};

pub(crate) const DAY_IN_LEDGERS: u32 = 17_280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub(crate) const LOAN_BUMP_AMOUNT: u32 = 120 * DAY_IN_LEDGERS;
pub(crate) const LOAN_LIFETIME_THRESHOLD: u32 = LOAN_BUMP_AMOUNT - 7 * DAY_IN_LEDGERS;

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Loan(u64),
    Guarantee(u64),
}

fn token_key(env: &Env) -> Symbol {
    Symbol::new(env, "token")
}

fn next_id_key(env: &Env) -> Symbol {
    Symbol::new(env, "next_id")
}

fn loans_count_key(env: &Env) -> Symbol {
    Symbol::new(env, "loans_cnt")
}

fn guarantees_count_key(env: &Env) -> Symbol {
    Symbol::new(env, "guar_cnt")
}

fn reentrancy_key(env: &Env) -> Symbol {
    Symbol::new(env, "reentrancy")
}

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

// ── configuration ───────────────────────────────────────────────────────────

pub fn has_token(env: &Env) -> bool {
    env.storage().instance().has(&token_key(env))
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&token_key(env), token);
}

pub fn get_token(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&token_key(env))
        .ok_or(ContractError::NotInitialized)
}

// ── loan table ──────────────────────────────────────────────────────────────

/// Raw slot read, including settled tombstones.
pub fn read_loan(env: &Env, loan_id: u64) -> Option<Loan> {
    let key = DataKey::Loan(loan_id);
    let loan: Option<Loan> = env.storage().persistent().get(&key);
    if loan.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, LOAN_LIFETIME_THRESHOLD, LOAN_BUMP_AMOUNT);
    }
    loan
}

/// Live loan lookup; tombstoned and unknown ids both fail.
pub fn load_loan(env: &Env, loan_id: u64) -> Result<Loan, ContractError> {
    match read_loan(env, loan_id) {
        Some(loan) if loan.exists => Ok(loan),
        _ => Err(ContractError::LoanNotFound),
    }
}

pub fn write_loan(env: &Env, loan: &Loan) {
    let key = DataKey::Loan(loan.id);
    env.storage().persistent().set(&key, loan);
    env.storage()
        .persistent()
        .extend_ttl(&key, LOAN_LIFETIME_THRESHOLD, LOAN_BUMP_AMOUNT);
}

// ── guarantee table ─────────────────────────────────────────────────────────

pub fn read_guarantee(env: &Env, loan_id: u64) -> Option<Guarantee> {
    let key = DataKey::Guarantee(loan_id);
    let guarantee: Option<Guarantee> = env.storage().persistent().get(&key);
    if guarantee.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, LOAN_LIFETIME_THRESHOLD, LOAN_BUMP_AMOUNT);
    }
    guarantee
}

pub fn write_guarantee(env: &Env, loan_id: u64, guarantee: &Guarantee) {
    let key = DataKey::Guarantee(loan_id);
    env.storage().persistent().set(&key, guarantee);
    env.storage()
        .persistent()
        .extend_ttl(&key, LOAN_LIFETIME_THRESHOLD, LOAN_BUMP_AMOUNT);
}

pub fn remove_guarantee(env: &Env, loan_id: u64) {
    env.storage()
        .persistent()
        .remove(&DataKey::Guarantee(loan_id));
}

/// Hand out the next dense loan id. Ids are never reused.
pub fn allocate_loan_id(env: &Env) -> Result<u64, ContractError> {
    let id: u64 = env.storage().instance().get(&next_id_key(env)).unwrap_or(0);
    let next = id.checked_add(1).ok_or(ContractError::Overflow)?;
    env.storage().instance().set(&next_id_key(env), &next);
    Ok(id)
}

// ── counters ────────────────────────────────────────────────────────────────

pub fn loans_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&loans_count_key(env))
        .unwrap_or(0)
}

pub fn guarantees_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&guarantees_count_key(env))
        .unwrap_or(0)
}

fn bump_counter(env: &Env, key: &Symbol, increment: bool) -> Result<u64, ContractError> {
    let current: u64 = env.storage().instance().get(key).unwrap_or(0);
    let updated = if increment {
        current.checked_add(1)
    } else {
        current.checked_sub(1)
    };
    let updated = updated.ok_or(ContractError::Overflow)?;
    env.storage().instance().set(key, &updated);
    Ok(updated)
}

pub fn increment_loans(env: &Env) -> Result<u64, ContractError> {
    bump_counter(env, &loans_count_key(env), true)
}

pub fn decrement_loans(env: &Env) -> Result<u64, ContractError> {
    bump_counter(env, &loans_count_key(env), false)
}

pub fn increment_guarantees(env: &Env) -> Result<u64, ContractError> {
    bump_counter(env, &guarantees_count_key(env), true)
}

pub fn decrement_guarantees(env: &Env) -> Result<u64, ContractError> {
    bump_counter(env, &guarantees_count_key(env), false)
}

// ── reentrancy guard ────────────────────────────────────────────────────────

pub fn set_reentrancy_guard(env: &Env) -> Result<(), ContractError> {
    let key = reentrancy_key(env);
    let current: bool = env.storage().instance().get(&key).unwrap_or(false);
    if current {
        return Err(ContractError::Reentrancy);
    }
    env.storage().instance().set(&key, &true);
    Ok(())
}

pub fn clear_reentrancy_guard(env: &Env) {
    env.storage().instance().set(&reentrancy_key(env), &false);
}

pub fn reentrancy_guard_active(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&reentrancy_key(env))
        .unwrap_or(false)
}
