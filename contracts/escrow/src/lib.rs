#![no_std]

//! Creditra escrow contract: guaranteed peer-to-peer loans.
//!
//! A borrower requests a loan, a guarantor underwrites it by depositing collateral
//! equal to the principal, the borrower accepts or rejects the underwriting, a lender
//! funds the accepted loan and the borrower finally repays principal plus the lender's
//! and the guarantor's interest.
//!
//! # Reentrancy
//! Every path that moves tokens writes its bookkeeping first and only then calls the
//! token contract. Those paths also hold a reentrancy guard in instance storage; a
//! callback into the escrow while a transfer is in flight fails with `Reentrancy`.

mod auth;
mod deadline;
mod events;
mod settlement;
mod storage;
mod types;

use soroban_sdk::{contract, contractimpl, log, symbol_short, token, Address, Env};

use events::{
    publish_guarantee_event, publish_loan_funded, publish_loan_requested, publish_overdue,
    publish_settlement, GuaranteeEvent, LoanFundedEvent, LoanRequestedEvent, OverdueEvent,
    SettlementEvent,
};
pub use types::{ContractError, Guarantee, GuaranteeStatus, Loan, LoanInfo};

#[contract]
pub struct LoanEscrow;

#[contractimpl]
impl LoanEscrow {
    /// Configure the token every deposit, loan and repayment is denominated in.
    pub fn init(env: Env, token: Address) -> Result<(), ContractError> {
        if storage::has_token(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        storage::set_token(&env, &token);
        storage::extend_instance(&env);
        Ok(())
    }

    /// Open a loan request. The caller becomes the borrower.
    ///
    /// Returns the new loan id.
    ///
    /// # Errors
    /// * `InvalidAmount` – `principal` is zero or negative
    /// * `InvalidDuration` – `duration_days` is zero
    pub fn request_loan(
        env: Env,
        borrower: Address,
        principal: i128,
        duration_days: u64,
        loan_interest_rate: u32,
    ) -> Result<u64, ContractError> {
        borrower.require_auth();

        if principal <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        if duration_days == 0 {
            return Err(ContractError::InvalidDuration);
        }

        let loan_id = storage::allocate_loan_id(&env)?;
        let loan = Loan {
            id: loan_id,
            borrower: borrower.clone(),
            principal,
            loan_interest_rate,
            duration_days,
            lender: None,
            has_accepted_guarantee: false,
            is_funded: false,
            exists: true,
            funded_at: 0,
            created_at: env.ledger().timestamp(),
            guarantor: None,
        };
        storage::write_loan(&env, &loan);
        storage::increment_loans(&env)?;
        storage::extend_instance(&env);

        publish_loan_requested(
            &env,
            LoanRequestedEvent {
                loan_id,
                borrower,
                principal,
                duration_days,
                loan_interest_rate,
            },
        );
        Ok(loan_id)
    }

    /// Underwrite a loan: deposit collateral equal to the principal and propose a rate.
    ///
    /// # Errors
    /// * `LoanNotFound` – unknown or settled loan
    /// * `SelfDealing` – the borrower tried to underwrite their own loan
    /// * `GuaranteeExists` – the loan's guarantee slot is already taken
    /// * `InvalidInterestRate` – `guarantee_interest_rate` is zero
    /// * `InsufficientFunds` – `amount` differs from the principal
    pub fn provide_guarantee(
        env: Env,
        guarantor: Address,
        loan_id: u64,
        guarantee_interest_rate: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        guarantor.require_auth();

        let mut loan = storage::load_loan(&env, loan_id)?;
        auth::require_not_borrower_guarantor(&loan, &guarantor)?;
        if loan.guarantor.is_some() || storage::read_guarantee(&env, loan_id).is_some() {
            return Err(ContractError::GuaranteeExists);
        }
        if guarantee_interest_rate == 0 {
            return Err(ContractError::InvalidInterestRate);
        }
        if amount != loan.principal {
            log!(&env, "deposit must equal principal", amount, loan.principal);
            return Err(ContractError::InsufficientFunds);
        }

        storage::set_reentrancy_guard(&env)?;
        let guarantee = Guarantee {
            guarantor: guarantor.clone(),
            guarantee_interest_rate,
            deposit_amount: amount,
            status: GuaranteeStatus::WaitingForHandling,
            exists: true,
        };
        loan.guarantor = Some(guarantor.clone());
        storage::write_loan(&env, &loan);
        storage::write_guarantee(&env, loan_id, &guarantee);
        storage::increment_guarantees(&env)?;
        storage::extend_instance(&env);

        let token_client = token::Client::new(&env, &storage::get_token(&env)?);
        token_client.transfer(&guarantor, &env.current_contract_address(), &amount);
        storage::clear_reentrancy_guard(&env);

        publish_guarantee_event(
            &env,
            GuaranteeEvent {
                event_type: symbol_short!("provided"),
                loan_id,
                guarantor,
                guarantee_interest_rate,
                deposit_amount: amount,
                status: GuaranteeStatus::WaitingForHandling,
            },
        );
        Ok(())
    }

    /// Borrower's decision on the pending guarantee.
    ///
    /// Accepting marks the loan as guaranteed. Rejecting frees the guarantee slot and
    /// refunds the deposit to the guarantor.
    ///
    /// # Errors
    /// * `LoanNotFound` – unknown or settled loan
    /// * `Unauthorized` – caller is not the borrower
    /// * `GuaranteeNotFound` – no guarantee is waiting for a decision
    pub fn handle_guarantee(
        env: Env,
        borrower: Address,
        loan_id: u64,
        accept: bool,
    ) -> Result<(), ContractError> {
        borrower.require_auth();

        let mut loan = storage::load_loan(&env, loan_id)?;
        auth::require_borrower(&loan, &borrower)?;
        let mut guarantee = match storage::read_guarantee(&env, loan_id) {
            Some(g) if g.status == GuaranteeStatus::WaitingForHandling => g,
            _ => return Err(ContractError::GuaranteeNotFound),
        };

        if accept {
            guarantee.status = GuaranteeStatus::Accepted;
            loan.has_accepted_guarantee = true;
            storage::write_loan(&env, &loan);
            storage::write_guarantee(&env, loan_id, &guarantee);
            storage::extend_instance(&env);

            publish_guarantee_event(
                &env,
                GuaranteeEvent {
                    event_type: symbol_short!("accepted"),
                    loan_id,
                    guarantor: guarantee.guarantor,
                    guarantee_interest_rate: guarantee.guarantee_interest_rate,
                    deposit_amount: guarantee.deposit_amount,
                    status: GuaranteeStatus::Accepted,
                },
            );
            return Ok(());
        }

        storage::set_reentrancy_guard(&env)?;
        loan.guarantor = None;
        storage::write_loan(&env, &loan);
        storage::remove_guarantee(&env, loan_id);
        storage::decrement_guarantees(&env)?;
        storage::extend_instance(&env);

        let token_client = token::Client::new(&env, &storage::get_token(&env)?);
        token_client.transfer(
            &env.current_contract_address(),
            &guarantee.guarantor,
            &guarantee.deposit_amount,
        );
        storage::clear_reentrancy_guard(&env);

        publish_guarantee_event(
            &env,
            GuaranteeEvent {
                event_type: symbol_short!("rejected"),
                loan_id,
                guarantor: guarantee.guarantor,
                guarantee_interest_rate: guarantee.guarantee_interest_rate,
                deposit_amount: guarantee.deposit_amount,
                status: guarantee.status,
            },
        );
        Ok(())
    }

    /// Fund a guaranteed loan. The principal goes straight to the borrower.
    ///
    /// # Errors
    /// * `LoanNotFound` – unknown or settled loan
    /// * `GuaranteeNotAccepted` – the borrower has not accepted a guarantee yet
    /// * `LenderExists` – the loan is already funded
    /// * `Unauthorized` – the borrower tried to fund their own loan
    /// * `InsufficientFunds` – `amount` differs from the principal
    pub fn provide_loan_for_loanee(
        env: Env,
        lender: Address,
        loan_id: u64,
        amount: i128,
    ) -> Result<(), ContractError> {
        lender.require_auth();

        let mut loan = storage::load_loan(&env, loan_id)?;
        if !loan.has_accepted_guarantee {
            return Err(ContractError::GuaranteeNotAccepted);
        }
        if loan.lender.is_some() {
            return Err(ContractError::LenderExists);
        }
        auth::require_not_borrower_lender(&loan, &lender)?;
        if amount != loan.principal {
            log!(&env, "funding must equal principal", amount, loan.principal);
            return Err(ContractError::InsufficientFunds);
        }

        storage::set_reentrancy_guard(&env)?;
        let funded_at = env.ledger().timestamp();
        loan.lender = Some(lender.clone());
        loan.is_funded = true;
        loan.funded_at = funded_at;
        storage::write_loan(&env, &loan);
        storage::extend_instance(&env);

        let token_client = token::Client::new(&env, &storage::get_token(&env)?);
        token_client.transfer(&lender, &loan.borrower, &amount);
        storage::clear_reentrancy_guard(&env);

        publish_loan_funded(
            &env,
            LoanFundedEvent {
                loan_id,
                lender,
                borrower: loan.borrower,
                amount,
                funded_at,
            },
        );
        Ok(())
    }

    /// Lender's check on the repayment window. Returns `true` once the loan is overdue.
    ///
    /// The loan is left untouched either way; an overdue loan can still be repaid.
    ///
    /// # Errors
    /// * `LoanNotFound` – unknown or settled loan
    /// * `LoanNotFunded` – the loan has no lender yet
    /// * `Unauthorized` – caller is not the loan's lender
    pub fn is_loan_overdue(env: Env, lender: Address, loan_id: u64) -> Result<bool, ContractError> {
        lender.require_auth();

        let loan = storage::load_loan(&env, loan_id)?;
        if !loan.is_funded {
            return Err(ContractError::LoanNotFunded);
        }
        auth::require_lender(&loan, &lender)?;

        let now = env.ledger().timestamp();
        let overdue = deadline::is_overdue(&loan, now)?;
        if overdue {
            publish_overdue(
                &env,
                OverdueEvent {
                    loan_id,
                    lender,
                    deadline: deadline::repayment_deadline(&loan)?,
                    observed_at: now,
                },
            );
        }
        Ok(overdue)
    }

    /// Lender-facing summary of a loan.
    ///
    /// # Errors
    /// * `Unauthorized` – caller is not the loan's lender
    /// * `LoanNotFound` – the loan has been settled
    pub fn get_loans_info(
        env: Env,
        lender: Address,
        loan_id: u64,
    ) -> Result<LoanInfo, ContractError> {
        lender.require_auth();

        let loan = storage::read_loan(&env, loan_id).ok_or(ContractError::Unauthorized)?;
        auth::require_lender(&loan, &lender)?;
        if !loan.exists {
            return Err(ContractError::LoanNotFound);
        }

        Ok(LoanInfo {
            loans_count: storage::loans_count(&env),
            has_accepted_guarantee: loan.has_accepted_guarantee,
            interest_amount: settlement::interest(loan.principal, loan.loan_interest_rate)?,
            guarantor: loan.guarantor,
        })
    }

    /// Repay a funded loan and settle it.
    ///
    /// Pulls the required repayment from the borrower, pays principal plus loan
    /// interest to the lender and the deposit plus guarantee interest to the
    /// guarantor, then closes both the loan and its guarantee. When `amount` exceeds
    /// the required repayment only the required repayment is pulled.
    ///
    /// # Errors
    /// * `LoanNotFound` – unknown or settled loan
    /// * `LoanNotFunded` – no lender has funded the loan yet
    /// * `Unauthorized` – caller is not the borrower
    /// * `InsufficientFunds` – `amount` is below the required repayment
    pub fn pay_back_loan(
        env: Env,
        borrower: Address,
        loan_id: u64,
        amount: i128,
    ) -> Result<(), ContractError> {
        borrower.require_auth();

        let mut loan = storage::load_loan(&env, loan_id)?;
        if !loan.is_funded {
            return Err(ContractError::LoanNotFunded);
        }
        auth::require_borrower(&loan, &borrower)?;

        let guarantee = storage::read_guarantee(&env, loan_id)
            .filter(|g| g.status == GuaranteeStatus::Accepted)
            .ok_or(ContractError::GuaranteeNotFound)?;
        let lender = loan.lender.clone().ok_or(ContractError::LoanNotFunded)?;
        let payout = settlement::payout(&loan, &guarantee)?;
        if amount < payout.required {
            log!(&env, "repayment below required", amount, payout.required);
            return Err(ContractError::InsufficientFunds);
        }

        storage::set_reentrancy_guard(&env)?;
        loan.exists = false;
        loan.guarantor = None;
        storage::write_loan(&env, &loan);
        storage::remove_guarantee(&env, loan_id);
        storage::decrement_loans(&env)?;
        storage::decrement_guarantees(&env)?;
        storage::extend_instance(&env);

        let escrow = env.current_contract_address();
        let token_client = token::Client::new(&env, &storage::get_token(&env)?);
        token_client.transfer(&borrower, &escrow, &payout.required);
        token_client.transfer(&escrow, &lender, &payout.to_lender);
        token_client.transfer(&escrow, &guarantee.guarantor, &payout.to_guarantor);
        storage::clear_reentrancy_guard(&env);

        publish_settlement(
            &env,
            SettlementEvent {
                loan_id,
                borrower,
                lender,
                guarantor: guarantee.guarantor,
                repaid: payout.required,
                to_lender: payout.to_lender,
                to_guarantor: payout.to_guarantor,
                timestamp: env.ledger().timestamp(),
            },
        );
        Ok(())
    }

    /// Amount `pay_back_loan` will pull for this loan.
    ///
    /// # Errors
    /// * `LoanNotFound` – unknown or settled loan
    /// * `GuaranteeNotFound` – the borrower has not accepted a guarantee yet
    pub fn required_repayment(env: Env, loan_id: u64) -> Result<i128, ContractError> {
        let loan = storage::load_loan(&env, loan_id)?;
        let guarantee = storage::read_guarantee(&env, loan_id)
            .filter(|g| g.status == GuaranteeStatus::Accepted)
            .ok_or(ContractError::GuaranteeNotFound)?;
        settlement::required_repayment(
            loan.principal,
            loan.loan_interest_rate,
            guarantee.guarantee_interest_rate,
        )
    }

    /// Ledger timestamp after which a funded loan is overdue.
    pub fn repayment_deadline(env: Env, loan_id: u64) -> Result<u64, ContractError> {
        let loan = storage::load_loan(&env, loan_id)?;
        deadline::repayment_deadline(&loan)
    }

    /// Get a live loan (view function).
    pub fn get_loan(env: Env, loan_id: u64) -> Result<Loan, ContractError> {
        storage::load_loan(&env, loan_id)
    }

    /// Raw loan slot, including settled records (view function).
    pub fn loans(env: Env, loan_id: u64) -> Option<Loan> {
        storage::read_loan(&env, loan_id)
    }

    /// Current guarantee slot of a loan (view function).
    pub fn guarantees(env: Env, loan_id: u64) -> Option<Guarantee> {
        storage::read_guarantee(&env, loan_id)
    }

    pub fn loans_count(env: Env) -> u64 {
        storage::loans_count(&env)
    }

    pub fn guarantees_count(env: Env) -> u64 {
        storage::guarantees_count(&env)
    }

    pub fn settlement_token(env: Env) -> Result<Address, ContractError> {
        storage::get_token(&env)
    }

    /// Whether a token-moving call is currently in flight.
    pub fn is_locked(env: Env) -> bool {
        storage::reentrancy_guard_active(&env)
    }
}
