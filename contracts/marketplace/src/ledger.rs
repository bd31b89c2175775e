//! MedToken credit ledger.
//!
//! Balances live in persistent storage under `(BAL, account)`. An absent key
//! reads as a zero balance and a balance that drops to zero removes its key,
//! so "never seen" and "emptied" are the same state.
//!
//! Ledger invariant: the sum of every balance, the marketplace's own fee
//! balance included, equals `total_issued - total_redeemed`.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::errors::ContractError;
use crate::{extend_persistent_ttl, MarketConfig};

/// Credit issued per whole unit of the payment token.
pub const CREDIT_PER_UNIT: i128 = 100;

/// Stroops in one whole unit of the payment token.
pub const UNIT_SIZE: i128 = 10_000_000;

/// Flat credit fee kept by the marketplace on every `return_credit`.
pub const RETURN_FEE: i128 = 10;

const BALANCE: Symbol = symbol_short!("BAL");
const TOTAL_ISSUED: Symbol = symbol_short!("TOT_ISS");
const TOTAL_REDEEMED: Symbol = symbol_short!("TOT_RDM");

fn balance_key(who: &Address) -> (Symbol, Address) {
    (BALANCE, who.clone())
}

/// Payment-token stroops backing a single credit.
pub fn value_per_credit(config: &MarketConfig) -> i128 {
    config.unit_size / config.credit_per_unit
}

/// Whole credits bought by a positive `deposit` of stroops. Any remainder is
/// not charged.
pub fn credit_for_deposit(config: &MarketConfig, deposit: i128) -> i128 {
    deposit / value_per_credit(config)
}

/// Stroops paid out for `credit` returned credits.
pub fn value_for_credit(config: &MarketConfig, credit: i128) -> Result<i128, ContractError> {
    credit
        .checked_mul(value_per_credit(config))
        .ok_or(ContractError::InvalidInput)
}

pub fn balance_of(env: &Env, who: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&balance_key(who))
        .unwrap_or(0)
}

fn set_balance(env: &Env, who: &Address, amount: i128) {
    let key = balance_key(who);
    if amount == 0 {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, &amount);
    extend_persistent_ttl(env, &key);
}

/// Adds `amount` to `who`'s balance and returns the new balance.
pub fn credit(env: &Env, who: &Address, amount: i128) -> Result<i128, ContractError> {
    let next = balance_of(env, who)
        .checked_add(amount)
        .ok_or(ContractError::InvalidInput)?;
    set_balance(env, who, next);
    Ok(next)
}

/// Removes `amount` from `who`'s balance and returns what is left.
pub fn debit(env: &Env, who: &Address, amount: i128) -> Result<i128, ContractError> {
    let current = balance_of(env, who);
    if current < amount {
        return Err(ContractError::InsufficientCredit);
    }
    let next = current - amount;
    set_balance(env, who, next);
    Ok(next)
}

/// Zeroes `who`'s balance and returns what it held.
pub fn drain(env: &Env, who: &Address) -> i128 {
    let current = balance_of(env, who);
    set_balance(env, who, 0);
    current
}

pub fn total_issued(env: &Env) -> i128 {
    env.storage().instance().get(&TOTAL_ISSUED).unwrap_or(0)
}

pub fn total_redeemed(env: &Env) -> i128 {
    env.storage().instance().get(&TOTAL_REDEEMED).unwrap_or(0)
}

pub fn record_issued(env: &Env, amount: i128) -> Result<(), ContractError> {
    let next = total_issued(env)
        .checked_add(amount)
        .ok_or(ContractError::InvalidInput)?;
    env.storage().instance().set(&TOTAL_ISSUED, &next);
    Ok(())
}

pub fn record_redeemed(env: &Env, amount: i128) -> Result<(), ContractError> {
    let next = total_redeemed(env)
        .checked_add(amount)
        .ok_or(ContractError::InvalidInput)?;
    env.storage().instance().set(&TOTAL_REDEEMED, &next);
    Ok(())
}
