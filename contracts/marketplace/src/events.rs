#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, Vec};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the marketplace is wired to its collaborators.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub payment_token: Address,
    pub registry: Address,
    pub record_store: Address,
    pub timestamp: u64,
}

/// Fired when an account converts deposited value into credit.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreditAcquiredEvent {
    pub account: Address,
    pub deposited: i128,
    pub credit: i128,
    pub new_balance: i128,
    pub timestamp: u64,
}

/// Fired when an account returns all of its credit.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreditReturnedEvent {
    pub account: Address,
    pub returned: i128,
    pub fee: i128,
    pub payout: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListingAddedEvent {
    pub listing_id: u64,
    pub owner: Address,
    pub record_types: Vec<u32>,
    pub allow_organization_types: Vec<u32>,
    pub price_per_day: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListingRemovedEvent {
    pub listing_id: u64,
    pub owner: Address,
    pub timestamp: u64,
}

/// Fired when an organization buys time-bounded access through a listing.
///
/// The record store consumes this to materialise the grant.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessGrantedEvent {
    pub listing_id: u64,
    pub buyer: Address,
    pub patient: Address,
    pub record_types: Vec<u32>,
    pub cost: i128,
    pub expires_at: u64,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    payment_token: Address,
    registry: Address,
    record_store: Address,
) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        admin,
        payment_token,
        registry,
        record_store,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_credit_acquired(
    env: &Env,
    account: Address,
    deposited: i128,
    credit: i128,
    new_balance: i128,
) {
    let topics = (symbol_short!("MT_GET"), account.clone());
    let data = CreditAcquiredEvent {
        account,
        deposited,
        credit,
        new_balance,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_credit_returned(
    env: &Env,
    account: Address,
    returned: i128,
    fee: i128,
    payout: i128,
) {
    let topics = (symbol_short!("MT_RET"), account.clone());
    let data = CreditReturnedEvent {
        account,
        returned,
        fee,
        payout,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes the listing id, owner, record types, allowed organization
/// categories and daily price of a new listing.
pub fn publish_listing_added(
    env: &Env,
    listing_id: u64,
    owner: Address,
    record_types: Vec<u32>,
    allow_organization_types: Vec<u32>,
    price_per_day: i128,
) {
    let topics = (symbol_short!("LST_ADD"), owner.clone());
    let data = ListingAddedEvent {
        listing_id,
        owner,
        record_types,
        allow_organization_types,
        price_per_day,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_listing_removed(env: &Env, listing_id: u64, owner: Address) {
    let topics = (symbol_short!("LST_REM"), owner.clone());
    let data = ListingRemovedEvent {
        listing_id,
        owner,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_access_granted(
    env: &Env,
    listing_id: u64,
    buyer: Address,
    patient: Address,
    record_types: Vec<u32>,
    cost: i128,
    expires_at: u64,
) {
    let topics = (symbol_short!("ACC_GRT"), listing_id, buyer.clone());
    let data = AccessGrantedEvent {
        listing_id,
        buyer,
        patient,
        record_types,
        cost,
        expires_at,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
