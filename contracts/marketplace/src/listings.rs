//! Listing registry and purchased access grants.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::extend_persistent_ttl;

const LISTING: Symbol = symbol_short!("LISTING");
const LISTING_CTR: Symbol = symbol_short!("LST_CTR");
const PATIENT_LISTINGS: Symbol = symbol_short!("P_LIST");
const GRANT: Symbol = symbol_short!("GRANT");

pub const SECONDS_PER_DAY: u64 = 86_400;

/// A patient's offer to sell time-limited access to some of their record types.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Listing {
    pub id: u64,
    pub owner: Address,
    pub price_per_day: i128,
    /// Only types the record store confirmed for `owner` at listing time.
    pub record_types: Vec<u32>,
    /// Organization categories allowed to buy. Empty means nobody can.
    pub allow_organization_types: Vec<u32>,
    pub created_at: u64,
}

impl Listing {
    pub fn allows_category(&self, category: u32) -> bool {
        self.allow_organization_types.contains(category)
    }
}

fn listing_key(id: u64) -> (Symbol, u64) {
    (LISTING, id)
}

fn patient_key(patient: &Address) -> (Symbol, Address) {
    (PATIENT_LISTINGS, patient.clone())
}

fn grant_key(listing_id: u64, buyer: &Address) -> (Symbol, u64, Address) {
    (GRANT, listing_id, buyer.clone())
}

/// Ids start at 1 and are never handed out twice, removed listings included.
pub fn next_listing_id(env: &Env) -> u64 {
    let current: u64 = env.storage().instance().get(&LISTING_CTR).unwrap_or(0);
    let next = current.saturating_add(1);
    env.storage().instance().set(&LISTING_CTR, &next);
    next
}

/// Number of listing ids issued so far.
pub fn listing_count(env: &Env) -> u64 {
    env.storage().instance().get(&LISTING_CTR).unwrap_or(0)
}

pub fn get_listing(env: &Env, id: u64) -> Option<Listing> {
    env.storage().persistent().get(&listing_key(id))
}

pub fn store_listing(env: &Env, listing: &Listing) {
    let key = listing_key(listing.id);
    env.storage().persistent().set(&key, listing);
    extend_persistent_ttl(env, &key);

    let mut ids = patient_listings(env, &listing.owner);
    ids.push_back(listing.id);
    set_patient_listings(env, &listing.owner, &ids);
}

pub fn delete_listing(env: &Env, listing: &Listing) {
    env.storage().persistent().remove(&listing_key(listing.id));

    let mut ids = patient_listings(env, &listing.owner);
    if let Some(pos) = ids.first_index_of(listing.id) {
        ids.remove(pos);
    }
    set_patient_listings(env, &listing.owner, &ids);
}

/// Active listing ids owned by `patient`, oldest first.
pub fn patient_listings(env: &Env, patient: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&patient_key(patient))
        .unwrap_or(Vec::new(env))
}

fn set_patient_listings(env: &Env, patient: &Address, ids: &Vec<u64>) {
    let key = patient_key(patient);
    if ids.is_empty() {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, ids);
    extend_persistent_ttl(env, &key);
}

/// Collapses repeated entries, keeping first-seen order.
pub fn dedup(env: &Env, values: &Vec<u32>) -> Vec<u32> {
    let mut out = Vec::new(env);
    for value in values.iter() {
        if !out.contains(value) {
            out.push_back(value);
        }
    }
    out
}

pub fn grant_expiry(env: &Env, listing_id: u64, buyer: &Address) -> Option<u64> {
    env.storage().persistent().get(&grant_key(listing_id, buyer))
}

/// Extends `buyer`'s grant on `listing_id` by `duration_days`.
///
/// A still-running grant is extended from its current expiry, a lapsed or
/// missing one from now. Returns the new expiry.
pub fn extend_grant(env: &Env, listing_id: u64, buyer: &Address, duration_days: u32) -> u64 {
    let now = env.ledger().timestamp();
    let start = match grant_expiry(env, listing_id, buyer) {
        Some(expires_at) if expires_at > now => expires_at,
        _ => now,
    };
    let expires_at =
        start.saturating_add((duration_days as u64).saturating_mul(SECONDS_PER_DAY));

    let key = grant_key(listing_id, buyer);
    env.storage().persistent().set(&key, &expires_at);
    extend_persistent_ttl(env, &key);
    expires_at
}
