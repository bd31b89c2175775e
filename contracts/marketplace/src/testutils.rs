//! In-memory stand-ins for the registry and record store contracts.
//!
//! They answer the same calls as the real collaborator contracts, plus the
//! setters a test needs to arrange patients, organizations and records.

use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, Symbol};

const PATIENT: Symbol = symbol_short!("PATIENT");
const ORGANIZATION: Symbol = symbol_short!("ORG");
const RECORD: Symbol = symbol_short!("RECORD");

/// Category reported for addresses that are not registered organizations.
pub const UNREGISTERED_CATEGORY: u32 = u32::MAX;

#[contract]
pub struct MockRegistry;

#[contractimpl]
impl MockRegistry {
    pub fn register_patient(env: Env, who: Address) {
        env.storage().persistent().set(&(PATIENT, who), &true);
    }

    pub fn register_organization(env: Env, who: Address, category: u32) {
        env.storage().persistent().set(&(ORGANIZATION, who), &category);
    }

    pub fn is_registered_patient(env: Env, who: Address) -> bool {
        env.storage().persistent().has(&(PATIENT, who))
    }

    pub fn is_registered_organization(env: Env, who: Address) -> bool {
        env.storage().persistent().has(&(ORGANIZATION, who))
    }

    pub fn organization_category(env: Env, who: Address) -> u32 {
        env.storage()
            .persistent()
            .get(&(ORGANIZATION, who))
            .unwrap_or(UNREGISTERED_CATEGORY)
    }
}

#[contract]
pub struct MockRecordStore;

#[contractimpl]
impl MockRecordStore {
    pub fn add_record(env: Env, patient: Address, record_type: u32) {
        env.storage()
            .persistent()
            .set(&(RECORD, patient, record_type), &true);
    }

    pub fn has_record_of_type(env: Env, patient: Address, record_type: u32) -> bool {
        env.storage()
            .persistent()
            .has(&(RECORD, patient, record_type))
    }
}
