//! Cross-contract interfaces the marketplace consumes.
//!
//! The participant registry and the record store live in their own
//! contracts; the marketplace only ever reads from them. Their addresses are
//! wired once in `initialize` and never change afterwards.

use soroban_sdk::{Address, Env};

/// Patient and organization membership.
///
/// Registered patients and organizations are assumed disjoint.
#[soroban_sdk::contractclient(name = "RegistryClient")]
pub trait Registry {
    fn is_registered_patient(env: Env, who: Address) -> bool;

    fn is_registered_organization(env: Env, who: Address) -> bool;

    /// Category of a registered organization (hospital, research, pharmacy, ...).
    fn organization_category(env: Env, who: Address) -> u32;
}

/// Medical record metadata storage.
#[soroban_sdk::contractclient(name = "RecordStoreClient")]
pub trait RecordStore {
    fn has_record_of_type(env: Env, patient: Address, record_type: u32) -> bool;
}
