//! Caller classification.
//!
//! Roles are never stored by the marketplace: the owner is the configured
//! admin and patient/organization membership is looked up in the registry
//! on every call.

use soroban_sdk::{contracttype, log, Address, Env};

use crate::collaborators::RegistryClient;
use crate::errors::ContractError;
use crate::MarketConfig;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum CallerRole {
    Unknown = 0,
    Owner = 1,
    Patient = 2,
    Organization = 3,
}

impl CallerRole {
    /// Owner, patient or organization: anyone allowed to hold credit.
    pub fn is_participant(&self) -> bool {
        !matches!(self, CallerRole::Unknown)
    }
}

/// Owner first, then the patient registry, then the organization registry.
pub fn classify(env: &Env, config: &MarketConfig, who: &Address) -> CallerRole {
    if *who == config.admin {
        return CallerRole::Owner;
    }

    let registry = RegistryClient::new(env, &config.registry);
    if registry.is_registered_patient(who) {
        CallerRole::Patient
    } else if registry.is_registered_organization(who) {
        CallerRole::Organization
    } else {
        CallerRole::Unknown
    }
}

/// Guard for ledger operations open to every classified participant.
pub fn require_participant(
    env: &Env,
    config: &MarketConfig,
    who: &Address,
) -> Result<CallerRole, ContractError> {
    let role = classify(env, config, who);
    if !role.is_participant() {
        log!(env, "rejected unclassified caller", who.clone());
        return Err(ContractError::Unauthorized);
    }
    Ok(role)
}

/// Guard for operations restricted to exactly one role.
pub fn require_role(
    env: &Env,
    config: &MarketConfig,
    who: &Address,
    required: CallerRole,
) -> Result<(), ContractError> {
    let role = classify(env, config, who);
    if role != required {
        log!(
            env,
            "rejected caller role",
            who.clone(),
            role as u32,
            required as u32
        );
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}
