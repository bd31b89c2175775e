#![no_std]

pub mod access;
pub mod collaborators;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod listings;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

use soroban_sdk::{
    contract, contractimpl, contracttype, log, symbol_short, token, Address, Env, IntoVal,
    Symbol, Val, Vec,
};

pub use access::CallerRole;
pub use errors::{ContractError, ErrorCategory};
pub use listings::Listing;

use collaborators::{RecordStoreClient, RegistryClient};

// ── Storage key constants ────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");
const INITIALIZED: Symbol = symbol_short!("INIT");

pub(crate) const TTL_THRESHOLD: u32 = 5184000;
pub(crate) const TTL_EXTEND_TO: u32 = 10368000;

/// Keeps the config, totals and listing counter alive.
pub(crate) fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub(crate) fn extend_persistent_ttl<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Types ────────────────────────────────────────────────────────────────────

/// Fixed marketplace configuration, written once by `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketConfig {
    /// The single administrative identity ("owner").
    pub admin: Address,
    /// Stellar asset contract holding deposited value.
    pub payment_token: Address,
    /// Patient/organization registry contract.
    pub registry: Address,
    /// Medical record store contract.
    pub record_store: Address,
    pub credit_per_unit: i128,
    pub unit_size: i128,
    pub return_fee: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct MarketplaceContract;

#[contractimpl]
impl MarketplaceContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Wire the marketplace to its collaborators.
    ///
    /// * `admin`         – the owner account; may hold credit like any participant.
    /// * `payment_token` – SAC address of the asset deposited for credit.
    /// * `registry`      – patient/organization registry contract.
    /// * `record_store`  – record store contract answering `has_record_of_type`.
    ///
    /// Collaborator handles are fixed from here on.
    pub fn initialize(
        env: Env,
        admin: Address,
        payment_token: Address,
        registry: Address,
        record_store: Address,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        let config = MarketConfig {
            admin: admin.clone(),
            payment_token: payment_token.clone(),
            registry: registry.clone(),
            record_store: record_store.clone(),
            credit_per_unit: ledger::CREDIT_PER_UNIT,
            unit_size: ledger::UNIT_SIZE,
            return_fee: ledger::RETURN_FEE,
        };

        env.storage().instance().set(&CONFIG, &config);
        env.storage().instance().set(&INITIALIZED, &true);
        extend_instance_ttl(&env);

        events::publish_initialized(&env, admin, payment_token, registry, record_store);

        Ok(())
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        Ok(Self::load_config(&env)?.admin)
    }

    pub fn get_config(env: Env) -> Result<MarketConfig, ContractError> {
        Self::load_config(&env)
    }

    // ── Credit ledger ───────────────────────────────────────────────────────

    /// Convert `deposit` stroops of the payment token into credit.
    ///
    /// Only whole credits are bought; the stroops that would not make up a
    /// whole credit stay with the caller. Returns the caller's new balance.
    pub fn acquire_credit(env: Env, caller: Address, deposit: i128) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        extend_instance_ttl(&env);
        caller.require_auth();
        access::require_participant(&env, &config, &caller)?;

        if deposit <= 0 {
            return Err(ContractError::InvalidInput);
        }
        let credit = ledger::credit_for_deposit(&config, deposit);
        if credit == 0 {
            return Err(ContractError::InvalidInput);
        }
        let charged = ledger::value_for_credit(&config, credit)?;

        let new_balance = ledger::credit(&env, &caller, credit)?;
        ledger::record_issued(&env, credit)?;

        token::Client::new(&env, &config.payment_token).transfer(
            &caller,
            &env.current_contract_address(),
            &charged,
        );

        log!(&env, "credit acquired", caller.clone(), credit);
        events::publish_credit_acquired(&env, caller, charged, credit, new_balance);

        Ok(new_balance)
    }

    /// Credit balance of any account, the marketplace's own included.
    /// Unseen accounts hold zero.
    pub fn check_credit(env: Env, account: Address) -> i128 {
        ledger::balance_of(&env, &account)
    }

    /// Return the caller's entire balance for payment-token value.
    ///
    /// The fixed fee moves to the marketplace's own balance and the rest is
    /// paid out. Fails with `NoCredit` on an empty balance and with
    /// `InsufficientCredit` when the balance cannot cover the fee.
    /// Returns the payout in stroops.
    pub fn return_credit(env: Env, caller: Address) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        extend_instance_ttl(&env);
        caller.require_auth();
        access::require_participant(&env, &config, &caller)?;

        let balance = ledger::balance_of(&env, &caller);
        if balance == 0 {
            return Err(ContractError::NoCredit);
        }
        if balance < config.return_fee {
            return Err(ContractError::InsufficientCredit);
        }

        let returned = balance - config.return_fee;
        let payout = ledger::value_for_credit(&config, returned)?;

        ledger::drain(&env, &caller);
        ledger::credit(&env, &env.current_contract_address(), config.return_fee)?;
        ledger::record_redeemed(&env, returned)?;

        if payout > 0 {
            token::Client::new(&env, &config.payment_token).transfer(
                &env.current_contract_address(),
                &caller,
                &payout,
            );
        }

        log!(&env, "credit returned", caller.clone(), balance);
        events::publish_credit_returned(&env, caller, balance, config.return_fee, payout);

        Ok(payout)
    }

    pub fn get_total_issued(env: Env) -> i128 {
        ledger::total_issued(&env)
    }

    pub fn get_total_redeemed(env: Env) -> i128 {
        ledger::total_redeemed(&env)
    }

    /// Payment-token stroops backing one credit.
    pub fn get_exchange_rate(env: Env) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        Ok(ledger::value_per_credit(&config))
    }

    pub fn get_return_fee(env: Env) -> Result<i128, ContractError> {
        Ok(Self::load_config(&env)?.return_fee)
    }

    // ── Listings ────────────────────────────────────────────────────────────

    /// Publish a listing for some of the caller's record types.
    ///
    /// Patients only. Record types without a stored record are dropped; the
    /// call fails with `NoMatchingRecords` when none are left.
    pub fn add_listing(
        env: Env,
        caller: Address,
        price_per_day: i128,
        record_types: Vec<u32>,
        allow_organization_types: Vec<u32>,
    ) -> Result<u64, ContractError> {
        let config = Self::load_config(&env)?;
        extend_instance_ttl(&env);
        caller.require_auth();
        access::require_role(&env, &config, &caller, CallerRole::Patient)?;

        if record_types.is_empty() {
            return Err(ContractError::InvalidInput);
        }
        if price_per_day <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let records = RecordStoreClient::new(&env, &config.record_store);
        let mut matched = Vec::new(&env);
        for record_type in listings::dedup(&env, &record_types).iter() {
            if records.has_record_of_type(&caller, &record_type) {
                matched.push_back(record_type);
            }
        }
        if matched.is_empty() {
            return Err(ContractError::NoMatchingRecords);
        }

        let listing = Listing {
            id: listings::next_listing_id(&env),
            owner: caller,
            price_per_day,
            record_types: matched,
            allow_organization_types: listings::dedup(&env, &allow_organization_types),
            created_at: env.ledger().timestamp(),
        };
        listings::store_listing(&env, &listing);

        events::publish_listing_added(
            &env,
            listing.id,
            listing.owner.clone(),
            listing.record_types.clone(),
            listing.allow_organization_types.clone(),
            listing.price_per_day,
        );

        Ok(listing.id)
    }

    /// Delete a listing. Existence is checked before ownership, so removing
    /// the same id twice always ends in `NotFound`.
    pub fn remove_listing(env: Env, caller: Address, listing_id: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        extend_instance_ttl(&env);
        caller.require_auth();

        let listing = listings::get_listing(&env, listing_id).ok_or(ContractError::NotFound)?;
        if listing.owner != caller {
            log!(&env, "rejected listing removal", caller, listing_id);
            return Err(ContractError::Unauthorized);
        }

        listings::delete_listing(&env, &listing);

        events::publish_listing_removed(&env, listing_id, listing.owner);

        Ok(())
    }

    pub fn get_listing_details(env: Env, listing_id: u64) -> Result<Listing, ContractError> {
        listings::get_listing(&env, listing_id).ok_or(ContractError::NotFound)
    }

    pub fn get_patient_listings(env: Env, patient: Address) -> Vec<u64> {
        listings::patient_listings(&env, &patient)
    }

    pub fn get_listing_count(env: Env) -> u64 {
        listings::listing_count(&env)
    }

    /// Buy `duration_days` of access to a listing's record types.
    ///
    /// Organizations whose category the listing allows only. The cost
    /// `price_per_day * duration_days` moves from the buyer's balance to the
    /// listing owner's. Returns the grant's expiry timestamp.
    pub fn buy_listing(
        env: Env,
        caller: Address,
        listing_id: u64,
        duration_days: u32,
    ) -> Result<u64, ContractError> {
        let config = Self::load_config(&env)?;
        extend_instance_ttl(&env);
        caller.require_auth();
        access::require_role(&env, &config, &caller, CallerRole::Organization)?;

        let listing = listings::get_listing(&env, listing_id).ok_or(ContractError::NotFound)?;
        if duration_days == 0 {
            return Err(ContractError::InvalidInput);
        }

        let category = RegistryClient::new(&env, &config.registry).organization_category(&caller);
        if !listing.allows_category(category) {
            log!(&env, "organization category not allowed", caller, category);
            return Err(ContractError::Unauthorized);
        }

        let cost = listing
            .price_per_day
            .checked_mul(duration_days as i128)
            .ok_or(ContractError::InvalidInput)?;

        ledger::debit(&env, &caller, cost)?;
        ledger::credit(&env, &listing.owner, cost)?;

        let expires_at = listings::extend_grant(&env, listing_id, &caller, duration_days);

        events::publish_access_granted(
            &env,
            listing_id,
            caller,
            listing.owner,
            listing.record_types,
            cost,
            expires_at,
        );

        Ok(expires_at)
    }

    pub fn get_access_expiry(env: Env, listing_id: u64, buyer: Address) -> Option<u64> {
        listings::grant_expiry(&env, listing_id, &buyer)
    }

    /// Whether `buyer` holds an unexpired grant on `listing_id`.
    pub fn has_access(env: Env, listing_id: u64, buyer: Address) -> bool {
        match listings::grant_expiry(&env, listing_id, &buyer) {
            Some(expires_at) => env.ledger().timestamp() < expires_at,
            None => false,
        }
    }

    // ── Access control ──────────────────────────────────────────────────────

    /// How the marketplace currently classifies `account`.
    pub fn get_caller_role(env: Env, account: Address) -> Result<CallerRole, ContractError> {
        let config = Self::load_config(&env)?;
        Ok(access::classify(&env, &config, &account))
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn load_config(env: &Env) -> Result<MarketConfig, ContractError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_listings;
