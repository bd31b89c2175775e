#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects
)]
extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Ledger as _},
    vec, Address, IntoVal, TryIntoVal, Val, Vec,
};

use crate::events::{AccessGrantedEvent, ListingAddedEvent, ListingRemovedEvent};
use crate::ledger::UNIT_SIZE;
use crate::listings::SECONDS_PER_DAY;
use crate::test::{all_events, fund, new_organization, new_patient, setup, Fixture};
use crate::ContractError;

const HOSPITAL: u32 = 0;
const RESEARCH: u32 = 1;
const PHARMACY: u32 = 2;

/// Registers a patient holding records of type 0 and 1.
fn patient_with_records(f: &Fixture) -> Address {
    let patient = new_patient(f);
    f.records.add_record(&patient, &0);
    f.records.add_record(&patient, &1);
    patient
}

/// Topics and payload of the most recent contract event.
fn last_event(f: &Fixture) -> (Vec<Val>, Val) {
    let events: Vec<(Address, Vec<Val>, Val)> = all_events(&f.env);
    assert!(!events.is_empty());
    let event = events.get(events.len() - 1).unwrap();
    assert_eq!(event.0, f.client.address);
    (event.1, event.2)
}

// ── add_listing ──────────────────────────────────────────────────────────────

#[test]
fn test_add_listing_returns_first_id_and_stores_details() {
    let f = setup();
    let patient = patient_with_records(&f);

    f.env.ledger().set_timestamp(1_000);
    let id = f.client.add_listing(
        &patient,
        &1,
        &vec![&f.env, 0u32],
        &vec![&f.env, HOSPITAL],
    );
    assert_eq!(id, 1);

    let listing = f.client.get_listing_details(&id);
    assert_eq!(listing.id, 1);
    assert_eq!(listing.owner, patient);
    assert_eq!(listing.price_per_day, 1);
    assert_eq!(listing.record_types, vec![&f.env, 0u32]);
    assert_eq!(listing.allow_organization_types, vec![&f.env, HOSPITAL]);
    assert_eq!(listing.created_at, 1_000);

    assert_eq!(f.client.get_patient_listings(&patient), vec![&f.env, 1u64]);
    assert_eq!(f.client.get_listing_count(), 1);
}

#[test]
fn test_add_listing_by_non_patient_fails() {
    let f = setup();
    let org = new_organization(&f, HOSPITAL);
    let stranger = Address::generate(&f.env);

    for caller in [&f.admin, &org, &stranger] {
        let result = f.client.try_add_listing(
            caller,
            &1,
            &vec![&f.env, 0u32],
            &vec![&f.env, HOSPITAL],
        );
        assert_eq!(result, Err(Ok(ContractError::Unauthorized)));
    }
    assert_eq!(f.client.get_listing_count(), 0);
}

#[test]
fn test_add_listing_without_record_types_fails() {
    let f = setup();
    let patient = patient_with_records(&f);

    let result =
        f.client
            .try_add_listing(&patient, &1, &Vec::new(&f.env), &vec![&f.env, HOSPITAL]);
    assert_eq!(result, Err(Ok(ContractError::InvalidInput)));
}

#[test]
fn test_add_listing_non_positive_price_fails() {
    let f = setup();
    let patient = patient_with_records(&f);

    for price in [0i128, -5] {
        let result = f.client.try_add_listing(
            &patient,
            &price,
            &vec![&f.env, 0u32],
            &vec![&f.env, HOSPITAL],
        );
        assert_eq!(result, Err(Ok(ContractError::InvalidInput)));
    }
}

#[test]
fn test_add_listing_without_matching_records_fails() {
    let f = setup();
    let patient = patient_with_records(&f);

    let result = f.client.try_add_listing(
        &patient,
        &1,
        &vec![&f.env, 4u32],
        &vec![&f.env, HOSPITAL],
    );
    assert_eq!(result, Err(Ok(ContractError::NoMatchingRecords)));
    assert_eq!(f.client.get_listing_count(), 0);
}

#[test]
fn test_add_listing_drops_unmatched_and_duplicate_types() {
    let f = setup();
    let patient = patient_with_records(&f);

    let id = f.client.add_listing(
        &patient,
        &3,
        &vec![&f.env, 1u32, 4, 0, 1],
        &vec![&f.env, RESEARCH, RESEARCH, PHARMACY],
    );

    let listing = f.client.get_listing_details(&id);
    assert_eq!(listing.record_types, vec![&f.env, 1u32, 0]);
    assert_eq!(listing.allow_organization_types, vec![&f.env, RESEARCH, PHARMACY]);
}

#[test]
fn test_listing_ids_increase_across_patients() {
    let f = setup();
    let alice = patient_with_records(&f);
    let bob = patient_with_records(&f);
    let types = vec![&f.env, 0u32];
    let allow = vec![&f.env, HOSPITAL];

    assert_eq!(f.client.add_listing(&alice, &1, &types, &allow), 1);
    assert_eq!(f.client.add_listing(&bob, &1, &types, &allow), 2);
    assert_eq!(f.client.add_listing(&alice, &1, &types, &allow), 3);

    assert_eq!(f.client.get_patient_listings(&alice), vec![&f.env, 1u64, 3]);
    assert_eq!(f.client.get_patient_listings(&bob), vec![&f.env, 2u64]);
}

// ── get_listing_details ─────────────────────────────────────────────────────

#[test]
fn test_get_missing_listing_is_not_found() {
    let f = setup();
    assert_eq!(
        f.client.try_get_listing_details(&1),
        Err(Ok(ContractError::NotFound))
    );
}

// ── remove_listing ───────────────────────────────────────────────────────────

#[test]
fn test_remove_listing_lifecycle() {
    let f = setup();
    let patient = patient_with_records(&f);
    let stranger = Address::generate(&f.env);

    let id = f.client.add_listing(
        &patient,
        &1,
        &vec![&f.env, 0u32],
        &vec![&f.env, HOSPITAL],
    );

    // Never issued.
    assert_eq!(
        f.client.try_remove_listing(&stranger, &2),
        Err(Ok(ContractError::NotFound))
    );
    // Exists, wrong caller.
    assert_eq!(
        f.client.try_remove_listing(&stranger, &id),
        Err(Ok(ContractError::Unauthorized))
    );

    f.client.remove_listing(&patient, &id);

    assert_eq!(
        f.client.try_get_listing_details(&id),
        Err(Ok(ContractError::NotFound))
    );
    assert!(f.client.get_patient_listings(&patient).is_empty());

    // Already removed: existence is checked before ownership.
    assert_eq!(
        f.client.try_remove_listing(&stranger, &id),
        Err(Ok(ContractError::NotFound))
    );
    assert_eq!(
        f.client.try_remove_listing(&patient, &id),
        Err(Ok(ContractError::NotFound))
    );
}

#[test]
fn test_removed_ids_are_never_reused() {
    let f = setup();
    let patient = patient_with_records(&f);
    let types = vec![&f.env, 0u32];
    let allow = vec![&f.env, HOSPITAL];

    let first = f.client.add_listing(&patient, &1, &types, &allow);
    f.client.remove_listing(&patient, &first);
    let second = f.client.add_listing(&patient, &1, &types, &allow);

    assert_eq!(second, first + 1);
    assert_eq!(f.client.get_patient_listings(&patient), vec![&f.env, second]);
}

// ── buy_listing ──────────────────────────────────────────────────────────────

#[test]
fn test_buy_listing_moves_credit_and_grants_access() {
    let f = setup();
    let patient = patient_with_records(&f);
    let org = new_organization(&f, RESEARCH);

    let id = f.client.add_listing(
        &patient,
        &5,
        &vec![&f.env, 0u32, 1],
        &vec![&f.env, RESEARCH],
    );
    f.client.acquire_credit(&org, &UNIT_SIZE);

    f.env.ledger().set_timestamp(10_000);
    let expires_at = f.client.buy_listing(&org, &id, &3);

    assert_eq!(expires_at, 10_000 + 3 * SECONDS_PER_DAY);
    assert_eq!(f.client.check_credit(&org), 85);
    assert_eq!(f.client.check_credit(&patient), 15);
    assert_eq!(f.client.get_access_expiry(&id, &org), Some(expires_at));
    assert!(f.client.has_access(&id, &org));

    f.env.ledger().set_timestamp(expires_at);
    assert!(!f.client.has_access(&id, &org));
}

#[test]
fn test_buy_listing_extends_running_grant() {
    let f = setup();
    let patient = patient_with_records(&f);
    let org = new_organization(&f, RESEARCH);

    let id = f.client.add_listing(
        &patient,
        &1,
        &vec![&f.env, 0u32],
        &vec![&f.env, RESEARCH],
    );
    f.client.acquire_credit(&org, &UNIT_SIZE);

    f.env.ledger().set_timestamp(0);
    let first = f.client.buy_listing(&org, &id, &1);
    f.env.ledger().set_timestamp(first / 2);
    let second = f.client.buy_listing(&org, &id, &2);

    assert_eq!(second, 3 * SECONDS_PER_DAY);
}

#[test]
fn test_buy_listing_requires_organization() {
    let f = setup();
    let patient = patient_with_records(&f);
    let other_patient = new_patient(&f);
    let id = f.client.add_listing(
        &patient,
        &1,
        &vec![&f.env, 0u32],
        &vec![&f.env, HOSPITAL],
    );
    fund(&f, &f.admin, 1);
    f.client.acquire_credit(&f.admin, &UNIT_SIZE);
    f.client.acquire_credit(&other_patient, &UNIT_SIZE);

    for caller in [&f.admin, &other_patient] {
        assert_eq!(
            f.client.try_buy_listing(caller, &id, &1),
            Err(Ok(ContractError::Unauthorized))
        );
    }
}

#[test]
fn test_buy_listing_rejects_disallowed_category() {
    let f = setup();
    let patient = patient_with_records(&f);
    let pharmacy = new_organization(&f, PHARMACY);

    let id = f.client.add_listing(
        &patient,
        &1,
        &vec![&f.env, 0u32],
        &vec![&f.env, HOSPITAL, RESEARCH],
    );
    f.client.acquire_credit(&pharmacy, &UNIT_SIZE);

    assert_eq!(
        f.client.try_buy_listing(&pharmacy, &id, &1),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(f.client.check_credit(&pharmacy), 100);
    assert_eq!(f.client.get_access_expiry(&id, &pharmacy), None);
}

#[test]
fn test_buy_listing_with_insufficient_credit_fails() {
    let f = setup();
    let patient = patient_with_records(&f);
    let org = new_organization(&f, HOSPITAL);

    let id = f.client.add_listing(
        &patient,
        &60,
        &vec![&f.env, 0u32],
        &vec![&f.env, HOSPITAL],
    );
    f.client.acquire_credit(&org, &UNIT_SIZE);

    assert_eq!(
        f.client.try_buy_listing(&org, &id, &2),
        Err(Ok(ContractError::InsufficientCredit))
    );
    assert_eq!(f.client.check_credit(&org), 100);
    assert_eq!(f.client.check_credit(&patient), 0);
}

#[test]
fn test_buy_listing_missing_or_zero_duration_fails() {
    let f = setup();
    let patient = patient_with_records(&f);
    let org = new_organization(&f, HOSPITAL);
    let id = f.client.add_listing(
        &patient,
        &1,
        &vec![&f.env, 0u32],
        &vec![&f.env, HOSPITAL],
    );
    f.client.acquire_credit(&org, &UNIT_SIZE);

    assert_eq!(
        f.client.try_buy_listing(&org, &(id + 1), &1),
        Err(Ok(ContractError::NotFound))
    );
    assert_eq!(
        f.client.try_buy_listing(&org, &id, &0),
        Err(Ok(ContractError::InvalidInput))
    );
}

#[test]
fn test_removed_listing_cannot_be_bought() {
    let f = setup();
    let patient = patient_with_records(&f);
    let org = new_organization(&f, HOSPITAL);
    let id = f.client.add_listing(
        &patient,
        &1,
        &vec![&f.env, 0u32],
        &vec![&f.env, HOSPITAL],
    );
    f.client.acquire_credit(&org, &UNIT_SIZE);
    f.client.remove_listing(&patient, &id);

    assert_eq!(
        f.client.try_buy_listing(&org, &id, &1),
        Err(Ok(ContractError::NotFound))
    );
}

// ── Events ───────────────────────────────────────────────────────────────────

#[test]
fn test_add_listing_publishes_listing_added() {
    let f = setup();
    let patient = patient_with_records(&f);

    f.env.ledger().set_timestamp(500);
    let id = f.client.add_listing(
        &patient,
        &7,
        &vec![&f.env, 1u32, 0],
        &vec![&f.env, HOSPITAL, RESEARCH],
    );

    let (topics, data) = last_event(&f);
    assert_eq!(
        topics,
        (symbol_short!("LST_ADD"), patient.clone()).into_val(&f.env)
    );
    let payload: ListingAddedEvent = data.try_into_val(&f.env).unwrap();
    assert_eq!(payload.listing_id, id);
    assert_eq!(payload.owner, patient);
    assert_eq!(payload.record_types, vec![&f.env, 1u32, 0]);
    assert_eq!(
        payload.allow_organization_types,
        vec![&f.env, HOSPITAL, RESEARCH]
    );
    assert_eq!(payload.price_per_day, 7);
    assert_eq!(payload.timestamp, 500);
}

#[test]
fn test_remove_listing_publishes_listing_removed() {
    let f = setup();
    let patient = patient_with_records(&f);
    let id = f.client.add_listing(
        &patient,
        &1,
        &vec![&f.env, 0u32],
        &vec![&f.env, HOSPITAL],
    );

    f.client.remove_listing(&patient, &id);

    let (topics, data) = last_event(&f);
    assert_eq!(
        topics,
        (symbol_short!("LST_REM"), patient.clone()).into_val(&f.env)
    );
    let payload: ListingRemovedEvent = data.try_into_val(&f.env).unwrap();
    assert_eq!(payload.listing_id, id);
    assert_eq!(payload.owner, patient);
}

#[test]
fn test_buy_listing_publishes_access_granted() {
    let f = setup();
    let patient = patient_with_records(&f);
    let org = new_organization(&f, RESEARCH);
    let id = f.client.add_listing(
        &patient,
        &4,
        &vec![&f.env, 0u32, 1],
        &vec![&f.env, RESEARCH],
    );
    f.client.acquire_credit(&org, &UNIT_SIZE);

    f.env.ledger().set_timestamp(2_000);
    let expires_at = f.client.buy_listing(&org, &id, &2);

    let (topics, data) = last_event(&f);
    assert_eq!(
        topics,
        (symbol_short!("ACC_GRT"), id, org.clone()).into_val(&f.env)
    );
    let payload: AccessGrantedEvent = data.try_into_val(&f.env).unwrap();
    assert_eq!(payload.listing_id, id);
    assert_eq!(payload.buyer, org);
    assert_eq!(payload.patient, patient);
    assert_eq!(payload.record_types, vec![&f.env, 0u32, 1]);
    assert_eq!(payload.cost, 8);
    assert_eq!(payload.expires_at, expires_at);
    assert_eq!(payload.expires_at, 2_000 + 2 * SECONDS_PER_DAY);
}
