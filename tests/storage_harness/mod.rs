//! Shared test harness for data service testing
//!
//! Provides tenant helpers, broker fixtures and the `data_service_tests!`
//! conformance suite run against every `DataService<Corretor>` backend.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod data_service_tests;

use imob::core::field::FieldValue;
use imob::core::tenant::RealEstateId;
use imob::entities::{ActiveStatus, Corretor};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Tenants
// ---------------------------------------------------------------------------

/// The tenant most tests run under
pub fn tenant() -> RealEstateId {
    RealEstateId::new("re-test").expect("non-blank tenant")
}

/// A second tenant for isolation checks
pub fn other_tenant() -> RealEstateId {
    RealEstateId::new("re-other").expect("non-blank tenant")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create an active broker with a derived phone and CRECI
pub fn create_test_broker(name: &str, email: &str, regions: &[&str]) -> Corretor {
    Corretor::new(
        name,
        ActiveStatus::Active,
        email.to_string(),
        "(41) 99999-0000".to_string(),
        format!("{}-F", 10_000 + name.len()),
        vec!["residencial".to_string()],
        regions.iter().map(|r| r.to_string()).collect(),
    )
}

/// Create a broker with a fixed id
pub fn create_test_broker_with_id(id: Uuid, name: &str, email: &str) -> Corretor {
    let mut broker = create_test_broker(name, email, &[]);
    broker.id = id;
    broker
}

/// `n` brokers named `Broker_0`..`Broker_{n-1}`, even ones inactive
pub fn sample_batch(n: usize) -> Vec<Corretor> {
    (0..n)
        .map(|i| {
            let mut broker = create_test_broker(
                &format!("Broker_{}", i),
                &format!("broker{}@imob.test", i),
                &["Batel"],
            );
            if i % 2 == 0 {
                broker.status = ActiveStatus::Inactive;
            }
            broker
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Assertion helpers
// ---------------------------------------------------------------------------

/// Assert the list has the expected number of items
pub fn assert_count<T>(list: &[T], expected: usize) {
    assert_eq!(
        list.len(),
        expected,
        "Expected {} items, got {}",
        expected,
        list.len()
    );
}

/// Assert a field value is the expected text
pub fn assert_field_value_string(fv: &FieldValue, expected: &str) {
    match fv {
        FieldValue::String(s) => assert_eq!(s, expected),
        other => panic!("Expected FieldValue::String, got {:?}", other),
    }
}
