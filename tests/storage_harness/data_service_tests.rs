//! Macro-generated test suite for `DataService<Corretor>` contract validation.
//!
//! The `data_service_tests!` macro generates a test module that validates any
//! `DataService<Corretor>` implementation against the full contract: CRUD
//! operations, tenant isolation, pipeline compatibility and concurrent access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use imob::storage::InMemoryDataService;
//!
//! data_service_tests!(async { InMemoryDataService::<Corretor>::new() });
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_and_get`: create then retrieve, verify all fields
//! - `test_get_nonexistent`: get with random UUID returns None
//! - `test_list_empty`: list on empty tenant returns empty vec
//! - `test_list_multiple`: create 5 entities, list returns all 5 in order
//! - `test_update_existing`: mutate fields, verify persisted
//! - `test_update_nonexistent`: update unknown ID returns Err
//! - `test_delete_existing`: delete then get returns None
//! - `test_delete_nonexistent`: delete unknown ID returns Err
//!
//! ## Tenancy
//! - `test_tenant_isolation`: entities never leak across tenants
//! - `test_same_id_in_two_tenants`: partitions are independent
//!
//! ## Edge Cases
//! - `test_create_duplicate_id`: second insert with the same id fails
//! - `test_listed_rows_feed_pipeline`: listed rows run through a ListQuery
//! - `test_concurrent_access`: parallel creates from spawned tasks

/// Generate a full `DataService<Corretor>` conformance test suite.
///
/// `$factory` must be an expression evaluating to a future that resolves to
/// an instance implementing `DataService<Corretor> + Clone + 'static`. It is
/// re-evaluated for each test to ensure isolation.
#[macro_export]
macro_rules! data_service_tests {
    ($factory:expr) => {
        mod data_service_contract_tests {
            use super::*;
            use imob::core::entity::{Data, Entity};
            use imob::core::filter::FilterState;
            use imob::core::query::ListQuery;
            use imob::core::service::DataService;
            use imob::entities::{ActiveStatus, Corretor};
            use uuid::Uuid;

            // ==================================================================
            // CRUD: Create & Get
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let service = $factory.await;
                let tenant = tenant();
                let broker = create_test_broker("Maria Silva", "maria@imob.test", &["Batel"]);
                let id = broker.id;

                let created = service.create(&tenant, broker.clone()).await.unwrap();
                assert_eq!(created.id(), id);
                assert_eq!(created.name(), "Maria Silva");

                let retrieved = service.get(&tenant, &id).await.unwrap().unwrap();
                assert_eq!(retrieved, broker);
                assert_eq!(retrieved.regions, vec!["Batel".to_string()]);
                assert_eq!(retrieved.status(), "active");
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let service = $factory.await;
                let result = service.get(&tenant(), &Uuid::new_v4()).await.unwrap();
                assert!(result.is_none());
            }

            // ==================================================================
            // CRUD: List
            // ==================================================================

            #[tokio::test]
            async fn test_list_empty() {
                let service = $factory.await;
                let all = service.list(&tenant()).await.unwrap();
                assert!(all.is_empty());
            }

            #[tokio::test]
            async fn test_list_multiple() {
                let service = $factory.await;
                let tenant = tenant();
                let batch = sample_batch(5);

                for broker in &batch {
                    service.create(&tenant, broker.clone()).await.unwrap();
                }

                let all = service.list(&tenant).await.unwrap();
                assert_count(&all, 5);

                let names: Vec<&str> = all.iter().map(|b| b.name()).collect();
                assert_eq!(
                    names,
                    vec!["Broker_0", "Broker_1", "Broker_2", "Broker_3", "Broker_4"]
                );
            }

            // ==================================================================
            // CRUD: Update
            // ==================================================================

            #[tokio::test]
            async fn test_update_existing() {
                let service = $factory.await;
                let tenant = tenant();
                let mut broker = create_test_broker("Alice", "alice@imob.test", &[]);
                let id = broker.id;

                service.create(&tenant, broker.clone()).await.unwrap();

                broker.name = "Alice Updated".to_string();
                broker.email = "alice.updated@imob.test".to_string();
                broker.status = ActiveStatus::Inactive;
                broker.touch();

                let updated = service.update(&tenant, &id, broker).await.unwrap();
                assert_eq!(updated.name(), "Alice Updated");
                assert_eq!(updated.email, "alice.updated@imob.test");

                let retrieved = service.get(&tenant, &id).await.unwrap().unwrap();
                assert_eq!(retrieved.name(), "Alice Updated");
                assert_eq!(retrieved.status(), "inactive");
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let service = $factory.await;
                let broker = create_test_broker("Ghost", "ghost@imob.test", &[]);
                let id = broker.id;

                let result = service.update(&tenant(), &id, broker).await;
                assert!(
                    result.is_err(),
                    "Updating a nonexistent entity should return an error"
                );
            }

            // ==================================================================
            // CRUD: Delete
            // ==================================================================

            #[tokio::test]
            async fn test_delete_existing() {
                let service = $factory.await;
                let tenant = tenant();
                let broker = create_test_broker("ToDelete", "delete@imob.test", &[]);
                let id = broker.id;

                service.create(&tenant, broker).await.unwrap();
                assert!(service.get(&tenant, &id).await.unwrap().is_some());

                service.delete(&tenant, &id).await.unwrap();

                assert!(
                    service.get(&tenant, &id).await.unwrap().is_none(),
                    "Entity should be gone after delete"
                );
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let service = $factory.await;
                let result = service.delete(&tenant(), &Uuid::new_v4()).await;
                assert!(result.is_err());
            }

            // ==================================================================
            // Tenancy
            // ==================================================================

            #[tokio::test]
            async fn test_tenant_isolation() {
                let service = $factory.await;
                let broker = create_test_broker("Scoped", "scoped@imob.test", &[]);
                let id = broker.id;

                service.create(&tenant(), broker.clone()).await.unwrap();

                assert!(service.list(&other_tenant()).await.unwrap().is_empty());
                assert!(service.get(&other_tenant(), &id).await.unwrap().is_none());
                assert!(service.update(&other_tenant(), &id, broker).await.is_err());
                assert!(service.delete(&other_tenant(), &id).await.is_err());

                assert_count(&service.list(&tenant()).await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_same_id_in_two_tenants() {
                let service = $factory.await;
                let id = Uuid::new_v4();

                service
                    .create(&tenant(), create_test_broker_with_id(id, "First", "a@imob.test"))
                    .await
                    .unwrap();
                service
                    .create(&other_tenant(), create_test_broker_with_id(id, "Second", "b@imob.test"))
                    .await
                    .unwrap();

                let first = service.get(&tenant(), &id).await.unwrap().unwrap();
                let second = service.get(&other_tenant(), &id).await.unwrap().unwrap();
                assert_eq!(first.name(), "First");
                assert_eq!(second.name(), "Second");
            }

            // ==================================================================
            // Edge cases
            // ==================================================================

            #[tokio::test]
            async fn test_create_duplicate_id() {
                let service = $factory.await;
                let tenant = tenant();
                let id = Uuid::new_v4();

                service
                    .create(&tenant, create_test_broker_with_id(id, "First", "first@imob.test"))
                    .await
                    .unwrap();
                let result = service
                    .create(&tenant, create_test_broker_with_id(id, "Second", "second@imob.test"))
                    .await;
                assert!(result.is_err(), "Duplicate id should be rejected");

                let retrieved = service.get(&tenant, &id).await.unwrap().unwrap();
                assert_eq!(retrieved.name(), "First", "First entity should remain");
            }

            #[tokio::test]
            async fn test_listed_rows_feed_pipeline() {
                let service = $factory.await;
                let tenant = tenant();

                for broker in sample_batch(6) {
                    service.create(&tenant, broker).await.unwrap();
                }

                let rows = service.list(&tenant).await.unwrap();
                let query = ListQuery::default()
                    .with_filters(FilterState::new().with_status("active"))
                    .with_search("broker_");
                let visible = query.run(&rows);

                assert_count(&visible, 3);
                assert!(visible.iter().all(|b| b.status == ActiveStatus::Active));
            }

            /// Concurrent creates from multiple spawned tasks.
            ///
            /// Requires the service to be `Clone + Send + 'static`: clones
            /// share the backing store.
            #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
            async fn test_concurrent_access() {
                let service = $factory.await;
                let s1 = service.clone();
                let s2 = service.clone();

                let e1 = create_test_broker("Concurrent_A", "ca@imob.test", &[]);
                let e2 = create_test_broker("Concurrent_B", "cb@imob.test", &[]);
                let id1 = e1.id;
                let id2 = e2.id;

                let h1 = tokio::spawn(async move { s1.create(&tenant(), e1).await });
                let h2 = tokio::spawn(async move { s2.create(&tenant(), e2).await });

                let (r1, r2) = tokio::time::timeout(std::time::Duration::from_secs(30), async {
                    tokio::try_join!(h1, h2).unwrap()
                })
                .await
                .expect("Concurrent creates timed out after 30s");

                r1.unwrap();
                r2.unwrap();

                let all: Vec<Corretor> = service.list(&tenant()).await.unwrap();
                assert_count(&all, 2);

                let ids: Vec<Uuid> = all.iter().map(|e| e.id()).collect();
                assert!(ids.contains(&id1), "Entity A should be present");
                assert!(ids.contains(&id2), "Entity B should be present");
            }
        }
    };
}
