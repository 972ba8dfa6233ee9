//! Integration tests for RemoteDataService against a live in-memory server.
//!
//! Each test binds the development server on an ephemeral port and talks to
//! it over HTTP, so the client and the handlers are checked against the same
//! envelope contract.

#[macro_use]
mod storage_harness;

use imob::client::{RemoteDataService, RestClient};
use imob::entities::Corretor;
use imob::server::ServerBuilder;
use storage_harness::*;
use tokio::net::TcpListener;

async fn spawn_remote() -> RemoteDataService<Corretor> {
    let app = ServerBuilder::new()
        .register_in_memory::<Corretor>()
        .build()
        .expect("router builds");
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    let client = RestClient::with_base_url(&format!("http://{}", addr)).expect("client builds");
    RemoteDataService::new(client)
}

data_service_tests!(spawn_remote());

mod remote_specific_tests {
    use super::*;
    use imob::core::service::DataService;
    use imob::entities::ActiveStatus;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_list_with_extra_params_is_accepted() {
        let service = spawn_remote().await;
        let broker = create_test_broker("Maria Silva", "maria@imob.test", &["Batel"]);
        service.create(&tenant(), broker).await.unwrap();

        let mut params = BTreeMap::new();
        params.insert("page_size".to_string(), "50".to_string());
        let rows = service.list_with(&tenant(), &params).await.unwrap();
        assert_count(&rows, 1);
    }

    #[tokio::test]
    async fn test_list_params_narrow_server_results() {
        let service = spawn_remote().await;
        for broker in sample_batch(4) {
            service.create(&tenant(), broker).await.unwrap();
        }

        let mut params = BTreeMap::new();
        params.insert("status".to_string(), "inactive".to_string());
        let rows = service.list_with(&tenant(), &params).await.unwrap();

        assert_count(&rows, 2);
        assert!(rows.iter().all(|b| b.status == ActiveStatus::Inactive));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        let client = RestClient::with_base_url("http://127.0.0.1:9").unwrap();
        let service = RemoteDataService::<Corretor>::new(client);
        assert!(service.list(&tenant()).await.is_err());
    }
}
