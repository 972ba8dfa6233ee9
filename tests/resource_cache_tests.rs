//! Entity resources sharing one query cache
//!
//! Covers request deduplication across resources, tenant partitioning,
//! invalidation after mutations and stale responses arriving late.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use imob::cache::{CacheKey, CacheTag, QueryCache};
use imob::core::filter::FilterState;
use imob::core::query::ListQuery;
use imob::core::service::DataService;
use imob::core::tenant::RealEstateId;
use imob::entities::{ActiveStatus, Comissao};
use imob::resource::EntityResource;
use imob::storage::InMemoryDataService;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// In-memory service that counts list calls and can be switched offline
///
/// `delay` is spent before reading the store, `lag` after it, so a lagging
/// list answers with the rows present when it started.
#[derive(Clone, Default)]
struct CountingService {
    inner: InMemoryDataService<Comissao>,
    lists: Arc<AtomicUsize>,
    last_params: Arc<Mutex<Option<BTreeMap<String, String>>>>,
    offline: Arc<AtomicBool>,
    delay: Duration,
    lag: Duration,
}

impl CountingService {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    fn with_lag(lag: Duration) -> Self {
        Self {
            lag,
            ..Self::default()
        }
    }

    fn list_calls(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    fn last_params(&self) -> Option<BTreeMap<String, String>> {
        self.last_params.lock().unwrap().clone()
    }

    fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl DataService<Comissao> for CountingService {
    async fn list(&self, tenant: &RealEstateId) -> Result<Vec<Comissao>> {
        self.list_with(tenant, &BTreeMap::new()).await
    }

    async fn list_with(
        &self,
        tenant: &RealEstateId,
        params: &BTreeMap<String, String>,
    ) -> Result<Vec<Comissao>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock().unwrap() = Some(params.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(anyhow!("connection refused"));
        }
        let rows = self.inner.list_with(tenant, params).await?;
        if !self.lag.is_zero() {
            tokio::time::sleep(self.lag).await;
        }
        Ok(rows)
    }

    async fn get(&self, tenant: &RealEstateId, id: &Uuid) -> Result<Option<Comissao>> {
        self.inner.get(tenant, id).await
    }

    async fn create(&self, tenant: &RealEstateId, entity: Comissao) -> Result<Comissao> {
        self.inner.create(tenant, entity).await
    }

    async fn update(&self, tenant: &RealEstateId, id: &Uuid, entity: Comissao) -> Result<Comissao> {
        self.inner.update(tenant, id, entity).await
    }

    async fn delete(&self, tenant: &RealEstateId, id: &Uuid) -> Result<()> {
        self.inner.delete(tenant, id).await
    }
}

fn tenant(id: &str) -> RealEstateId {
    RealEstateId::new(id).unwrap()
}

fn rule(name: &str, percentual: f64) -> Comissao {
    Comissao::new(
        name,
        ActiveStatus::Active,
        String::new(),
        percentual,
        None,
        vec!["Maria Silva".into()],
    )
}

fn resource(
    service: &CountingService,
    cache: &Arc<QueryCache>,
    tenant_id: &str,
) -> EntityResource<Comissao> {
    EntityResource::new(Arc::new(service.clone()), Arc::clone(cache), tenant(tenant_id))
}

#[tokio::test]
async fn test_concurrent_identical_loads_share_one_fetch() {
    let service = CountingService::with_delay(Duration::from_millis(20));
    service.create(&tenant("re-1"), rule("Venda", 6.0)).await.unwrap();
    let cache = Arc::new(QueryCache::new(Duration::from_secs(60)));

    let resources: Vec<_> = (0..5).map(|_| resource(&service, &cache, "re-1")).collect();
    let results = futures::future::join_all(resources.iter().map(|r| r.load())).await;

    assert!(results.iter().all(|r| r.as_ref().map(Vec::len).ok() == Some(1)));
    assert_eq!(service.list_calls(), 1);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_tenants_never_share_entries() {
    let service = CountingService::default();
    service.create(&tenant("re-1"), rule("Venda", 6.0)).await.unwrap();
    let cache = Arc::new(QueryCache::new(Duration::from_secs(60)));

    let first = resource(&service, &cache, "re-1").load().await.unwrap();
    let second = resource(&service, &cache, "re-2").load().await.unwrap();

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(service.list_calls(), 2);
}

#[tokio::test]
async fn test_query_params_are_part_of_the_key() {
    let service = CountingService::default();
    let mut archived = rule("Antiga", 4.0);
    archived.status = ActiveStatus::Inactive;
    service.create(&tenant("re-1"), rule("Venda", 6.0)).await.unwrap();
    service.create(&tenant("re-1"), archived).await.unwrap();
    let cache = Arc::new(QueryCache::new(Duration::from_secs(60)));

    let all = resource(&service, &cache, "re-1").load().await.unwrap();
    assert_eq!(service.last_params(), Some(BTreeMap::new()));

    let active = resource(&service, &cache, "re-1")
        .with_param("status", "active")
        .load()
        .await
        .unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Venda");
    assert_eq!(
        service.last_params(),
        Some(BTreeMap::from([("status".to_string(), "active".to_string())]))
    );
    assert_eq!(service.list_calls(), 2);
    assert_eq!(
        cache.invalidate_tag(&CacheTag::entity_tenant("comissoes", tenant("re-1"))),
        2
    );
}

#[tokio::test]
async fn test_mutation_invalidates_other_views_of_same_tenant() {
    let service = CountingService::default();
    let cache = Arc::new(QueryCache::new(Duration::from_secs(60)));
    let editor = resource(&service, &cache, "re-1");
    let list_view = resource(&service, &cache, "re-1");
    let other_tenant = resource(&service, &cache, "re-2");

    list_view.load().await.unwrap();
    other_tenant.load().await.unwrap();
    assert_eq!(service.list_calls(), 2);

    editor.create(rule("Captação", 2.0)).await.unwrap();

    let refreshed = list_view.load().await.unwrap();
    assert_eq!(refreshed.len(), 1);
    assert_eq!(service.list_calls(), 3);

    other_tenant.load().await.unwrap();
    assert_eq!(service.list_calls(), 3, "other tenant stays cached");
}

#[tokio::test]
async fn test_load_overtaken_by_mutation_keeps_mutated_data() {
    let service = CountingService::with_lag(Duration::from_millis(50));
    let cache = Arc::new(QueryCache::new(Duration::from_secs(60)));
    let view = resource(&service, &cache, "re-1");

    let (loaded, created) = tokio::join!(view.load(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        view.create(rule("Nova", 3.0)).await
    });
    let created = created.unwrap();

    assert_eq!(loaded.unwrap(), vec![created.clone()]);
    let state = view.state();
    assert_eq!(state.data, Some(vec![created]));
    assert!(!state.loading && !state.is_validating);

    let reloaded = view.load().await.unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(service.list_calls(), 2, "stale response was not cached");
}

#[tokio::test]
async fn test_dedupe_window_expires() {
    let service = CountingService::default();
    let cache = Arc::new(QueryCache::new(Duration::from_millis(10)));
    let view = resource(&service, &cache, "re-1");

    view.load().await.unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    view.load().await.unwrap();

    assert_eq!(service.list_calls(), 2);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_data() {
    let service = CountingService::default();
    service.create(&tenant("re-1"), rule("Venda", 6.0)).await.unwrap();
    let cache = Arc::new(QueryCache::new(Duration::from_secs(60)));
    let view = resource(&service, &cache, "re-1");

    view.load().await.unwrap();
    service.set_offline(true);

    let err = view.refresh().await.unwrap_err();
    assert!(err.to_string().contains("connection refused"));

    let state = view.state();
    assert_eq!(state.data.as_ref().map(Vec::len), Some(1));
    assert!(!state.loading && !state.is_validating);
    assert!(state.error.is_some());
    assert!(view.view(&ListQuery::default()).is_none(), "views guard on error");

    service.set_offline(false);
    view.refresh().await.unwrap();
    assert!(view.state().error.is_none());
}

#[tokio::test]
async fn test_subscribers_observe_loading_then_data() {
    let service = CountingService::default();
    service.create(&tenant("re-1"), rule("Venda", 6.0)).await.unwrap();
    let cache = Arc::new(QueryCache::new(Duration::from_secs(60)));
    let view = resource(&service, &cache, "re-1");
    let mut updates = view.subscribe();

    view.load().await.unwrap();

    assert!(updates.has_changed().unwrap());
    let state = updates.borrow_and_update().clone();
    assert!(!state.loading);
    assert_eq!(state.data.map(|d| d.len()), Some(1));
}

#[tokio::test]
async fn test_view_runs_pipeline_on_loaded_rules() {
    let service = CountingService::default();
    for (name, percentual) in [("Baixa", 10.0), ("Média", 50.0), ("Alta", 90.0)] {
        service.create(&tenant("re-1"), rule(name, percentual)).await.unwrap();
    }
    let cache = Arc::new(QueryCache::new(Duration::from_secs(60)));
    let view = resource(&service, &cache, "re-1");
    view.load().await.unwrap();

    let query = ListQuery::default().with_filters(FilterState::new().with_range(
        "percentual_total",
        Some(20.0),
        Some(80.0),
    ));
    let rows = view.view(&query).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Média");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_response_arriving_after_invalidation_is_not_stored() {
    let cache = Arc::new(QueryCache::new(Duration::from_secs(60)));
    let key = CacheKey::new("comissoes", tenant("re-1"));
    let (release, gate) = tokio::sync::oneshot::channel::<()>();
    let (started_tx, started) = tokio::sync::oneshot::channel::<()>();

    let fetch = {
        let cache = Arc::clone(&cache);
        let key = key.clone();
        tokio::spawn(async move {
            cache
                .fetch(&key, || async move {
                    started_tx.send(()).ok();
                    gate.await.ok();
                    Ok(vec![1_u32, 2, 3])
                })
                .await
        })
    };

    started.await.unwrap();
    cache.invalidate_key(&key);
    release.send(()).unwrap();

    let value = fetch.await.unwrap().unwrap();
    assert_eq!(value, vec![1, 2, 3], "caller still gets its response");
    assert!(cache.peek::<Vec<u32>>(&key).await.is_none());
}
