//! Development API server seeded with sample listings
//!
//! Run with `cargo run --example dev_server`, then query
//! `http://127.0.0.1:8000/properties?real_estate_id=demo`.

use imob::prelude::*;
use tracing_subscriber::EnvFilter;

fn sample_properties() -> Vec<Property> {
    vec![
        Property::new(
            "Casa no Batel",
            ListingStatus::Available,
            "casa".into(),
            "Rua Gutemberg, 100".into(),
            "Batel".into(),
            "Curitiba".into(),
            "PR".into(),
            Some("80420030".into()),
            1_250_000.0,
            280.0,
            4,
            3,
            2,
            vec!["piscina".into(), "churrasqueira".into()],
            None,
        ),
        Property::new(
            "Apartamento Água Verde",
            ListingStatus::Reserved,
            "apartamento".into(),
            "Av. República Argentina, 1500".into(),
            "Água Verde".into(),
            "Curitiba".into(),
            "PR".into(),
            None,
            540_000.0,
            92.0,
            2,
            2,
            1,
            vec!["academia".into()],
            None,
        ),
    ]
}

fn sample_brokers() -> Vec<Corretor> {
    vec![Corretor::new(
        "Maria Silva",
        ActiveStatus::Active,
        "maria@imob.com.br".into(),
        "(41) 99999-0000".into(),
        "12345-F".into(),
        vec!["venda".into()],
        vec!["Batel".into(), "Água Verde".into()],
    )]
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,imob=debug")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => DashboardConfig::from_yaml_file(path)?,
        None => DashboardConfig::default(),
    };
    let tenant = config
        .tenant()
        .or_else(|| RealEstateId::new("demo"))
        .ok_or_else(|| anyhow::anyhow!("no tenant configured"))?;

    tracing::info!(tenant = %tenant, "seeding sample data");

    ServerBuilder::new()
        .register::<Property>(InMemoryDataService::seeded(&tenant, sample_properties())?)
        .register::<Corretor>(InMemoryDataService::seeded(&tenant, sample_brokers())?)
        .register_in_memory::<Terreno>()
        .register_in_memory::<Empreendimento>()
        .register_in_memory::<Cobranca>()
        .register_in_memory::<Comissao>()
        .serve("127.0.0.1:8000")
        .await
}
