use std::sync::Arc;

use anyhow::Context;

use billrun_api::app::services::AppServices;
use billrun_api::config::ApiConfig;
use billrun_api::gateway::DevPaymentGateway;
use billrun_api::{app, scheduler};
use billrun_data::{InMemoryInvoiceStore, PostgresInvoiceStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    billrun_observability::init();

    let config = ApiConfig::from_env();
    let gateway = Arc::new(DevPaymentGateway::new(
        config.gateway_success_ratio,
        config.gateway_network_ratio,
    ));

    let services = match &config.database_url {
        Some(url) => {
            let store = PostgresInvoiceStore::connect(url)
                .await
                .context("connecting to postgres")?;
            AppServices::postgres(Arc::new(store), gateway)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using an in-memory store with demo data");
            let store = Arc::new(InMemoryInvoiceStore::new());
            store.seed_demo_data(100, 10);
            AppServices::in_memory(store, gateway)
        }
    };
    let services = Arc::new(services);

    let _scheduler = config.billing_interval.map(|every| {
        tracing::info!(every_secs = every.as_secs(), "billing scheduler running");
        scheduler::spawn_billing_scheduler(Arc::clone(&services), every)
    });
    if config.billing_interval.is_none() {
        tracing::info!("scheduled billing disabled (BILLING_INTERVAL_SECS=0)");
    }

    let router = app::build_app(Arc::clone(&services));
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;
    Ok(())
}
