use std::sync::Arc;

use meilisearch_sdk::client::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use eco::types::{SustainabilityType, TypeRegistry};
use ledger::remote::{RemoteLedger, get_remote_ledger};

use super::{config::Config, database::init_redis, search::init_meilisearch};

pub struct State {
    pub config: Config,
    pub redis_connection: ConnectionManager,
    pub meili_client: Arc<Client>,
    pub registry: TypeRegistry,
    pub remote_ledger: RemoteLedger,
}

impl State {
    pub async fn new() -> Arc<Self> {
        let remote_ledger = get_remote_ledger().await.expect("Ledger unreachable!");
        info!(
            "Ledger loaded: {} products, {} types, {} users",
            remote_ledger.ledger.products.len(),
            remote_ledger.ledger.types.len(),
            remote_ledger.ledger.emissions.len()
        );

        let registry =
            TypeRegistry::new(
                remote_ledger
                    .ledger
                    .types
                    .iter()
                    .map(|t| SustainabilityType {
                        id: t.id,
                        type_name: t.type_name.clone(),
                        importance_level: t.importance_level,
                        is_active: t.is_active,
                    }),
            );

        let config = Config::load();

        let (redis_connection, product_scores) =
            init_redis(&config.redis_url, &remote_ledger).await;
        let meili_client = init_meilisearch(
            &config.meili_url,
            &config.meili_key,
            &remote_ledger.ledger.products,
            &product_scores,
        )
        .await;

        Arc::new(Self {
            config,
            redis_connection,
            meili_client,
            registry,
            remote_ledger,
        })
    }
}
