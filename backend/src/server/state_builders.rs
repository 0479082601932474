//! Builders wiring repository adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use gameswap::domain::ports::{GameRepository, TradeOfferRepository, UserRepository};
use gameswap::domain::{GameCatalogueService, TradeOfferService, UserAccountService};
use gameswap::inbound::http::state::{HttpState, HttpStatePorts};
use gameswap::outbound::memory::InMemoryStore;
use gameswap::outbound::persistence::{
    DbPool, DieselGameRepository, DieselTradeOfferRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Wrap one set of repositories in the domain services behind the driving
/// ports.
fn wire_services<U, G, O>(users: Arc<U>, games: Arc<G>, offers: Arc<O>) -> HttpState
where
    U: UserRepository + 'static,
    G: GameRepository + 'static,
    O: TradeOfferRepository + 'static,
{
    let trade = Arc::new(TradeOfferService::new(offers, games.clone()));
    HttpState::new(HttpStatePorts {
        offers: trade.clone(),
        offers_query: trade,
        users: Arc::new(UserAccountService::new(users)),
        games: Arc::new(GameCatalogueService::new(games)),
    })
}

fn diesel_state(pool: &DbPool) -> HttpState {
    wire_services(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselGameRepository::new(pool.clone())),
        Arc::new(DieselTradeOfferRepository::new(pool.clone())),
    )
}

fn in_memory_state() -> HttpState {
    let store = InMemoryStore::new();
    wire_services(
        Arc::new(store.users()),
        Arc::new(store.games()),
        Arc::new(store.offers()),
    )
}

/// Build HTTP state from PostgreSQL when a pool is configured, otherwise
/// from a process-local store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            info!(backend = "postgres", "serving from database");
            diesel_state(pool)
        }
        None => {
            info!(backend = "memory", "no database configured; state is not persisted");
            in_memory_state()
        }
    };
    web::Data::new(state)
}

#[cfg(test)]
mod tests {
    //! State wiring tests.

    use super::*;
    use std::net::SocketAddr;

    use gameswap::domain::ports::RegisterUserRequest;

    #[actix_web::test]
    async fn memory_state_shares_one_store_across_ports() {
        let config = ServerConfig::new(SocketAddr::from(([127, 0, 0, 1], 0)));
        let state = build_http_state(&config);

        let user = state
            .users
            .register(RegisterUserRequest {
                username: "ada".to_owned(),
                password: "secret".to_owned(),
                email: "ada@example.com".to_owned(),
                street_address: "12 Analytical Row".to_owned(),
            })
            .await
            .expect("registration succeeds");
        let games = state.games.browse(user.id()).await.expect("browse");

        assert_eq!(user.id().get(), 1);
        assert!(games.is_empty());
    }
}
