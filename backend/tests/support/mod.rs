//! Shared helpers for integration tests that run against the in-memory
//! store.

use std::sync::Arc;

use gameswap::domain::{GameCatalogueService, TradeOfferService, UserAccountService};
use gameswap::inbound::http::state::{HttpState, HttpStatePorts};
use gameswap::outbound::memory::InMemoryStore;

/// Wire the domain services over `store`.
pub fn in_memory_state(store: &InMemoryStore) -> HttpState {
    let games = Arc::new(store.games());
    let offers = Arc::new(TradeOfferService::new(Arc::new(store.offers()), games.clone()));
    HttpState::new(HttpStatePorts {
        offers: offers.clone(),
        offers_query: offers,
        users: Arc::new(UserAccountService::new(Arc::new(store.users()))),
        games: Arc::new(GameCatalogueService::new(games)),
    })
}
