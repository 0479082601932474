//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{GameCatalogue, TradeOfferCommand, TradeOfferQuery, UserAccounts};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub offers: Arc<dyn TradeOfferCommand>,
    pub offers_query: Arc<dyn TradeOfferQuery>,
    pub users: Arc<dyn UserAccounts>,
    pub games: Arc<dyn GameCatalogue>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub offers: Arc<dyn TradeOfferCommand>,
    pub offers_query: Arc<dyn TradeOfferQuery>,
    pub users: Arc<dyn UserAccounts>,
    pub games: Arc<dyn GameCatalogue>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use gameswap::domain::{GameCatalogueService, TradeOfferService, UserAccountService};
    /// use gameswap::inbound::http::state::{HttpState, HttpStatePorts};
    /// use gameswap::outbound::memory::InMemoryStore;
    ///
    /// let store = InMemoryStore::new();
    /// let games = Arc::new(store.games());
    /// let offers = Arc::new(TradeOfferService::new(Arc::new(store.offers()), games.clone()));
    /// let state = HttpState::new(HttpStatePorts {
    ///     offers: offers.clone(),
    ///     offers_query: offers,
    ///     users: Arc::new(UserAccountService::new(Arc::new(store.users()))),
    ///     games: Arc::new(GameCatalogueService::new(games)),
    /// });
    /// let _offers = state.offers.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            offers,
            offers_query,
            users,
            games,
        } = ports;
        Self {
            offers,
            offers_query,
            users,
            games,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
