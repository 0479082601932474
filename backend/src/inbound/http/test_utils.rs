//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::Value;

use crate::Trace;
use crate::domain::{GameCatalogueService, TradeOfferService, UserAccountService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;

/// Wire the domain services over an in-memory store.
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

/// Initialise the full route table against `state`.
pub async fn init_app(
    state: HttpState,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .configure(super::configure),
    )
    .await
}

/// Send a JSON request and return the status with the parsed body, if any.
pub async fn send_json<S>(
    app: &S,
    request: test::TestRequest,
) -> (actix_web::http::StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, request.to_request()).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };
    (status, body)
}
