//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod error;
pub mod games;
pub mod health;
pub mod links;
pub mod offers;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

pub use error::ApiResult;

/// Register extractor error handlers and every resource route.
///
/// Health probes are registered separately because they depend on
/// [`health::HealthState`] rather than [`state::HttpState`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(offers::create_offer)
        .service(offers::list_offers)
        .service(offers::get_offer)
        .service(offers::respond_to_offer)
        .service(users::register_user)
        .service(users::get_user)
        .service(users::replace_user)
        .service(users::patch_user)
        .service(users::delete_user)
        .service(games::list_game)
        .service(games::browse_games)
        .service(games::get_game)
        .service(games::replace_game)
        .service(games::patch_game)
        .service(games::delete_game);
}
