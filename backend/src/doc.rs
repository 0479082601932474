//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP endpoint from the inbound layer together
//! with the request and response schemas they reference. Domain types are
//! described through the wrappers in
//! [`crate::inbound::http::schemas`] so the domain stays free of utoipa.
//!
//! The document is served by Swagger UI in debug builds and exported with
//! `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::inbound::http::games::{
    CreateGameRequest, GameDetailsRequest, GameResponse, PatchGameBody,
};
use crate::inbound::http::links::{Link, Links};
use crate::inbound::http::offers::{
    CreateOfferRequest, TradeOfferResponse, UpdateOfferStatusRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    PatchUserBody, RegisterUserBody, ReplaceUserBody, UserResponse,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gameswap API",
        description = "Peer-to-peer board game trading: users, their games and trade offers."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::offers::create_offer,
        crate::inbound::http::offers::list_offers,
        crate::inbound::http::offers::get_offer,
        crate::inbound::http::offers::respond_to_offer,
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::replace_user,
        crate::inbound::http::users::patch_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::games::list_game,
        crate::inbound::http::games::browse_games,
        crate::inbound::http::games::get_game,
        crate::inbound::http::games::replace_game,
        crate::inbound::http::games::patch_game,
        crate::inbound::http::games::delete_game,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        Link,
        Links,
        CreateOfferRequest,
        UpdateOfferStatusRequest,
        TradeOfferResponse,
        RegisterUserBody,
        ReplaceUserBody,
        PatchUserBody,
        UserResponse,
        CreateGameRequest,
        GameDetailsRequest,
        PatchGameBody,
        GameResponse,
    )),
    tags(
        (name = "offers", description = "Proposing, reviewing and answering trade offers"),
        (name = "users", description = "User registration and profiles"),
        (name = "games", description = "Listing and browsing games"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
