//! Trade offer HTTP handlers.
//!
//! ```text
//! POST  /offers
//! GET   /offers?userId=<id>&type=<incoming|outgoing>
//! GET   /offers/{id}
//! PATCH /offers/{id}
//! ```

use std::str::FromStr;

use actix_web::http::header;
use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::RespondToOfferRequest;
use crate::domain::trade::{OfferDirection, OfferRequest, OfferResponse, TradeOffer};
use crate::domain::{Error, OfferId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::links::Links;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_id, require,
};

const OFFER_ID: FieldName = FieldName::new("offerId");
const USER_ID: FieldName = FieldName::new("userId");
const OWNER_USER_ID: FieldName = FieldName::new("ownerUserId");
const CURRENT_STATUS: FieldName = FieldName::new("currentStatus");

/// Request payload for proposing a trade.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateOfferRequest {
    /// User proposing the trade.
    #[schema(example = 2)]
    pub requester_id: Option<i64>,
    /// Game the requester wants.
    #[schema(example = 10)]
    pub game_requested_id: Option<i64>,
    /// Game the requester gives up in exchange.
    #[schema(example = 20)]
    pub game_offered_id: Option<i64>,
}

/// Request payload for responding to a trade.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateOfferStatusRequest {
    /// Must match the offer's owner.
    #[schema(example = 1)]
    pub owner_user_id: Option<i64>,
    /// `accepted`, `rejected` or `cancelled`.
    #[schema(example = "accepted")]
    pub current_status: Option<String>,
}

/// Query parameters for listing offers.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListOffersQuery {
    /// User whose offers are listed.
    pub user_id: Option<String>,
    /// `outgoing` for offers the user made; anything else lists incoming.
    #[serde(rename = "type")]
    pub direction: Option<String>,
}

/// Trade offer representation.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TradeOfferResponse {
    pub offer_id: i64,
    pub requester_id: i64,
    pub owner_user_id: i64,
    pub game_requested_id: i64,
    pub game_offered_id: i64,
    #[schema(example = "pending")]
    pub current_status: String,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl From<TradeOffer> for TradeOfferResponse {
    fn from(offer: TradeOffer) -> Self {
        Self {
            offer_id: offer.id().get(),
            requester_id: offer.requester().get(),
            owner_user_id: offer.owner().get(),
            game_requested_id: offer.game_requested().get(),
            game_offered_id: offer.game_offered().get(),
            current_status: offer.status().as_str().to_owned(),
            links: Links::editable("offers", offer.id()),
        }
    }
}

fn parse_create_request(payload: CreateOfferRequest) -> Result<OfferRequest, Error> {
    Ok(OfferRequest {
        requester_id: require(payload.requester_id, FieldName::new("requesterId"))?,
        game_requested_id: require(payload.game_requested_id, FieldName::new("gameRequestedId"))?,
        game_offered_id: require(payload.game_offered_id, FieldName::new("gameOfferedId"))?,
    })
}

fn parse_status_request(
    offer_id: OfferId,
    payload: UpdateOfferStatusRequest,
) -> Result<RespondToOfferRequest, Error> {
    let owner = require(payload.owner_user_id, OWNER_USER_ID)?;
    let status = require(payload.current_status, CURRENT_STATUS)?;
    let actor = UserId::new(owner).ok();
    let response = OfferResponse::from_str(&status).map_err(|_| {
        invalid_value_error(CURRENT_STATUS, &status, "accepted, rejected, cancelled")
    })?;
    Ok(RespondToOfferRequest {
        offer_id,
        actor,
        response,
    })
}

/// Propose a trade.
#[utoipa::path(
    post,
    path = "/offers",
    request_body = CreateOfferRequest,
    responses(
        (status = 201, description = "Offer created as pending", body = TradeOfferResponse),
        (status = 400, description = "Invalid or inadmissible offer", body = ErrorSchema),
        (status = 404, description = "A referenced game does not exist", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["offers"],
    operation_id = "createOffer"
)]
#[post("/offers")]
pub async fn create_offer(
    state: web::Data<HttpState>,
    payload: web::Json<CreateOfferRequest>,
) -> ApiResult<HttpResponse> {
    let request = parse_create_request(payload.into_inner())?;
    let offer = state.offers.create_offer(request).await?;
    let body = TradeOfferResponse::from(offer);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, body.links.self_link.href.clone()))
        .json(body))
}

/// List a user's incoming or outgoing offers.
#[utoipa::path(
    get,
    path = "/offers",
    params(ListOffersQuery),
    responses(
        (status = 200, description = "Offers for the user", body = [TradeOfferResponse]),
        (status = 400, description = "Missing or malformed userId", body = ErrorSchema)
    ),
    tags = ["offers"],
    operation_id = "listOffers"
)]
#[get("/offers")]
pub async fn list_offers(
    state: web::Data<HttpState>,
    query: web::Query<ListOffersQuery>,
) -> ApiResult<web::Json<Vec<TradeOfferResponse>>> {
    let ListOffersQuery { user_id, direction } = query.into_inner();
    let user_id: UserId = parse_id(&require(user_id, USER_ID)?, USER_ID)?;
    let direction = OfferDirection::from_query(direction.as_deref());
    let offers = state.offers_query.list_offers(user_id, direction).await?;
    Ok(web::Json(
        offers.into_iter().map(TradeOfferResponse::from).collect(),
    ))
}

/// Fetch one offer.
#[utoipa::path(
    get,
    path = "/offers/{id}",
    params(("id" = i64, Path, description = "Offer identifier")),
    responses(
        (status = 200, description = "The offer", body = TradeOfferResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "No such offer", body = ErrorSchema)
    ),
    tags = ["offers"],
    operation_id = "getOffer"
)]
#[get("/offers/{id}")]
pub async fn get_offer(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TradeOfferResponse>> {
    let offer_id: OfferId = parse_id(&path.into_inner(), OFFER_ID)?;
    let offer = state.offers_query.get_offer(offer_id).await?;
    Ok(web::Json(TradeOfferResponse::from(offer)))
}

/// Accept, reject or cancel a pending offer. Only the owner may respond.
#[utoipa::path(
    patch,
    path = "/offers/{id}",
    params(("id" = i64, Path, description = "Offer identifier")),
    request_body = UpdateOfferStatusRequest,
    responses(
        (status = 204, description = "Offer resolved"),
        (status = 400, description = "Missing fields or unknown status", body = ErrorSchema),
        (status = 403, description = "Caller is not the offer's owner", body = ErrorSchema),
        (status = 404, description = "No such offer", body = ErrorSchema),
        (status = 409, description = "Offer not pending, stale or contended", body = ErrorSchema)
    ),
    tags = ["offers"],
    operation_id = "respondToOffer"
)]
#[patch("/offers/{id}")]
pub async fn respond_to_offer(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateOfferStatusRequest>,
) -> ApiResult<HttpResponse> {
    let offer_id: OfferId = parse_id(&path.into_inner(), OFFER_ID)?;
    let request = parse_status_request(offer_id, payload.into_inner())?;
    state.offers.respond_to_offer(request).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "offers_tests.rs"]
mod tests;
