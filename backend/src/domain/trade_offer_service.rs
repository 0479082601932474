//! Trade offer domain service.
//!
//! Implements the offer driving ports on top of the offer and game
//! repositories. Creation runs the admission rules against current
//! ownership; responses run the state machine and hand acceptances to the
//! repository, which settles them atomically.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    GameRepository, GameRepositoryError, OfferResolution, RespondToOfferRequest,
    TradeOfferCommand, TradeOfferQuery, TradeOfferRepository, TradeOfferRepositoryError,
};
use crate::domain::trade::{
    AcceptanceError, OfferDirection, OfferRejection, OfferRequest, OfferResponse, OfferStatus,
    TradeOffer, TransitionError, authorize,
};
use crate::domain::{Error, GameId, GameOwnership, OfferId, UserId};

fn map_offer_repository_error(error: TradeOfferRepositoryError) -> Error {
    match error {
        TradeOfferRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("trade offer repository unavailable: {message}"))
        }
        TradeOfferRepositoryError::Query { message } => {
            Error::internal(format!("trade offer repository error: {message}"))
        }
        TradeOfferRepositoryError::Acceptance { reason } => map_acceptance_error(reason),
    }
}

fn map_game_lookup_error(error: GameRepositoryError) -> Error {
    match error {
        GameRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("game repository unavailable: {message}"))
        }
        other => Error::internal(format!("game repository error: {other}")),
    }
}

fn offer_not_found(offer_id: OfferId) -> Error {
    Error::not_found(format!("offer {offer_id} not found"))
        .with_details(json!({ "code": "offer_not_found", "offerId": offer_id.get() }))
}

fn offer_not_pending(status: Option<OfferStatus>) -> Error {
    let details = match status {
        Some(status) => json!({ "code": "offer_not_pending", "status": status.as_str() }),
        None => json!({ "code": "offer_not_pending" }),
    };
    Error::conflict("offer is no longer pending").with_details(details)
}

fn map_acceptance_error(reason: AcceptanceError) -> Error {
    match reason {
        AcceptanceError::OfferNotFound { offer_id } => offer_not_found(offer_id),
        AcceptanceError::OfferNotPending { status } => offer_not_pending(Some(status)),
        AcceptanceError::OfferStale => Error::conflict(
            "ownership of the traded games changed since the offer was made",
        )
        .with_details(json!({ "code": "offer_stale" })),
        AcceptanceError::Conflict { message } => {
            warn!(%message, "acceptance aborted by a concurrent update");
            Error::conflict("offer was modified concurrently; retry the request")
                .with_details(json!({ "code": "conflict" }))
        }
    }
}

fn map_rejection(rejection: &OfferRejection) -> Error {
    let code = rejection.code();
    let message = rejection.to_string();
    match *rejection {
        OfferRejection::InvalidInput { field, value } => Error::invalid_request(message)
            .with_details(json!({ "code": code, "field": field, "value": value })),
        OfferRejection::SelfTradeNotAllowed => {
            Error::invalid_request(message).with_details(json!({ "code": code }))
        }
        OfferRejection::GameNotFound { game_id } => Error::not_found(message)
            .with_details(json!({ "code": code, "gameId": game_id.get() })),
        OfferRejection::NotYourGame { game_id }
        | OfferRejection::CannotRequestOwnGame { game_id } => Error::invalid_request(message)
            .with_details(json!({ "code": code, "gameId": game_id.get() })),
    }
}

fn map_transition_error(error: TransitionError) -> Error {
    match error {
        TransitionError::NotPending { current } => offer_not_pending(Some(current)),
        TransitionError::NotOwner => Error::forbidden(error.to_string())
            .with_details(json!({ "code": error.code() })),
    }
}

/// Trade offer service implementing the command and query driving ports.
#[derive(Clone)]
pub struct TradeOfferService<O, G> {
    offers: Arc<O>,
    games: Arc<G>,
}

impl<O, G> TradeOfferService<O, G> {
    /// Create a service over the offer and game repositories.
    pub fn new(offers: Arc<O>, games: Arc<G>) -> Self {
        Self { offers, games }
    }
}

impl<O, G> TradeOfferService<O, G>
where
    O: TradeOfferRepository,
    G: GameRepository,
{
    async fn ownership_of(
        &self,
        game_id: GameId,
    ) -> Result<Option<GameOwnership>, Error> {
        let game = self
            .games
            .find_by_id(game_id)
            .await
            .map_err(map_game_lookup_error)?;
        Ok(game.map(|game| game.ownership()))
    }

    async fn load_offer(&self, offer_id: OfferId) -> Result<TradeOffer, Error> {
        self.offers
            .find_by_id(offer_id)
            .await
            .map_err(map_offer_repository_error)?
            .ok_or_else(|| offer_not_found(offer_id))
    }
}

#[async_trait]
impl<O, G> TradeOfferCommand for TradeOfferService<O, G>
where
    O: TradeOfferRepository,
    G: GameRepository,
{
    async fn create_offer(&self, request: OfferRequest) -> Result<TradeOffer, Error> {
        let checked = request.check().map_err(|err| map_rejection(&err))?;
        let requested = self.ownership_of(checked.game_requested()).await?;
        let offered = self.ownership_of(checked.game_offered()).await?;
        let admitted = checked
            .admit(requested, offered)
            .map_err(|err| map_rejection(&err))?;

        let offer = self
            .offers
            .insert(&admitted)
            .await
            .map_err(map_offer_repository_error)?;
        info!(
            offer_id = %offer.id(),
            requester = %offer.requester(),
            owner = %offer.owner(),
            "trade offer created"
        );
        Ok(offer)
    }

    async fn respond_to_offer(
        &self,
        request: RespondToOfferRequest,
    ) -> Result<OfferResolution, Error> {
        let offer = self.load_offer(request.offer_id).await?;
        let transition =
            authorize(&offer, request.actor, request.response).map_err(map_transition_error)?;

        if request.response == OfferResponse::Accept {
            let accepted = self
                .offers
                .accept(transition.offer_id)
                .await
                .map_err(map_offer_repository_error)?;
            info!(
                offer_id = %transition.offer_id,
                cancelled = accepted.cancelled_offers.len(),
                "trade offer accepted"
            );
            return Ok(OfferResolution {
                offer_id: transition.offer_id,
                status: OfferStatus::Accepted,
                cancelled_offers: accepted.cancelled_offers,
            });
        }

        let closed = self
            .offers
            .close_pending(transition)
            .await
            .map_err(map_offer_repository_error)?;
        if !closed {
            debug!(offer_id = %transition.offer_id, "offer resolved concurrently");
            return Err(offer_not_pending(None));
        }
        info!(offer_id = %transition.offer_id, status = %transition.to, "trade offer closed");
        Ok(OfferResolution {
            offer_id: transition.offer_id,
            status: transition.to,
            cancelled_offers: Vec::new(),
        })
    }
}

#[async_trait]
impl<O, G> TradeOfferQuery for TradeOfferService<O, G>
where
    O: TradeOfferRepository,
    G: GameRepository,
{
    async fn get_offer(&self, offer_id: OfferId) -> Result<TradeOffer, Error> {
        self.load_offer(offer_id).await
    }

    async fn list_offers(
        &self,
        user_id: UserId,
        direction: OfferDirection,
    ) -> Result<Vec<TradeOffer>, Error> {
        let listed = match direction {
            OfferDirection::Incoming => self.offers.list_by_owner(user_id).await,
            OfferDirection::Outgoing => self.offers.list_by_requester(user_id).await,
        };
        listed.map_err(map_offer_repository_error)
    }
}

#[cfg(test)]
#[path = "trade_offer_service_tests.rs"]
mod tests;
