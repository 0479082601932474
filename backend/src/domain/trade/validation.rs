//! Admission rules for new trade offers.
//!
//! Checks run in a fixed order and the first failure wins:
//! identifiers are positive, the two games differ, both games exist, the
//! requester owns the offered game, and the requester does not already own
//! the requested game. The first two need no store access; see
//! [`OfferRequest::check`]. The rest run against current ownership in
//! [`CheckedOfferRequest::admit`].

use crate::domain::{GameId, GameOwnership, UserId};

use super::NewTradeOffer;

/// Why an offer was refused at creation time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OfferRejection {
    /// An identifier was missing, zero or negative.
    #[error("{field} must be a positive integer, got {value}")]
    InvalidInput {
        /// Wire name of the offending field.
        field: &'static str,
        /// Rejected raw value.
        value: i64,
    },
    /// The requested and offered game are the same.
    #[error("cannot trade a game for itself")]
    SelfTradeNotAllowed,
    /// A referenced game does not exist.
    #[error("game {game_id} not found")]
    GameNotFound {
        /// First missing game, requested side checked first.
        game_id: GameId,
    },
    /// The requester does not own the offered game.
    #[error("you do not own game {game_id}")]
    NotYourGame {
        /// The offered game.
        game_id: GameId,
    },
    /// The requester already owns the requested game.
    #[error("you already own game {game_id}")]
    CannotRequestOwnGame {
        /// The requested game.
        game_id: GameId,
    },
}

impl OfferRejection {
    /// Stable machine-readable sub-code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::SelfTradeNotAllowed => "self_trade_not_allowed",
            Self::GameNotFound { .. } => "game_not_found",
            Self::NotYourGame { .. } => "not_your_game",
            Self::CannotRequestOwnGame { .. } => "cannot_request_own_game",
        }
    }
}

/// Raw offer creation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferRequest {
    /// Proposing user.
    pub requester_id: i64,
    /// Game the requester wants.
    pub game_requested_id: i64,
    /// Game the requester gives up.
    pub game_offered_id: i64,
}

/// Offer input whose identifiers are well formed and distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedOfferRequest {
    requester: UserId,
    game_requested: GameId,
    game_offered: GameId,
}

fn positive<T>(
    field: &'static str,
    value: i64,
    parse: impl FnOnce(i64) -> Result<T, crate::domain::IdValidationError>,
) -> Result<T, OfferRejection> {
    parse(value).map_err(|_| OfferRejection::InvalidInput { field, value })
}

impl OfferRequest {
    /// Run the store-independent checks.
    pub fn check(self) -> Result<CheckedOfferRequest, OfferRejection> {
        let requester = positive("requesterId", self.requester_id, UserId::new)?;
        let game_requested = positive("gameRequestedId", self.game_requested_id, GameId::new)?;
        let game_offered = positive("gameOfferedId", self.game_offered_id, GameId::new)?;
        if game_requested == game_offered {
            return Err(OfferRejection::SelfTradeNotAllowed);
        }
        Ok(CheckedOfferRequest {
            requester,
            game_requested,
            game_offered,
        })
    }
}

impl CheckedOfferRequest {
    /// Proposing user.
    #[must_use]
    pub fn requester(&self) -> UserId {
        self.requester
    }

    /// Game the requester wants.
    #[must_use]
    pub fn game_requested(&self) -> GameId {
        self.game_requested
    }

    /// Game the requester gives up.
    #[must_use]
    pub fn game_offered(&self) -> GameId {
        self.game_offered
    }

    /// Run the ownership checks against the current owners of both games.
    ///
    /// `None` means the store has no such game.
    pub fn admit(
        self,
        requested: Option<GameOwnership>,
        offered: Option<GameOwnership>,
    ) -> Result<NewTradeOffer, OfferRejection> {
        let requested = requested.ok_or(OfferRejection::GameNotFound {
            game_id: self.game_requested,
        })?;
        let offered = offered.ok_or(OfferRejection::GameNotFound {
            game_id: self.game_offered,
        })?;
        if offered.owner != self.requester {
            return Err(OfferRejection::NotYourGame {
                game_id: self.game_offered,
            });
        }
        if requested.owner == self.requester {
            return Err(OfferRejection::CannotRequestOwnGame {
                game_id: self.game_requested,
            });
        }
        Ok(NewTradeOffer {
            requester: self.requester,
            owner: requested.owner,
            game_requested: self.game_requested,
            game_offered: self.game_offered,
        })
    }
}
