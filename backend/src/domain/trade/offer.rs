//! Trade offer entity and status vocabulary.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::{GameId, OfferId, UserId};

/// Lifecycle status of a trade offer.
///
/// `Pending` is the only non-terminal state. Every other status is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfferStatus {
    /// Awaiting a decision from the owner of the requested game.
    Pending,
    /// The owner accepted and ownership of both games was swapped.
    Accepted,
    /// The owner declined.
    Rejected,
    /// Withdrawn, or invalidated by another accepted trade.
    Cancelled,
}

impl OfferStatus {
    /// Canonical lowercase wire and storage form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether the lattice permits moving from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted | Self::Rejected | Self::Cancelled)
        )
    }
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to recognise a stored or submitted status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown offer status '{0}'")]
pub struct ParseOfferStatusError(pub String);

impl FromStr for OfferStatus {
    type Err = ParseOfferStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseOfferStatusError(s.to_owned())),
        }
    }
}

/// Decision a client may submit for a pending offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferResponse {
    /// Accept the trade and swap ownership.
    Accept,
    /// Decline the trade.
    Reject,
    /// Withdraw the trade.
    Cancel,
}

impl OfferResponse {
    /// Status the offer ends in when the response succeeds.
    #[must_use]
    pub fn target_status(self) -> OfferStatus {
        match self {
            Self::Accept => OfferStatus::Accepted,
            Self::Reject => OfferStatus::Rejected,
            Self::Cancel => OfferStatus::Cancelled,
        }
    }
}

/// A submitted status that is not `accepted`, `rejected` or `cancelled`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status must be one of accepted, rejected or cancelled, got '{0}'")]
pub struct UnknownOfferResponse(pub String);

impl FromStr for OfferResponse {
    type Err = UnknownOfferResponse;

    /// Parses case-insensitively after trimming. `pending` is not a response.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<OfferStatus>() {
            Ok(OfferStatus::Accepted) => Ok(Self::Accept),
            Ok(OfferStatus::Rejected) => Ok(Self::Reject),
            Ok(OfferStatus::Cancelled) => Ok(Self::Cancel),
            Ok(OfferStatus::Pending) | Err(_) => Err(UnknownOfferResponse(s.to_owned())),
        }
    }
}

/// Which side of a user's offers to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OfferDirection {
    /// Offers where the user owns the requested game.
    #[default]
    Incoming,
    /// Offers the user made.
    Outgoing,
}

impl OfferDirection {
    /// Interpret the `type` query parameter.
    ///
    /// Only `outgoing` (any case, surrounding whitespace ignored) selects
    /// outgoing offers; anything else, including absence, means incoming.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.trim().eq_ignore_ascii_case("outgoing") => Self::Outgoing,
            _ => Self::Incoming,
        }
    }
}

/// Offer that passed admission and is ready to be stored as `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTradeOffer {
    /// User proposing the trade.
    pub requester: UserId,
    /// Owner of the requested game at creation time.
    pub owner: UserId,
    /// Game the requester wants.
    pub game_requested: GameId,
    /// Game the requester gives up.
    pub game_offered: GameId,
}

/// Stored offer fields prior to invariant checks.
#[derive(Debug, Clone)]
pub struct TradeOfferDraft {
    /// Store-assigned identifier.
    pub id: OfferId,
    /// User proposing the trade.
    pub requester: UserId,
    /// Owner of the requested game at creation time.
    pub owner: UserId,
    /// Game the requester wants.
    pub game_requested: GameId,
    /// Game the requester gives up.
    pub game_offered: GameId,
    /// Current lifecycle status.
    pub status: OfferStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last status change.
    pub updated_at: DateTime<Utc>,
}

/// Structural invariant violated by a stored offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TradeOfferInvariantError {
    /// Both sides reference the same game.
    #[error("an offer cannot trade a game for itself")]
    SameGame,
    /// The requester is also the owner.
    #[error("an offer cannot be made to oneself")]
    SelfTrade,
}

/// A proposal to swap one game for another.
///
/// ## Invariants
/// - `game_requested != game_offered`
/// - `requester != owner`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeOffer {
    id: OfferId,
    requester: UserId,
    owner: UserId,
    game_requested: GameId,
    game_offered: GameId,
    status: OfferStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TradeOffer {
    /// Validate a draft read from storage.
    pub fn new(draft: TradeOfferDraft) -> Result<Self, TradeOfferInvariantError> {
        if draft.game_requested == draft.game_offered {
            return Err(TradeOfferInvariantError::SameGame);
        }
        if draft.requester == draft.owner {
            return Err(TradeOfferInvariantError::SelfTrade);
        }
        Ok(Self {
            id: draft.id,
            requester: draft.requester,
            owner: draft.owner,
            game_requested: draft.game_requested,
            game_offered: draft.game_offered,
            status: draft.status,
            created_at: draft.created_at,
            updated_at: draft.updated_at,
        })
    }

    /// Materialise a freshly admitted offer as `pending`.
    #[must_use]
    pub fn pending(id: OfferId, offer: NewTradeOffer, now: DateTime<Utc>) -> Self {
        Self {
            id,
            requester: offer.requester,
            owner: offer.owner,
            game_requested: offer.game_requested,
            game_offered: offer.game_offered,
            status: OfferStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Store-assigned identifier.
    #[must_use]
    pub fn id(&self) -> OfferId {
        self.id
    }

    /// User proposing the trade.
    #[must_use]
    pub fn requester(&self) -> UserId {
        self.requester
    }

    /// Owner of the requested game when the offer was made.
    #[must_use]
    pub fn owner(&self) -> UserId {
        self.owner
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

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> OfferStatus {
        self.status
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the last status change.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the offer references `game` on either side.
    #[must_use]
    pub fn involves(&self, game: GameId) -> bool {
        self.game_requested == game || self.game_offered == game
    }

    /// Copy of this offer in `status`, stamped at `at`.
    #[must_use]
    pub fn with_status(mut self, status: OfferStatus, at: DateTime<Utc>) -> Self {
        self.status = status;
        self.updated_at = at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("accepted", OfferResponse::Accept)]
    #[case("  REJECTED ", OfferResponse::Reject)]
    #[case("Cancelled", OfferResponse::Cancel)]
    fn responses_parse_case_insensitively(#[case] raw: &str, #[case] expected: OfferResponse) {
        assert_eq!(raw.parse::<OfferResponse>(), Ok(expected));
    }

    #[rstest]
    #[case("pending")]
    #[case("approved")]
    #[case("")]
    fn pending_and_unknown_responses_are_rejected(#[case] raw: &str) {
        assert!(raw.parse::<OfferResponse>().is_err());
    }

    #[rstest]
    #[case(None, OfferDirection::Incoming)]
    #[case(Some("outgoing"), OfferDirection::Outgoing)]
    #[case(Some(" OutGoing "), OfferDirection::Outgoing)]
    #[case(Some("incoming"), OfferDirection::Incoming)]
    #[case(Some("sideways"), OfferDirection::Incoming)]
    fn direction_defaults_to_incoming(
        #[case] raw: Option<&str>,
        #[case] expected: OfferDirection,
    ) {
        assert_eq!(OfferDirection::from_query(raw), expected);
    }

    #[rstest]
    fn only_pending_can_transition() {
        for next in [
            OfferStatus::Accepted,
            OfferStatus::Rejected,
            OfferStatus::Cancelled,
        ] {
            assert!(OfferStatus::Pending.can_transition_to(next));
            assert!(!next.can_transition_to(OfferStatus::Pending));
            assert!(next.is_terminal());
        }
        assert!(!OfferStatus::Pending.can_transition_to(OfferStatus::Pending));
    }

    #[rstest]
    fn stored_offer_must_reference_two_games() {
        let game = GameId::new(3).expect("id");
        let draft = TradeOfferDraft {
            id: OfferId::new(1).expect("id"),
            requester: UserId::new(1).expect("id"),
            owner: UserId::new(2).expect("id"),
            game_requested: game,
            game_offered: game,
            status: OfferStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(
            TradeOffer::new(draft),
            Err(TradeOfferInvariantError::SameGame)
        );
    }
}
