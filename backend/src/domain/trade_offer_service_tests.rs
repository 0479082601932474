//! Tests for the trade offer service.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockGameRepository, MockTradeOfferRepository};
use crate::domain::trade::{
    AcceptedTrade, NewTradeOffer, OfferTransition, OwnershipTransfer,
};
use crate::domain::{ErrorCode, Game, GameDetails, GameDetailsDraft};

fn user(raw: i64) -> UserId {
    UserId::new(raw).expect("valid user id")
}

fn game_id(raw: i64) -> GameId {
    GameId::new(raw).expect("valid game id")
}

fn offer_id(raw: i64) -> OfferId {
    OfferId::new(raw).expect("valid offer id")
}

fn game(id: i64, owner: i64) -> Game {
    Game::new(
        game_id(id),
        user(owner),
        GameDetails::new(GameDetailsDraft {
            title: format!("Game {id}"),
            publisher: "Publisher".to_owned(),
            description: "Description".to_owned(),
            year: 2001,
            condition: "good".to_owned(),
        })
        .expect("valid details"),
    )
}

fn pending_offer() -> TradeOffer {
    TradeOffer::pending(
        offer_id(5),
        NewTradeOffer {
            requester: user(1),
            owner: user(2),
            game_requested: game_id(20),
            game_offered: game_id(10),
        },
        Utc::now(),
    )
}

fn games_with(owners: &[(i64, i64)]) -> MockGameRepository {
    let mut games = MockGameRepository::new();
    let catalogue: Vec<Game> = owners.iter().map(|&(id, owner)| game(id, owner)).collect();
    games.expect_find_by_id().returning(move |id| {
        Ok(catalogue.iter().find(|game| game.id() == id).cloned())
    });
    games
}

fn service(
    offers: MockTradeOfferRepository,
    games: MockGameRepository,
) -> TradeOfferService<MockTradeOfferRepository, MockGameRepository> {
    TradeOfferService::new(Arc::new(offers), Arc::new(games))
}

#[fixture]
fn request() -> OfferRequest {
    OfferRequest {
        requester_id: 1,
        game_requested_id: 20,
        game_offered_id: 10,
    }
}

#[rstest]
#[tokio::test]
async fn create_offer_stores_pending_offer_with_requested_owner(request: OfferRequest) {
    let mut offers = MockTradeOfferRepository::new();
    offers
        .expect_insert()
        .withf(|offer| offer.owner == user(2) && offer.requester == user(1))
        .times(1)
        .returning(|offer| Ok(TradeOffer::pending(offer_id(5), *offer, Utc::now())));

    let created = service(offers, games_with(&[(20, 2), (10, 1)]))
        .create_offer(request)
        .await
        .expect("offer created");

    assert_eq!(created.status(), OfferStatus::Pending);
    assert_eq!(created.game_requested(), game_id(20));
}

#[rstest]
#[case(OfferRequest { requester_id: 0, game_requested_id: 20, game_offered_id: 10 }, ErrorCode::InvalidRequest, "invalid_input")]
#[case(OfferRequest { requester_id: 1, game_requested_id: 10, game_offered_id: 10 }, ErrorCode::InvalidRequest, "self_trade_not_allowed")]
#[case(OfferRequest { requester_id: 1, game_requested_id: 99, game_offered_id: 10 }, ErrorCode::NotFound, "game_not_found")]
#[case(OfferRequest { requester_id: 3, game_requested_id: 20, game_offered_id: 10 }, ErrorCode::InvalidRequest, "not_your_game")]
#[case(OfferRequest { requester_id: 2, game_requested_id: 20, game_offered_id: 30 }, ErrorCode::InvalidRequest, "cannot_request_own_game")]
#[tokio::test]
async fn create_offer_rejections_are_mapped(
    #[case] request: OfferRequest,
    #[case] expected_code: ErrorCode,
    #[case] detail: &str,
) {
    let mut offers = MockTradeOfferRepository::new();
    offers.expect_insert().times(0);

    let error = service(offers, games_with(&[(20, 2), (10, 1), (30, 2)]))
        .create_offer(request)
        .await
        .expect_err("rejected");

    assert_eq!(error.code(), expected_code);
    assert_eq!(error.detail_code(), Some(detail));
}

#[rstest]
#[tokio::test]
async fn create_offer_maps_game_connection_error(request: OfferRequest) {
    let mut games = MockGameRepository::new();
    games
        .expect_find_by_id()
        .returning(|_| Err(GameRepositoryError::connection("refused")));

    let error = service(MockTradeOfferRepository::new(), games)
        .create_offer(request)
        .await
        .expect_err("unavailable");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn respond_to_missing_offer_is_not_found() {
    let mut offers = MockTradeOfferRepository::new();
    offers.expect_find_by_id().returning(|_| Ok(None));

    let error = service(offers, MockGameRepository::new())
        .respond_to_offer(RespondToOfferRequest {
            offer_id: offer_id(5),
            actor: Some(user(2)),
            response: OfferResponse::Reject,
        })
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.detail_code(), Some("offer_not_found"));
}

#[rstest]
#[tokio::test]
async fn respond_by_non_owner_is_forbidden() {
    let mut offers = MockTradeOfferRepository::new();
    offers
        .expect_find_by_id()
        .returning(|_| Ok(Some(pending_offer())));
    offers.expect_accept().times(0);

    let error = service(offers, MockGameRepository::new())
        .respond_to_offer(RespondToOfferRequest {
            offer_id: offer_id(5),
            actor: Some(user(1)),
            response: OfferResponse::Accept,
        })
        .await
        .expect_err("forbidden");

    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(error.detail_code(), Some("not_owner"));
}

#[rstest]
#[tokio::test]
async fn respond_to_settled_offer_is_conflict() {
    let mut offers = MockTradeOfferRepository::new();
    offers.expect_find_by_id().returning(|_| {
        Ok(Some(
            pending_offer().with_status(OfferStatus::Rejected, Utc::now()),
        ))
    });

    let error = service(offers, MockGameRepository::new())
        .respond_to_offer(RespondToOfferRequest {
            offer_id: offer_id(5),
            actor: Some(user(2)),
            response: OfferResponse::Accept,
        })
        .await
        .expect_err("conflict");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.detail_code(), Some("offer_not_pending"));
}

#[rstest]
#[tokio::test]
async fn accept_delegates_to_atomic_settlement() {
    let mut offers = MockTradeOfferRepository::new();
    offers
        .expect_find_by_id()
        .returning(|_| Ok(Some(pending_offer())));
    offers
        .expect_accept()
        .with(eq(offer_id(5)))
        .times(1)
        .returning(|_| {
            Ok(AcceptedTrade {
                offer: pending_offer().with_status(OfferStatus::Accepted, Utc::now()),
                transfers: [
                    OwnershipTransfer {
                        game_id: game_id(20),
                        from: user(2),
                        to: user(1),
                    },
                    OwnershipTransfer {
                        game_id: game_id(10),
                        from: user(1),
                        to: user(2),
                    },
                ],
                cancelled_offers: vec![offer_id(6)],
            })
        });
    offers.expect_close_pending().times(0);

    let resolution = service(offers, MockGameRepository::new())
        .respond_to_offer(RespondToOfferRequest {
            offer_id: offer_id(5),
            actor: Some(user(2)),
            response: OfferResponse::Accept,
        })
        .await
        .expect("accepted");

    assert_eq!(resolution.status, OfferStatus::Accepted);
    assert_eq!(resolution.cancelled_offers, vec![offer_id(6)]);
}

#[rstest]
#[case(AcceptanceError::OfferStale, "offer_stale")]
#[case(AcceptanceError::OfferNotPending { status: OfferStatus::Cancelled }, "offer_not_pending")]
#[case(AcceptanceError::Conflict { message: "could not serialize access".to_owned() }, "conflict")]
#[tokio::test]
async fn acceptance_failures_are_conflicts(#[case] reason: AcceptanceError, #[case] detail: &str) {
    let mut offers = MockTradeOfferRepository::new();
    offers
        .expect_find_by_id()
        .returning(|_| Ok(Some(pending_offer())));
    offers
        .expect_accept()
        .return_once(move |_| Err(TradeOfferRepositoryError::acceptance(reason)));

    let error = service(offers, MockGameRepository::new())
        .respond_to_offer(RespondToOfferRequest {
            offer_id: offer_id(5),
            actor: Some(user(2)),
            response: OfferResponse::Accept,
        })
        .await
        .expect_err("conflict");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.detail_code(), Some(detail));
}

#[rstest]
#[tokio::test]
async fn reject_applies_conditional_status_change() {
    let mut offers = MockTradeOfferRepository::new();
    offers
        .expect_find_by_id()
        .returning(|_| Ok(Some(pending_offer())));
    offers
        .expect_close_pending()
        .with(eq(OfferTransition {
            offer_id: offer_id(5),
            to: OfferStatus::Rejected,
        }))
        .times(1)
        .returning(|_| Ok(true));
    offers.expect_accept().times(0);

    let resolution = service(offers, MockGameRepository::new())
        .respond_to_offer(RespondToOfferRequest {
            offer_id: offer_id(5),
            actor: Some(user(2)),
            response: OfferResponse::Reject,
        })
        .await
        .expect("rejected");

    assert_eq!(resolution.status, OfferStatus::Rejected);
    assert!(resolution.cancelled_offers.is_empty());
}

#[rstest]
#[tokio::test]
async fn cancel_losing_race_reports_not_pending() {
    let mut offers = MockTradeOfferRepository::new();
    offers
        .expect_find_by_id()
        .returning(|_| Ok(Some(pending_offer())));
    offers.expect_close_pending().returning(|_| Ok(false));

    let error = service(offers, MockGameRepository::new())
        .respond_to_offer(RespondToOfferRequest {
            offer_id: offer_id(5),
            actor: Some(user(2)),
            response: OfferResponse::Cancel,
        })
        .await
        .expect_err("lost race");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.detail_code(), Some("offer_not_pending"));
}

#[rstest]
#[case(OfferDirection::Incoming)]
#[case(OfferDirection::Outgoing)]
#[tokio::test]
async fn list_offers_selects_side_by_direction(#[case] direction: OfferDirection) {
    let mut offers = MockTradeOfferRepository::new();
    let (owner_calls, requester_calls) = match direction {
        OfferDirection::Incoming => (1, 0),
        OfferDirection::Outgoing => (0, 1),
    };
    offers
        .expect_list_by_owner()
        .times(owner_calls)
        .returning(|_| Ok(vec![pending_offer()]));
    offers
        .expect_list_by_requester()
        .times(requester_calls)
        .returning(|_| Ok(vec![pending_offer()]));

    let listed = service(offers, MockGameRepository::new())
        .list_offers(user(2), direction)
        .await
        .expect("listed");

    assert_eq!(listed.len(), 1);
}

#[rstest]
#[tokio::test]
async fn query_errors_are_internal() {
    let mut offers = MockTradeOfferRepository::new();
    offers
        .expect_find_by_id()
        .returning(|_| Err(TradeOfferRepositoryError::query("relation missing")));

    let error = service(offers, MockGameRepository::new())
        .get_offer(offer_id(5))
        .await
        .expect_err("internal");

    assert_eq!(error.code(), ErrorCode::InternalError);
}
