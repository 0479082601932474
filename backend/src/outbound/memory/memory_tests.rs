//! Tests for the in-memory repositories.

use rstest::{fixture, rstest};

use super::*;
use crate::domain::{
    EmailAddress, GameDetailsDraft, Password, PasswordHash, StreetAddress, Username,
};

struct Seeded {
    store: InMemoryStore,
    alice: UserId,
    bob: UserId,
    carol: UserId,
    catan: GameId,
    azul: GameId,
    root: GameId,
}

fn new_user(name: &str) -> NewUser {
    NewUser {
        username: Username::new(name).expect("username"),
        email: EmailAddress::new(format!("{name}@example.com")).expect("email"),
        street_address: StreetAddress::new("1 High Street").expect("address"),
        password_hash: PasswordHash::derive(
            &Password::new("correct horse".to_owned()).expect("password"),
        ),
    }
}

fn new_game(owner: UserId, title: &str) -> NewGame {
    NewGame {
        owner,
        details: GameDetails::new(GameDetailsDraft {
            title: title.to_owned(),
            publisher: "Publisher".to_owned(),
            description: "Boxed and complete".to_owned(),
            year: 2010,
            condition: "good".to_owned(),
        })
        .expect("details"),
    }
}

fn proposal(requester: UserId, owner: UserId, wanted: GameId, given: GameId) -> NewTradeOffer {
    NewTradeOffer {
        requester,
        owner,
        game_requested: wanted,
        game_offered: given,
    }
}

#[fixture]
async fn seeded() -> Seeded {
    let store = InMemoryStore::new();
    let users = store.users();
    let games = store.games();
    let alice = users.insert(&new_user("alice")).await.expect("alice").id();
    let bob = users.insert(&new_user("bob")).await.expect("bob").id();
    let carol = users.insert(&new_user("carol")).await.expect("carol").id();
    let catan = games.insert(&new_game(alice, "Catan")).await.expect("catan").id();
    let azul = games.insert(&new_game(bob, "Azul")).await.expect("azul").id();
    let root = games.insert(&new_game(carol, "Root")).await.expect("root").id();
    Seeded {
        store,
        alice,
        bob,
        carol,
        catan,
        azul,
        root,
    }
}

#[rstest]
#[tokio::test]
async fn identifiers_are_assigned_sequentially(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    assert_eq!(seeded.alice.get(), 1);
    assert_eq!(seeded.carol.get(), 3);
    assert_eq!(seeded.root.get(), 3);
}

#[rstest]
#[tokio::test]
async fn games_require_an_existing_owner() {
    let store = InMemoryStore::new();
    let ghost = UserId::new(42).expect("id");

    let err = store
        .games()
        .insert(&new_game(ghost, "Catan"))
        .await
        .expect_err("no owner");

    assert_eq!(err, GameRepositoryError::owner_not_found(42));
}

#[rstest]
#[tokio::test]
async fn browse_excludes_the_viewers_games(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let visible = seeded
        .store
        .games()
        .list_not_owned_by(seeded.alice)
        .await
        .expect("list");

    let ids: Vec<GameId> = visible.iter().map(Game::id).collect();
    assert_eq!(ids, vec![seeded.azul, seeded.root]);
}

#[rstest]
#[tokio::test]
async fn accept_swaps_owners_and_cancels_conflicting_offers(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let offers = seeded.store.offers();
    let winner = offers
        .insert(&proposal(seeded.bob, seeded.alice, seeded.catan, seeded.azul))
        .await
        .expect("winner");
    let rival = offers
        .insert(&proposal(seeded.carol, seeded.alice, seeded.catan, seeded.root))
        .await
        .expect("rival");
    let counter = offers
        .insert(&proposal(seeded.alice, seeded.carol, seeded.root, seeded.catan))
        .await
        .expect("counter");

    let accepted = offers.accept(winner.id()).await.expect("accepted");

    assert_eq!(accepted.offer.status(), OfferStatus::Accepted);
    assert_eq!(accepted.cancelled_offers, vec![rival.id(), counter.id()]);

    let games = seeded.store.games();
    let catan = games.find_by_id(seeded.catan).await.expect("find").expect("catan");
    let azul = games.find_by_id(seeded.azul).await.expect("find").expect("azul");
    assert_eq!(catan.owner(), seeded.bob);
    assert_eq!(azul.owner(), seeded.alice);

    let rival = offers.find_by_id(rival.id()).await.expect("find").expect("rival");
    assert_eq!(rival.status(), OfferStatus::Cancelled);
}

#[rstest]
#[tokio::test]
async fn second_acceptance_reports_not_pending(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let offers = seeded.store.offers();
    let offer = offers
        .insert(&proposal(seeded.bob, seeded.alice, seeded.catan, seeded.azul))
        .await
        .expect("offer");
    offers.accept(offer.id()).await.expect("first");

    let err = offers.accept(offer.id()).await.expect_err("second");

    assert_eq!(
        err,
        TradeOfferRepositoryError::acceptance(AcceptanceError::OfferNotPending {
            status: OfferStatus::Accepted,
        })
    );
    let catan = seeded
        .store
        .games()
        .find_by_id(seeded.catan)
        .await
        .expect("find")
        .expect("catan");
    assert_eq!(catan.owner(), seeded.bob);
}

#[rstest]
#[tokio::test]
async fn stale_offers_are_left_pending(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let offers = seeded.store.offers();
    // Root belongs to Carol, so the offer cannot settle.
    let offer = offers
        .insert(&proposal(seeded.bob, seeded.alice, seeded.catan, seeded.root))
        .await
        .expect("offer");

    let err = offers.accept(offer.id()).await.expect_err("stale");

    assert_eq!(
        err,
        TradeOfferRepositoryError::acceptance(AcceptanceError::OfferStale)
    );
    let stored = offers.find_by_id(offer.id()).await.expect("find").expect("offer");
    assert_eq!(stored.status(), OfferStatus::Pending);
}

#[rstest]
#[tokio::test]
async fn accept_unknown_offer_is_not_found() {
    let store = InMemoryStore::new();
    let id = OfferId::new(9).expect("id");

    let err = store.offers().accept(id).await.expect_err("missing");

    assert_eq!(
        err,
        TradeOfferRepositoryError::acceptance(AcceptanceError::OfferNotFound { offer_id: id })
    );
}

#[rstest]
#[tokio::test]
async fn close_pending_only_applies_once(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let offers = seeded.store.offers();
    let offer = offers
        .insert(&proposal(seeded.bob, seeded.alice, seeded.catan, seeded.azul))
        .await
        .expect("offer");
    let transition = OfferTransition {
        offer_id: offer.id(),
        to: OfferStatus::Rejected,
    };

    assert!(offers.close_pending(transition).await.expect("first"));
    assert!(!offers.close_pending(transition).await.expect("second"));
}

#[rstest]
#[tokio::test]
async fn offers_are_listed_by_party(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    let offers = seeded.store.offers();
    let outgoing = offers
        .insert(&proposal(seeded.bob, seeded.alice, seeded.catan, seeded.azul))
        .await
        .expect("offer");

    let by_requester = offers.list_by_requester(seeded.bob).await.expect("list");
    let by_owner = offers.list_by_owner(seeded.bob).await.expect("list");

    assert_eq!(by_requester, vec![outgoing]);
    assert!(by_owner.is_empty());
}

#[rstest]
#[tokio::test]
async fn referenced_rows_cannot_be_deleted(#[future] seeded: Seeded) {
    let seeded = seeded.await;
    seeded
        .store
        .offers()
        .insert(&proposal(seeded.bob, seeded.alice, seeded.catan, seeded.azul))
        .await
        .expect("offer");

    let game_err = seeded
        .store
        .games()
        .delete(seeded.catan)
        .await
        .expect_err("game in use");
    let user_err = seeded
        .store
        .users()
        .delete(seeded.carol)
        .await
        .expect_err("carol still owns root");

    assert_eq!(game_err, GameRepositoryError::in_use(seeded.catan.get()));
    assert_eq!(user_err, UserRepositoryError::in_use(seeded.carol.get()));
    assert!(
        seeded
            .store
            .games()
            .delete(seeded.root)
            .await
            .expect("root is free")
    );
}

#[rstest]
#[tokio::test]
async fn profile_updates_report_missing_users() {
    let store = InMemoryStore::new();
    let missing = UserId::new(5).expect("id");
    let profile = UserProfile {
        username: Username::new("dora").expect("username"),
        street_address: StreetAddress::new("2 Low Road").expect("address"),
    };

    assert!(!store.users().update_profile(missing, &profile).await.expect("update"));
    assert!(!store.users().delete(missing).await.expect("delete"));
}

#[rstest]
#[tokio::test]
async fn profile_updates_rewrite_stored_users() {
    let store = InMemoryStore::new();
    let users = store.users();
    let id = users.insert(&new_user("ada")).await.expect("ada").id();
    let profile = UserProfile {
        username: Username::new("ada2").expect("username"),
        street_address: StreetAddress::new("2 Low Road").expect("address"),
    };
    let street = StreetAddress::new("3 Mill Lane").expect("address");
    let patch = UserProfilePatch::new(None, Some(street)).expect("patch");

    assert!(users.update_profile(id, &profile).await.expect("update"));
    assert!(users.patch_profile(id, &patch).await.expect("patch"));
    let stored = users.find_by_id(id).await.expect("find").expect("present");

    assert_eq!(stored.username().as_str(), "ada2");
    assert_eq!(stored.street_address().as_str(), "3 Mill Lane");
    assert_eq!(stored.email().as_str(), "ada@example.com");
}
