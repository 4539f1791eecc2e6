//! Command-side behaviour of the gift-card service.

mod properties;
mod support;

use giftcard_ledger::{
    hydrate, EventStore, GiftCard, GiftCardCommand, GiftCardEvent, GiftCardService, Rejection,
    SubmitError,
};
use support::{service, RacingStore};

#[test]
fn issue_redeem_cancel_lifecycle() {
    let service = service();
    service.submit(GiftCardCommand::issue("X", 100)).unwrap();
    service.submit(GiftCardCommand::redeem("X", 30)).unwrap();
    service.submit(GiftCardCommand::cancel("X")).unwrap();

    let card = service.load("X").unwrap();
    assert!(card.exists());
    assert_eq!(card.initial_value(), 100);
    assert_eq!(card.remaining_value(), 0);

    let names: Vec<_> = service
        .events()
        .load_events("X")
        .unwrap()
        .iter()
        .map(|e| e.record.event_name.clone())
        .collect();
    assert_eq!(names, ["Issued", "Redeemed", "Cancelled"]);
}

#[test]
fn redeem_beyond_balance_is_rejected_without_event() {
    let service = service();
    service.submit(GiftCardCommand::issue("X", 80)).unwrap();
    service.submit(GiftCardCommand::redeem("X", 50)).unwrap();

    let err = service.submit(GiftCardCommand::redeem("X", 50)).unwrap_err();
    assert_eq!(
        err,
        SubmitError::Rejected(Rejection::InsufficientBalance {
            id: "X".into(),
            requested: 50,
            remaining: 30,
        })
    );
    assert_eq!(service.events().load_events("X").unwrap().len(), 2);
}

#[test]
fn second_issue_is_rejected() {
    let service = service();
    service.submit(GiftCardCommand::issue("X", 10)).unwrap();
    let err = service.submit(GiftCardCommand::issue("X", 20)).unwrap_err();
    assert_eq!(
        err.rejection(),
        Some(&Rejection::AlreadyIssued { id: "X".into() })
    );
    assert_eq!(service.load("X").unwrap().initial_value(), 10);
}

#[test]
fn commands_on_unknown_cards_are_not_found() {
    let service = service();
    for command in [GiftCardCommand::redeem("ghost", 5), GiftCardCommand::cancel("ghost")] {
        let err = service.submit(command).unwrap_err();
        assert_eq!(err.rejection(), Some(&Rejection::NotFound { id: "ghost".into() }));
    }
    assert_eq!(service.events().last_sequence().unwrap(), 0);
}

#[test]
fn non_positive_amounts_are_rejected() {
    let service = service();
    assert_eq!(
        service.submit(GiftCardCommand::issue("X", 0)).unwrap_err().rejection(),
        Some(&Rejection::InvalidAmount { amount: 0 })
    );

    service.submit(GiftCardCommand::issue("X", 10)).unwrap();
    assert_eq!(
        service.submit(GiftCardCommand::redeem("X", -3)).unwrap_err().rejection(),
        Some(&Rejection::InvalidAmount { amount: -3 })
    );
}

#[test]
fn cancel_twice_succeeds() {
    let service = service();
    service.submit(GiftCardCommand::issue("X", 40)).unwrap();
    service.submit(GiftCardCommand::cancel("X")).unwrap();
    service.submit(GiftCardCommand::cancel("X")).unwrap();

    let card = service.load("X").unwrap();
    assert_eq!(card.remaining_value(), 0);
    assert_eq!(card.initial_value(), 40);
}

#[test]
fn redeeming_a_cancelled_card_fails_on_balance() {
    let service = service();
    service.submit(GiftCardCommand::issue("X", 40)).unwrap();
    service.submit(GiftCardCommand::cancel("X")).unwrap();

    let err = service.submit(GiftCardCommand::redeem("X", 1)).unwrap_err();
    assert!(matches!(
        err.rejection(),
        Some(Rejection::InsufficientBalance { remaining: 0, .. })
    ));
}

#[test]
fn stale_append_surfaces_conflict_and_resubmit_succeeds() {
    support::init_tracing();
    let service = GiftCardService::new(RacingStore::default());
    service.submit(GiftCardCommand::issue("X", 10)).unwrap();

    // The first load of a non-empty stream lets the rival redeem 1 first.
    let err = service.submit(GiftCardCommand::redeem("X", 5)).unwrap_err();
    assert_eq!(
        err,
        SubmitError::ConcurrencyConflict {
            id: "X".into(),
            expected: 1,
            actual: 2,
        }
    );

    service.submit(GiftCardCommand::redeem("X", 5)).unwrap();
    assert_eq!(service.load("X").unwrap().remaining_value(), 4);
}

#[test]
fn stored_stream_replays_to_loaded_state() {
    let service = service();
    service.submit(GiftCardCommand::issue("X", 90)).unwrap();
    service.submit(GiftCardCommand::redeem("X", 15)).unwrap();

    let history = service.events().load_events("X").unwrap();
    let card: GiftCard = hydrate(&history).unwrap();
    assert_eq!(card, service.load("X").unwrap());

    let events: Vec<GiftCardEvent> = history
        .iter()
        .map(|stored| GiftCardEvent::try_from(&stored.record).unwrap())
        .collect();
    assert_eq!(
        events,
        [
            GiftCardEvent::Issued { id: "X".into(), amount: 90 },
            GiftCardEvent::Redeemed { id: "X".into(), amount: 15 },
        ]
    );
}
