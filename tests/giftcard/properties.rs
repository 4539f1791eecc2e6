use giftcard_ledger::{
    Aggregate, CardSummaryFilter, FetchCardSummariesQuery, GiftCardCommand, GiftCardLedger,
    LedgerConfig, SubmitError,
};
use proptest::prelude::*;

fn command() -> impl Strategy<Value = GiftCardCommand> {
    let id = prop::sample::select(vec!["A", "B", "C"]);
    prop_oneof![
        (id.clone(), -5i64..200).prop_map(|(id, amount)| GiftCardCommand::issue(id, amount)),
        (id.clone(), -5i64..200).prop_map(|(id, amount)| GiftCardCommand::redeem(id, amount)),
        id.prop_map(|id| GiftCardCommand::cancel(id)),
    ]
}

proptest! {
    #[test]
    fn balance_stays_within_issued_value(commands in prop::collection::vec(command(), 0..40)) {
        let ledger = GiftCardLedger::in_memory(LedgerConfig::default());

        for command in commands {
            let id = command.id().to_string();
            let before = ledger.load(&id).unwrap();
            let decision = before.handle(&command);

            match (ledger.submit(command), decision) {
                (Ok(_), Ok(_)) => {}
                (Err(SubmitError::Rejected(got)), Err(expected)) => {
                    prop_assert_eq!(got, expected);
                }
                (outcome, expected) => {
                    prop_assert!(false, "submit gave {:?}, state decides {:?}", outcome, expected)
                }
            }

            let card = ledger.load(&id).unwrap();
            if card.exists() {
                prop_assert!(card.remaining_value() >= 0);
                prop_assert!(card.remaining_value() <= card.initial_value());
            }
        }

        // The projection converges on the replayed state.
        ledger.catch_up().unwrap();
        let rows = ledger
            .fetch(&FetchCardSummariesQuery::new(0, 10, CardSummaryFilter::default()))
            .unwrap();
        for row in rows {
            let card = ledger.load(&row.id).unwrap();
            prop_assert_eq!(row.initial_value, card.initial_value());
            prop_assert_eq!(row.remaining_value, card.remaining_value());
        }
    }
}
