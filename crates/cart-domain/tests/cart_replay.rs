//! Integration tests for rebuilding carts from their event history.
//!
//! These tests drive the public replay API end to end: ordering, line
//! merging, status rules and error reporting.

use cart_domain::{
    Aggregate, Cart, CartError, CartEvent, CartId, CartStatus, ClientId, LineItem, Money,
    RecordedEvent, ReplayError, ReplayOptions, fold, reconstruct, reconstruct_recorded,
    reconstruct_with,
};
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

fn cart_x() -> CartId {
    CartId::from_uuid(Uuid::from_u128(0x1000))
}

fn client_y() -> ClientId {
    ClientId::from_uuid(Uuid::from_u128(0x2000))
}

fn t1() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 14, 15, 9, 26).unwrap()
}

fn t2() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 14, 16, 0, 0).unwrap()
}

fn shoes(quantity: u32) -> LineItem {
    LineItem::new("shoes", quantity, Money::from_units(100))
}

fn tshirt(quantity: u32) -> LineItem {
    LineItem::new("tshirt", quantity, Money::from_units(50))
}

fn open() -> CartEvent {
    CartEvent::cart_opened(cart_x(), client_y())
}

fn add(item: LineItem) -> CartEvent {
    CartEvent::item_added(cart_x(), item)
}

fn remove(item: LineItem) -> CartEvent {
    CartEvent::item_removed(cart_x(), item)
}

/// Open, add shoes x2 and tshirt x1, remove one shoe, confirm, cancel.
fn checkout_history() -> Vec<CartEvent> {
    vec![
        open(),
        add(shoes(2)),
        add(tshirt(1)),
        remove(shoes(1)),
        CartEvent::cart_confirmed(cart_x(), t1()),
        CartEvent::cart_canceled(cart_x(), t2()),
    ]
}

mod end_to_end {
    use super::*;

    #[test]
    fn checkout_then_cancel() {
        let cart = reconstruct(&checkout_history()).unwrap();

        assert_eq!(cart.id(), cart_x());
        assert_eq!(cart.client_id(), client_y());
        assert_eq!(cart.lines(), &[shoes(1), tshirt(1)]);
        assert_eq!(cart.status(), CartStatus::Canceled);
        assert_eq!(cart.confirmed_at(), Some(t1()));
        assert_eq!(cart.canceled_at(), Some(t2()));
        assert_eq!(cart.total_amount(), Money::from_units(150));
    }

    #[test]
    fn replay_is_deterministic() {
        let history = checkout_history();

        let first = reconstruct(&history).unwrap();
        let second = reconstruct(&history).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn every_prefix_of_a_valid_history_replays() {
        let history = checkout_history();

        for len in 1..=history.len() {
            assert!(reconstruct(&history[..len]).is_ok(), "prefix of {len} failed");
        }
    }

    #[test]
    fn recorded_history_rebuilds_same_cart() {
        let history = checkout_history();
        let records: Vec<RecordedEvent> = history
            .iter()
            .map(|event| RecordedEvent::from_event(event).unwrap())
            .collect();

        assert_eq!(
            reconstruct_recorded(&records).unwrap(),
            reconstruct(&history).unwrap()
        );
    }

    #[test]
    fn independent_replays_on_separate_threads() {
        let history = checkout_history();
        let expected = reconstruct(&history).unwrap();

        let carts: Vec<Cart> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| reconstruct(&history).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(carts.iter().all(|cart| *cart == expected));
    }
}

mod line_items {
    use super::*;

    #[test]
    fn adding_same_product_merges_lines() {
        let cart = reconstruct(&[open(), add(shoes(2)), add(shoes(3))]).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines(), &[shoes(5)]);
    }

    #[test]
    fn removing_all_units_deletes_line() {
        let cart = reconstruct(&[open(), add(shoes(2)), remove(shoes(2))]).unwrap();

        assert!(cart.line(&"shoes".into()).is_none());
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn partial_removal_keeps_unit_price() {
        let cart = reconstruct(&[open(), add(shoes(2)), remove(shoes(1))]).unwrap();

        let line = cart.line(&"shoes".into()).unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.unit_price, Money::from_units(100));
    }

    #[test]
    fn removed_line_can_be_added_again_at_the_end() {
        let cart = reconstruct(&[
            open(),
            add(shoes(1)),
            add(tshirt(1)),
            remove(shoes(1)),
            add(shoes(4)),
        ])
        .unwrap();

        assert_eq!(cart.lines(), &[tshirt(1), shoes(4)]);
    }

    #[test]
    fn negative_unit_price_is_rejected() {
        let refund = LineItem::new("shoes", 2, Money::from_cents(-500));
        let error = reconstruct(&[open(), add(refund)]).unwrap_err();

        assert_eq!(error.index(), Some(1));
        assert_eq!(
            error.aggregate_error(),
            Some(&CartError::InvalidPrice {
                product_id: "shoes".into(),
                price: Money::from_cents(-500),
            })
        );
    }

    #[test]
    fn removing_unknown_product_fails() {
        let error = reconstruct(&[open(), add(tshirt(1)), remove(shoes(1))]).unwrap_err();

        assert_eq!(error.index(), Some(2));
        assert_eq!(
            error.aggregate_error(),
            Some(&CartError::UnknownLine {
                product_id: "shoes".into()
            })
        );
    }

    #[test]
    fn removing_more_than_available_fails() {
        let error = reconstruct(&[open(), add(shoes(1)), remove(shoes(3))]).unwrap_err();

        assert_eq!(error.index(), Some(2));
        assert_eq!(
            error.aggregate_error(),
            Some(&CartError::InsufficientQuantity {
                product_id: "shoes".into(),
                requested: 3,
                available: 1,
            })
        );
    }
}

mod lifecycle {
    use super::*;

    #[test]
    fn events_before_open_are_rejected() {
        let error = reconstruct(&[add(shoes(1)), open()]).unwrap_err();

        assert!(matches!(
            error,
            ReplayError::Apply {
                index: 0,
                event_type: "ItemAdded",
                source: CartError::UninitializedAggregate { .. },
            }
        ));
    }

    #[test]
    fn second_open_is_rejected() {
        let error = reconstruct(&[open(), open()]).unwrap_err();

        assert_eq!(
            error.aggregate_error(),
            Some(&CartError::AlreadyOpened { cart_id: cart_x() })
        );
    }

    #[test]
    fn confirmed_cart_rejects_new_items() {
        let error = reconstruct(&[
            open(),
            add(shoes(1)),
            CartEvent::cart_confirmed(cart_x(), t1()),
            add(tshirt(1)),
        ])
        .unwrap_err();

        assert_eq!(error.index(), Some(3));
        assert!(matches!(
            error.aggregate_error(),
            Some(CartError::CartClosed {
                status: CartStatus::Confirmed,
                ..
            })
        ));
    }

    #[test]
    fn canceled_cart_rejects_removals() {
        let error = reconstruct(&[
            open(),
            add(shoes(1)),
            CartEvent::cart_canceled(cart_x(), t1()),
            remove(shoes(1)),
        ])
        .unwrap_err();

        assert!(matches!(
            error.aggregate_error(),
            Some(CartError::CartClosed {
                status: CartStatus::Canceled,
                ..
            })
        ));
    }

    #[test]
    fn double_confirm_is_rejected() {
        let error = reconstruct(&[
            open(),
            CartEvent::cart_confirmed(cart_x(), t1()),
            CartEvent::cart_confirmed(cart_x(), t2()),
        ])
        .unwrap_err();

        assert!(matches!(
            error.aggregate_error(),
            Some(CartError::InvalidStatusTransition { .. })
        ));
    }

    #[test]
    fn events_for_another_cart_are_rejected() {
        let other = CartId::from_uuid(Uuid::from_u128(0x3000));
        let error =
            reconstruct(&[open(), CartEvent::item_added(other, shoes(1))]).unwrap_err();

        assert!(matches!(
            error.aggregate_error(),
            Some(CartError::CartMismatch { .. })
        ));
    }
}

mod replay_driver {
    use super::*;

    #[test]
    fn empty_history() {
        assert!(fold(&Vec::new()).unwrap().is_none());
        assert!(matches!(
            reconstruct(&Vec::new()),
            Err(ReplayError::EmptyHistory { .. })
        ));
    }

    #[test]
    fn expected_cart_id_is_checked() {
        let history = checkout_history();

        assert!(reconstruct_with(&history, &ReplayOptions::expect_id(cart_x())).is_ok());

        let other = CartId::from_uuid(Uuid::from_u128(0x3000));
        let error = reconstruct_with(&history, &ReplayOptions::expect_id(other)).unwrap_err();
        assert!(matches!(error, ReplayError::UnexpectedAggregate { .. }));
        assert_eq!(error.index(), None);
    }

    #[test]
    fn error_message_identifies_offending_event() {
        let error = reconstruct(&[open(), remove(shoes(1))]).unwrap_err();

        assert_eq!(
            error.to_string(),
            "Event 1 (ItemRemoved) rejected: Product not found: shoes"
        );
    }

    #[test]
    fn unsupported_recorded_event_is_fatal() {
        let records = vec![
            RecordedEvent::from_event(&open()).unwrap(),
            RecordedEvent::new("CouponApplied", serde_json::json!({ "code": "SPRING" })),
        ];

        let error = reconstruct_recorded(&records).unwrap_err();

        assert_eq!(error.index(), Some(1));
        assert_eq!(error.reason(), "unsupported_event");
    }

    #[test]
    fn apply_can_be_driven_step_by_step() {
        let history = checkout_history();

        let cart = history
            .iter()
            .try_fold(None, |state, event| Cart::apply(state, event).map(Some))
            .unwrap()
            .unwrap();

        assert_eq!(cart, reconstruct(&history).unwrap());
    }
}
