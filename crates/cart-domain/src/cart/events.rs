//! Cart domain events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::{CartId, ClientId, LineItem};

/// Events that can occur on a cart aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CartEvent {
    /// Cart was opened for a client.
    CartOpened(CartOpenedData),

    /// Units of a product were put in the cart.
    ItemAdded(ItemAddedData),

    /// Units of a product were taken out of the cart.
    ItemRemoved(ItemRemovedData),

    /// Cart was confirmed.
    CartConfirmed(CartConfirmedData),

    /// Cart was canceled.
    CartCanceled(CartCanceledData),
}

impl DomainEvent for CartEvent {
    const EVENT_TYPES: &'static [&'static str] = &[
        "CartOpened",
        "ItemAdded",
        "ItemRemoved",
        "CartConfirmed",
        "CartCanceled",
    ];

    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::CartOpened(_) => "CartOpened",
            CartEvent::ItemAdded(_) => "ItemAdded",
            CartEvent::ItemRemoved(_) => "ItemRemoved",
            CartEvent::CartConfirmed(_) => "CartConfirmed",
            CartEvent::CartCanceled(_) => "CartCanceled",
        }
    }
}

/// Data for CartOpened event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartOpenedData {
    /// The new cart's ID.
    pub cart_id: CartId,

    /// The client the cart belongs to.
    pub client_id: ClientId,
}

/// Data for ItemAdded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAddedData {
    pub cart_id: CartId,

    /// Product, number of units added and unit price.
    pub item: LineItem,
}

/// Data for ItemRemoved event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemovedData {
    pub cart_id: CartId,

    /// Product and number of units removed. The unit price is informational.
    pub item: LineItem,
}

/// Data for CartConfirmed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfirmedData {
    pub cart_id: CartId,
    pub confirmed_at: DateTime<Utc>,
}

/// Data for CartCanceled event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCanceledData {
    pub cart_id: CartId,
    pub canceled_at: DateTime<Utc>,
}

// Convenience constructors for events.
// Timestamps come from the caller; no constructor reads the clock.
impl CartEvent {
    /// Creates a CartOpened event.
    pub fn cart_opened(cart_id: CartId, client_id: ClientId) -> Self {
        CartEvent::CartOpened(CartOpenedData { cart_id, client_id })
    }

    /// Creates an ItemAdded event.
    pub fn item_added(cart_id: CartId, item: LineItem) -> Self {
        CartEvent::ItemAdded(ItemAddedData { cart_id, item })
    }

    /// Creates an ItemRemoved event.
    pub fn item_removed(cart_id: CartId, item: LineItem) -> Self {
        CartEvent::ItemRemoved(ItemRemovedData { cart_id, item })
    }

    /// Creates a CartConfirmed event.
    pub fn cart_confirmed(cart_id: CartId, confirmed_at: DateTime<Utc>) -> Self {
        CartEvent::CartConfirmed(CartConfirmedData {
            cart_id,
            confirmed_at,
        })
    }

    /// Creates a CartCanceled event.
    pub fn cart_canceled(cart_id: CartId, canceled_at: DateTime<Utc>) -> Self {
        CartEvent::CartCanceled(CartCanceledData {
            cart_id,
            canceled_at,
        })
    }

    /// Returns the cart this event belongs to.
    pub fn cart_id(&self) -> CartId {
        match self {
            CartEvent::CartOpened(data) => data.cart_id,
            CartEvent::ItemAdded(data) => data.cart_id,
            CartEvent::ItemRemoved(data) => data.cart_id,
            CartEvent::CartConfirmed(data) => data.cart_id,
            CartEvent::CartCanceled(data) => data.cart_id,
        }
    }
}
