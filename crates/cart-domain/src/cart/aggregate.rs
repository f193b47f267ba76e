//! Cart aggregate implementation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate::{Aggregate, DomainEvent};

use super::{
    CartError, CartEvent, CartId, CartStatus, ClientId, LineItem, Money, ProductId,
    events::CartOpenedData,
};

/// Cart aggregate root.
///
/// A `Cart` only exists once its `CartOpened` event has been applied. Every
/// later event must target the same cart and is checked against the current
/// status before it takes effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cart {
    /// Unique cart identifier.
    id: CartId,

    /// Client who owns the cart.
    client_id: ClientId,

    /// Current status of the cart.
    status: CartStatus,

    /// Lines in first-added order, at most one per product.
    lines: Vec<LineItem>,

    confirmed_at: Option<DateTime<Utc>>,

    canceled_at: Option<DateTime<Utc>>,
}

impl Aggregate for Cart {
    type Event = CartEvent;
    type Error = CartError;
    type Id = CartId;

    fn aggregate_type() -> &'static str {
        "Cart"
    }

    fn id(&self) -> CartId {
        self.id
    }

    fn apply(state: Option<Self>, event: &CartEvent) -> Result<Self, CartError> {
        match event {
            CartEvent::CartOpened(data) => match state {
                None => Ok(Self::open(data)),
                Some(cart) => Err(CartError::AlreadyOpened { cart_id: cart.id }),
            },
            CartEvent::ItemAdded(data) => Self::opened(state, event)?.add_item(&data.item),
            CartEvent::ItemRemoved(data) => Self::opened(state, event)?.remove_item(&data.item),
            CartEvent::CartConfirmed(data) => Self::opened(state, event)?.confirm(data.confirmed_at),
            CartEvent::CartCanceled(data) => Self::opened(state, event)?.cancel(data.canceled_at),
        }
    }
}

// Query methods
impl Cart {
    /// Returns the client ID.
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Returns the current status.
    pub fn status(&self) -> CartStatus {
        self.status
    }

    /// Returns all lines in first-added order.
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Returns the line for a product.
    pub fn line(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.lines.iter().find(|line| &line.product_id == product_id)
    }

    /// Returns the number of distinct products.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity of all lines.
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Returns the total amount of all lines.
    ///
    /// Saturates at `i64::MAX` cents rather than wrapping.
    pub fn total_amount(&self) -> Money {
        self.lines.iter().map(LineItem::total_price).sum()
    }

    /// Returns when the cart was confirmed.
    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at
    }

    /// Returns when the cart was canceled.
    pub fn canceled_at(&self) -> Option<DateTime<Utc>> {
        self.canceled_at
    }

    /// Returns true if lines can no longer change.
    pub fn is_closed(&self) -> bool {
        self.status.is_closed()
    }
}

// Transition rules
impl Cart {
    fn open(data: &CartOpenedData) -> Self {
        Self {
            id: data.cart_id,
            client_id: data.client_id,
            status: CartStatus::Pending,
            lines: Vec::new(),
            confirmed_at: None,
            canceled_at: None,
        }
    }

    /// Unwraps the previous state for any event other than `CartOpened`.
    fn opened(state: Option<Self>, event: &CartEvent) -> Result<Self, CartError> {
        let cart = state.ok_or(CartError::UninitializedAggregate {
            event_type: event.event_type(),
        })?;

        if event.cart_id() != cart.id {
            return Err(CartError::CartMismatch {
                expected: cart.id,
                actual: event.cart_id(),
            });
        }

        Ok(cart)
    }

    fn ensure_lines_modifiable(&self, action: &'static str) -> Result<(), CartError> {
        if self.status.can_modify_lines() {
            Ok(())
        } else {
            Err(CartError::CartClosed {
                status: self.status,
                action,
            })
        }
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| &line.product_id == product_id)
    }

    fn add_item(mut self, item: &LineItem) -> Result<Self, CartError> {
        self.ensure_lines_modifiable("add item")?;

        if item.unit_price.is_negative() {
            return Err(CartError::InvalidPrice {
                product_id: item.product_id.clone(),
                price: item.unit_price,
            });
        }

        if let Some(line) = self.lines.iter_mut().find(|line| line.same_product(item)) {
            line.quantity = line.quantity.checked_add(item.quantity).ok_or_else(|| {
                CartError::QuantityOverflow {
                    product_id: item.product_id.clone(),
                }
            })?;
        } else if item.quantity > 0 {
            self.lines.push(item.clone());
        }

        Ok(self)
    }

    fn remove_item(mut self, item: &LineItem) -> Result<Self, CartError> {
        self.ensure_lines_modifiable("remove item")?;

        let index = self
            .position(&item.product_id)
            .ok_or_else(|| CartError::UnknownLine {
                product_id: item.product_id.clone(),
            })?;

        let available = self.lines[index].quantity;
        let remaining =
            available
                .checked_sub(item.quantity)
                .ok_or_else(|| CartError::InsufficientQuantity {
                    product_id: item.product_id.clone(),
                    requested: item.quantity,
                    available,
                })?;

        if remaining == 0 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity = remaining;
        }

        Ok(self)
    }

    fn confirm(mut self, confirmed_at: DateTime<Utc>) -> Result<Self, CartError> {
        if !self.status.can_confirm() {
            return Err(CartError::InvalidStatusTransition {
                from: self.status,
                to: CartStatus::Confirmed,
            });
        }

        self.status = CartStatus::Confirmed;
        self.confirmed_at = Some(confirmed_at);
        Ok(self)
    }

    fn cancel(mut self, canceled_at: DateTime<Utc>) -> Result<Self, CartError> {
        if !self.status.can_cancel() {
            return Err(CartError::InvalidStatusTransition {
                from: self.status,
                to: CartStatus::Canceled,
            });
        }

        self.status = CartStatus::Canceled;
        self.canceled_at = Some(canceled_at);
        Ok(self)
    }
}
