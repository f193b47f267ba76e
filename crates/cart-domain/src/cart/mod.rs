//! Cart aggregate and related types.

mod aggregate;
mod events;
mod state;
mod value_objects;

pub use aggregate::Cart;
pub use events::{
    CartCanceledData, CartConfirmedData, CartEvent, CartOpenedData, ItemAddedData,
    ItemRemovedData,
};
pub use state::CartStatus;
pub use value_objects::{CartId, ClientId, LineItem, Money, ProductId};

use thiserror::Error;

/// Errors raised when an event cannot be applied to the current cart state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// An event arrived before the cart was opened.
    #[error("Cart not created: {event_type} requires an opened cart")]
    UninitializedAggregate { event_type: &'static str },

    /// A second CartOpened event arrived.
    #[error("Cart already opened: {cart_id}")]
    AlreadyOpened { cart_id: CartId },

    /// The event addresses a different cart.
    #[error("Event for cart {actual} applied to cart {expected}")]
    CartMismatch { expected: CartId, actual: CartId },

    /// Removal of a product that has no line in the cart.
    #[error("Product not found: {product_id}")]
    UnknownLine { product_id: ProductId },

    /// Removal of more units than the line holds.
    #[error("Insufficient quantity for {product_id}: requested {requested}, available {available}")]
    InsufficientQuantity {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// An added line carries a negative unit price.
    #[error("Invalid price for {product_id}: {price}")]
    InvalidPrice { product_id: ProductId, price: Money },

    /// Merging an addition would overflow the line quantity.
    #[error("Quantity overflow for {product_id}")]
    QuantityOverflow { product_id: ProductId },

    /// Lines changed after the cart left the Pending status.
    #[error("Cannot {action}: cart is {status}")]
    CartClosed {
        status: CartStatus,
        action: &'static str,
    },

    /// Status change not allowed from the current status.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition { from: CartStatus, to: CartStatus },
}
