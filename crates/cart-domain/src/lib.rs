//! Event-sourced shopping cart.
//!
//! This crate rebuilds a cart purely from its event history:
//! - Aggregate trait with a fallible, state-passing `apply`
//! - DomainEvent trait for closed sets of domain events
//! - Cart aggregate with line items and a confirm/cancel lifecycle
//! - Replay driver that folds an ordered history into the current cart

pub mod aggregate;
pub mod cart;
pub mod error;
pub mod recorded;
pub mod replay;

pub use aggregate::{Aggregate, DomainEvent};
pub use cart::{
    Cart, CartCanceledData, CartConfirmedData, CartError, CartEvent, CartId, CartOpenedData,
    CartStatus, ClientId, ItemAddedData, ItemRemovedData, LineItem, Money, ProductId,
};
pub use error::ReplayError;
pub use recorded::{DecodeError, RecordedEvent};
pub use replay::{
    ReplayOptions, fold, reconstruct, reconstruct_recorded, reconstruct_with, replay,
    replay_recorded,
};
