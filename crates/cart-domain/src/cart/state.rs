//! Cart status machine.

use serde::{Deserialize, Serialize};

/// The status of a cart in its lifecycle.
///
/// Status transitions:
/// ```text
/// Pending ──► Confirmed ──► Canceled
///    │                         ▲
///    └─────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CartStatus {
    /// Cart is open, lines can be added and removed.
    Pending,

    /// Cart was confirmed by the client.
    Confirmed,

    /// Cart was canceled (terminal state).
    Canceled,
}

impl CartStatus {
    /// Returns true if lines can be added or removed in this status.
    pub fn can_modify_lines(&self) -> bool {
        matches!(self, CartStatus::Pending)
    }

    /// Returns true if the cart can be confirmed in this status.
    pub fn can_confirm(&self) -> bool {
        matches!(self, CartStatus::Pending)
    }

    /// Returns true if the cart can be canceled in this status.
    pub fn can_cancel(&self) -> bool {
        matches!(self, CartStatus::Pending | CartStatus::Confirmed)
    }

    /// Returns true once the cart no longer accepts line changes.
    pub fn is_closed(&self) -> bool {
        !self.can_modify_lines()
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CartStatus::Pending => "Pending",
            CartStatus::Confirmed => "Confirmed",
            CartStatus::Canceled => "Canceled",
        }
    }
}

impl std::fmt::Display for CartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
