use crate::bookings::{BookingError, BookingStatus};

/// Service for managing booking status transitions
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Arguments
    /// * `from` - Current booking status
    /// * `to` - Desired new status
    ///
    /// # Returns
    /// `true` if the transition is valid, `false` otherwise
    ///
    /// # Valid Transitions
    /// - Pending → Confirmed (payment), Cancelled (expiry or user)
    /// - Confirmed → Cancelled (cancellation with charge)
    /// - Cancelled → nothing
    ///
    /// Unlike order statuses, repeating a status is not a no-op here: a
    /// second confirmation or cancellation must be reported to the caller.
    pub fn is_valid_transition(from: BookingStatus, to: BookingStatus) -> bool {
        matches!(
            (from, to),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }

    /// Attempt to transition from one status to another
    ///
    /// # Returns
    /// `Ok(to)` if the transition is valid, `Err(BookingError::AlreadyFinal)` otherwise
    pub fn transition(from: BookingStatus, to: BookingStatus) -> Result<BookingStatus, BookingError> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            tracing::debug!("Rejected booking transition from {} to {}", from, to);
            Err(BookingError::AlreadyFinal)
        }
    }

    /// Whether no further transitions are possible
    pub fn is_terminal(status: BookingStatus) -> bool {
        status == BookingStatus::Cancelled
    }
}
