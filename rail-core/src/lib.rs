pub mod ledger;
pub mod receipt;
pub mod seat;

pub use ledger::{LedgerPolicy, LedgerSnapshot, SeatLedger};
pub use receipt::{PurchaseRequest, Receipt, SectionAvailability, UserSeat};
pub use seat::{SeatId, SectionLayout};

/// Fixed ticket price charged for every reservation.
pub const DEFAULT_TICKET_PRICE: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReservationError {
    #[error("No active reservation for user: {0}")]
    NotFound(String),
    #[error("All sections are full")]
    SeatsExhausted,
    #[error("No available seats found in section {section}")]
    NoAvailableSeats { section: String },
    #[error("User already holds a reservation: {0}")]
    DuplicateReservation(String),
    #[error("Unknown section: {0}")]
    UnknownSection(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Invalid seat layout: {0}")]
    InvalidLayout(String),
    #[error("Occupancy invariant violated: {0}")]
    Inconsistent(String),
}

pub type ReservationResult<T> = Result<T, ReservationError>;
