use serde::{Deserialize, Serialize};

/// Lifecycle events emitted after a reservation mutation has been applied.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationEvent {
    TicketPurchased {
        email: String,
        seat_section: String,
        seat_number: u32,
        price_paid: f64,
        occurred_at: i64,
    },
    TicketCancelled {
        email: String,
        seat_section: String,
        seat_number: u32,
        occurred_at: i64,
    },
    SeatChanged {
        email: String,
        from_section: String,
        from_number: u32,
        to_section: String,
        to_number: u32,
        occurred_at: i64,
    },
}

impl ReservationEvent {
    pub fn email(&self) -> &str {
        match self {
            Self::TicketPurchased { email, .. }
            | Self::TicketCancelled { email, .. }
            | Self::SeatChanged { email, .. } => email,
        }
    }

    /// Sections whose occupancy changed because of this event.
    pub fn touches_section(&self, section: &str) -> bool {
        match self {
            Self::TicketPurchased { seat_section, .. } | Self::TicketCancelled { seat_section, .. } => {
                seat_section == section
            }
            Self::SeatChanged { from_section, to_section, .. } => {
                from_section == section || to_section == section
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::TicketPurchased { .. } => "ticket_purchased",
            Self::TicketCancelled { .. } => "ticket_cancelled",
            Self::SeatChanged { .. } => "seat_changed",
        }
    }
}
