use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::seat::SeatId;
use crate::{ReservationError, ReservationResult};

/// Trip and customer details supplied with a ticket purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub origin: String,
    pub destination: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl PurchaseRequest {
    pub fn validate(&self) -> ReservationResult<()> {
        if self.email.trim().is_empty() {
            return Err(ReservationError::InvalidRequest(
                "customer email is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// An active reservation, keyed by the customer's email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub origin: String,
    pub destination: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub seat: SeatId,
    pub price_paid: f64,
    pub issued_at: DateTime<Utc>,
}

impl Receipt {
    pub fn issue(request: PurchaseRequest, seat: SeatId, price_paid: f64) -> Self {
        Self {
            origin: request.origin,
            destination: request.destination,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            seat,
            price_paid,
            issued_at: Utc::now(),
        }
    }

    pub fn section(&self) -> &str {
        &self.seat.section
    }

    pub fn seat_number(&self) -> u32 {
        self.seat.number
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSeat {
    pub email: String,
    pub section: String,
    pub seat_number: u32,
}

impl From<&Receipt> for UserSeat {
    fn from(receipt: &Receipt) -> Self {
        Self {
            email: receipt.email.clone(),
            section: receipt.seat.section.clone(),
            seat_number: receipt.seat.number,
        }
    }
}

/// Occupancy summary for one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionAvailability {
    pub section: String,
    pub capacity: u32,
    pub occupied: u32,
    pub available: u32,
}

impl SectionAvailability {
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.occupied as f64 / self.capacity as f64
        }
    }
}
