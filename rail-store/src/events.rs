use chrono::Utc;
use rail_core::{Receipt, SeatId};
use rail_shared::ReservationEvent;
use tokio::sync::broadcast;
use tracing::debug;

/// In-process fan-out of reservation events to any number of listeners.
#[derive(Clone)]
pub struct EventProducer {
    sender: broadcast::Sender<ReservationEvent>,
}

impl EventProducer {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns the number of listeners that received the event.
    pub fn publish(&self, event: ReservationEvent) -> usize {
        let kind = event.kind();
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!("Published {} to {} listeners", kind, receivers);
                receivers
            }
            Err(_) => {
                debug!("Dropped {}: no listeners", kind);
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReservationEvent> {
        self.sender.subscribe()
    }
}

pub fn ticket_purchased(receipt: &Receipt) -> ReservationEvent {
    ReservationEvent::TicketPurchased {
        email: receipt.email.clone(),
        seat_section: receipt.seat.section.clone(),
        seat_number: receipt.seat.number,
        price_paid: receipt.price_paid,
        occurred_at: Utc::now().timestamp(),
    }
}

pub fn ticket_cancelled(receipt: &Receipt) -> ReservationEvent {
    ReservationEvent::TicketCancelled {
        email: receipt.email.clone(),
        seat_section: receipt.seat.section.clone(),
        seat_number: receipt.seat.number,
        occurred_at: Utc::now().timestamp(),
    }
}

pub fn seat_changed(from: &SeatId, receipt: &Receipt) -> ReservationEvent {
    ReservationEvent::SeatChanged {
        email: receipt.email.clone(),
        from_section: from.section.clone(),
        from_number: from.number,
        to_section: receipt.seat.section.clone(),
        to_number: receipt.seat.number,
        occurred_at: Utc::now().timestamp(),
    }
}
