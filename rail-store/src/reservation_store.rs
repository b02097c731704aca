use rail_core::{
    LedgerPolicy, LedgerSnapshot, PurchaseRequest, Receipt, ReservationResult, SeatId, SeatLedger,
    SectionAvailability, SectionLayout, UserSeat,
};
use rail_shared::Masked;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::app_config::TrainConfig;

/// The single authority over seat occupancy and receipts.
///
/// Every operation, reads included, runs inside one exclusive critical section,
/// so callers only ever observe states reachable by some serial ordering of the
/// mutations. Nothing inside the lock blocks or sleeps.
pub struct ReservationStore {
    ledger: Mutex<SeatLedger>,
}

impl ReservationStore {
    pub fn new(layout: SectionLayout, policy: LedgerPolicy) -> Self {
        Self {
            ledger: Mutex::new(SeatLedger::new(layout, policy)),
        }
    }

    pub fn from_config(train: &TrainConfig) -> ReservationResult<Self> {
        Ok(Self::new(train.layout()?, train.policy()))
    }

    pub async fn purchase(&self, request: PurchaseRequest) -> ReservationResult<Receipt> {
        let email = Masked(request.email.clone());
        info!("Received purchase request for user: {}", email);

        let result = self.ledger.lock().await.purchase(request);
        match &result {
            Ok(receipt) => info!(
                "Purchase successful for user: {}, seat: {}, price: {}",
                email, receipt.seat, receipt.price_paid
            ),
            Err(e) => warn!("Purchase failed for user: {}: {}", email, e),
        }
        result
    }

    pub async fn view_receipt(&self, email: &str) -> ReservationResult<Receipt> {
        let result = self.ledger.lock().await.receipt(email);
        if let Err(e) = &result {
            warn!("Receipt lookup failed for user: {}: {}", Masked(email), e);
        }
        result
    }

    pub async fn users_by_section(&self, section: &str) -> Vec<UserSeat> {
        let users = self.ledger.lock().await.users_in_section(section);
        info!("Returning {} users for section: {}", users.len(), section);
        users
    }

    pub async fn remove_user(&self, email: &str) -> ReservationResult<Receipt> {
        let result = self.ledger.lock().await.remove(email);
        match &result {
            Ok(receipt) => info!("User removed: {}, released seat {}", Masked(email), receipt.seat),
            Err(e) => warn!("Removal failed for user: {}: {}", Masked(email), e),
        }
        result
    }

    /// Returns the seat held before the move together with the updated receipt.
    pub async fn modify_seat(
        &self,
        email: &str,
        new_section: &str,
    ) -> ReservationResult<(SeatId, Receipt)> {
        let result = {
            let mut ledger = self.ledger.lock().await;
            ledger.receipt(email).and_then(|current| {
                ledger
                    .modify_seat(email, new_section)
                    .map(|receipt| (current.seat, receipt))
            })
        };

        match &result {
            Ok((previous, receipt)) => info!(
                "Seat modified for user: {}, {} -> {}",
                Masked(email),
                previous,
                receipt.seat
            ),
            Err(e) => warn!("Seat modification failed for user: {}: {}", Masked(email), e),
        }
        result
    }

    pub async fn is_seat_occupied(&self, seat: &SeatId) -> bool {
        self.ledger.lock().await.is_seat_occupied(seat)
    }

    pub async fn occupancy(&self, seat: &SeatId) -> u32 {
        self.ledger.lock().await.occupancy(seat)
    }

    pub async fn availability(&self) -> Vec<SectionAvailability> {
        self.ledger.lock().await.availability()
    }

    pub async fn layout(&self) -> SectionLayout {
        self.ledger.lock().await.layout().clone()
    }

    pub async fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.lock().await.snapshot()
    }
}
