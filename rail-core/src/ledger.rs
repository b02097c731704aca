use std::collections::{BTreeMap, HashMap};

use rail_shared::Masked;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::receipt::{PurchaseRequest, Receipt, SectionAvailability, UserSeat};
use crate::seat::{SeatId, SectionLayout};
use crate::{ReservationError, ReservationResult, DEFAULT_TICKET_PRICE};

/// Pricing and reassignment knobs for a ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerPolicy {
    pub price: f64,
    /// Upper bound on the fallback scan used when moving a reservation to another
    /// section. `None` bounds it by the number of configured sections, which is
    /// the historical behaviour and usually smaller than the section capacity.
    /// Always clamped to the per-section capacity.
    pub reassign_scan_limit: Option<u32>,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            price: DEFAULT_TICKET_PRICE,
            reassign_scan_limit: None,
        }
    }
}

/// Seat occupancy plus the active reservations that justify it.
///
/// Every mutating operation validates and picks its target seat before writing
/// anything, so a failed call never leaves partial state behind.
#[derive(Debug, Clone)]
pub struct SeatLedger {
    layout: SectionLayout,
    policy: LedgerPolicy,
    occupancy: HashMap<SeatId, u32>,
    receipts: HashMap<String, Receipt>,
}

impl SeatLedger {
    pub fn new(layout: SectionLayout, policy: LedgerPolicy) -> Self {
        Self {
            layout,
            policy,
            occupancy: HashMap::new(),
            receipts: HashMap::new(),
        }
    }

    pub fn layout(&self) -> &SectionLayout {
        &self.layout
    }

    pub fn policy(&self) -> &LedgerPolicy {
        &self.policy
    }

    /// Book the first free seat, scanning sections in order and seats ascending.
    pub fn purchase(&mut self, request: PurchaseRequest) -> ReservationResult<Receipt> {
        request.validate()?;

        if self.receipts.contains_key(&request.email) {
            return Err(ReservationError::DuplicateReservation(request.email));
        }

        let seat = self
            .layout
            .seats()
            .find(|seat| !self.is_seat_occupied(seat))
            .ok_or(ReservationError::SeatsExhausted)?;

        debug!(email = %Masked(&request.email), seat = %seat, "first free seat selected");

        let receipt = Receipt::issue(request, seat.clone(), self.policy.price);
        self.occupy(seat);
        self.receipts.insert(receipt.email.clone(), receipt.clone());

        Ok(receipt)
    }

    pub fn receipt(&self, email: &str) -> ReservationResult<Receipt> {
        self.receipts
            .get(email)
            .cloned()
            .ok_or_else(|| ReservationError::NotFound(email.to_string()))
    }

    /// Snapshot of the reservations seated in `section`, ordered by seat number.
    pub fn users_in_section(&self, section: &str) -> Vec<UserSeat> {
        let mut seats: Vec<UserSeat> = self
            .receipts
            .values()
            .filter(|receipt| receipt.section() == section)
            .map(UserSeat::from)
            .collect();
        seats.sort_by(|a, b| a.seat_number.cmp(&b.seat_number).then_with(|| a.email.cmp(&b.email)));
        seats
    }

    /// Cancel a reservation and free its seat. Returns the released receipt.
    pub fn remove(&mut self, email: &str) -> ReservationResult<Receipt> {
        let receipt = self
            .receipts
            .remove(email)
            .ok_or_else(|| ReservationError::NotFound(email.to_string()))?;
        self.release(&receipt.seat);
        Ok(receipt)
    }

    /// Move a reservation into `new_section`.
    ///
    /// The same seat number is tried first. Failing that, seat numbers from 1 up
    /// to the reassignment scan limit are tried in order.
    pub fn modify_seat(&mut self, email: &str, new_section: &str) -> ReservationResult<Receipt> {
        let current = self
            .receipts
            .get(email)
            .map(|receipt| receipt.seat.clone())
            .ok_or_else(|| ReservationError::NotFound(email.to_string()))?;

        if !self.layout.contains_section(new_section) {
            return Err(ReservationError::UnknownSection(new_section.to_string()));
        }

        let target = self
            .find_reassignment(&current, new_section)
            .ok_or_else(|| ReservationError::NoAvailableSeats {
                section: new_section.to_string(),
            })?;

        debug!(email = %Masked(email), from = %current, to = %target, "reassigning seat");

        self.release(&current);
        self.occupy(target.clone());

        let receipt = self
            .receipts
            .get_mut(email)
            .ok_or_else(|| ReservationError::NotFound(email.to_string()))?;
        receipt.seat = target;
        Ok(receipt.clone())
    }

    pub fn is_seat_occupied(&self, seat: &SeatId) -> bool {
        self.occupancy(seat) > 0
    }

    pub fn occupancy(&self, seat: &SeatId) -> u32 {
        self.occupancy.get(seat).copied().unwrap_or(0)
    }

    pub fn reservation_count(&self) -> usize {
        self.receipts.len()
    }

    pub fn availability(&self) -> Vec<SectionAvailability> {
        let capacity = self.layout.seats_per_section();
        self.layout
            .sections()
            .iter()
            .map(|section| {
                let occupied = (1..=capacity)
                    .filter(|number| self.is_seat_occupied(&SeatId::new(section.clone(), *number)))
                    .count() as u32;
                SectionAvailability {
                    section: section.clone(),
                    capacity,
                    occupied,
                    available: capacity - occupied,
                }
            })
            .collect()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            occupancy: self
                .occupancy
                .iter()
                .filter(|(_, count)| **count > 0)
                .map(|(seat, count)| (seat.clone(), *count))
                .collect(),
            receipts: self
                .receipts
                .iter()
                .map(|(email, receipt)| (email.clone(), receipt.clone()))
                .collect(),
        }
    }

    fn scan_limit(&self) -> u32 {
        let default_limit = self.layout.section_count() as u32;
        self.policy
            .reassign_scan_limit
            .unwrap_or(default_limit)
            .min(self.layout.seats_per_section())
    }

    fn find_reassignment(&self, current: &SeatId, new_section: &str) -> Option<SeatId> {
        let same_number = SeatId::new(new_section, current.number);
        if current.number <= self.layout.seats_per_section() && !self.is_seat_occupied(&same_number) {
            return Some(same_number);
        }

        (1..=self.scan_limit())
            .map(|number| SeatId::new(new_section, number))
            .find(|seat| !self.is_seat_occupied(seat))
    }

    fn occupy(&mut self, seat: SeatId) {
        *self.occupancy.entry(seat).or_insert(0) += 1;
    }

    fn release(&mut self, seat: &SeatId) {
        if let Some(count) = self.occupancy.get_mut(seat) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.occupancy.remove(seat);
            }
        }
    }
}

/// Owned copy of ledger state, ordered for comparison and inspection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LedgerSnapshot {
    pub occupancy: BTreeMap<SeatId, u32>,
    pub receipts: BTreeMap<String, Receipt>,
}

impl LedgerSnapshot {
    /// Every reservation sits on an occupied seat and every occupied seat has
    /// exactly one reservation.
    pub fn check_consistency(&self) -> ReservationResult<()> {
        let mut holders: HashMap<&SeatId, usize> = HashMap::new();

        for (email, receipt) in &self.receipts {
            if email != &receipt.email {
                return Err(ReservationError::Inconsistent(format!(
                    "receipt keyed by {} belongs to {}",
                    email, receipt.email
                )));
            }
            if self.occupancy.get(&receipt.seat).copied().unwrap_or(0) == 0 {
                return Err(ReservationError::Inconsistent(format!(
                    "seat {} held by {} is not marked occupied",
                    receipt.seat, email
                )));
            }
            *holders.entry(&receipt.seat).or_insert(0) += 1;
        }

        for (seat, count) in &self.occupancy {
            if *count == 0 {
                continue;
            }
            let held_by = holders.get(seat).copied().unwrap_or(0);
            if *count != 1 || held_by != 1 {
                return Err(ReservationError::Inconsistent(format!(
                    "seat {} has occupancy {} and {} reservations",
                    seat, count, held_by
                )));
            }
        }

        Ok(())
    }
}
