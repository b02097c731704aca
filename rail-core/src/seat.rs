use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::{ReservationError, ReservationResult};

/// A single seat on the train, addressed by section label and 1-based number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatId {
    pub section: String,
    pub number: u32,
}

impl SeatId {
    pub fn new(section: impl Into<String>, number: u32) -> Self {
        Self {
            section: section.into(),
            number,
        }
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.section, self.number)
    }
}

/// Fixed seating topology: ordered section labels, each with the same capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionLayout {
    sections: Vec<String>,
    seats_per_section: u32,
}

impl SectionLayout {
    pub fn new(sections: Vec<String>, seats_per_section: u32) -> ReservationResult<Self> {
        if sections.is_empty() {
            return Err(ReservationError::InvalidLayout(
                "at least one section is required".to_string(),
            ));
        }
        if seats_per_section == 0 {
            return Err(ReservationError::InvalidLayout(
                "seats_per_section must be positive".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for label in &sections {
            if label.trim().is_empty() {
                return Err(ReservationError::InvalidLayout(
                    "section labels must not be blank".to_string(),
                ));
            }
            if !seen.insert(label.as_str()) {
                return Err(ReservationError::InvalidLayout(format!(
                    "duplicate section label: {}",
                    label
                )));
            }
        }

        Ok(Self {
            sections,
            seats_per_section,
        })
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn seats_per_section(&self) -> u32 {
        self.seats_per_section
    }

    /// Total number of seats across all sections
    pub fn capacity(&self) -> usize {
        self.sections.len() * self.seats_per_section as usize
    }

    pub fn contains_section(&self, section: &str) -> bool {
        self.sections.iter().any(|s| s == section)
    }

    /// Every seat in first-fit order: sections as configured, numbers ascending.
    pub fn seats(&self) -> impl Iterator<Item = SeatId> + '_ {
        self.sections.iter().flat_map(move |section| {
            (1..=self.seats_per_section).map(move |number| SeatId::new(section.clone(), number))
        })
    }
}

impl Default for SectionLayout {
    /// Two sections of ten seats.
    fn default() -> Self {
        Self {
            sections: vec!["A".to_string(), "B".to_string()],
            seats_per_section: 10,
        }
    }
}
