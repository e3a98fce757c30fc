//! Per-side reserve of units waiting to be placed.

use std::collections::BTreeMap;

use crate::board::PieceType;

use super::PlacementError;

/// Remaining unit counts for one side. Counts never go negative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reserve {
    counts: BTreeMap<PieceType, u32>,
}

impl Reserve {
    /// Builds a reserve from an army table plus a mountain allotment.
    pub fn new(army: &BTreeMap<PieceType, u32>, mountains: u32) -> Self {
        let mut counts: BTreeMap<PieceType, u32> = army
            .iter()
            .filter(|(kind, n)| !kind.is_terrain() && **n > 0)
            .map(|(kind, n)| (*kind, *n))
            .collect();
        if mountains > 0 {
            counts.insert(PieceType::Mountain, mountains);
        }
        Reserve { counts }
    }

    pub fn remaining(&self, kind: PieceType) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Takes one unit out of the reserve.
    pub fn take(&mut self, kind: PieceType) -> Result<(), PlacementError> {
        match self.counts.get_mut(&kind) {
            Some(n) if *n > 0 => {
                *n -= 1;
                if *n == 0 {
                    self.counts.remove(&kind);
                }
                Ok(())
            }
            _ => Err(PlacementError::Exhausted(kind)),
        }
    }

    /// Returns one unit to the reserve.
    pub fn give_back(&mut self, kind: PieceType) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }

    /// Drops every remaining unit of one kind, returning how many there were.
    pub fn discard(&mut self, kind: PieceType) -> u32 {
        self.counts.remove(&kind).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Remaining counts by kind, in catalog order.
    pub fn counts(&self) -> &BTreeMap<PieceType, u32> {
        &self.counts
    }
}
