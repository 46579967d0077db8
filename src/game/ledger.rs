use std::collections::BTreeMap;

use crate::game::resources::ResourceSet;
use crate::types::{CardType, DevelopmentCard, PieceKind, Resource};

/// Keyed nonnegative counter of card and piece quantities, used identically
/// for the shared bank and for each player's private holdings. No operation
/// ever drives a count negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    counts: BTreeMap<CardType, u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("{0} is not tracked by this ledger")]
    UnknownCardType(CardType),
    #[error("not enough {card} to do this: have {available}, need {requested}")]
    InsufficientSupply {
        card: CardType,
        available: u32,
        requested: u32,
    },
}

impl Ledger {
    /// A freshly stocked bank: 19 of each resource, the full development
    /// deck. Banks do not track piece counters.
    pub fn bank() -> Self {
        let mut counts = BTreeMap::new();
        for resource in Resource::ALL {
            counts.insert(resource.into(), 19);
        }
        counts.insert(DevelopmentCard::Knight.into(), 14);
        counts.insert(DevelopmentCard::VictoryPoint.into(), 5);
        counts.insert(DevelopmentCard::RoadBuilding.into(), 2);
        counts.insert(DevelopmentCard::Monopoly.into(), 2);
        counts.insert(DevelopmentCard::YearOfPlenty.into(), 2);
        Self { counts }
    }

    /// A fresh player's holdings: zero cards, full piece allotments.
    pub fn player() -> Self {
        let mut counts = BTreeMap::new();
        for resource in Resource::ALL {
            counts.insert(resource.into(), 0);
        }
        for card in DevelopmentCard::ALL {
            counts.insert(card.into(), 0);
        }
        counts.insert(PieceKind::Road.into(), 15);
        counts.insert(PieceKind::Settlement.into(), 5);
        counts.insert(PieceKind::City.into(), 4);
        Self { counts }
    }

    pub fn get(&self, card: CardType) -> Result<u32, LedgerError> {
        self.counts
            .get(&card)
            .copied()
            .ok_or(LedgerError::UnknownCardType(card))
    }

    pub fn add(&mut self, card: CardType, amount: u32) -> Result<(), LedgerError> {
        let count = self
            .counts
            .get_mut(&card)
            .ok_or(LedgerError::UnknownCardType(card))?;
        *count += amount;
        Ok(())
    }

    /// Removes cards, leaving the ledger untouched when the balance cannot
    /// cover the amount. Insufficient supply is an expected game situation,
    /// not caller misuse.
    pub fn remove(&mut self, card: CardType, amount: u32) -> Result<(), LedgerError> {
        let count = self
            .counts
            .get_mut(&card)
            .ok_or(LedgerError::UnknownCardType(card))?;
        if *count < amount {
            return Err(LedgerError::InsufficientSupply {
                card,
                available: *count,
                requested: amount,
            });
        }
        *count -= amount;
        Ok(())
    }

    /// Total resource cards held, the count the discard rule is judged on.
    pub fn resource_total(&self) -> u32 {
        Resource::ALL
            .iter()
            .map(|&resource| self.counts.get(&resource.into()).copied().unwrap_or(0))
            .sum()
    }

    /// Errors with the first shortfall if the ledger cannot cover the set.
    pub fn check_covers(&self, set: &ResourceSet) -> Result<(), LedgerError> {
        for (resource, requested) in set.iter() {
            if requested == 0 {
                continue;
            }
            let available = self.get(resource.into())?;
            if available < requested {
                return Err(LedgerError::InsufficientSupply {
                    card: resource.into(),
                    available,
                    requested,
                });
            }
        }
        Ok(())
    }

    pub fn covers(&self, set: &ResourceSet) -> bool {
        self.check_covers(set).is_ok()
    }

    pub fn credit(&mut self, set: &ResourceSet) -> Result<(), LedgerError> {
        for (resource, amount) in set.iter() {
            self.add(resource.into(), amount)?;
        }
        Ok(())
    }

    /// All-or-nothing removal of a whole set.
    pub fn debit(&mut self, set: &ResourceSet) -> Result<(), LedgerError> {
        self.check_covers(set)?;
        for (resource, amount) in set.iter() {
            self.remove(resource.into(), amount)?;
        }
        Ok(())
    }

    /// Owned copy of the counts, the serialization boundary.
    pub fn snapshot(&self) -> BTreeMap<CardType, u32> {
        self.counts.clone()
    }
}
