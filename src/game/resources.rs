use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Resource;

/// A resource-type to nonnegative-count mapping: build costs, trade sides,
/// and discard selections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceSet {
    counts: [u32; Resource::ALL.len()],
}

impl ResourceSet {
    pub const fn from_counts(counts: [u32; 5]) -> Self {
        Self { counts }
    }

    pub const fn zero() -> Self {
        Self {
            counts: [0; Resource::ALL.len()],
        }
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    pub fn get(&self, resource: Resource) -> u32 {
        self.counts[resource_index(resource)]
    }

    pub fn add(&mut self, resource: Resource, amount: u32) {
        self.counts[resource_index(resource)] += amount;
    }

    pub fn with(mut self, resource: Resource, amount: u32) -> Self {
        self.add(resource, amount);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Resource, u32)> + '_ {
        Resource::ALL.into_iter().zip(self.counts.iter().copied())
    }
}

impl fmt::Display for ResourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![];
        for (resource, amount) in self.iter() {
            if amount > 0 {
                parts.push(format!("{amount}x{resource}"));
            }
        }
        write!(f, "{}", parts.join(", "))
    }
}

const fn resource_index(resource: Resource) -> usize {
    match resource {
        Resource::Brick => 0,
        Resource::Lumber => 1,
        Resource::Ore => 2,
        Resource::Wheat => 3,
        Resource::Wool => 4,
    }
}

// Counts are in Resource::ALL order: Brick, Lumber, Ore, Wheat, Wool.
pub const COST_ROAD: ResourceSet = ResourceSet::from_counts([1, 1, 0, 0, 0]);
pub const COST_SETTLEMENT: ResourceSet = ResourceSet::from_counts([1, 1, 0, 1, 1]);
pub const COST_CITY: ResourceSet = ResourceSet::from_counts([0, 0, 3, 2, 0]);
pub const COST_DEVELOPMENT: ResourceSet = ResourceSet::from_counts([0, 0, 1, 1, 1]);
