use crate::error::SeedError;
use crate::persist::Outcome;
use crate::refs::{EntityKind, RefSet};
use crate::settings::SeedSettings;
use crate::tenant::TenantContext;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::collections::BTreeSet;

/// An entity kind a phase consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// The phase cannot run without at least one row of this kind.
    Required(EntityKind),
    /// The phase runs with whatever exists, including nothing.
    Optional(EntityKind),
}

impl Requirement {
    pub fn kind(self) -> EntityKind {
        match self {
            Requirement::Required(kind) | Requirement::Optional(kind) => kind,
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Requirement::Required(_))
    }
}

/// Static description of a phase, registered once at startup.
#[derive(Debug)]
pub struct PhaseDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub requires: &'static [Requirement],
    pub provides: &'static [EntityKind],
}

/// Everything a phase may touch besides its input references.
pub struct PhaseContext<'a> {
    pub db: &'a DatabaseConnection,
    pub tenant: &'a TenantContext,
    pub settings: &'a SeedSettings,
}

/// Per-phase record of which natural keys were defined and how they landed.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    created: u64,
    existing: u64,
    keys: BTreeSet<String>,
}

impl Tally {
    /// Counts one record. A key seen twice in the same phase means two
    /// logical records were given the same identity; it is counted once.
    pub fn record(&mut self, key: String, outcome: Outcome) {
        if !self.keys.insert(key.clone()) {
            log::warn!("Natural key {key} was defined twice in one phase");
            return;
        }
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::Existing => self.existing += 1,
        }
    }

    pub fn created(&self) -> u64 {
        self.created
    }

    pub fn existing(&self) -> u64 {
        self.existing
    }

    /// Number of distinct natural keys the phase defined.
    pub fn total(&self) -> u64 {
        self.created + self.existing
    }

    pub fn keys(&self) -> &BTreeSet<String> {
        &self.keys
    }
}

/// What a phase hands back: references for its dependents and its tally.
#[derive(Debug, Default)]
pub struct PhaseOutput {
    pub refs: RefSet,
    pub tally: Tally,
}

/// One entity family's generator.
///
/// `run` must be idempotent for a given tenant: every write goes through
/// `persist::find_or_create` on a natural key.
#[async_trait]
pub trait Phase: Send + Sync {
    fn descriptor(&self) -> &'static PhaseDescriptor;

    async fn run(&self, ctx: &PhaseContext<'_>, refs: &RefSet) -> Result<PhaseOutput, SeedError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_each_key_once() {
        let mut tally = Tally::default();
        tally.record("t:student:00001".into(), Outcome::Created);
        tally.record("t:student:00002".into(), Outcome::Existing);
        tally.record("t:student:00001".into(), Outcome::Created);
        assert_eq!(tally.created(), 1);
        assert_eq!(tally.existing(), 1);
        assert_eq!(tally.total(), 2);
        assert_eq!(tally.keys().len(), 2);
    }

    #[test]
    fn requirement_kind_and_strength() {
        let req = Requirement::Optional(EntityKind::Student);
        assert_eq!(req.kind(), EntityKind::Student);
        assert!(!req.is_required());
        assert!(Requirement::Required(EntityKind::School).is_required());
    }
}
