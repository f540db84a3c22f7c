//! Phase registry, dependency ordering and the two run modes.

use crate::error::SeedError;
use crate::refs::{EntityKind, RefSet};
use crate::report::Reporter;
use crate::resolver::Resolver;
use crate::seed::{Phase, PhaseContext, PhaseDescriptor, Requirement};
use crate::settings::SeedSettings;
use crate::tenant::TenantContext;
use sea_orm::DatabaseConnection;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// Every registered phase plus the order they must run in.
///
/// A phase depends on whichever phase provides a kind it consumes, whether
/// the requirement is required or optional. The graph is validated once,
/// at construction.
pub struct Registry {
    phases: Vec<Box<dyn Phase>>,
    providers: BTreeMap<EntityKind, usize>,
    order: Vec<usize>,
}

impl Registry {
    pub fn new(phases: Vec<Box<dyn Phase>>) -> Result<Self, SeedError> {
        let mut names = BTreeSet::new();
        let mut providers: BTreeMap<EntityKind, usize> = BTreeMap::new();
        for (idx, phase) in phases.iter().enumerate() {
            let desc = phase.descriptor();
            if !names.insert(desc.name) {
                return Err(SeedError::DuplicatePhase(desc.name.to_owned()));
            }
            for &kind in desc.provides {
                if let Some(&first) = providers.get(&kind) {
                    return Err(SeedError::DuplicateProvider {
                        kind,
                        first: phases[first].descriptor().name.to_owned(),
                        second: desc.name.to_owned(),
                    });
                }
                providers.insert(kind, idx);
            }
        }

        let mut edges: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); phases.len()];
        for (idx, phase) in phases.iter().enumerate() {
            let desc = phase.descriptor();
            for req in desc.requires {
                let Some(&provider) = providers.get(&req.kind()) else {
                    return Err(SeedError::UnknownProvider {
                        phase: desc.name.to_owned(),
                        kind: req.kind(),
                    });
                };
                edges[idx].insert(provider);
            }
        }

        let order = topological_order(&edges).map_err(|stuck| {
            SeedError::DependencyCycle(
                stuck
                    .into_iter()
                    .map(|idx| phases[idx].descriptor().name.to_owned())
                    .collect(),
            )
        })?;

        Ok(Self {
            phases,
            providers,
            order,
        })
    }

    pub fn get(&self, name: &str) -> Option<&dyn Phase> {
        self.phases
            .iter()
            .find(|p| p.descriptor().name == name)
            .map(|p| p.as_ref())
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &'static PhaseDescriptor> + '_ {
        self.phases.iter().map(|p| p.descriptor())
    }

    pub fn provider_of(&self, kind: EntityKind) -> Option<&'static str> {
        self.providers
            .get(&kind)
            .map(|&idx| self.phases[idx].descriptor().name)
    }

    /// Names of the phases `name` depends on directly.
    pub fn dependencies(&self, name: &str) -> Option<Vec<&'static str>> {
        let phase = self.get(name)?;
        let mut deps: Vec<&'static str> = Vec::new();
        for req in phase.descriptor().requires {
            if let Some(provider) = self.provider_of(req.kind()) {
                if !deps.contains(&provider) {
                    deps.push(provider);
                }
            }
        }
        Some(deps)
    }

    pub fn execution_order(&self) -> Vec<&'static str> {
        self.order
            .iter()
            .map(|&idx| self.phases[idx].descriptor().name)
            .collect()
    }

    /// `(name, description)` pairs in execution order.
    pub fn listing(&self) -> Vec<(&'static str, &'static str)> {
        self.order
            .iter()
            .map(|&idx| {
                let desc = self.phases[idx].descriptor();
                (desc.name, desc.description)
            })
            .collect()
    }
}

/// Kahn's algorithm over `deps[i]` = the nodes `i` depends on. Among ready
/// nodes the lowest index goes first. On a cycle, returns the nodes that
/// could not be ordered.
fn topological_order(deps: &[BTreeSet<usize>]) -> Result<Vec<usize>, Vec<usize>> {
    let mut pending: Vec<usize> = deps.iter().map(BTreeSet::len).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); deps.len()];
    for (node, node_deps) in deps.iter().enumerate() {
        for &dep in node_deps {
            dependents[dep].push(node);
        }
    }

    let mut ready: BTreeSet<usize> = (0..deps.len()).filter(|&n| pending[n] == 0).collect();
    let mut order = Vec::with_capacity(deps.len());
    while let Some(node) = ready.pop_first() {
        order.push(node);
        for &next in &dependents[node] {
            pending[next] -= 1;
            if pending[next] == 0 {
                ready.insert(next);
            }
        }
    }

    if order.len() == deps.len() {
        Ok(order)
    } else {
        Err((0..deps.len()).filter(|&n| pending[n] > 0).collect())
    }
}

/// Runs phases of a `Registry` against one database and tenant.
pub struct Orchestrator<'a> {
    db: &'a DatabaseConnection,
    tenant: &'a TenantContext,
    settings: &'a SeedSettings,
    registry: &'a Registry,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        tenant: &'a TenantContext,
        settings: &'a SeedSettings,
        registry: &'a Registry,
    ) -> Self {
        Self {
            db,
            tenant,
            settings,
            registry,
        }
    }

    fn context(&self) -> PhaseContext<'a> {
        PhaseContext {
            db: self.db,
            tenant: self.tenant,
            settings: self.settings,
        }
    }

    fn provider_name(&self, kind: EntityKind) -> &'static str {
        self.registry
            .provider_of(kind)
            .unwrap_or_else(|| kind.provided_by())
    }

    /// Every phase in dependency order, threading references from one phase
    /// to the next. Stops at the first failure; phases that already
    /// completed keep their rows.
    pub async fn run_all(&self, reporter: &mut Reporter) -> Result<RefSet, SeedError> {
        let mut refs = RefSet::default();
        log::info!(
            "Seeding `{}` with {} phases",
            self.tenant.domain,
            self.registry.order.len()
        );

        for &idx in &self.registry.order {
            let phase = self.registry.phases[idx].as_ref();
            let name = phase.descriptor().name;
            reporter.begin(name);

            let result = match self.fill_requirements(phase.descriptor(), &mut refs).await {
                Ok(()) => self.execute(phase, &refs, reporter).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(output) => refs.absorb(output),
                Err(err) => {
                    reporter.fail(name);
                    return Err(wrap(name, err));
                }
            }
        }
        Ok(refs)
    }

    /// Runs exactly one phase against what is already stored. The tenant and
    /// every requirement are resolved and checked before the phase writes
    /// anything.
    pub async fn run_single(
        &self,
        name: &str,
        reporter: &mut Reporter,
    ) -> Result<RefSet, SeedError> {
        let phase = self
            .registry
            .get(name)
            .ok_or_else(|| SeedError::UnknownPhase(name.to_owned()))?;
        let desc = phase.descriptor();
        log::info!("Running `{}` alone for `{}`", desc.name, self.tenant.domain);

        let mut refs = RefSet::default();
        if !desc.provides.contains(&EntityKind::School) {
            let resolver = Resolver::for_tenant(self.db, self.tenant).await?;
            for &req in desc.requires {
                resolver
                    .require(desc.name, req, self.provider_name(req.kind()), &mut refs)
                    .await?;
            }
        }

        reporter.begin(desc.name);
        match self.execute(phase, &refs, reporter).await {
            Ok(output) => {
                refs.absorb(output);
                Ok(refs)
            }
            Err(err) => {
                reporter.fail(desc.name);
                Err(wrap(desc.name, err))
            }
        }
    }

    /// Loads any consumed kind not already supplied in-process, then checks
    /// required kinds are non-empty.
    async fn fill_requirements(
        &self,
        desc: &PhaseDescriptor,
        refs: &mut RefSet,
    ) -> Result<(), SeedError> {
        let missing: Vec<Requirement> = desc
            .requires
            .iter()
            .copied()
            .filter(|req| !refs.is_loaded(req.kind()))
            .collect();

        if !missing.is_empty() {
            let resolver = match refs.school() {
                Some(school) => Resolver::new(self.db, school.clone()),
                None => Resolver::for_tenant(self.db, self.tenant).await?,
            };
            for req in missing {
                resolver.load(req.kind(), refs).await?;
            }
        }

        for req in desc.requires {
            if req.is_required() && refs.len(req.kind()) == 0 {
                return Err(SeedError::MissingPrerequisite {
                    phase: desc.name.to_owned(),
                    kind: req.kind(),
                    provider: self.provider_name(req.kind()).to_owned(),
                });
            }
        }
        Ok(())
    }

    async fn execute(
        &self,
        phase: &dyn Phase,
        refs: &RefSet,
        reporter: &mut Reporter,
    ) -> Result<RefSet, SeedError> {
        let name = phase.descriptor().name;
        let start = Instant::now();
        let output = phase.run(&self.context(), refs).await?;
        let elapsed = start.elapsed();

        let tally = &output.tally;
        log::info!(
            "Phase `{name}` finished: {} created, {} existing in {:.2?}",
            tally.created(),
            tally.existing(),
            elapsed
        );
        reporter.record(name, tally.created(), tally.existing(), elapsed);
        Ok(output.refs)
    }
}

fn wrap(phase: &str, err: SeedError) -> SeedError {
    if err.is_precondition() {
        err
    } else {
        SeedError::PhaseFailed {
            phase: phase.to_owned(),
            source: Box::new(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::PhaseOutput;
    use async_trait::async_trait;

    struct Fake(&'static PhaseDescriptor);

    #[async_trait]
    impl Phase for Fake {
        fn descriptor(&self) -> &'static PhaseDescriptor {
            self.0
        }

        async fn run(&self, _: &PhaseContext<'_>, _: &RefSet) -> Result<PhaseOutput, SeedError> {
            Ok(PhaseOutput::default())
        }
    }

    static ROOT: PhaseDescriptor = PhaseDescriptor {
        name: "root",
        description: "root",
        requires: &[],
        provides: &[EntityKind::School],
    };
    static LEFT: PhaseDescriptor = PhaseDescriptor {
        name: "left",
        description: "left",
        requires: &[Requirement::Required(EntityKind::School)],
        provides: &[EntityKind::Subject],
    };
    static RIGHT: PhaseDescriptor = PhaseDescriptor {
        name: "right",
        description: "right",
        requires: &[
            Requirement::Required(EntityKind::Subject),
            Requirement::Optional(EntityKind::Book),
        ],
        provides: &[EntityKind::Student],
    };
    static BOOKS: PhaseDescriptor = PhaseDescriptor {
        name: "books",
        description: "books",
        requires: &[Requirement::Required(EntityKind::School)],
        provides: &[EntityKind::Book],
    };
    static LOOP: PhaseDescriptor = PhaseDescriptor {
        name: "loop",
        description: "loop",
        requires: &[Requirement::Required(EntityKind::Student)],
        provides: &[EntityKind::Subject],
    };
    static STUDENTS_TOO: PhaseDescriptor = PhaseDescriptor {
        name: "students_too",
        description: "students",
        requires: &[],
        provides: &[EntityKind::Student],
    };

    fn registry(descs: &[&'static PhaseDescriptor]) -> Result<Registry, SeedError> {
        Registry::new(
            descs
                .iter()
                .map(|&d| Box::new(Fake(d)) as Box<dyn Phase>)
                .collect(),
        )
    }

    #[test]
    fn providers_run_before_consumers_even_when_registered_later() {
        let reg = registry(&[&RIGHT, &LEFT, &BOOKS, &ROOT]).unwrap();
        assert_eq!(reg.execution_order(), ["root", "left", "books", "right"]);
        assert_eq!(reg.dependencies("right").unwrap(), ["left", "books"]);
        assert_eq!(reg.provider_of(EntityKind::Book), Some("books"));
    }

    #[test]
    fn optional_requirements_still_order_phases() {
        let reg = registry(&[&ROOT, &LEFT, &RIGHT, &BOOKS]).unwrap();
        let order = reg.execution_order();
        let pos = |n| order.iter().position(|&o| o == n).unwrap();
        assert!(pos("books") < pos("right"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = registry(&[&ROOT, &ROOT]).err().unwrap();
        assert!(matches!(err, SeedError::DuplicatePhase(name) if name == "root"));
    }

    #[test]
    fn consumed_kind_needs_a_provider() {
        let err = registry(&[&ROOT, &LEFT, &RIGHT]).err().unwrap();
        assert!(matches!(
            err,
            SeedError::UnknownProvider { kind: EntityKind::Book, .. }
        ));
    }

    #[test]
    fn two_providers_for_one_kind_are_rejected() {
        let err = registry(&[&ROOT, &LEFT, &BOOKS, &RIGHT, &STUDENTS_TOO])
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SeedError::DuplicateProvider { kind: EntityKind::Student, .. }
        ));
    }

    #[test]
    fn cycles_name_the_stuck_phases() {
        static RIGHT_ONLY: PhaseDescriptor = PhaseDescriptor {
            name: "right",
            description: "right",
            requires: &[Requirement::Required(EntityKind::Subject)],
            provides: &[EntityKind::Student],
        };
        let err = registry(&[&ROOT, &RIGHT_ONLY, &LOOP]).err().unwrap();
        match err {
            SeedError::DependencyCycle(names) => assert_eq!(names, ["right", "loop"]),
            other => panic!("expected a cycle, got {other}"),
        }
    }

    #[test]
    fn listing_follows_execution_order() {
        let reg = registry(&[&BOOKS, &ROOT]).unwrap();
        let names: Vec<_> = reg.listing().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["root", "books"]);
        assert!(reg.get("missing").is_none());
    }
}
