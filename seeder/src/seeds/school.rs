use crate::error::SeedError;
use crate::keys::{KeyPart, natural_key};
use crate::persist::{Outcome, find_or_create};
use crate::refs::{EntityKind, RefSet, SchoolRef};
use crate::seed::{Phase, PhaseContext, PhaseDescriptor, PhaseOutput};
use async_trait::async_trait;
use chrono::Utc;
use db::models::school;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, Set};

pub struct SchoolSeeder;

static DESCRIPTOR: PhaseDescriptor = PhaseDescriptor {
    name: "school",
    description: "Tenant school, found or created by its domain",
    requires: &[],
    provides: &[EntityKind::School],
};

#[async_trait]
impl Phase for SchoolSeeder {
    fn descriptor(&self) -> &'static PhaseDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &PhaseContext<'_>, _refs: &RefSet) -> Result<PhaseOutput, SeedError> {
        let tenant = ctx.tenant;
        let now = Utc::now();
        let key = Condition::all().add(school::Column::Domain.eq(tenant.domain.as_str()));
        let model = school::ActiveModel {
            domain: Set(tenant.domain.clone()),
            name: Set(tenant.name.clone()),
            name_ar: Set(tenant.name_ar.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let (mut row, outcome) = find_or_create::<school::Entity>(ctx.db, key, model).await?;

        // Display names follow configuration; the domain never changes.
        if outcome == Outcome::Existing && (row.name != tenant.name || row.name_ar != tenant.name_ar)
        {
            let mut active: school::ActiveModel = row.into();
            active.name = Set(tenant.name.clone());
            active.name_ar = Set(tenant.name_ar.clone());
            active.updated_at = Set(now);
            row = active.update(ctx.db).await?;
            log::info!("Renamed school `{}` to {}", row.domain, row.name);
        }

        let mut out = PhaseOutput::default();
        out.tally.record(
            natural_key(tenant, EntityKind::School, KeyPart::Semantic(&[tenant.domain.as_str()])),
            outcome,
        );
        out.refs.set_school(SchoolRef {
            id: row.id,
            domain: row.domain,
        });
        Ok(out)
    }
}
