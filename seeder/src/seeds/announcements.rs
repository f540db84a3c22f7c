use super::{date, school_id, school_year_start};
use crate::data::ANNOUNCEMENTS;
use crate::error::SeedError;
use crate::keys::{self, KeyPart, natural_key};
use crate::persist::find_or_create;
use crate::refs::{EntityKind, RefSet};
use crate::seed::{Phase, PhaseContext, PhaseDescriptor, PhaseOutput, Requirement};
use async_trait::async_trait;
use chrono::{Duration, NaiveTime};
use db::models::announcement;
use db::models::user::Role;
use sea_orm::{ColumnTrait, Condition, Set};

pub struct AnnouncementsSeeder;

static DESCRIPTOR: PhaseDescriptor = PhaseDescriptor {
    name: "announcements",
    description: "School-wide announcements, signed by the first admin or principal if one exists",
    requires: &[
        Requirement::Required(EntityKind::School),
        Requirement::Optional(EntityKind::User),
    ],
    provides: &[],
};

#[async_trait]
impl Phase for AnnouncementsSeeder {
    fn descriptor(&self) -> &'static PhaseDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &PhaseContext<'_>, refs: &RefSet) -> Result<PhaseOutput, SeedError> {
        let school_id = school_id(DESCRIPTOR.name, refs)?;
        let author_id = refs
            .users()
            .iter()
            .find(|u| matches!(u.role, Role::Admin | Role::Principal))
            .map(|u| u.id);
        if author_id.is_none() {
            log::info!("No admin or principal account; announcements are unsigned");
        }

        let year_start = date(school_year_start(ctx.settings.today), 9, 1)?;
        let morning = NaiveTime::from_hms_opt(7, 0, 0).unwrap_or_default();

        let mut out = PhaseOutput::default();
        for content in ANNOUNCEMENTS {
            let slug = keys::slug(content.title);
            let published_at = (year_start + Duration::days(content.day_offset))
                .and_time(morning)
                .and_utc();

            let key = Condition::all()
                .add(announcement::Column::SchoolId.eq(school_id))
                .add(announcement::Column::Slug.eq(slug.as_str()));
            let model = announcement::ActiveModel {
                school_id: Set(school_id),
                author_id: Set(author_id),
                slug: Set(slug.clone()),
                title: Set(content.title.to_owned()),
                title_ar: Set(content.title_ar.to_owned()),
                body: Set(content.body.to_owned()),
                body_ar: Set(content.body_ar.to_owned()),
                audience: Set(content.audience),
                published_at: Set(published_at),
                ..Default::default()
            };
            let (_, outcome) = find_or_create::<announcement::Entity>(ctx.db, key, model).await?;
            out.tally.record(
                natural_key(ctx.tenant, "announcement", KeyPart::Semantic(&[slug.as_str()])),
                outcome,
            );
        }

        Ok(out)
    }
}
