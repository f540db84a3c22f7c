use super::{date, school_id, school_year_start};
use crate::data::{SUBJECTS, TERMS, YEAR_LEVELS};
use crate::error::SeedError;
use crate::keys::{KeyPart, natural_key};
use crate::persist::{Outcome, find_or_create};
use crate::refs::{EntityKind, RefSet, SchoolYearRef, SubjectRef, TermRef, YearLevelRef};
use crate::seed::{Phase, PhaseContext, PhaseDescriptor, PhaseOutput, Requirement};
use async_trait::async_trait;
use db::models::{school_year, subject, term, year_level};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

pub struct AcademicSeeder;

static DESCRIPTOR: PhaseDescriptor = PhaseDescriptor {
    name: "academic",
    description: "School years, terms of the current year, grade levels and subjects",
    requires: &[Requirement::Required(EntityKind::School)],
    provides: &[
        EntityKind::SchoolYear,
        EntityKind::Term,
        EntityKind::YearLevel,
        EntityKind::Subject,
    ],
};

#[async_trait]
impl Phase for AcademicSeeder {
    fn descriptor(&self) -> &'static PhaseDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &PhaseContext<'_>, refs: &RefSet) -> Result<PhaseOutput, SeedError> {
        let school_id = school_id(DESCRIPTOR.name, refs)?;
        let start_year = school_year_start(ctx.settings.today);
        let mut out = PhaseOutput::default();

        // Previous year first so ids follow the calendar.
        let mut years = Vec::with_capacity(2);
        for (first_year, is_current) in [(start_year - 1, false), (start_year, true)] {
            let (year, outcome) = ensure_school_year(ctx.db, school_id, first_year, is_current).await?;
            out.tally.record(
                natural_key(
                    ctx.tenant,
                    EntityKind::SchoolYear,
                    KeyPart::Semantic(&[year.name.as_str()]),
                ),
                outcome,
            );
            years.push(year);
        }

        // At most one current year per school.
        let current_name = format!("{start_year}-{}", start_year + 1);
        school_year::Entity::update_many()
            .col_expr(school_year::Column::IsCurrent, Expr::value(false))
            .filter(school_year::Column::SchoolId.eq(school_id))
            .filter(school_year::Column::IsCurrent.eq(true))
            .filter(school_year::Column::Name.ne(current_name.as_str()))
            .exec(ctx.db)
            .await?;

        let current = years
            .iter()
            .find(|y| y.is_current)
            .cloned()
            .ok_or_else(|| SeedError::missing(DESCRIPTOR.name, EntityKind::SchoolYear))?;

        let mut terms = Vec::with_capacity(TERMS.len());
        for (i, content) in TERMS.iter().enumerate() {
            let sequence = i as i32 + 1;
            let (sy, sm, sd) = content.start;
            let (ey, em, ed) = content.end;
            let starts_on = date(start_year + sy as i32, sm, sd)?;
            let ends_on = date(start_year + ey as i32, em, ed)?;

            let key = Condition::all()
                .add(term::Column::SchoolYearId.eq(current.id))
                .add(term::Column::Sequence.eq(sequence));
            let model = term::ActiveModel {
                school_id: Set(school_id),
                school_year_id: Set(current.id),
                sequence: Set(sequence),
                name: Set(content.name.to_owned()),
                name_ar: Set(content.name_ar.to_owned()),
                starts_on: Set(starts_on),
                ends_on: Set(ends_on),
                ..Default::default()
            };
            let (row, outcome) = find_or_create::<term::Entity>(ctx.db, key, model).await?;
            let seq = sequence.to_string();
            out.tally.record(
                natural_key(
                    ctx.tenant,
                    EntityKind::Term,
                    KeyPart::Semantic(&[current.name.as_str(), seq.as_str()]),
                ),
                outcome,
            );
            terms.push(TermRef {
                id: row.id,
                school_year_id: row.school_year_id,
                sequence: row.sequence,
                starts_on: row.starts_on,
            });
        }

        let level_count = ctx.settings.year_levels.min(YEAR_LEVELS.len());
        let mut levels = Vec::with_capacity(level_count);
        for (i, content) in YEAR_LEVELS.iter().take(level_count).enumerate() {
            let key = Condition::all()
                .add(year_level::Column::SchoolId.eq(school_id))
                .add(year_level::Column::Code.eq(content.code));
            let model = year_level::ActiveModel {
                school_id: Set(school_id),
                code: Set(content.code.to_owned()),
                name: Set(content.name.to_owned()),
                name_ar: Set(content.name_ar.to_owned()),
                level_order: Set(i as i32 + 1),
                ..Default::default()
            };
            let (row, outcome) = find_or_create::<year_level::Entity>(ctx.db, key, model).await?;
            out.tally.record(
                natural_key(ctx.tenant, EntityKind::YearLevel, KeyPart::Semantic(&[content.code])),
                outcome,
            );
            levels.push(YearLevelRef {
                id: row.id,
                code: row.code,
                level_order: row.level_order,
            });
        }

        let mut subjects = Vec::with_capacity(SUBJECTS.len());
        for content in SUBJECTS {
            let key = Condition::all()
                .add(subject::Column::SchoolId.eq(school_id))
                .add(subject::Column::Code.eq(content.code));
            let model = subject::ActiveModel {
                school_id: Set(school_id),
                code: Set(content.code.to_owned()),
                name: Set(content.name.to_owned()),
                name_ar: Set(content.name_ar.to_owned()),
                weekly_periods: Set(content.weekly_periods),
                ..Default::default()
            };
            let (row, outcome) = find_or_create::<subject::Entity>(ctx.db, key, model).await?;
            out.tally.record(
                natural_key(ctx.tenant, EntityKind::Subject, KeyPart::Semantic(&[content.code])),
                outcome,
            );
            subjects.push(SubjectRef {
                id: row.id,
                code: row.code,
            });
        }

        out.refs.set_school_years(years);
        out.refs.set_terms(terms);
        out.refs.set_year_levels(levels);
        out.refs.set_subjects(subjects);
        Ok(out)
    }
}

/// `first_year`-`first_year + 1`, running 1 September to 30 June. An existing
/// row keeps its id; only its current flag is brought in line.
async fn ensure_school_year(
    db: &DatabaseConnection,
    school_id: i64,
    first_year: i32,
    is_current: bool,
) -> Result<(SchoolYearRef, Outcome), SeedError> {
    let name = format!("{first_year}-{}", first_year + 1);
    let key = Condition::all()
        .add(school_year::Column::SchoolId.eq(school_id))
        .add(school_year::Column::Name.eq(name.as_str()));
    let model = school_year::ActiveModel {
        school_id: Set(school_id),
        name: Set(name),
        starts_on: Set(date(first_year, 9, 1)?),
        ends_on: Set(date(first_year + 1, 6, 30)?),
        is_current: Set(is_current),
        ..Default::default()
    };
    let (mut row, outcome) = find_or_create::<school_year::Entity>(db, key, model).await?;

    if row.is_current != is_current {
        let mut active: school_year::ActiveModel = row.into();
        active.is_current = Set(is_current);
        row = active.update(db).await?;
        log::info!("School year {} is_current set to {is_current}", row.name);
    }

    Ok((
        SchoolYearRef {
            id: row.id,
            name: row.name,
            starts_on: row.starts_on,
            is_current: row.is_current,
        },
        outcome,
    ))
}
