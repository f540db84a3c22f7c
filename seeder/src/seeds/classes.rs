use super::school_id;
use crate::data::YEAR_LEVELS;
use crate::error::SeedError;
use crate::keys::{self, KeyPart, natural_key};
use crate::persist::find_or_create;
use crate::refs::{ClassRef, EnrollmentRef, EntityKind, RefSet};
use crate::seed::{Phase, PhaseContext, PhaseDescriptor, PhaseOutput, Requirement};
use async_trait::async_trait;
use db::models::{class, class_enrollment};
use sea_orm::{ColumnTrait, Condition, Set};

pub struct ClassesSeeder;

static DESCRIPTOR: PhaseDescriptor = PhaseDescriptor {
    name: "classes",
    description: "Class sections of the current school year with homeroom teachers and enrollments",
    requires: &[
        Requirement::Required(EntityKind::School),
        Requirement::Required(EntityKind::SchoolYear),
        Requirement::Required(EntityKind::YearLevel),
        Requirement::Required(EntityKind::Teacher),
        Requirement::Required(EntityKind::Student),
    ],
    provides: &[EntityKind::Class, EntityKind::Enrollment],
};

const CAPACITY: i32 = 30;

#[async_trait]
impl Phase for ClassesSeeder {
    fn descriptor(&self) -> &'static PhaseDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &PhaseContext<'_>, refs: &RefSet) -> Result<PhaseOutput, SeedError> {
        let school_id = school_id(DESCRIPTOR.name, refs)?;
        let year = refs
            .current_school_year()
            .ok_or_else(|| SeedError::missing(DESCRIPTOR.name, EntityKind::SchoolYear))?;
        let teachers = refs.teachers();
        if teachers.is_empty() {
            return Err(SeedError::missing(DESCRIPTOR.name, EntityKind::Teacher));
        }

        let sections = ctx.settings.sections_per_level.max(1);
        let mut levels = refs.year_levels().to_vec();
        levels.sort_by_key(|l| l.level_order);

        let mut out = PhaseOutput::default();
        let mut classes = Vec::with_capacity(levels.len() * sections);
        let mut enrollments = Vec::new();
        for level in &levels {
            let content = YEAR_LEVELS.iter().find(|c| c.code == level.code);
            let (level_name, level_name_ar) = content
                .map(|c| (c.name, c.name_ar))
                .unwrap_or((level.code.as_str(), level.code.as_str()));

            let mut level_classes = Vec::with_capacity(sections);
            for section in 0..sections {
                let code = keys::class_code(&level.code, section);
                let label = keys::section_label(section);
                let homeroom = &teachers[classes.len() % teachers.len()];

                let key = Condition::all()
                    .add(class::Column::SchoolYearId.eq(year.id))
                    .add(class::Column::Code.eq(code.as_str()));
                let model = class::ActiveModel {
                    school_id: Set(school_id),
                    school_year_id: Set(year.id),
                    year_level_id: Set(level.id),
                    code: Set(code.clone()),
                    name: Set(format!("{level_name} - Section {label}")),
                    name_ar: Set(format!("{level_name_ar} - شعبة {label}")),
                    homeroom_teacher_id: Set(Some(homeroom.id)),
                    capacity: Set(CAPACITY),
                    ..Default::default()
                };
                let (row, outcome) = find_or_create::<class::Entity>(ctx.db, key, model).await?;
                out.tally.record(
                    natural_key(
                        ctx.tenant,
                        EntityKind::Class,
                        KeyPart::Semantic(&[year.name.as_str(), code.as_str()]),
                    ),
                    outcome,
                );
                let class_ref = ClassRef {
                    id: row.id,
                    code: row.code,
                    school_year_id: row.school_year_id,
                    year_level_id: row.year_level_id,
                };
                level_classes.push(class_ref.clone());
                classes.push(class_ref);
            }

            // Round-robin across sections in student-number order. A student
            // already placed this year keeps their class, even if the section
            // count changed since.
            let level_students = refs
                .students()
                .iter()
                .filter(|s| s.year_level_id == level.id);
            for (j, student) in level_students.enumerate() {
                let section = &level_classes[j % level_classes.len()];
                let key = Condition::all()
                    .add(class_enrollment::Column::SchoolYearId.eq(year.id))
                    .add(class_enrollment::Column::StudentId.eq(student.id));
                let model = class_enrollment::ActiveModel {
                    class_id: Set(section.id),
                    student_id: Set(student.id),
                    school_year_id: Set(year.id),
                    enrolled_on: Set(year.starts_on),
                };
                let (row, outcome) =
                    find_or_create::<class_enrollment::Entity>(ctx.db, key, model).await?;
                out.tally.record(
                    natural_key(
                        ctx.tenant,
                        EntityKind::Enrollment,
                        KeyPart::Semantic(&[year.name.as_str(), student.student_number.as_str()]),
                    ),
                    outcome,
                );
                enrollments.push(EnrollmentRef {
                    class_id: row.class_id,
                    student_id: row.student_id,
                });
            }
        }

        out.refs.set_classes(classes);
        out.refs.set_enrollments(enrollments);
        Ok(out)
    }
}
