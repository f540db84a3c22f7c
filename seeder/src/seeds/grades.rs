use super::school_id;
use crate::error::SeedError;
use crate::keys::{KeyPart, natural_key};
use crate::persist::find_or_create;
use crate::refs::{EntityKind, RefSet};
use crate::seed::{Phase, PhaseContext, PhaseDescriptor, PhaseOutput, Requirement};
use async_trait::async_trait;
use db::models::grade_record::{self, letter_for};
use rand::Rng;
use sea_orm::{ColumnTrait, Condition, Set};

pub struct GradesSeeder;

static DESCRIPTOR: PhaseDescriptor = PhaseDescriptor {
    name: "grades",
    description: "Term grades for every student in every subject",
    requires: &[
        Requirement::Required(EntityKind::School),
        Requirement::Required(EntityKind::Term),
        Requirement::Required(EntityKind::Subject),
        Requirement::Required(EntityKind::Student),
    ],
    provides: &[],
};

#[async_trait]
impl Phase for GradesSeeder {
    fn descriptor(&self) -> &'static PhaseDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &PhaseContext<'_>, refs: &RefSet) -> Result<PhaseOutput, SeedError> {
        let school_id = school_id(DESCRIPTOR.name, refs)?;
        let mut terms = refs.terms().to_vec();
        terms.sort_by_key(|t| t.sequence);
        terms.truncate(ctx.settings.graded_terms);

        let mut rng = ctx.settings.rng(DESCRIPTOR.name);
        let mut out = PhaseOutput::default();
        for student in refs.students() {
            for subject in refs.subjects() {
                for term in &terms {
                    // One decimal place, 55.0 to 100.0.
                    let score = f64::from(rng.gen_range(550..=1000u16)) / 10.0;
                    let key = Condition::all()
                        .add(grade_record::Column::StudentId.eq(student.id))
                        .add(grade_record::Column::SubjectId.eq(subject.id))
                        .add(grade_record::Column::TermId.eq(term.id));
                    let model = grade_record::ActiveModel {
                        school_id: Set(school_id),
                        student_id: Set(student.id),
                        subject_id: Set(subject.id),
                        term_id: Set(term.id),
                        score: Set(score),
                        letter: Set(letter_for(score).to_owned()),
                        ..Default::default()
                    };
                    let (_, outcome) =
                        find_or_create::<grade_record::Entity>(ctx.db, key, model).await?;
                    let sequence = term.sequence.to_string();
                    out.tally.record(
                        natural_key(
                            ctx.tenant,
                            "grade",
                            KeyPart::Semantic(&[
                                student.student_number.as_str(),
                                subject.code.as_str(),
                                sequence.as_str(),
                            ]),
                        ),
                        outcome,
                    );
                }
            }
        }

        Ok(out)
    }
}
