//! Teachers, students and guardians, each with a login account.
//!
//! Student `n` (counted across levels) belongs to guardian `(n + 1) / 2`, so
//! siblings come in pairs and share a family name.

use super::{Account, date, ensure_account, school_id, school_year_start};
use crate::data::{FAMILY_NAMES, FEMALE_NAMES, MALE_NAMES, PersonName};
use crate::error::SeedError;
use crate::keys::{self, KeyPart, natural_key};
use crate::persist::find_or_create;
use crate::refs::{EntityKind, GuardianRef, RefSet, StudentRef, TeacherRef};
use crate::seed::{Phase, PhaseContext, PhaseDescriptor, PhaseOutput, Requirement};
use async_trait::async_trait;
use chrono::Duration;
use db::models::guardian_student::Relationship;
use db::models::student::Gender;
use db::models::user::{Role, hash_password};
use db::models::{guardian, guardian_student, student, teacher};
use fake::Fake;
use fake::faker::job::en::Title;
use rand::Rng;
use rand::rngs::StdRng;
use sea_orm::{ColumnTrait, Condition, Set};

pub struct PeopleSeeder;

static DESCRIPTOR: PhaseDescriptor = PhaseDescriptor {
    name: "people",
    description: "Teachers, students per grade level, and their guardians",
    requires: &[
        Requirement::Required(EntityKind::School),
        Requirement::Required(EntityKind::YearLevel),
        Requirement::Required(EntityKind::Subject),
    ],
    provides: &[EntityKind::Teacher, EntityKind::Student, EntityKind::Guardian],
};

fn pick(names: &'static [PersonName], index: usize) -> &'static PersonName {
    &names[index % names.len()]
}

/// Every fourth family is represented by the mother.
fn relationship_for(guardian: usize) -> Relationship {
    if guardian % 4 == 0 {
        Relationship::Mother
    } else {
        Relationship::Father
    }
}

fn phone(rng: &mut StdRng) -> String {
    format!("+9665{:08}", rng.gen_range(0..100_000_000u32))
}

#[async_trait]
impl Phase for PeopleSeeder {
    fn descriptor(&self) -> &'static PhaseDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &PhaseContext<'_>, refs: &RefSet) -> Result<PhaseOutput, SeedError> {
        let school_id = school_id(DESCRIPTOR.name, refs)?;
        let subjects = refs.subjects();
        if subjects.is_empty() {
            return Err(SeedError::missing(DESCRIPTOR.name, EntityKind::Subject));
        }

        let settings = ctx.settings;
        let tenant = ctx.tenant;
        let start_year = school_year_start(settings.today);
        let password_hash = hash_password(&settings.demo_password)?;
        let mut rng = settings.rng(DESCRIPTOR.name);
        let mut out = PhaseOutput::default();

        let mut teachers = Vec::with_capacity(settings.teachers);
        for i in 1..=settings.teachers {
            let first = if i % 2 == 0 {
                pick(FEMALE_NAMES, (i - 1) / 2)
            } else {
                pick(MALE_NAMES, (i - 1) / 2)
            };
            let family = pick(FAMILY_NAMES, i * 5);
            let email = keys::email(tenant, "teacher", i);
            let account = Account {
                email: email.clone(),
                full_name: format!("{} {}", first.en, family.en),
                full_name_ar: format!("{} {}", first.ar, family.ar),
                role: Role::Teacher,
                phone: Some(phone(&mut rng)),
            };
            let (user, outcome) = ensure_account(ctx.db, school_id, &password_hash, account).await?;
            out.tally.record(
                natural_key(tenant, EntityKind::User, KeyPart::Semantic(&[email.as_str()])),
                outcome,
            );

            let employee_code = keys::employee_code(i);
            let subject = &subjects[(i - 1) % subjects.len()];
            let key = Condition::all()
                .add(teacher::Column::SchoolId.eq(school_id))
                .add(teacher::Column::EmployeeCode.eq(employee_code.as_str()));
            let model = teacher::ActiveModel {
                school_id: Set(school_id),
                user_id: Set(user.id),
                employee_code: Set(employee_code.clone()),
                subject_id: Set(Some(subject.id)),
                hired_on: Set(date(start_year - (i % 10) as i32, 8, 15)?),
                ..Default::default()
            };
            let (row, outcome) = find_or_create::<teacher::Entity>(ctx.db, key, model).await?;
            log::debug!("Teacher {employee_code} teaches {}", subject.code);
            out.tally.record(
                natural_key(tenant, EntityKind::Teacher, KeyPart::Semantic(&[employee_code.as_str()])),
                outcome,
            );
            teachers.push(TeacherRef {
                id: row.id,
                user_id: row.user_id,
                employee_code: row.employee_code,
                subject_id: row.subject_id,
            });
        }

        let mut levels = refs.year_levels().to_vec();
        levels.sort_by_key(|l| l.level_order);

        let mut students = Vec::with_capacity(levels.len() * settings.students_per_level);
        let mut guardians: Vec<GuardianRef> = Vec::new();
        let mut n: usize = 0;
        for level in &levels {
            for _ in 0..settings.students_per_level {
                n += 1;
                let g = n.div_ceil(2);
                let family = pick(FAMILY_NAMES, g - 1);

                if guardians.len() < g {
                    let first = match relationship_for(g) {
                        Relationship::Mother => pick(FEMALE_NAMES, g * 3),
                        _ => pick(MALE_NAMES, g - 1),
                    };
                    let email = keys::email(tenant, "guardian", g);
                    let account = Account {
                        email: email.clone(),
                        full_name: format!("{} {}", first.en, family.en),
                        full_name_ar: format!("{} {}", first.ar, family.ar),
                        role: Role::Guardian,
                        phone: Some(phone(&mut rng)),
                    };
                    let (user, outcome) =
                        ensure_account(ctx.db, school_id, &password_hash, account).await?;
                    out.tally.record(
                        natural_key(tenant, EntityKind::User, KeyPart::Semantic(&[email.as_str()])),
                        outcome,
                    );

                    let occupation: String = Title().fake();
                    let key = Condition::all().add(guardian::Column::UserId.eq(user.id));
                    let model = guardian::ActiveModel {
                        school_id: Set(school_id),
                        user_id: Set(user.id),
                        phone: Set(user.phone.clone().unwrap_or_default()),
                        occupation: Set(Some(occupation)),
                        ..Default::default()
                    };
                    let (row, outcome) =
                        find_or_create::<guardian::Entity>(ctx.db, key, model).await?;
                    out.tally.record(
                        natural_key(tenant, EntityKind::Guardian, KeyPart::Index(g)),
                        outcome,
                    );
                    guardians.push(GuardianRef {
                        id: row.id,
                        user_id: row.user_id,
                    });
                }

                let (gender, first) = if n % 2 == 0 {
                    (Gender::Female, pick(FEMALE_NAMES, n / 2))
                } else {
                    (Gender::Male, pick(MALE_NAMES, n / 2))
                };
                let email = keys::email(tenant, "student", n);
                let account = Account {
                    email: email.clone(),
                    full_name: format!("{} {}", first.en, family.en),
                    full_name_ar: format!("{} {}", first.ar, family.ar),
                    role: Role::Student,
                    phone: None,
                };
                let (user, outcome) =
                    ensure_account(ctx.db, school_id, &password_hash, account).await?;
                out.tally.record(
                    natural_key(tenant, EntityKind::User, KeyPart::Semantic(&[email.as_str()])),
                    outcome,
                );

                let student_number = keys::student_number(n);
                let born_on = date(start_year - (5 + level.level_order), 1, 1)?
                    + Duration::days(rng.gen_range(0..365));
                let key = Condition::all()
                    .add(student::Column::SchoolId.eq(school_id))
                    .add(student::Column::StudentNumber.eq(student_number.as_str()));
                let model = student::ActiveModel {
                    school_id: Set(school_id),
                    user_id: Set(user.id),
                    student_number: Set(student_number.clone()),
                    year_level_id: Set(level.id),
                    gender: Set(gender),
                    born_on: Set(born_on),
                    ..Default::default()
                };
                let (row, outcome) = find_or_create::<student::Entity>(ctx.db, key, model).await?;
                out.tally.record(
                    natural_key(tenant, EntityKind::Student, KeyPart::Index(n)),
                    outcome,
                );

                let guardian = &guardians[g - 1];
                let key = Condition::all()
                    .add(guardian_student::Column::GuardianId.eq(guardian.id))
                    .add(guardian_student::Column::StudentId.eq(row.id));
                let link = guardian_student::ActiveModel {
                    guardian_id: Set(guardian.id),
                    student_id: Set(row.id),
                    relationship: Set(relationship_for(g)),
                };
                let (_, outcome) =
                    find_or_create::<guardian_student::Entity>(ctx.db, key, link).await?;
                let g_key = g.to_string();
                out.tally.record(
                    natural_key(
                        tenant,
                        "guardian_student",
                        KeyPart::Semantic(&[g_key.as_str(), student_number.as_str()]),
                    ),
                    outcome,
                );

                students.push(StudentRef {
                    id: row.id,
                    user_id: row.user_id,
                    student_number: row.student_number,
                    year_level_id: row.year_level_id,
                });
            }
        }

        out.refs.set_teachers(teachers);
        out.refs.set_students(students);
        out.refs.set_guardians(guardians);
        Ok(out)
    }
}
