//! Attendance for the term that is active on the run date.
//!
//! Rows are keyed by student and day, so reruns on the same date write
//! nothing. Once a later term has started, a rerun records that term's
//! opening days as well; earlier terms' rows are left in place.

use super::school_id;
use crate::error::SeedError;
use crate::keys::{KeyPart, natural_key};
use crate::persist::find_or_create;
use crate::refs::{EntityKind, RefSet, TermRef};
use crate::seed::{Phase, PhaseContext, PhaseDescriptor, PhaseOutput, Requirement};
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use db::models::attendance_record::{self, AttendanceStatus};
use rand::Rng;
use sea_orm::{ColumnTrait, Condition, Set};

pub struct AttendanceSeeder;

static DESCRIPTOR: PhaseDescriptor = PhaseDescriptor {
    name: "attendance",
    description: "Daily attendance for every enrolled student over the first school days of the term active on the run date",
    requires: &[
        Requirement::Required(EntityKind::School),
        Requirement::Required(EntityKind::Term),
        Requirement::Required(EntityKind::Enrollment),
    ],
    provides: &[],
};

/// The term that has most recently started, or the first one if none has.
fn active_term(terms: &[TermRef], today: NaiveDate) -> Option<&TermRef> {
    terms
        .iter()
        .filter(|t| t.starts_on <= today)
        .max_by_key(|t| t.starts_on)
        .or_else(|| terms.iter().min_by_key(|t| t.sequence))
}

/// The first `count` days from `from` on, skipping the Friday/Saturday weekend.
fn school_days(from: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut day = from;
    while days.len() < count {
        if !matches!(day.weekday(), Weekday::Fri | Weekday::Sat) {
            days.push(day);
        }
        day += Duration::days(1);
    }
    days
}

fn status_for(roll: u32) -> AttendanceStatus {
    match roll {
        0..85 => AttendanceStatus::Present,
        85..92 => AttendanceStatus::Late,
        92..97 => AttendanceStatus::Absent,
        _ => AttendanceStatus::Excused,
    }
}

#[async_trait]
impl Phase for AttendanceSeeder {
    fn descriptor(&self) -> &'static PhaseDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &PhaseContext<'_>, refs: &RefSet) -> Result<PhaseOutput, SeedError> {
        let school_id = school_id(DESCRIPTOR.name, refs)?;
        let term = active_term(refs.terms(), ctx.settings.today)
            .ok_or_else(|| SeedError::missing(DESCRIPTOR.name, EntityKind::Term))?;
        let days = school_days(term.starts_on, ctx.settings.attendance_days);
        log::debug!(
            "Recording attendance for term {} from {}",
            term.sequence,
            term.starts_on
        );

        let mut rng = ctx.settings.rng(DESCRIPTOR.name);
        let mut out = PhaseOutput::default();
        for enrollment in refs.enrollments() {
            for day in &days {
                let status = status_for(rng.gen_range(0..100));
                let key = Condition::all()
                    .add(attendance_record::Column::StudentId.eq(enrollment.student_id))
                    .add(attendance_record::Column::AttendedOn.eq(*day));
                let model = attendance_record::ActiveModel {
                    school_id: Set(school_id),
                    class_id: Set(enrollment.class_id),
                    student_id: Set(enrollment.student_id),
                    attended_on: Set(*day),
                    status: Set(status),
                    ..Default::default()
                };
                let (_, outcome) =
                    find_or_create::<attendance_record::Entity>(ctx.db, key, model).await?;
                let student = enrollment.student_id.to_string();
                let date = day.to_string();
                out.tally.record(
                    natural_key(
                        ctx.tenant,
                        "attendance",
                        KeyPart::Semantic(&[student.as_str(), date.as_str()]),
                    ),
                    outcome,
                );
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weekends_are_skipped() {
        // 2025-09-04 is a Thursday.
        let days = school_days(d(2025, 9, 4), 3);
        assert_eq!(days, vec![d(2025, 9, 4), d(2025, 9, 7), d(2025, 9, 8)]);
    }

    #[test]
    fn active_term_is_latest_started() {
        let term = |sequence, starts_on| TermRef {
            id: i64::from(sequence),
            school_year_id: 1,
            sequence,
            starts_on,
        };
        let terms = vec![
            term(1, d(2025, 9, 1)),
            term(2, d(2026, 1, 5)),
            term(3, d(2026, 4, 6)),
        ];
        assert_eq!(active_term(&terms, d(2026, 2, 1)).map(|t| t.sequence), Some(2));
        assert_eq!(active_term(&terms, d(2025, 8, 1)).map(|t| t.sequence), Some(1));
    }

    #[test]
    fn status_buckets_cover_the_roll() {
        assert_eq!(status_for(0), AttendanceStatus::Present);
        assert_eq!(status_for(90), AttendanceStatus::Late);
        assert_eq!(status_for(95), AttendanceStatus::Absent);
        assert_eq!(status_for(99), AttendanceStatus::Excused);
    }
}
