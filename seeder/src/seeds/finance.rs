use super::school_id;
use crate::data::{TERMS, YEAR_LEVELS};
use crate::error::SeedError;
use crate::keys::{self, KeyPart, natural_key};
use crate::persist::find_or_create;
use crate::refs::{EntityKind, RefSet};
use crate::seed::{Phase, PhaseContext, PhaseDescriptor, PhaseOutput, Requirement};
use async_trait::async_trait;
use chrono::{Datelike, Duration};
use db::models::fee_invoice::{self, InvoiceStatus};
use rand::Rng;
use sea_orm::{ColumnTrait, Condition, Set};
use std::collections::HashMap;

pub struct FinanceSeeder;

static DESCRIPTOR: PhaseDescriptor = PhaseDescriptor {
    name: "finance",
    description: "Tuition invoices per student and term, some paid in full or in part",
    requires: &[
        Requirement::Required(EntityKind::School),
        Requirement::Required(EntityKind::Term),
        Requirement::Required(EntityKind::YearLevel),
        Requirement::Required(EntityKind::Student),
    ],
    provides: &[],
};

const DUE_AFTER_DAYS: i64 = 14;
/// Used for levels without a tuition entry.
const DEFAULT_TUITION_CENTS: i64 = 2_000_000;

/// Paid amount for a roll in `0..100`: most families pay in full, some pay
/// half, the rest nothing yet.
fn paid_for(amount: i64, roll: u32) -> i64 {
    match roll {
        0..60 => amount,
        60..85 => amount / 2,
        _ => 0,
    }
}

#[async_trait]
impl Phase for FinanceSeeder {
    fn descriptor(&self) -> &'static PhaseDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &PhaseContext<'_>, refs: &RefSet) -> Result<PhaseOutput, SeedError> {
        let school_id = school_id(DESCRIPTOR.name, refs)?;
        let mut terms = refs.terms().to_vec();
        terms.sort_by_key(|t| t.sequence);
        let Some(first_term) = terms.first() else {
            return Err(SeedError::missing(DESCRIPTOR.name, EntityKind::Term));
        };
        let academic_year = first_term.starts_on.year();
        terms.truncate(ctx.settings.graded_terms);

        let per_term = |level_code: &str| {
            YEAR_LEVELS
                .iter()
                .find(|l| l.code == level_code)
                .map_or(DEFAULT_TUITION_CENTS, |l| l.tuition_cents)
                / TERMS.len() as i64
        };
        let term_fee: HashMap<i64, i64> = refs
            .year_levels()
            .iter()
            .map(|l| (l.id, per_term(&l.code)))
            .collect();

        let mut rng = ctx.settings.rng(DESCRIPTOR.name);
        let mut out = PhaseOutput::default();
        for term in &terms {
            for student in refs.students() {
                let amount = term_fee
                    .get(&student.year_level_id)
                    .copied()
                    .unwrap_or(DEFAULT_TUITION_CENTS / TERMS.len() as i64);
                let paid = paid_for(amount, rng.gen_range(0..100));
                let invoice_number =
                    keys::invoice_number(academic_year, term.sequence, &student.student_number);

                let key = Condition::all()
                    .add(fee_invoice::Column::SchoolId.eq(school_id))
                    .add(fee_invoice::Column::InvoiceNumber.eq(invoice_number.as_str()));
                let model = fee_invoice::ActiveModel {
                    school_id: Set(school_id),
                    student_id: Set(student.id),
                    term_id: Set(term.id),
                    invoice_number: Set(invoice_number.clone()),
                    amount_cents: Set(amount),
                    paid_cents: Set(paid),
                    status: Set(InvoiceStatus::from_amounts(amount, paid)),
                    due_on: Set(term.starts_on + Duration::days(DUE_AFTER_DAYS)),
                    ..Default::default()
                };
                let (_, outcome) =
                    find_or_create::<fee_invoice::Entity>(ctx.db, key, model).await?;
                out.tally.record(
                    natural_key(
                        ctx.tenant,
                        "invoice",
                        KeyPart::Semantic(&[invoice_number.as_str()]),
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

    #[test]
    fn payment_split_matches_status() {
        assert_eq!(
            InvoiceStatus::from_amounts(600, paid_for(600, 10)),
            InvoiceStatus::Paid
        );
        assert_eq!(
            InvoiceStatus::from_amounts(600, paid_for(600, 70)),
            InvoiceStatus::Partial
        );
        assert_eq!(
            InvoiceStatus::from_amounts(600, paid_for(600, 90)),
            InvoiceStatus::Unpaid
        );
    }
}
