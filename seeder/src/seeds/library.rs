use super::school_id;
use crate::data::BOOKS;
use crate::error::SeedError;
use crate::keys::{self, KeyPart, natural_key};
use crate::persist::find_or_create;
use crate::refs::{BookRef, EntityKind, RefSet};
use crate::seed::{Phase, PhaseContext, PhaseDescriptor, PhaseOutput, Requirement};
use async_trait::async_trait;
use chrono::Duration;
use db::models::{book_loan, library_book};
use sea_orm::{ColumnTrait, Condition, Set};

pub struct LibrarySeeder;

static DESCRIPTOR: PhaseDescriptor = PhaseDescriptor {
    name: "library",
    description: "Library catalogue, plus loans to students when any exist",
    requires: &[
        Requirement::Required(EntityKind::School),
        Requirement::Optional(EntityKind::Student),
    ],
    provides: &[EntityKind::Book],
};

const LOAN_DAYS: i64 = 14;

#[async_trait]
impl Phase for LibrarySeeder {
    fn descriptor(&self) -> &'static PhaseDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &PhaseContext<'_>, refs: &RefSet) -> Result<PhaseOutput, SeedError> {
        let school_id = school_id(DESCRIPTOR.name, refs)?;
        let mut out = PhaseOutput::default();

        let mut books = Vec::with_capacity(BOOKS.len());
        for (i, content) in BOOKS.iter().enumerate() {
            let isbn = keys::isbn13(ctx.tenant, i + 1);
            let key = Condition::all()
                .add(library_book::Column::SchoolId.eq(school_id))
                .add(library_book::Column::Isbn.eq(isbn.as_str()));
            let model = library_book::ActiveModel {
                school_id: Set(school_id),
                isbn: Set(isbn.clone()),
                title: Set(content.title.to_owned()),
                title_ar: Set(content.title_ar.to_owned()),
                author: Set(content.author.to_owned()),
                copies: Set(content.copies),
                ..Default::default()
            };
            let (row, outcome) = find_or_create::<library_book::Entity>(ctx.db, key, model).await?;
            out.tally.record(
                natural_key(ctx.tenant, EntityKind::Book, KeyPart::Semantic(&[isbn.as_str()])),
                outcome,
            );
            books.push(BookRef {
                id: row.id,
                isbn: row.isbn,
            });
        }

        // Without students the catalogue alone is a complete result.
        let students = refs.students();
        let loans = ctx.settings.library_loans.min(students.len());
        if loans == 0 {
            log::info!("No students to lend to; catalogue only");
        }
        for (i, student) in students.iter().take(loans).enumerate() {
            let book = &books[i % books.len()];
            let borrowed_on = ctx.settings.today - Duration::days((i % 20) as i64 + 1);
            let returned_on = (i % 3 == 0).then(|| borrowed_on + Duration::days(7));

            let key = Condition::all()
                .add(book_loan::Column::BookId.eq(book.id))
                .add(book_loan::Column::StudentId.eq(student.id));
            let model = book_loan::ActiveModel {
                book_id: Set(book.id),
                student_id: Set(student.id),
                borrowed_on: Set(borrowed_on),
                due_on: Set(borrowed_on + Duration::days(LOAN_DAYS)),
                returned_on: Set(returned_on),
            };
            let (_, outcome) = find_or_create::<book_loan::Entity>(ctx.db, key, model).await?;
            out.tally.record(
                natural_key(
                    ctx.tenant,
                    "loan",
                    KeyPart::Semantic(&[book.isbn.as_str(), student.student_number.as_str()]),
                ),
                outcome,
            );
        }

        out.refs.set_books(books);
        Ok(out)
    }
}
