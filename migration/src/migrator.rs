use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202509010001_create_schools::Migration),
            Box::new(migrations::m202509010002_create_users::Migration),
            Box::new(migrations::m202509010003_create_school_years::Migration),
            Box::new(migrations::m202509010004_create_terms::Migration),
            Box::new(migrations::m202509010005_create_year_levels::Migration),
            Box::new(migrations::m202509010006_create_subjects::Migration),
            Box::new(migrations::m202509010007_create_teachers::Migration),
            Box::new(migrations::m202509010008_create_students::Migration),
            Box::new(migrations::m202509010009_create_guardians::Migration),
            Box::new(migrations::m202509010010_create_guardian_students::Migration),
            Box::new(migrations::m202509010011_create_classes::Migration),
            Box::new(migrations::m202509010012_create_class_enrollments::Migration),
            Box::new(migrations::m202509010013_create_attendance_records::Migration),
            Box::new(migrations::m202509010014_create_grade_records::Migration),
            Box::new(migrations::m202509010015_create_fee_invoices::Migration),
            Box::new(migrations::m202509010016_create_library_books::Migration),
            Box::new(migrations::m202509010017_create_book_loans::Migration),
            Box::new(migrations::m202509010018_create_announcements::Migration),
        ]
    }
}
