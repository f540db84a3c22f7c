pub mod m202509010001_create_schools;
pub mod m202509010002_create_users;
pub mod m202509010003_create_school_years;
pub mod m202509010004_create_terms;
pub mod m202509010005_create_year_levels;
pub mod m202509010006_create_subjects;
pub mod m202509010007_create_teachers;
pub mod m202509010008_create_students;
pub mod m202509010009_create_guardians;
pub mod m202509010010_create_guardian_students;
pub mod m202509010011_create_classes;
pub mod m202509010012_create_class_enrollments;
pub mod m202509010013_create_attendance_records;
pub mod m202509010014_create_grade_records;
pub mod m202509010015_create_fee_invoices;
pub mod m202509010016_create_library_books;
pub mod m202509010017_create_book_loans;
pub mod m202509010018_create_announcements;
