pub mod announcement;
pub mod attendance_record;
pub mod book_loan;
pub mod class;
pub mod class_enrollment;
pub mod fee_invoice;
pub mod grade_record;
pub mod guardian;
pub mod guardian_student;
pub mod library_book;
pub mod school;
pub mod school_year;
pub mod student;
pub mod subject;
pub mod teacher;
pub mod term;
pub mod user;
pub mod year_level;

pub use announcement::Entity as Announcement;
pub use attendance_record::Entity as AttendanceRecord;
pub use book_loan::Entity as BookLoan;
pub use class::Entity as Class;
pub use class_enrollment::Entity as ClassEnrollment;
pub use fee_invoice::Entity as FeeInvoice;
pub use grade_record::Entity as GradeRecord;
pub use guardian::Entity as Guardian;
pub use guardian_student::Entity as GuardianStudent;
pub use library_book::Entity as LibraryBook;
pub use school::Entity as School;
pub use school_year::Entity as SchoolYear;
pub use student::Entity as Student;
pub use subject::Entity as Subject;
pub use teacher::Entity as Teacher;
pub use term::Entity as Term;
pub use user::Entity as User;
pub use year_level::Entity as YearLevel;
