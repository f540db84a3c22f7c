//! Minimal projections of persisted rows, handed from one phase to the next.
//!
//! A reference carries an id plus whatever a downstream phase needs to link
//! to the row or rebuild its natural key. Nothing more.

use chrono::NaiveDate;
use db::models::user::Role;
use std::collections::BTreeSet;
use std::fmt;

/// Entity families that phases exchange references for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    School,
    User,
    SchoolYear,
    Term,
    YearLevel,
    Subject,
    Teacher,
    Student,
    Guardian,
    Class,
    Enrollment,
    Book,
}

impl EntityKind {
    pub const ALL: [EntityKind; 12] = [
        EntityKind::School,
        EntityKind::User,
        EntityKind::SchoolYear,
        EntityKind::Term,
        EntityKind::YearLevel,
        EntityKind::Subject,
        EntityKind::Teacher,
        EntityKind::Student,
        EntityKind::Guardian,
        EntityKind::Class,
        EntityKind::Enrollment,
        EntityKind::Book,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::School => "school",
            EntityKind::User => "user",
            EntityKind::SchoolYear => "school_year",
            EntityKind::Term => "term",
            EntityKind::YearLevel => "year_level",
            EntityKind::Subject => "subject",
            EntityKind::Teacher => "teacher",
            EntityKind::Student => "student",
            EntityKind::Guardian => "guardian",
            EntityKind::Class => "class",
            EntityKind::Enrollment => "enrollment",
            EntityKind::Book => "book",
        }
    }

    /// Phase of the built-in pipeline that creates this kind.
    pub fn provided_by(self) -> &'static str {
        match self {
            EntityKind::School => "school",
            EntityKind::User => "users",
            EntityKind::SchoolYear
            | EntityKind::Term
            | EntityKind::YearLevel
            | EntityKind::Subject => "academic",
            EntityKind::Teacher | EntityKind::Student | EntityKind::Guardian => "people",
            EntityKind::Class | EntityKind::Enrollment => "classes",
            EntityKind::Book => "library",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolRef {
    pub id: i64,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolYearRef {
    pub id: i64,
    pub name: String,
    pub starts_on: NaiveDate,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRef {
    pub id: i64,
    pub school_year_id: i64,
    pub sequence: i32,
    pub starts_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearLevelRef {
    pub id: i64,
    pub code: String,
    pub level_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRef {
    pub id: i64,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherRef {
    pub id: i64,
    pub user_id: i64,
    pub employee_code: String,
    pub subject_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRef {
    pub id: i64,
    pub user_id: i64,
    pub student_number: String,
    pub year_level_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardianRef {
    pub id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRef {
    pub id: i64,
    pub code: String,
    pub school_year_id: i64,
    pub year_level_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentRef {
    pub class_id: i64,
    pub student_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRef {
    pub id: i64,
    pub isbn: String,
}

/// References accumulated during a run, keyed by entity kind.
///
/// A kind is *loaded* once some phase or the resolver has supplied it, even
/// if the list is empty; `len` and `is_loaded` let callers tell the two apart.
#[derive(Debug, Clone, Default)]
pub struct RefSet {
    school: Option<SchoolRef>,
    users: Vec<UserRef>,
    school_years: Vec<SchoolYearRef>,
    terms: Vec<TermRef>,
    year_levels: Vec<YearLevelRef>,
    subjects: Vec<SubjectRef>,
    teachers: Vec<TeacherRef>,
    students: Vec<StudentRef>,
    guardians: Vec<GuardianRef>,
    classes: Vec<ClassRef>,
    enrollments: Vec<EnrollmentRef>,
    books: Vec<BookRef>,
    loaded: BTreeSet<EntityKind>,
}

impl RefSet {
    pub fn is_loaded(&self, kind: EntityKind) -> bool {
        self.loaded.contains(&kind)
    }

    pub fn loaded_kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.loaded.iter().copied()
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::School => usize::from(self.school.is_some()),
            EntityKind::User => self.users.len(),
            EntityKind::SchoolYear => self.school_years.len(),
            EntityKind::Term => self.terms.len(),
            EntityKind::YearLevel => self.year_levels.len(),
            EntityKind::Subject => self.subjects.len(),
            EntityKind::Teacher => self.teachers.len(),
            EntityKind::Student => self.students.len(),
            EntityKind::Guardian => self.guardians.len(),
            EntityKind::Class => self.classes.len(),
            EntityKind::Enrollment => self.enrollments.len(),
            EntityKind::Book => self.books.len(),
        }
    }

    /// Moves every kind loaded in `other` into `self`, replacing what was there.
    pub fn absorb(&mut self, other: RefSet) {
        let RefSet {
            mut school,
            mut users,
            mut school_years,
            mut terms,
            mut year_levels,
            mut subjects,
            mut teachers,
            mut students,
            mut guardians,
            mut classes,
            mut enrollments,
            mut books,
            loaded,
        } = other;

        for kind in loaded {
            match kind {
                EntityKind::School => self.school = school.take(),
                EntityKind::User => self.users = std::mem::take(&mut users),
                EntityKind::SchoolYear => self.school_years = std::mem::take(&mut school_years),
                EntityKind::Term => self.terms = std::mem::take(&mut terms),
                EntityKind::YearLevel => self.year_levels = std::mem::take(&mut year_levels),
                EntityKind::Subject => self.subjects = std::mem::take(&mut subjects),
                EntityKind::Teacher => self.teachers = std::mem::take(&mut teachers),
                EntityKind::Student => self.students = std::mem::take(&mut students),
                EntityKind::Guardian => self.guardians = std::mem::take(&mut guardians),
                EntityKind::Class => self.classes = std::mem::take(&mut classes),
                EntityKind::Enrollment => self.enrollments = std::mem::take(&mut enrollments),
                EntityKind::Book => self.books = std::mem::take(&mut books),
            }
            self.loaded.insert(kind);
        }
    }

    pub fn school(&self) -> Option<&SchoolRef> {
        self.school.as_ref()
    }

    pub fn set_school(&mut self, school: SchoolRef) {
        self.school = Some(school);
        self.loaded.insert(EntityKind::School);
    }

    pub fn users(&self) -> &[UserRef] {
        &self.users
    }

    pub fn set_users(&mut self, users: Vec<UserRef>) {
        self.users = users;
        self.loaded.insert(EntityKind::User);
    }

    pub fn school_years(&self) -> &[SchoolYearRef] {
        &self.school_years
    }

    pub fn current_school_year(&self) -> Option<&SchoolYearRef> {
        self.school_years.iter().find(|y| y.is_current)
    }

    pub fn set_school_years(&mut self, years: Vec<SchoolYearRef>) {
        self.school_years = years;
        self.loaded.insert(EntityKind::SchoolYear);
    }

    pub fn terms(&self) -> &[TermRef] {
        &self.terms
    }

    pub fn set_terms(&mut self, terms: Vec<TermRef>) {
        self.terms = terms;
        self.loaded.insert(EntityKind::Term);
    }

    pub fn year_levels(&self) -> &[YearLevelRef] {
        &self.year_levels
    }

    pub fn set_year_levels(&mut self, levels: Vec<YearLevelRef>) {
        self.year_levels = levels;
        self.loaded.insert(EntityKind::YearLevel);
    }

    pub fn subjects(&self) -> &[SubjectRef] {
        &self.subjects
    }

    pub fn set_subjects(&mut self, subjects: Vec<SubjectRef>) {
        self.subjects = subjects;
        self.loaded.insert(EntityKind::Subject);
    }

    pub fn teachers(&self) -> &[TeacherRef] {
        &self.teachers
    }

    pub fn set_teachers(&mut self, teachers: Vec<TeacherRef>) {
        self.teachers = teachers;
        self.loaded.insert(EntityKind::Teacher);
    }

    pub fn students(&self) -> &[StudentRef] {
        &self.students
    }

    pub fn set_students(&mut self, students: Vec<StudentRef>) {
        self.students = students;
        self.loaded.insert(EntityKind::Student);
    }

    pub fn guardians(&self) -> &[GuardianRef] {
        &self.guardians
    }

    pub fn set_guardians(&mut self, guardians: Vec<GuardianRef>) {
        self.guardians = guardians;
        self.loaded.insert(EntityKind::Guardian);
    }

    pub fn classes(&self) -> &[ClassRef] {
        &self.classes
    }

    pub fn set_classes(&mut self, classes: Vec<ClassRef>) {
        self.classes = classes;
        self.loaded.insert(EntityKind::Class);
    }

    pub fn enrollments(&self) -> &[EnrollmentRef] {
        &self.enrollments
    }

    pub fn set_enrollments(&mut self, enrollments: Vec<EnrollmentRef>) {
        self.enrollments = enrollments;
        self.loaded.insert(EntityKind::Enrollment);
    }

    pub fn books(&self) -> &[BookRef] {
        &self.books
    }

    pub fn set_books(&mut self, books: Vec<BookRef>) {
        self.books = books;
        self.loaded.insert(EntityKind::Book);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_is_loaded_but_has_no_rows() {
        let mut refs = RefSet::default();
        assert!(!refs.is_loaded(EntityKind::Book));
        refs.set_books(Vec::new());
        assert!(refs.is_loaded(EntityKind::Book));
        assert_eq!(refs.len(EntityKind::Book), 0);
    }

    #[test]
    fn absorb_only_replaces_loaded_kinds() {
        let mut base = RefSet::default();
        base.set_subjects(vec![SubjectRef { id: 1, code: "MATH".into() }]);
        base.set_books(vec![BookRef { id: 9, isbn: "9780000000002".into() }]);

        let mut update = RefSet::default();
        update.set_books(Vec::new());
        base.absorb(update);

        assert_eq!(base.len(EntityKind::Subject), 1);
        assert_eq!(base.len(EntityKind::Book), 0);
        assert!(base.is_loaded(EntityKind::Book));
    }

    #[test]
    fn every_kind_names_a_provider() {
        for kind in EntityKind::ALL {
            assert!(!kind.provided_by().is_empty(), "{kind} has no provider");
        }
    }
}
