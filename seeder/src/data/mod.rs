//! Static bilingual content. Phases index into these tables; nothing here
//! decides how many records exist or how they link.

mod announcements;
mod library;
mod names;

pub use announcements::{ANNOUNCEMENTS, AnnouncementContent};
pub use library::{BOOKS, BookContent};
pub use names::{FAMILY_NAMES, FEMALE_NAMES, MALE_NAMES, PersonName};

use db::models::user::Role;

pub struct StaffMember {
    pub role: Role,
    pub prefix: &'static str,
    pub name: &'static str,
    pub name_ar: &'static str,
}

pub static STAFF: &[StaffMember] = &[
    StaffMember {
        role: Role::Admin,
        prefix: "admin",
        name: "Faisal Al-Harbi",
        name_ar: "فيصل الحربي",
    },
    StaffMember {
        role: Role::Principal,
        prefix: "principal",
        name: "Huda Al-Qahtani",
        name_ar: "هدى القحطاني",
    },
    StaffMember {
        role: Role::Principal,
        prefix: "principal",
        name: "Majed Al-Otaibi",
        name_ar: "ماجد العتيبي",
    },
    StaffMember {
        role: Role::Accountant,
        prefix: "accounts",
        name: "Salman Al-Dosari",
        name_ar: "سلمان الدوسري",
    },
    StaffMember {
        role: Role::Librarian,
        prefix: "library",
        name: "Reem Al-Shehri",
        name_ar: "ريم الشهري",
    },
    StaffMember {
        role: Role::Registrar,
        prefix: "registrar",
        name: "Nawaf Al-Mutairi",
        name_ar: "نواف المطيري",
    },
];

pub struct LevelContent {
    pub code: &'static str,
    pub name: &'static str,
    pub name_ar: &'static str,
    /// Yearly tuition in halalas.
    pub tuition_cents: i64,
}

pub static YEAR_LEVELS: &[LevelContent] = &[
    LevelContent { code: "G01", name: "Grade 1", name_ar: "الصف الأول", tuition_cents: 1_800_000 },
    LevelContent { code: "G02", name: "Grade 2", name_ar: "الصف الثاني", tuition_cents: 1_800_000 },
    LevelContent { code: "G03", name: "Grade 3", name_ar: "الصف الثالث", tuition_cents: 1_900_000 },
    LevelContent { code: "G04", name: "Grade 4", name_ar: "الصف الرابع", tuition_cents: 1_900_000 },
    LevelContent { code: "G05", name: "Grade 5", name_ar: "الصف الخامس", tuition_cents: 2_000_000 },
    LevelContent { code: "G06", name: "Grade 6", name_ar: "الصف السادس", tuition_cents: 2_000_000 },
    LevelContent { code: "G07", name: "Grade 7", name_ar: "الصف السابع", tuition_cents: 2_300_000 },
    LevelContent { code: "G08", name: "Grade 8", name_ar: "الصف الثامن", tuition_cents: 2_300_000 },
    LevelContent { code: "G09", name: "Grade 9", name_ar: "الصف التاسع", tuition_cents: 2_400_000 },
    LevelContent { code: "G10", name: "Grade 10", name_ar: "الصف العاشر", tuition_cents: 2_700_000 },
    LevelContent { code: "G11", name: "Grade 11", name_ar: "الصف الحادي عشر", tuition_cents: 2_700_000 },
    LevelContent { code: "G12", name: "Grade 12", name_ar: "الصف الثاني عشر", tuition_cents: 2_800_000 },
];

pub struct SubjectContent {
    pub code: &'static str,
    pub name: &'static str,
    pub name_ar: &'static str,
    pub weekly_periods: i32,
}

pub static SUBJECTS: &[SubjectContent] = &[
    SubjectContent { code: "ARB", name: "Arabic Language", name_ar: "اللغة العربية", weekly_periods: 6 },
    SubjectContent { code: "ENG", name: "English Language", name_ar: "اللغة الإنجليزية", weekly_periods: 5 },
    SubjectContent { code: "MAT", name: "Mathematics", name_ar: "الرياضيات", weekly_periods: 6 },
    SubjectContent { code: "SCI", name: "Science", name_ar: "العلوم", weekly_periods: 4 },
    SubjectContent { code: "ISL", name: "Islamic Studies", name_ar: "الدراسات الإسلامية", weekly_periods: 4 },
    SubjectContent { code: "SOC", name: "Social Studies", name_ar: "الدراسات الاجتماعية", weekly_periods: 2 },
    SubjectContent { code: "CMP", name: "Computer Science", name_ar: "الحاسب الآلي", weekly_periods: 2 },
    SubjectContent { code: "ART", name: "Art Education", name_ar: "التربية الفنية", weekly_periods: 1 },
    SubjectContent { code: "PHE", name: "Physical Education", name_ar: "التربية البدنية", weekly_periods: 2 },
    SubjectContent { code: "QUR", name: "Holy Quran", name_ar: "القرآن الكريم", weekly_periods: 3 },
];

pub struct TermContent {
    pub name: &'static str,
    pub name_ar: &'static str,
    pub start: (u32, u32, u32),
    pub end: (u32, u32, u32),
}

/// `(year offset, month, day)` pairs; offset 0 is the start year.
pub static TERMS: &[TermContent] = &[
    TermContent { name: "First Term", name_ar: "الفصل الدراسي الأول", start: (0, 9, 1), end: (0, 12, 20) },
    TermContent { name: "Second Term", name_ar: "الفصل الدراسي الثاني", start: (1, 1, 5), end: (1, 3, 27) },
    TermContent { name: "Third Term", name_ar: "الفصل الدراسي الثالث", start: (1, 4, 6), end: (1, 6, 25) },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let levels: HashSet<_> = YEAR_LEVELS.iter().map(|l| l.code).collect();
        assert_eq!(levels.len(), YEAR_LEVELS.len());
        let subjects: HashSet<_> = SUBJECTS.iter().map(|s| s.code).collect();
        assert_eq!(subjects.len(), SUBJECTS.len());
    }

    #[test]
    fn every_entry_is_bilingual() {
        assert!(YEAR_LEVELS.iter().all(|l| !l.name_ar.is_empty()));
        assert!(SUBJECTS.iter().all(|s| !s.name_ar.is_empty()));
        assert!(BOOKS.iter().all(|b| !b.title_ar.is_empty()));
        assert!(ANNOUNCEMENTS.iter().all(|a| !a.body_ar.is_empty()));
    }
}
