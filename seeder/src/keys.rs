//! Deterministic natural keys.
//!
//! Every function here is pure: the same tenant, kind and discriminator give
//! the same key in every process. Discriminators are sequence indexes or
//! content-derived parts, never random numbers, so two logical records of
//! the same kind can only collide if a phase hands in the same index twice.

use crate::tenant::TenantContext;
use std::fmt;

/// What distinguishes one record from its siblings of the same kind.
#[derive(Debug, Clone, Copy)]
pub enum KeyPart<'a> {
    Index(usize),
    Semantic(&'a [&'a str]),
}

/// `<domain>:<kind>:<discriminator>`, the identity a phase tallies records by.
///
/// `kind` is an `EntityKind` for referenceable rows, or a plain table label
/// such as `"attendance"` for rows nothing downstream links to.
pub fn natural_key(tenant: &TenantContext, kind: impl fmt::Display, part: KeyPart<'_>) -> String {
    let discriminator = match part {
        KeyPart::Index(index) => format!("{index:05}"),
        KeyPart::Semantic(parts) => parts.join("/"),
    };
    format!("{}:{}:{}", tenant.domain, kind, discriminator)
}

/// Login email for the `index`-th account with the given local prefix.
pub fn email(tenant: &TenantContext, prefix: &str, index: usize) -> String {
    format!("{prefix}.{index:04}@{}", tenant.domain)
}

pub fn employee_code(index: usize) -> String {
    format!("EMP-{index:04}")
}

pub fn student_number(index: usize) -> String {
    format!("STU-{index:05}")
}

/// Section label in spreadsheet-column style: 0 → `A`, 25 → `Z`, 26 → `AA`.
pub fn section_label(section: usize) -> String {
    let mut label = Vec::new();
    let mut n = section + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}

pub fn class_code(level_code: &str, section: usize) -> String {
    format!("{level_code}-{}", section_label(section))
}

pub fn invoice_number(year: i32, term_sequence: i32, student_number: &str) -> String {
    format!("INV-{year}-T{term_sequence}-{student_number}")
}

/// A syntactically valid ISBN-13 unique per (tenant, index).
///
/// The registrant block is derived from the tenant domain so two schools do
/// not share catalogue numbers; the title block is the index itself.
pub fn isbn13(tenant: &TenantContext, index: usize) -> String {
    let registrant = stable_hash(&tenant.domain) % 1_000;
    let body = format!("978{registrant:03}{:06}", index % 1_000_000);
    let sum: u32 = body
        .bytes()
        .enumerate()
        .map(|(i, b)| u32::from(b - b'0') * if i % 2 == 0 { 1 } else { 3 })
        .sum();
    let check = (10 - sum % 10) % 10;
    format!("{body}{check}")
}

/// Lowercase ASCII slug; runs of anything else collapse to one `-`.
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// FNV-1a; stable across processes and toolchains, unlike `DefaultHasher`.
pub fn stable_hash(text: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    text.bytes()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refs::EntityKind;
    use std::collections::HashSet;

    fn tenant() -> TenantContext {
        TenantContext::new("demo.school.sa", "Demo", "تجربة")
    }

    #[test]
    fn same_inputs_same_key() {
        let a = natural_key(&tenant(), EntityKind::Student, KeyPart::Index(42));
        let b = natural_key(&tenant(), EntityKind::Student, KeyPart::Index(42));
        assert_eq!(a, b);
        assert_eq!(a, "demo.school.sa:student:00042");
    }

    #[test]
    fn different_index_different_key() {
        let keys: HashSet<_> = (0..500)
            .map(|i| natural_key(&tenant(), EntityKind::Teacher, KeyPart::Index(i)))
            .collect();
        assert_eq!(keys.len(), 500);
    }

    #[test]
    fn keys_are_namespaced_by_tenant_and_kind() {
        let other = TenantContext::new("other.school.sa", "Other", "أخرى");
        let a = natural_key(&tenant(), EntityKind::Book, KeyPart::Index(1));
        let b = natural_key(&other, EntityKind::Book, KeyPart::Index(1));
        let c = natural_key(&tenant(), EntityKind::Student, KeyPart::Index(1));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn semantic_parts_are_joined() {
        let key = natural_key(
            &tenant(),
            EntityKind::Enrollment,
            KeyPart::Semantic(&["G01-A", "STU-00001"]),
        );
        assert_eq!(key, "demo.school.sa:enrollment:G01-A/STU-00001");
    }

    #[test]
    fn emails_are_unique_per_index() {
        assert_eq!(email(&tenant(), "teacher", 7), "teacher.0007@demo.school.sa");
        assert_ne!(email(&tenant(), "teacher", 7), email(&tenant(), "teacher", 8));
        assert_ne!(email(&tenant(), "teacher", 7), email(&tenant(), "student", 7));
    }

    #[test]
    fn section_labels_roll_over() {
        assert_eq!(section_label(0), "A");
        assert_eq!(section_label(25), "Z");
        assert_eq!(section_label(26), "AA");
        assert_eq!(class_code("G07", 1), "G07-B");
    }

    #[test]
    fn isbn_has_valid_check_digit() {
        for index in [0, 1, 17, 999_999] {
            let isbn = isbn13(&tenant(), index);
            assert_eq!(isbn.len(), 13);
            let sum: u32 = isbn
                .bytes()
                .enumerate()
                .map(|(i, b)| u32::from(b - b'0') * if i % 2 == 0 { 1 } else { 3 })
                .sum();
            assert_eq!(sum % 10, 0, "{isbn}");
        }
        assert_ne!(isbn13(&tenant(), 1), isbn13(&tenant(), 2));
    }

    #[test]
    fn slug_collapses_punctuation() {
        assert_eq!(slug("Parent-Teacher Meeting: Term 1!"), "parent-teacher-meeting-term-1");
        assert_eq!(slug("  Hello  "), "hello");
    }

    #[test]
    fn stable_hash_is_fixed() {
        assert_eq!(stable_hash(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(stable_hash("a"), stable_hash("a"));
        assert_ne!(stable_hash("a"), stable_hash("b"));
    }
}
