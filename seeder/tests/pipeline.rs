use async_trait::async_trait;
use chrono::NaiveDate;
use db::models::{
    announcement, attendance_record, book_loan, class, class_enrollment, fee_invoice,
    grade_record, library_book, school, student, user,
};
use db::test_utils::setup_test_db;
use pretty_assertions::assert_eq;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter};
use seeder::error::SeedError;
use seeder::orchestrator::{Orchestrator, Registry};
use seeder::refs::{EntityKind, RefSet};
use seeder::report::Reporter;
use seeder::resolver::Resolver;
use seeder::seed::{Phase, PhaseContext, PhaseDescriptor, PhaseOutput, Requirement};
use seeder::seeds;
use seeder::settings::SeedSettings;
use seeder::tenant::TenantContext;

fn tenant() -> TenantContext {
    TenantContext::new("test.school.sa", "Test School", "مدرسة الاختبار")
}

fn settings() -> SeedSettings {
    SeedSettings {
        demo_password: "Test@12345".to_owned(),
        rng_seed: 7,
        year_levels: 2,
        sections_per_level: 2,
        students_per_level: 3,
        teachers: 2,
        attendance_days: 2,
        graded_terms: 1,
        library_loans: 3,
        today: NaiveDate::from_ymd_opt(2025, 10, 15).unwrap(),
    }
}

/// Rows each phase defines with `settings()`.
const EXPECTED: [(&str, u64); 10] = [
    ("school", 1),
    // six staff accounts
    ("users", 6),
    // 2 years + 3 terms + 2 levels + 10 subjects
    ("academic", 17),
    // 2 teachers and 6 students with accounts, 3 guardians with accounts, 6 links
    ("people", 28),
    // 4 sections + 6 enrollments
    ("classes", 10),
    // 6 enrollments x 2 days
    ("attendance", 12),
    // 6 students x 10 subjects x 1 term
    ("grades", 60),
    ("finance", 6),
    // 16 books + 3 loans
    ("library", 19),
    ("announcements", 6),
];

async fn run_all(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    settings: &SeedSettings,
) -> Result<(Reporter, RefSet), SeedError> {
    let registry = seeds::registry()?;
    let mut reporter = Reporter::quiet();
    let refs = Orchestrator::new(db, tenant, settings, &registry)
        .run_all(&mut reporter)
        .await?;
    Ok((reporter, refs))
}

async fn run_one(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    phase: &str,
) -> Result<Reporter, SeedError> {
    run_one_with(db, tenant, &settings(), phase).await
}

async fn run_one_with(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    settings: &SeedSettings,
    phase: &str,
) -> Result<Reporter, SeedError> {
    let registry = seeds::registry()?;
    let mut reporter = Reporter::quiet();
    Orchestrator::new(db, tenant, settings, &registry)
        .run_single(phase, &mut reporter)
        .await?;
    Ok(reporter)
}

async fn row_counts(db: &DatabaseConnection) -> Vec<u64> {
    vec![
        school::Entity::find().count(db).await.unwrap(),
        user::Entity::find().count(db).await.unwrap(),
        student::Entity::find().count(db).await.unwrap(),
        class::Entity::find().count(db).await.unwrap(),
        class_enrollment::Entity::find().count(db).await.unwrap(),
        attendance_record::Entity::find().count(db).await.unwrap(),
        grade_record::Entity::find().count(db).await.unwrap(),
        fee_invoice::Entity::find().count(db).await.unwrap(),
        library_book::Entity::find().count(db).await.unwrap(),
        book_loan::Entity::find().count(db).await.unwrap(),
        announcement::Entity::find().count(db).await.unwrap(),
    ]
}

#[tokio::test]
async fn full_run_on_empty_database_creates_every_phase_in_order() {
    let db = setup_test_db().await;
    let (reporter, _) = run_all(&db, &tenant(), &settings()).await.unwrap();

    let phases: Vec<_> = reporter.records().iter().map(|r| r.phase.as_str()).collect();
    let expected_phases: Vec<_> = EXPECTED.iter().map(|(p, _)| *p).collect();
    assert_eq!(phases, expected_phases);

    for (phase, count) in EXPECTED {
        let record = reporter.record_for(phase).unwrap();
        assert_eq!((phase, record.created, record.existing), (phase, count, 0));
    }
}

#[tokio::test]
async fn second_full_run_writes_nothing() {
    let db = setup_test_db().await;
    let (first, _) = run_all(&db, &tenant(), &settings()).await.unwrap();
    let before = row_counts(&db).await;

    let (second, _) = run_all(&db, &tenant(), &settings()).await.unwrap();
    assert_eq!(row_counts(&db).await, before);

    for record in second.records() {
        let original = first.record_for(&record.phase).unwrap();
        assert_eq!(record.created, 0, "{} created rows on rerun", record.phase);
        assert_eq!(record.existing, original.created);
    }
}

#[tokio::test]
async fn classes_rerun_alone_reports_only_existing_rows() {
    let db = setup_test_db().await;
    run_all(&db, &tenant(), &settings()).await.unwrap();
    let before = row_counts(&db).await;

    let reporter = run_one(&db, &tenant(), "classes").await.unwrap();
    let record = reporter.record_for("classes").unwrap();
    assert_eq!((record.created, record.existing), (0, 10));
    assert_eq!(row_counts(&db).await, before);
}

#[tokio::test]
async fn classes_on_a_bare_tenant_is_refused_before_writing() {
    let db = setup_test_db().await;
    run_one(&db, &tenant(), "school").await.unwrap();
    let before = row_counts(&db).await;

    let err = run_one(&db, &tenant(), "classes").await.unwrap_err();
    assert!(err.is_precondition());
    match &err {
        SeedError::MissingPrerequisite {
            phase,
            kind,
            provider,
        } => {
            assert_eq!(phase, "classes");
            assert_eq!(*kind, EntityKind::SchoolYear);
            assert_eq!(provider, "academic");
        }
        other => panic!("expected a missing prerequisite, got {other}"),
    }
    assert_eq!(row_counts(&db).await, before);
}

#[tokio::test]
async fn every_phase_rerun_alone_writes_nothing() {
    let db = setup_test_db().await;
    run_all(&db, &tenant(), &settings()).await.unwrap();
    let before = row_counts(&db).await;

    for (phase, count) in EXPECTED {
        let reporter = run_one(&db, &tenant(), phase).await.unwrap();
        let record = reporter.record_for(phase).unwrap();
        assert_eq!((phase, record.created, record.existing), (phase, 0, count));
        assert_eq!(row_counts(&db).await, before, "{phase} wrote rows on rerun");
    }
}

#[tokio::test]
async fn dependent_phases_refuse_a_bare_tenant() {
    let db = setup_test_db().await;
    run_one(&db, &tenant(), "school").await.unwrap();
    let before = row_counts(&db).await;

    let dependent: Vec<_> = seeds::phases()
        .iter()
        .map(|p| p.descriptor())
        .filter(|d| {
            d.requires
                .iter()
                .any(|r| matches!(r, Requirement::Required(k) if *k != EntityKind::School))
        })
        .map(|d| d.name)
        .collect();
    assert_eq!(
        dependent,
        ["people", "classes", "attendance", "grades", "finance"]
    );

    for phase in dependent {
        let err = run_one(&db, &tenant(), phase).await.unwrap_err();
        assert!(err.is_precondition(), "{phase}: {err}");
        assert!(
            matches!(err, SeedError::MissingPrerequisite { phase: ref p, .. } if p == phase),
            "{phase}: {err}"
        );
        assert_eq!(row_counts(&db).await, before, "{phase} wrote before refusing");
    }
}

#[tokio::test]
async fn changing_the_section_count_keeps_one_class_per_student() {
    let db = setup_test_db().await;
    run_all(&db, &tenant(), &settings()).await.unwrap();

    let wider = SeedSettings {
        sections_per_level: 3,
        ..settings()
    };
    let reporter = run_one_with(&db, &tenant(), &wider, "classes").await.unwrap();
    let record = reporter.record_for("classes").unwrap();
    // Two new sections; every enrollment already exists.
    assert_eq!((record.created, record.existing), (2, 10));

    let enrollments = class_enrollment::Entity::find().all(&db).await.unwrap();
    assert_eq!(enrollments.len(), 6);
    let mut students: Vec<_> = enrollments.iter().map(|e| e.student_id).collect();
    students.sort();
    students.dedup();
    assert_eq!(students.len(), 6);
}

#[tokio::test]
async fn attendance_picks_up_a_newly_started_term() {
    let db = setup_test_db().await;
    run_all(&db, &tenant(), &settings()).await.unwrap();
    assert_eq!(attendance_record::Entity::find().count(&db).await.unwrap(), 12);

    let february = SeedSettings {
        today: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        ..settings()
    };
    let reporter = run_one_with(&db, &tenant(), &february, "attendance")
        .await
        .unwrap();
    assert_eq!(reporter.record_for("attendance").unwrap().created, 12);
    assert_eq!(attendance_record::Entity::find().count(&db).await.unwrap(), 24);

    let again = run_one_with(&db, &tenant(), &february, "attendance")
        .await
        .unwrap();
    assert_eq!(again.record_for("attendance").unwrap().created, 0);
}

#[tokio::test]
async fn single_phase_without_a_tenant_fails() {
    let db = setup_test_db().await;
    let err = run_one(&db, &tenant(), "users").await.unwrap_err();
    assert!(matches!(err, SeedError::MissingTenant { ref domain } if domain == "test.school.sa"));
    assert_eq!(user::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_phase_is_rejected() {
    let db = setup_test_db().await;
    let err = run_one(&db, &tenant(), "cafeteria").await.unwrap_err();
    assert!(matches!(err, SeedError::UnknownPhase(ref name) if name == "cafeteria"));
    assert!(!err.is_precondition());
}

#[test]
fn listing_names_every_phase_with_a_description() {
    let registry = seeds::registry().unwrap();
    let listing = registry.listing();
    assert_eq!(listing.len(), EXPECTED.len());
    for (name, description) in listing {
        assert!(!name.is_empty());
        assert!(!description.trim().is_empty(), "{name} has no description");
    }
}

#[tokio::test]
async fn optional_inputs_may_be_empty() {
    let db = setup_test_db().await;
    run_one(&db, &tenant(), "school").await.unwrap();

    let library = run_one(&db, &tenant(), "library").await.unwrap();
    assert_eq!(library.record_for("library").unwrap().created, 16);
    assert_eq!(book_loan::Entity::find().count(&db).await.unwrap(), 0);

    run_one(&db, &tenant(), "announcements").await.unwrap();
    let unsigned = announcement::Entity::find()
        .filter(announcement::Column::AuthorId.is_null())
        .count(&db)
        .await
        .unwrap();
    assert_eq!(unsigned, 6);
}

#[tokio::test]
async fn resolved_references_match_what_the_run_produced() {
    let db = setup_test_db().await;
    let tenant = tenant();
    let (_, produced) = run_all(&db, &tenant, &settings()).await.unwrap();

    let resolver = Resolver::for_tenant(&db, &tenant).await.unwrap();
    let mut resolved = RefSet::default();
    for kind in EntityKind::ALL {
        resolver.load(kind, &mut resolved).await.unwrap();
        assert_eq!(resolved.len(kind), produced.len(kind), "{kind} differs");
    }

    assert_eq!(resolved.school(), produced.school());
    assert_eq!(resolved.users(), produced.users());
    assert_eq!(resolved.school_years(), produced.school_years());
    assert_eq!(resolved.terms(), produced.terms());
    assert_eq!(resolved.year_levels(), produced.year_levels());
    assert_eq!(resolved.subjects(), produced.subjects());
    assert_eq!(resolved.teachers(), produced.teachers());
    assert_eq!(resolved.students(), produced.students());
    assert_eq!(resolved.classes(), produced.classes());
    assert_eq!(resolved.books(), produced.books());

    let sorted = |refs: &RefSet| {
        let mut pairs: Vec<_> = refs
            .enrollments()
            .iter()
            .map(|e| (e.class_id, e.student_id))
            .collect();
        pairs.sort();
        pairs
    };
    assert_eq!(sorted(&resolved), sorted(&produced));
}

#[tokio::test]
async fn tenants_never_see_each_other() {
    let db = setup_test_db().await;
    let north = TenantContext::new("north.school.sa", "North", "الشمال");
    let south = TenantContext::new("south.school.sa", "South", "الجنوب");
    let (_, north_refs) = run_all(&db, &north, &settings()).await.unwrap();
    let (_, south_refs) = run_all(&db, &south, &settings()).await.unwrap();

    let resolver = Resolver::for_tenant(&db, &north).await.unwrap();
    let students = resolver.students().await.unwrap();
    assert_eq!(students.len(), 6);
    assert_eq!(students, north_refs.students());
    assert!(
        students
            .iter()
            .all(|s| !south_refs.students().iter().any(|o| o.id == s.id))
    );

    let users = resolver.users().await.unwrap();
    assert!(users.iter().all(|u| u.email.ends_with("@north.school.sa")));
    assert_eq!(resolver.books().await.unwrap(), north_refs.books());
}

#[tokio::test]
async fn natural_keys_are_stable_across_databases() {
    let emails = |db: DatabaseConnection| async move {
        let mut emails: Vec<String> = user::Entity::find()
            .all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        emails.sort();
        emails
    };

    let a = setup_test_db().await;
    run_all(&a, &tenant(), &settings()).await.unwrap();
    let b = setup_test_db().await;
    run_all(&b, &tenant(), &settings()).await.unwrap();

    assert_eq!(emails(a).await, emails(b).await);
}

#[tokio::test]
async fn interrupted_pipeline_resumes_without_duplicates() {
    let db = setup_test_db().await;
    for phase in ["school", "users", "academic"] {
        run_one(&db, &tenant(), phase).await.unwrap();
    }

    let (reporter, _) = run_all(&db, &tenant(), &settings()).await.unwrap();
    for phase in ["school", "users", "academic"] {
        assert_eq!(reporter.record_for(phase).unwrap().created, 0, "{phase}");
    }
    assert_eq!(reporter.record_for("people").unwrap().created, 28);
}

struct Broken;

static BROKEN: PhaseDescriptor = PhaseDescriptor {
    name: "broken",
    description: "always fails",
    requires: &[Requirement::Required(EntityKind::School)],
    provides: &[],
};

#[async_trait]
impl Phase for Broken {
    fn descriptor(&self) -> &'static PhaseDescriptor {
        &BROKEN
    }

    async fn run(&self, _: &PhaseContext<'_>, _: &RefSet) -> Result<PhaseOutput, SeedError> {
        Err(DbErr::Custom("disk on fire".to_owned()).into())
    }
}

#[tokio::test]
async fn phase_failures_are_tagged_and_keep_earlier_rows() {
    let db = setup_test_db().await;
    let mut phases = seeds::phases();
    phases.truncate(1);
    phases.push(Box::new(Broken));
    let registry = Registry::new(phases).unwrap();

    let (tenant, settings) = (tenant(), settings());
    let mut reporter = Reporter::quiet();
    let err = Orchestrator::new(&db, &tenant, &settings, &registry)
        .run_all(&mut reporter)
        .await
        .unwrap_err();

    assert!(matches!(err, SeedError::PhaseFailed { ref phase, .. } if phase == "broken"));
    assert!(!err.is_precondition());
    assert!(err.to_string().contains("disk on fire"));
    assert_eq!(reporter.records().len(), 1);
    assert_eq!(school::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn renamed_tenant_keeps_its_row() {
    let db = setup_test_db().await;
    run_one(&db, &tenant(), "school").await.unwrap();

    let renamed = TenantContext::new("test.school.sa", "Renamed School", "مدرسة جديدة");
    let reporter = run_one(&db, &renamed, "school").await.unwrap();
    assert_eq!(reporter.record_for("school").unwrap().existing, 1);

    let row = school::Entity::find()
        .filter(school::Column::Domain.eq("test.school.sa"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.name, "Renamed School");
    assert_eq!(school::Entity::find().count(&db).await.unwrap(), 1);
}
