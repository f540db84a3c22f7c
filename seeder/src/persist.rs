//! The one write path every phase goes through.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, SqlErr,
};

/// Whether `find_or_create` wrote a new row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Existing,
}

/// True only for violations of a unique index or primary key.
///
/// Foreign-key, not-null and type errors are defects and must not be
/// mistaken for an idempotency collision.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Returns the row matching `natural_key`, inserting `model` if there is none.
///
/// If the insert loses a race against another writer, the winner's row is
/// read back and returned as `Existing`. Any other insert error propagates.
pub async fn find_or_create<E>(
    db: &DatabaseConnection,
    natural_key: Condition,
    model: E::ActiveModel,
) -> Result<(E::Model, Outcome), DbErr>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    if let Some(existing) = E::find().filter(natural_key.clone()).one(db).await? {
        return Ok((existing, Outcome::Existing));
    }

    match model.insert(db).await {
        Ok(created) => Ok((created, Outcome::Created)),
        Err(err) if is_unique_violation(&err) => {
            log::warn!("Insert into {} raced an existing row: {err}", E::default().table_name());
            match E::find().filter(natural_key).one(db).await? {
                Some(existing) => Ok((existing, Outcome::Existing)),
                // The conflict was on some other unique column.
                None => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use db::models::{school, user};
    use db::test_utils::setup_test_db;
    use sea_orm::{ColumnTrait, PaginatorTrait, Set};

    fn school_model(domain: &str) -> school::ActiveModel {
        let now = Utc::now();
        school::ActiveModel {
            domain: Set(domain.to_owned()),
            name: Set("Test School".to_owned()),
            name_ar: Set("مدرسة الاختبار".to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn second_call_finds_the_first_row() {
        let db = setup_test_db().await;
        let key = Condition::all().add(school::Column::Domain.eq("a.school.sa"));

        let (first, outcome) =
            find_or_create::<school::Entity>(&db, key.clone(), school_model("a.school.sa"))
                .await
                .unwrap();
        assert_eq!(outcome, Outcome::Created);

        let (second, outcome) =
            find_or_create::<school::Entity>(&db, key, school_model("a.school.sa"))
                .await
                .unwrap();
        assert_eq!(outcome, Outcome::Existing);
        assert_eq!(first.id, second.id);
        assert_eq!(school::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unique_conflict_outside_the_key_propagates() {
        let db = setup_test_db().await;
        find_or_create::<school::Entity>(
            &db,
            Condition::all().add(school::Column::Domain.eq("b.school.sa")),
            school_model("b.school.sa"),
        )
        .await
        .unwrap();

        // The lookup never matches, so the insert hits the unique domain index
        // and the read-back finds nothing to hand out instead.
        let blind = Condition::all().add(school::Column::Id.eq(-1));
        let err = find_or_create::<school::Entity>(&db, blind, school_model("b.school.sa"))
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
        assert_eq!(school::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn foreign_key_failures_propagate() {
        let db = setup_test_db().await;
        let now = Utc::now();
        let orphan = user::ActiveModel {
            school_id: Set(4242),
            email: Set("ghost@nowhere.sa".to_owned()),
            full_name: Set("Ghost".to_owned()),
            full_name_ar: Set("شبح".to_owned()),
            role: Set(user::Role::Admin),
            password_hash: Set("x".to_owned()),
            phone: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let err = find_or_create::<user::Entity>(
            &db,
            Condition::all().add(user::Column::Email.eq("ghost@nowhere.sa")),
            orphan,
        )
        .await
        .unwrap_err();
        assert!(!is_unique_violation(&err));
    }
}
