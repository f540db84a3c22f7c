use super::{Account, ensure_account, school_id};
use crate::data::STAFF;
use crate::error::SeedError;
use crate::keys::{self, KeyPart, natural_key};
use crate::refs::{EntityKind, RefSet, UserRef};
use crate::seed::{Phase, PhaseContext, PhaseDescriptor, PhaseOutput, Requirement};
use async_trait::async_trait;
use db::models::user::hash_password;

pub struct UsersSeeder;

static DESCRIPTOR: PhaseDescriptor = PhaseDescriptor {
    name: "users",
    description: "Administrative staff accounts (admin, principals, accountant, librarian, registrar)",
    requires: &[Requirement::Required(EntityKind::School)],
    provides: &[EntityKind::User],
};

#[async_trait]
impl Phase for UsersSeeder {
    fn descriptor(&self) -> &'static PhaseDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &PhaseContext<'_>, refs: &RefSet) -> Result<PhaseOutput, SeedError> {
        let school_id = school_id(DESCRIPTOR.name, refs)?;
        let password_hash = hash_password(&ctx.settings.demo_password)?;

        let mut out = PhaseOutput::default();
        let mut users = Vec::with_capacity(STAFF.len());
        for (i, staff) in STAFF.iter().enumerate() {
            let email = keys::email(ctx.tenant, staff.prefix, i + 1);
            let account = Account {
                email: email.clone(),
                full_name: staff.name.to_owned(),
                full_name_ar: staff.name_ar.to_owned(),
                role: staff.role,
                phone: None,
            };
            let (row, outcome) = ensure_account(ctx.db, school_id, &password_hash, account).await?;
            out.tally.record(
                natural_key(ctx.tenant, EntityKind::User, KeyPart::Semantic(&[email.as_str()])),
                outcome,
            );
            users.push(UserRef {
                id: row.id,
                email: row.email,
                role: row.role,
            });
        }

        out.refs.set_users(users);
        Ok(out)
    }
}
