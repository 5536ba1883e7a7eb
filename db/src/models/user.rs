use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, Set};
use serde::Serialize;

/// Represents a user in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Display name.
    pub name: String,
    /// User's unique email address.
    pub email: String,
    /// Securely hashed password string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether the user has admin privileges.
    pub admin: bool,
    /// The one resource this user is allowed to edit, if any.
    pub affiliation: Option<i64>,
    /// Timestamp when the user was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the user was last updated.
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::password_reset_token::Entity")]
    PasswordResetToken,
}

impl Related<super::password_reset_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PasswordResetToken.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inserts a new user, hashing the plain-text password with Argon2.
    pub async fn create(
        db: &DatabaseConnection,
        username: &str,
        name: &str,
        email: &str,
        password: &str,
        admin: bool,
        affiliation: Option<i64>,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        let user = ActiveModel {
            username: Set(username.trim().to_owned()),
            name: Set(name.trim().to_owned()),
            email: Set(email.trim().to_owned()),
            password_hash: Set(Self::hash_password(password)?),
            admin: Set(admin),
            affiliation: Set(affiliation),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        user.insert(db).await
    }

    /// Looks a user up by either their username or their email address.
    pub async fn find_by_login(
        db: &DatabaseConnection,
        identifier: &str,
    ) -> Result<Option<Self>, DbErr> {
        let identifier = identifier.trim();
        Entity::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(db)
            .await
    }

    pub async fn get_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(email.trim()))
            .one(db)
            .await
    }

    /// Returns `true` if a user already uses this username or email.
    pub async fn exists_with(
        db: &DatabaseConnection,
        username: &str,
        email: &str,
    ) -> Result<bool, DbErr> {
        let found = Entity::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(username.trim()))
                    .add(Column::Email.eq(email.trim())),
            )
            .one(db)
            .await?;
        Ok(found.is_some())
    }

    /// Replaces the stored password hash.
    pub async fn update_password(
        db: &DatabaseConnection,
        user_id: i64,
        password: &str,
    ) -> Result<Self, DbErr> {
        let user = ActiveModel {
            id: Set(user_id),
            password_hash: Set(Self::hash_password(password)?),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        user.update(db).await
    }

    pub fn hash_password(password: &str) -> Result<String, DbErr> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DbErr::Custom(format!("password hashing failed: {e}")))
    }

    pub fn verify_password(&self, password: &str) -> bool {
        let parsed = match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Admins may edit every resource; everyone else only their affiliation.
    pub fn can_edit_resource(&self, resource_id: i64) -> bool {
        self.admin || self.affiliation == Some(resource_id)
    }

    /// Makes sure an admin account exists for `username` / `email`.
    ///
    /// A user already holding either identifier is promoted and keeps its password.
    /// Otherwise a new admin is created with `password`.
    pub async fn ensure_admin(
        db: &DatabaseConnection,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, DbErr> {
        let existing = Entity::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(username.trim()))
                    .add(Column::Email.eq(email.trim())),
            )
            .one(db)
            .await?;

        match existing {
            Some(user) if user.admin => Ok(user),
            Some(user) => {
                let mut active: ActiveModel = user.into();
                active.admin = Set(true);
                active.updated_at = Set(Utc::now());
                active.update(db).await
            }
            None => Self::create(db, username, username, email, password, true, None).await,
        }
    }
}
