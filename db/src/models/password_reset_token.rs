use chrono::{DateTime, Duration, Utc};
use rand::{RngCore, thread_rng};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "password_reset_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// 32 random bytes, hex encoded.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        user_id: i64,
        expiry_minutes: i64,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        let active_model = ActiveModel {
            user_id: Set(user_id),
            token: Set(generate_token()),
            expires_at: Set(now + Duration::minutes(expiry_minutes)),
            used: Set(false),
            created_at: Set(now),
            ..Default::default()
        };
        active_model.insert(db).await
    }

    pub async fn find_valid_token(
        db: &DatabaseConnection,
        token: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::Token.eq(token))
            .filter(Column::Used.eq(false))
            .filter(Column::ExpiresAt.gt(Utc::now()))
            .one(db)
            .await
    }

    /// Like [`Model::find_valid_token`], but the token must also belong to `user_id`.
    pub async fn find_valid_for_user(
        db: &DatabaseConnection,
        token: &str,
        user_id: i64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::Token.eq(token))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Used.eq(false))
            .filter(Column::ExpiresAt.gt(Utc::now()))
            .one(db)
            .await
    }

    pub async fn mark_as_used(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let mut active_model: ActiveModel = self.clone().into();
        active_model.used = Set(true);
        active_model.update(db).await?;
        Ok(())
    }
}
