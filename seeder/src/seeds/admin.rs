use crate::seed::Seeder;
use db::models::user::Model as UserModel;
use sea_orm::{DatabaseConnection, DbErr};

/// Creates the configured admin account, or promotes the user already holding
/// its username or email.
pub struct AdminSeeder {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[async_trait::async_trait]
impl Seeder for AdminSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        UserModel::ensure_admin(db, &self.username, &self.email, &self.password).await?;
        Ok(())
    }
}
