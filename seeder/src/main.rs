use crate::seed::run_seeder;
use crate::seeds::admin::AdminSeeder;
use colored::*;
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use util::config;

mod seed;
mod seeds;

const MIN_ADMIN_PASSWORD_LEN: usize = 8;

#[tokio::main]
async fn main() {
    let admin = AdminSeeder {
        username: config::admin_username(),
        email: config::admin_email(),
        password: config::admin_password(),
    };

    if admin.username.trim().is_empty() || admin.email.trim().is_empty() {
        eprintln!("{}", "ADMIN_USERNAME and ADMIN_EMAIL must be set".red());
        std::process::exit(1);
    }
    if admin.password.len() < MIN_ADMIN_PASSWORD_LEN {
        eprintln!(
            "{}",
            format!("ADMIN_PASSWORD must be at least {MIN_ADMIN_PASSWORD_LEN} characters").red()
        );
        std::process::exit(1);
    }

    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("{} {}", "Failed to open database:".red(), e);
            std::process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(&db, None).await {
        eprintln!("{} {}", "Failed to run migrations:".red(), e);
        std::process::exit(1);
    }

    run_seeder(&admin, "Admin", &db).await;
}
