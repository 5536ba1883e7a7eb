pub mod password_reset_token;
pub mod resource;
pub mod user;

pub use password_reset_token::Entity as PasswordResetToken;
pub use resource::Entity as Resource;
pub use user::Entity as User;
