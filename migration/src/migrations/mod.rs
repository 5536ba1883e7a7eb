pub mod m202505290001_create_users;
pub mod m202505290002_create_resources;
pub mod m202505290003_create_password_reset_tokens;
