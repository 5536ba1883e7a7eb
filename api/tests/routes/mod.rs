mod auth;
mod resources;
