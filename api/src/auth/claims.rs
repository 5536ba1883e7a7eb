use serde::{Deserialize, Serialize};

/// JWT payload issued at login.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub exp: usize,
    pub admin: bool,
}

/// The authenticated caller, extracted from a Bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
