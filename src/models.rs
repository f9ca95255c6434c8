use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = 30)]
    pub age: u32,
    #[schema(example = "alice@example.com", format = "email")]
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "alice@example.com", format = "email")]
    pub email: String,
    pub password: String,
}

/// Credential columns of an employee row, fetched during login/refresh.
#[derive(FromRow)]
pub struct EmployeeAuthRow {
    pub id: String,
    pub email: String,
    pub password: String,
    pub refresh_access_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Employee identifier
    pub sub: String,
    pub email: String,
    pub exp: usize,
    pub jti: String,
    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
