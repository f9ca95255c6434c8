use crate::{
    auth::{
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::{hash_password, verify_password},
    },
    config::Config,
    error::ApiError,
    models::{EmployeeAuthRow, LoginReq, RegisterReq, TokenType},
};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::email_cache;
use crate::utils::email_filter;

/// true  => email AVAILABLE
/// false => email TAKEN
pub async fn is_email_available(email: &str, pool: &MySqlPool) -> bool {
    let email = email.to_lowercase();

    // Cuckoo filter gives a fast definite negative.
    if !email_filter::might_exist(&email) {
        return true;
    }

    // Moka cache gives a fast positive.
    if email_cache::is_taken(&email).await {
        return false;
    }

    // Database fallback.
    let exists = sqlx::query_scalar::<_, i64>(
        "SELECT EXISTS(SELECT 1 FROM employee WHERE email = ? LIMIT 1)",
    )
    .bind(&email)
    .fetch_one(pool)
    .await
    .unwrap_or(1); // fail-safe

    exists == 0
}

#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    #[schema(example = "The user is registered successfully")]
    pub message: String,
    pub user_id: String,
}

/// Employee registration
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "Employee registered", body = RegisterResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn register(
    user: web::Json<RegisterReq>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let name = user.name.trim();
    let email = user.email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() || user.password.is_empty() {
        return Err(ApiError::Validation(
            "Name, email and password must not be empty".to_string(),
        ));
    }

    if !is_email_available(&email, pool.get_ref()).await {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let employee_id = Uuid::new_v4().to_string();

    let hashed = hash_password(&user.password)
        .map_err(|_| ApiError::Validation("Unusable password".to_string()))?;

    // Refresh token is bound to the new identifier before the row exists.
    let (refresh_token, _) = generate_refresh_token(
        &employee_id,
        &email,
        &config.refresh_token_secret,
        config.refresh_token_ttl,
    );

    let result = sqlx::query(
        r#"
        INSERT INTO employee (id, name, age, email, password, refresh_access_token)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&employee_id)
    .bind(name)
    .bind(user.age)
    .bind(&email)
    .bind(&hashed)
    .bind(&refresh_token)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            // Keep the filter and cache in step with the table.
            email_filter::record(&email);
            email_cache::mark_taken(&email).await;

            Ok(HttpResponse::Created().json(RegisterResponse {
                success: true,
                message: "The user is registered successfully".to_string(),
                user_id: employee_id,
            }))
        }
        Err(e) => {
            // Two registrations raced past the availability check.
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return Err(ApiError::Conflict("Email already registered".to_string()));
                }
            }

            Err(ApiError::Database(e))
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    /// Access token for the Authorization header
    pub token: String,
    pub refresh_token: String,
    pub user_id: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 401, description = "Unknown email or wrong password"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(pool, config, user),
    fields(email = %user.email)
)]
pub async fn login(
    user: web::Json<LoginReq>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    if user.email.trim().is_empty() || user.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    debug!("Fetching employee from database");

    let row = sqlx::query_as::<_, EmployeeAuthRow>(
        r#"
        SELECT id, email, password, refresh_access_token
        FROM employee
        WHERE email = ?
        "#,
    )
    .bind(user.email.trim().to_lowercase())
    .fetch_optional(pool.get_ref())
    .await?;

    let employee = match row {
        Some(e) => e,
        None => {
            info!("Invalid credentials: email not found");
            return Err(ApiError::Unauthorized(
                "Wrong credentials have been entered".to_string(),
            ));
        }
    };

    debug!("Verifying password");

    if verify_password(&user.password, &employee.password).is_err() {
        info!("Invalid credentials: password mismatch");
        return Err(ApiError::Unauthorized(
            "Wrong credentials have been entered".to_string(),
        ));
    }

    debug!("Generating tokens");

    let access_token = generate_access_token(
        &employee.id,
        &employee.email,
        &config.access_token_secret,
        config.access_token_ttl,
    );

    let (refresh_token, refresh_claims) = generate_refresh_token(
        &employee.id,
        &employee.email,
        &config.refresh_token_secret,
        config.refresh_token_ttl,
    );

    debug!(jti = %refresh_claims.jti, "Storing refresh token");

    sqlx::query("UPDATE employee SET refresh_access_token = ? WHERE id = ?")
        .bind(&refresh_token)
        .bind(&employee.id)
        .execute(pool.get_ref())
        .await?;

    info!("Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        message: "Successful login".to_string(),
        token: access_token,
        refresh_token,
        user_id: employee.id,
    }))
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Rotate the refresh token and issue a fresh access token.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "New token pair issued"),
        (status = 401, description = "Missing, invalid or superseded refresh token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn refresh_token(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let token = bearer_token(&req)
        .ok_or_else(|| ApiError::Unauthorized("No refresh token provided".to_string()))?;

    let claims = verify_token(token, &config.refresh_token_secret)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired refresh token".to_string()))?;

    if claims.token_type != TokenType::Refresh {
        return Err(ApiError::Unauthorized(
            "Invalid or expired refresh token".to_string(),
        ));
    }

    let row = sqlx::query_as::<_, EmployeeAuthRow>(
        r#"
        SELECT id, email, password, refresh_access_token
        FROM employee
        WHERE id = ?
        "#,
    )
    .bind(&claims.sub)
    .fetch_optional(pool.get_ref())
    .await?;

    let employee = row.ok_or_else(|| {
        ApiError::Unauthorized("Invalid or expired refresh token".to_string())
    })?;

    // Only the most recently issued refresh token is honored.
    if employee.refresh_access_token.as_deref() != Some(token) {
        return Err(ApiError::Unauthorized(
            "Invalid or expired refresh token".to_string(),
        ));
    }

    let (new_refresh_token, new_claims) = generate_refresh_token(
        &employee.id,
        &employee.email,
        &config.refresh_token_secret,
        config.refresh_token_ttl,
    );

    debug!(jti = %new_claims.jti, "Rotating refresh token");

    sqlx::query("UPDATE employee SET refresh_access_token = ? WHERE id = ?")
        .bind(&new_refresh_token)
        .bind(&employee.id)
        .execute(pool.get_ref())
        .await?;

    let access_token = generate_access_token(
        &employee.id,
        &employee.email,
        &config.access_token_secret,
        config.access_token_ttl,
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "token": access_token,
        "refresh_token": new_refresh_token,
    })))
}

/// Revoke the stored refresh token. Always succeeds.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Refresh token revoked (idempotent)")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> HttpResponse {
    let Some(token) = bearer_token(&req) else {
        return HttpResponse::NoContent().finish();
    };

    let Ok(claims) = verify_token(token, &config.refresh_token_secret) else {
        return HttpResponse::NoContent().finish();
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::NoContent().finish();
    }

    if let Err(e) =
        sqlx::query("UPDATE employee SET refresh_access_token = NULL WHERE id = ?")
            .bind(&claims.sub)
            .execute(pool.get_ref())
            .await
    {
        error!(error = %e, "Failed to clear refresh token");
    }

    HttpResponse::NoContent().finish()
}
