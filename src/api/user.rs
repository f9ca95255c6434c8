use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::employee::Employee;
use actix_web::{HttpResponse, web};
use chrono::NaiveTime;
use serde::Serialize;
use sqlx::{FromRow, MySqlPool};
use utoipa::ToSchema;

#[derive(FromRow, Serialize, ToSchema)]
pub struct CurrentProject {
    #[schema(example = 10)]
    pub id: u64,
    #[schema(example = "Harbor tower")]
    pub name: String,
}

#[derive(Serialize, ToSchema)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub email: String,
    #[schema(example = "North yard")]
    pub residence: String,
    #[schema(example = "weekdays")]
    pub availability: String,
    pub current_project: Option<CurrentProject>,
}

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: Profile,
}

/// Profile of the authenticated employee
#[utoipa::path(
    get,
    path = "/api/user/profile",
    responses(
        (status = 200, description = "Profile found", body = ProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee row is gone"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn get_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let row = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, name, age, email, residence_point, availability, total_pay
        FROM employee
        WHERE id = ?
        "#,
    )
    .bind(&auth.employee_id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // Current project, if the employee belongs to any group.
    let current_project = sqlx::query_as::<_, CurrentProject>(
        r#"
        SELECT project.id, project.name
        FROM project
        INNER JOIN user_groups ON project.id = user_groups.project
        INNER JOIN employee_groups ON user_groups.id = employee_groups.group_id
        WHERE employee_groups.employee_id = ?
        LIMIT 1
        "#,
    )
    .bind(&auth.employee_id)
    .fetch_optional(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        success: true,
        profile: Profile {
            id: row.id,
            name: row.name,
            age: row.age,
            email: row.email,
            residence: row.residence_point.unwrap_or_else(|| "Not set".to_string()),
            availability: row.availability.unwrap_or_else(|| "Not set".to_string()),
            current_project,
        },
    }))
}

#[derive(FromRow, Serialize, ToSchema)]
pub struct PayShift {
    #[schema(example = 200.0)]
    pub payment: f64,
    #[schema(example = 8.0)]
    pub hours_of_work: f64,
    #[schema(example = "Monday")]
    pub day: String,
    #[schema(example = "08:00:00", value_type = String, format = "time")]
    pub start_time: NaiveTime,
    #[schema(example = "16:00:00", value_type = String, format = "time")]
    pub end_time: NaiveTime,
}

#[derive(Serialize, ToSchema)]
pub struct PaySummary {
    /// Sum over every linked shift, attended or not
    #[schema(example = 400.0)]
    pub tentative_pay: f64,
    #[schema(example = 16.0)]
    pub hours_worked: f64,
    #[schema(example = 25.0)]
    pub average_hourly_pay: f64,
    #[schema(example = 2)]
    pub total_shifts: usize,
    pub shifts: Vec<PayShift>,
}

#[derive(Serialize, ToSchema)]
pub struct PayResponse {
    pub success: bool,
    pub pay: PaySummary,
}

/// Pay summary across every shift linked through the employee's groups.
/// Aggregates whether or not the employee checked in: this is tentative
/// pay, not confirmed earnings.
#[utoipa::path(
    get,
    path = "/api/user/pay",
    responses(
        (status = 200, description = "Pay summary", body = PayResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn get_pay(auth: AuthUser, pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let shifts = sqlx::query_as::<_, PayShift>(
        r#"
        SELECT shifts.payment, shifts.hours_of_work, shifts.day,
               shifts.start_time, shifts.end_time
        FROM shifts
        INNER JOIN shift_group ON shifts.id = shift_group.shift_id
        INNER JOIN employee_groups ON shift_group.group_id = employee_groups.group_id
        WHERE employee_groups.employee_id = ?
        ORDER BY shifts.day DESC, shifts.start_time DESC
        "#,
    )
    .bind(&auth.employee_id)
    .fetch_all(pool.get_ref())
    .await?;

    let total_pay: f64 = shifts.iter().map(|s| s.payment).sum();
    let total_hours: f64 = shifts.iter().map(|s| s.hours_of_work).sum();
    let average_hourly_pay = if total_hours > 0.0 {
        total_pay / total_hours
    } else {
        0.0
    };

    Ok(HttpResponse::Ok().json(PayResponse {
        success: true,
        pay: PaySummary {
            tentative_pay: total_pay,
            hours_worked: total_hours,
            average_hourly_pay,
            total_shifts: shifts.len(),
            shifts,
        },
    }))
}
