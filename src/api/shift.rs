use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::shift::Day;
use actix_web::{HttpResponse, web};
use chrono::{Datelike, Local, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, MySqlPool};
use utoipa::ToSchema;

#[derive(FromRow)]
struct TodayShiftRow {
    id: u64,
    day: String,
    start_time: NaiveTime,
    end_time: NaiveTime,
    hours_of_work: f64,
    payment: f64,
    project: u64,
    checked_in: i64,
}

#[derive(Serialize, ToSchema)]
pub struct TodayShift {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Monday")]
    pub day: String,
    #[schema(example = "08:00:00", value_type = String, format = "time")]
    pub start_time: NaiveTime,
    #[schema(example = "16:00:00", value_type = String, format = "time")]
    pub end_time: NaiveTime,
    #[schema(example = 8.0)]
    pub hours_of_work: f64,
    #[schema(example = 200.0)]
    pub payment: f64,
    #[schema(example = 10)]
    pub project: u64,
    pub checked_in: bool,
    /// Checkout is never persisted, so this is always false
    pub checked_out: bool,
}

#[derive(Serialize, ToSchema)]
pub struct TodayShiftsResponse {
    pub success: bool,
    pub shifts: Vec<TodayShift>,
}

/// Today's shifts for the authenticated employee, with check-in state
#[utoipa::path(
    get,
    path = "/api/shifts/today",
    responses(
        (status = 200, description = "Shift rows for today", body = TodayShiftsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Shifts"
)]
pub async fn today_shifts(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let now = Local::now();
    let today = Day::from(now.weekday()).to_string();
    let today_date = now.date_naive();

    let rows = sqlx::query_as::<_, TodayShiftRow>(
        r#"
        SELECT shifts.id, shifts.day, shifts.start_time, shifts.end_time,
               shifts.hours_of_work, shifts.payment, shifts.project,
               CASE WHEN attendance.employee_id IS NOT NULL THEN 1 ELSE 0 END AS checked_in
        FROM shifts
        INNER JOIN shift_group ON shifts.id = shift_group.shift_id
        INNER JOIN employee_groups ON employee_groups.group_id = shift_group.group_id
        LEFT JOIN attendance ON attendance.shift_id = shifts.id
            AND attendance.employee_id = ?
            AND attendance.date_of_shift = ?
        WHERE employee_groups.employee_id = ? AND shifts.day = ?
        ORDER BY shifts.start_time ASC
        "#,
    )
    .bind(&auth.employee_id)
    .bind(today_date)
    .bind(&auth.employee_id)
    .bind(&today)
    .fetch_all(pool.get_ref())
    .await?;

    let shifts = rows
        .into_iter()
        .map(|r| TodayShift {
            id: r.id,
            day: r.day,
            start_time: r.start_time,
            end_time: r.end_time,
            hours_of_work: r.hours_of_work,
            payment: r.payment,
            project: r.project,
            checked_in: r.checked_in != 0,
            checked_out: false,
        })
        .collect();

    Ok(HttpResponse::Ok().json(TodayShiftsResponse {
        success: true,
        shifts,
    }))
}

#[derive(Serialize, ToSchema)]
pub struct UpcomingShiftsResponse {
    pub success: bool,
    pub shifts: Vec<crate::model::shift::Shift>,
}

/// Shifts later today, soonest first
#[utoipa::path(
    get,
    path = "/api/shifts/upcoming",
    responses(
        (status = 200, description = "Upcoming shift rows", body = UpcomingShiftsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Shifts"
)]
pub async fn upcoming_shifts(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let now = Local::now();
    let today = Day::from(now.weekday()).to_string();
    let current_time = now.time();

    let shifts = sqlx::query_as::<_, crate::model::shift::Shift>(
        r#"
        SELECT shifts.id, shifts.day, shifts.start_time, shifts.end_time,
               shifts.hours_of_work, shifts.payment, shifts.project
        FROM shifts
        INNER JOIN shift_group ON shifts.id = shift_group.shift_id
        INNER JOIN employee_groups ON employee_groups.group_id = shift_group.group_id
        WHERE employee_groups.employee_id = ? AND shifts.day = ? AND shifts.start_time > ?
        ORDER BY shifts.start_time ASC
        "#,
    )
    .bind(&auth.employee_id)
    .bind(&today)
    .bind(current_time)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(UpcomingShiftsResponse {
        success: true,
        shifts,
    }))
}

#[derive(Deserialize, ToSchema)]
pub struct CheckInReq {
    #[schema(example = 1)]
    pub shift_id: u64,
}

#[derive(Serialize, ToSchema)]
pub struct CheckInResponse {
    pub success: bool,
    #[schema(example = "Check-in successful")]
    pub message: String,
    #[schema(example = 600.0)]
    pub new_pay: f64,
}

/// Check in to a shift. Credits the shift's payment once per day:
/// the pay increment and the attendance row commit together.
#[utoipa::path(
    post,
    path = "/api/shifts/check-in",
    request_body = CheckInReq,
    responses(
        (status = 200, description = "Checked in, pay credited", body = CheckInResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Shift or employee missing"),
        (status = 409, description = "Already checked in today"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Shifts"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CheckInReq>,
) -> Result<HttpResponse, ApiError> {
    let today = Local::now().date_naive();

    let mut tx = pool.begin().await?;

    let already = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM attendance
            WHERE employee_id = ? AND shift_id = ? AND date_of_shift = ?
        )
        "#,
    )
    .bind(&auth.employee_id)
    .bind(payload.shift_id)
    .bind(today)
    .fetch_one(&mut *tx)
    .await?;

    if already != 0 {
        return Err(ApiError::Conflict(
            "Already checked in for this shift".to_string(),
        ));
    }

    let payment = sqlx::query_scalar::<_, f64>("SELECT payment FROM shifts WHERE id = ?")
        .bind(payload.shift_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Shift not found".to_string()))?;

    // Lock the employee row so concurrent check-ins serialize on the pay read.
    let total_pay =
        sqlx::query_scalar::<_, f64>("SELECT total_pay FROM employee WHERE id = ? FOR UPDATE")
            .bind(&auth.employee_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    let new_pay = total_pay + payment;

    sqlx::query("UPDATE employee SET total_pay = ? WHERE id = ?")
        .bind(new_pay)
        .bind(&auth.employee_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("INSERT INTO attendance (employee_id, shift_id, date_of_shift) VALUES (?, ?, ?)")
        .bind(&auth.employee_id)
        .bind(payload.shift_id)
        .bind(today)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(HttpResponse::Ok().json(CheckInResponse {
        success: true,
        message: "Check-in successful".to_string(),
        new_pay,
    }))
}

#[derive(Deserialize, ToSchema)]
pub struct CheckoutReq {
    #[schema(example = 1)]
    pub shift_id: u64,
}

#[derive(Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub success: bool,
    #[schema(example = "Check-out successful")]
    pub message: String,
    #[schema(example = 600.0)]
    pub total_pay: f64,
}

/// Confirm the end of a shift. Nothing is persisted: checkout only
/// verifies today's check-in and reads back the accumulated pay.
#[utoipa::path(
    post,
    path = "/api/shifts/checkout",
    request_body = CheckoutReq,
    responses(
        (status = 200, description = "Checkout confirmed", body = CheckoutResponse),
        (status = 400, description = "Not checked in today"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee missing"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Shifts"
)]
pub async fn checkout(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CheckoutReq>,
) -> Result<HttpResponse, ApiError> {
    let today = Local::now().date_naive();

    let checked_in = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM attendance
            WHERE employee_id = ? AND shift_id = ? AND date_of_shift = ?
        )
        "#,
    )
    .bind(&auth.employee_id)
    .bind(payload.shift_id)
    .bind(today)
    .fetch_one(pool.get_ref())
    .await?;

    if checked_in == 0 {
        return Err(ApiError::Validation(
            "You must check in before checking out".to_string(),
        ));
    }

    let total_pay = sqlx::query_scalar::<_, f64>("SELECT total_pay FROM employee WHERE id = ?")
        .bind(&auth.employee_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    Ok(HttpResponse::Ok().json(CheckoutResponse {
        success: true,
        message: "Check-out successful".to_string(),
        total_pay,
    }))
}
