use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::group::Group;
use crate::model::manager::Manager;
use crate::model::project::Project;
use crate::model::shift::{Day, ShiftPlan, parse_time_of_day};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, MySqlPool};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

/// Project currently handled by this manager, if any.
async fn managed_project(
    pool: &MySqlPool,
    manager_id: &str,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        r#"
        SELECT project.id, project.name, project.building_id,
               project.required_shifts, project.hours_per_shift, project.pay_per_hour
        FROM project
        INNER JOIN manager ON project.id = manager.handling_project
        WHERE manager.id = ?
        "#,
    )
    .bind(manager_id)
    .fetch_optional(pool)
    .await
}

#[derive(Serialize, ToSchema)]
pub struct CheckRoleResponse {
    pub success: bool,
    pub is_manager: bool,
    #[schema(example = 10, nullable = true)]
    pub handling_project: Option<u64>,
}

/// Whether the caller is a manager, and which project they hold
#[utoipa::path(
    get,
    path = "/api/manager/check-role",
    responses(
        (status = 200, description = "Role probe", body = CheckRoleResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn check_role(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let manager = sqlx::query_as::<_, Manager>(
        "SELECT id, handling_project FROM manager WHERE id = ?",
    )
    .bind(&auth.employee_id)
    .fetch_optional(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(CheckRoleResponse {
        success: true,
        is_manager: manager.is_some(),
        handling_project: manager.and_then(|m| m.handling_project),
    }))
}

#[derive(Serialize, ToSchema)]
pub struct CurrentProjectResponse {
    pub success: bool,
    pub current_project: Option<Project>,
}

/// The manager's current project, or null before selection
#[utoipa::path(
    get,
    path = "/api/manager/projects",
    responses(
        (status = 200, description = "Current project", body = CurrentProjectResponse),
        (status = 401, description = "Caller is not a manager"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn current_project(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let manager = sqlx::query_as::<_, Manager>(
        "SELECT id, handling_project FROM manager WHERE id = ?",
    )
    .bind(&auth.employee_id)
    .fetch_optional(pool.get_ref())
    .await?;

    if manager.is_none() {
        return Err(ApiError::Unauthorized("Unauthorized access".to_string()));
    }

    let project = managed_project(pool.get_ref(), &auth.employee_id).await?;

    Ok(HttpResponse::Ok().json(CurrentProjectResponse {
        success: true,
        current_project: project,
    }))
}

#[derive(Serialize, ToSchema)]
pub struct AvailableProjectsResponse {
    pub success: bool,
    pub projects: Vec<Project>,
}

/// Projects that no manager has claimed yet
#[utoipa::path(
    get,
    path = "/api/manager/available-projects",
    responses(
        (status = 200, description = "Unmanaged projects", body = AvailableProjectsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn available_projects(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let projects = sqlx::query_as::<_, Project>(
        r#"
        SELECT project.id, project.name, project.building_id,
               project.required_shifts, project.hours_per_shift, project.pay_per_hour
        FROM project
        LEFT JOIN manager ON manager.handling_project = project.id
        WHERE manager.id IS NULL
        "#,
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(AvailableProjectsResponse {
        success: true,
        projects,
    }))
}

#[derive(Deserialize, ToSchema)]
pub struct SelectProjectReq {
    #[schema(example = 10)]
    pub project_id: u64,
}

/// Claim a project. One project per manager, one manager per project;
/// the manager row is locked for the whole check-then-assign sequence.
#[utoipa::path(
    post,
    path = "/api/manager/select-project",
    request_body = SelectProjectReq,
    responses(
        (status = 200, description = "Project assigned"),
        (status = 401, description = "Caller is not a manager"),
        (status = 404, description = "Project does not exist"),
        (status = 409, description = "Manager or project already bound"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn select_project(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<SelectProjectReq>,
) -> Result<HttpResponse, ApiError> {
    let mut tx = pool.begin().await?;

    let manager = sqlx::query_as::<_, Manager>(
        "SELECT id, handling_project FROM manager WHERE id = ? FOR UPDATE",
    )
    .bind(&auth.employee_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
        ApiError::Unauthorized("Unauthorized: manager not found or invalid token".to_string())
    })?;

    if manager.handling_project.is_some() {
        return Err(ApiError::Conflict(
            "Conflict: you already manage a project".to_string(),
        ));
    }

    let project_exists =
        sqlx::query_scalar::<_, i64>("SELECT EXISTS(SELECT 1 FROM project WHERE id = ?)")
            .bind(payload.project_id)
            .fetch_one(&mut *tx)
            .await?;

    if project_exists == 0 {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    let already_managed = sqlx::query_scalar::<_, i64>(
        "SELECT 1 FROM manager WHERE handling_project = ? LIMIT 1 FOR UPDATE",
    )
    .bind(payload.project_id)
    .fetch_optional(&mut *tx)
    .await?
    .is_some();

    if already_managed {
        return Err(ApiError::Conflict(
            "Conflict: this project already has a manager".to_string(),
        ));
    }

    sqlx::query("UPDATE manager SET handling_project = ? WHERE id = ?")
        .bind(payload.project_id)
        .bind(&auth.employee_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(manager_id = %auth.employee_id, project_id = payload.project_id, "Project assigned");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "You are now registered as the manager of this project",
    })))
}

#[derive(Deserialize, ToSchema)]
pub struct CreateGroupReq {
    #[schema(example = "Morning")]
    pub group_name: String,
    #[schema(example = "Monday")]
    pub day: String,
    #[schema(example = "08:00")]
    pub start_time: String,
    #[schema(example = "16:00")]
    pub end_time: String,
}

#[derive(Serialize, ToSchema)]
pub struct CreateGroupResponse {
    pub success: bool,
    pub message: String,
    pub group_id: String,
    #[schema(example = 1)]
    pub shift_id: u64,
    #[schema(example = 200.0)]
    pub payment: f64,
}

/// Create a group together with its shift and the link between them.
///
/// The shift must last exactly the project's configured hours; the
/// project must be under its shift quota; the (day, start, end) triple
/// and the group name must both be new for the project. All three
/// inserts commit or none do.
#[utoipa::path(
    post,
    path = "/api/manager/create-group",
    request_body = CreateGroupReq,
    responses(
        (status = 201, description = "Group and shift created", body = CreateGroupResponse),
        (status = 400, description = "Malformed fields or wrong shift duration"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Caller manages no project"),
        (status = 409, description = "Quota reached, duplicate shift, or duplicate group name"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn create_group(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateGroupReq>,
) -> Result<HttpResponse, ApiError> {
    let group_name = payload.group_name.trim();
    if group_name.is_empty() {
        return Err(ApiError::Validation("Group name is required".to_string()));
    }

    let day: Day = payload
        .day
        .parse()
        .map_err(|_| ApiError::Validation(format!("Unknown day \"{}\"", payload.day)))?;

    let start = parse_time_of_day(&payload.start_time)
        .ok_or_else(|| ApiError::Validation("Malformed start_time".to_string()))?;
    let end = parse_time_of_day(&payload.end_time)
        .ok_or_else(|| ApiError::Validation("Malformed end_time".to_string()))?;

    let project = managed_project(pool.get_ref(), &auth.employee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("You are not managing any project".to_string()))?;

    let plan = ShiftPlan::new(day, start, end);

    if !plan.duration_matches(project.hours_per_shift) {
        return Err(ApiError::Validation(format!(
            "Invalid duration: shifts on this project must last exactly {} hours",
            project.hours_per_shift
        )));
    }

    let mut tx = pool.begin().await?;

    let shift_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shifts WHERE project = ? FOR UPDATE")
            .bind(project.id)
            .fetch_one(&mut *tx)
            .await?;

    if shift_count >= project.required_shifts as i64 {
        return Err(ApiError::Conflict(format!(
            "Shift quota exceeded: this project already has its {} shifts",
            project.required_shifts
        )));
    }

    let duplicate_shift = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM shifts
            WHERE project = ? AND day = ? AND start_time = ? AND end_time = ?
        )
        "#,
    )
    .bind(project.id)
    .bind(day.to_string())
    .bind(start)
    .bind(end)
    .fetch_one(&mut *tx)
    .await?;

    if duplicate_shift != 0 {
        return Err(ApiError::Conflict(
            "Duplicate shift: an identical day and time already exists for this project"
                .to_string(),
        ));
    }

    let name_taken = sqlx::query_scalar::<_, i64>(
        "SELECT EXISTS(SELECT 1 FROM user_groups WHERE project = ? AND group_name = ?)",
    )
    .bind(project.id)
    .bind(group_name)
    .fetch_one(&mut *tx)
    .await?;

    if name_taken != 0 {
        return Err(ApiError::Conflict(format!(
            "A group with the name \"{}\" already exists under this project",
            group_name
        )));
    }

    let payment = plan.payment(project.pay_per_hour);
    let group_id = Uuid::new_v4().to_string();

    sqlx::query("INSERT INTO user_groups (id, project, group_name) VALUES (?, ?, ?)")
        .bind(&group_id)
        .bind(project.id)
        .bind(group_name)
        .execute(&mut *tx)
        .await?;

    let shift_insert = sqlx::query(
        r#"
        INSERT INTO shifts (day, start_time, end_time, hours_of_work, payment, project)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(day.to_string())
    .bind(start)
    .bind(end)
    .bind(plan.duration_hours())
    .bind(payment)
    .bind(project.id)
    .execute(&mut *tx)
    .await?;

    let shift_id = shift_insert.last_insert_id();

    sqlx::query("INSERT INTO shift_group (shift_id, group_id) VALUES (?, ?)")
        .bind(shift_id)
        .bind(&group_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(
        manager_id = %auth.employee_id,
        project_id = project.id,
        group_id = %group_id,
        shift_id,
        "Group and shift created"
    );

    Ok(HttpResponse::Created().json(CreateGroupResponse {
        success: true,
        message: format!(
            "Group \"{}\" created successfully under your project",
            group_name
        ),
        group_id,
        shift_id,
        payment,
    }))
}

#[derive(FromRow, Serialize, ToSchema)]
pub struct AssignableEmployee {
    pub id: String,
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "weekdays", nullable = true)]
    pub availability: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeesResponse {
    pub success: bool,
    pub users: Vec<AssignableEmployee>,
}

/// Employees not yet placed in any group under the manager's project
#[utoipa::path(
    get,
    path = "/api/manager/employees",
    responses(
        (status = 200, description = "Assignable employees", body = EmployeesResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Caller manages no project"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let project = managed_project(pool.get_ref(), &auth.employee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("You are not managing any project".to_string()))?;

    let users = sqlx::query_as::<_, AssignableEmployee>(
        r#"
        SELECT id, name, email, availability
        FROM employee
        WHERE id NOT IN (
            SELECT employee_groups.employee_id
            FROM employee_groups
            INNER JOIN user_groups ON user_groups.id = employee_groups.group_id
            WHERE user_groups.project = ?
        )
        "#,
    )
    .bind(project.id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(EmployeesResponse {
        success: true,
        users,
    }))
}

#[derive(Deserialize, ToSchema)]
pub struct AddEmployeeReq {
    pub employee_id: String,
    pub group_id: String,
}

/// Place an employee into one of the manager's groups
#[utoipa::path(
    post,
    path = "/api/manager/add-employee",
    request_body = AddEmployeeReq,
    responses(
        (status = 201, description = "Membership created"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No project, group, or employee"),
        (status = 409, description = "Already a member"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn add_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<AddEmployeeReq>,
) -> Result<HttpResponse, ApiError> {
    let project = managed_project(pool.get_ref(), &auth.employee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("You are not managing any project".to_string()))?;

    let mut tx = pool.begin().await?;

    let group_ok = sqlx::query_scalar::<_, i64>(
        "SELECT EXISTS(SELECT 1 FROM user_groups WHERE id = ? AND project = ?)",
    )
    .bind(&payload.group_id)
    .bind(project.id)
    .fetch_one(&mut *tx)
    .await?;

    if group_ok == 0 {
        return Err(ApiError::NotFound(
            "Group not found under your project".to_string(),
        ));
    }

    let employee_ok =
        sqlx::query_scalar::<_, i64>("SELECT EXISTS(SELECT 1 FROM employee WHERE id = ?)")
            .bind(&payload.employee_id)
            .fetch_one(&mut *tx)
            .await?;

    if employee_ok == 0 {
        return Err(ApiError::NotFound("Employee not found".to_string()));
    }

    let already_member = sqlx::query_scalar::<_, i64>(
        "SELECT EXISTS(SELECT 1 FROM employee_groups WHERE employee_id = ? AND group_id = ?)",
    )
    .bind(&payload.employee_id)
    .bind(&payload.group_id)
    .fetch_one(&mut *tx)
    .await?;

    if already_member != 0 {
        return Err(ApiError::Conflict(
            "Employee is already a member of this group".to_string(),
        ));
    }

    sqlx::query("INSERT INTO employee_groups (employee_id, group_id) VALUES (?, ?)")
        .bind(&payload.employee_id)
        .bind(&payload.group_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "message": "Employee added to group",
    })))
}

#[derive(Deserialize, ToSchema)]
pub struct GroupMembersReq {
    pub group_id: String,
}

#[derive(FromRow, Serialize, ToSchema)]
pub struct GroupMember {
    pub id: String,
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
}

#[derive(Serialize, ToSchema)]
pub struct GroupMembersResponse {
    pub success: bool,
    pub group_id: String,
    pub members: Vec<GroupMember>,
}

/// Members of one group under the manager's project
#[utoipa::path(
    post,
    path = "/api/manager/group-members",
    request_body = GroupMembersReq,
    responses(
        (status = 200, description = "Member rows", body = GroupMembersResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No project or group"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn group_members(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<GroupMembersReq>,
) -> Result<HttpResponse, ApiError> {
    let project = managed_project(pool.get_ref(), &auth.employee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("You are not managing any project".to_string()))?;

    let group_ok = sqlx::query_scalar::<_, i64>(
        "SELECT EXISTS(SELECT 1 FROM user_groups WHERE id = ? AND project = ?)",
    )
    .bind(&payload.group_id)
    .bind(project.id)
    .fetch_one(pool.get_ref())
    .await?;

    if group_ok == 0 {
        return Err(ApiError::NotFound(
            "Group not found under your project".to_string(),
        ));
    }

    let members = sqlx::query_as::<_, GroupMember>(
        r#"
        SELECT employee.id, employee.name, employee.email
        FROM employee
        INNER JOIN employee_groups ON employee.id = employee_groups.employee_id
        WHERE employee_groups.group_id = ?
        "#,
    )
    .bind(&payload.group_id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(GroupMembersResponse {
        success: true,
        group_id: payload.group_id.clone(),
        members,
    }))
}

#[derive(Serialize, ToSchema)]
pub struct GroupsResponse {
    pub success: bool,
    pub groups: Vec<Group>,
}

/// Groups under the manager's project
#[utoipa::path(
    get,
    path = "/api/manager/groups",
    responses(
        (status = 200, description = "Group rows", body = GroupsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No groups, or caller manages no project"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn groups(auth: AuthUser, pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let groups = sqlx::query_as::<_, Group>(
        r#"
        SELECT user_groups.id, user_groups.project, user_groups.group_name
        FROM user_groups
        INNER JOIN project ON user_groups.project = project.id
        INNER JOIN manager ON manager.handling_project = project.id
        WHERE manager.id = ?
        "#,
    )
    .bind(&auth.employee_id)
    .fetch_all(pool.get_ref())
    .await?;

    if groups.is_empty() {
        return Err(ApiError::NotFound(
            "No groups found, either you haven't created any groups or you're not managing a project".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(GroupsResponse {
        success: true,
        groups,
    }))
}
