use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, MySqlPool};
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct ProjectIdsResponse {
    pub success: bool,
    #[schema(example = json!([10, 12]))]
    pub project_ids: Vec<u64>,
}

/// Projects the employee is staffed on, via group membership
#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "Project ids", body = ProjectIdsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Projects"
)]
pub async fn fetch_projects(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let rows = sqlx::query_as::<_, (u64,)>(
        r#"
        SELECT project.id
        FROM project
        INNER JOIN user_groups ON project.id = user_groups.project
        INNER JOIN employee_groups ON user_groups.id = employee_groups.group_id
        WHERE employee_groups.employee_id = ?
        "#,
    )
    .bind(&auth.employee_id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(ProjectIdsResponse {
        success: true,
        project_ids: rows.into_iter().map(|(id,)| id).collect(),
    }))
}

#[derive(Deserialize, ToSchema)]
pub struct ProjectDetailsReq {
    #[schema(example = 10)]
    pub project_id: u64,
}

#[derive(FromRow, Serialize, ToSchema)]
pub struct ProjectDetailsRow {
    #[schema(example = "Dockside")]
    pub location_name: String,
    #[schema(example = "Harbor tower")]
    pub building_name: String,
    #[schema(example = 3)]
    pub building_id: u64,
    #[schema(nullable = true)]
    pub manager_name: Option<String>,
    #[schema(nullable = true)]
    pub manager_id: Option<String>,
    #[schema(nullable = true)]
    pub manager_email: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ProjectDetailsResponse {
    pub success: bool,
    pub project_details: Vec<ProjectDetailsRow>,
}

/// Location, building and managing principal of a project
#[utoipa::path(
    post,
    path = "/api/projects/details",
    request_body = ProjectDetailsReq,
    responses(
        (status = 200, description = "Detail rows", body = ProjectDetailsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Projects"
)]
pub async fn project_details(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<ProjectDetailsReq>,
) -> Result<HttpResponse, ApiError> {
    let rows = sqlx::query_as::<_, ProjectDetailsRow>(
        r#"
        SELECT location.name AS location_name,
               building.name AS building_name,
               building.id AS building_id,
               employee.name AS manager_name,
               employee.id AS manager_id,
               employee.email AS manager_email
        FROM project
        INNER JOIN building ON project.building_id = building.id
        INNER JOIN location ON location.id = building.location_id
        LEFT JOIN manager ON manager.handling_project = project.id
        LEFT JOIN employee ON manager.id = employee.id
        WHERE project.id = ?
        "#,
    )
    .bind(payload.project_id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(ProjectDetailsResponse {
        success: true,
        project_details: rows,
    }))
}
