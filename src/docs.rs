use crate::api::manager::{
    AddEmployeeReq, AssignableEmployee, AvailableProjectsResponse, CheckRoleResponse,
    CreateGroupReq, CreateGroupResponse, CurrentProjectResponse, EmployeesResponse, GroupMember,
    GroupMembersReq, GroupMembersResponse, GroupsResponse, SelectProjectReq,
};
use crate::api::project::{
    ProjectDetailsReq, ProjectDetailsResponse, ProjectDetailsRow, ProjectIdsResponse,
};
use crate::api::shift::{
    CheckInReq, CheckInResponse, CheckoutReq, CheckoutResponse, TodayShift, TodayShiftsResponse,
    UpcomingShiftsResponse,
};
use crate::api::user::{CurrentProject, PayResponse, PayShift, PaySummary, Profile, ProfileResponse};
use crate::auth::handlers::{LoginResponse, RegisterResponse};
use crate::model::employee::Employee;
use crate::model::group::Group;
use crate::model::project::Project;
use crate::model::shift::{Day, Shift};
use crate::models::{LoginReq, RegisterReq};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Crewshift API",
        version = "1.0.0",
        description = r#"
## Workforce shift-management backend

Employees register, log in, check into and out of scheduled shifts, and
track accrued pay. Managers claim a project, create shift groups, and
assign employees to them.

### Security
Everything except register/login and the health probe requires a
**JWT Bearer** access token; refresh tokens rotate on use.

Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,

        crate::api::user::get_profile,
        crate::api::user::get_pay,

        crate::api::project::fetch_projects,
        crate::api::project::project_details,

        crate::api::shift::today_shifts,
        crate::api::shift::upcoming_shifts,
        crate::api::shift::check_in,
        crate::api::shift::checkout,

        crate::api::manager::check_role,
        crate::api::manager::current_project,
        crate::api::manager::available_projects,
        crate::api::manager::select_project,
        crate::api::manager::create_group,
        crate::api::manager::list_employees,
        crate::api::manager::add_employee,
        crate::api::manager::group_members,
        crate::api::manager::groups,
    ),
    components(
        schemas(
            RegisterReq,
            LoginReq,
            RegisterResponse,
            LoginResponse,

            Employee,
            Project,
            Group,
            Shift,
            Day,

            Profile,
            CurrentProject,
            ProfileResponse,
            PayShift,
            PaySummary,
            PayResponse,

            ProjectIdsResponse,
            ProjectDetailsReq,
            ProjectDetailsRow,
            ProjectDetailsResponse,

            TodayShift,
            TodayShiftsResponse,
            UpcomingShiftsResponse,
            CheckInReq,
            CheckInResponse,
            CheckoutReq,
            CheckoutResponse,

            CheckRoleResponse,
            CurrentProjectResponse,
            AvailableProjectsResponse,
            SelectProjectReq,
            CreateGroupReq,
            CreateGroupResponse,
            AssignableEmployee,
            EmployeesResponse,
            AddEmployeeReq,
            GroupMembersReq,
            GroupMember,
            GroupMembersResponse,
            GroupsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and token lifecycle"),
        (name = "User", description = "Employee profile and pay APIs"),
        (name = "Projects", description = "Project visibility for employees"),
        (name = "Shifts", description = "Shift schedule and attendance APIs"),
        (name = "Manager", description = "Project, group and staffing administration"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
