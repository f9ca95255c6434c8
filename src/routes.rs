use crate::{
    api::{manager, project, shift, user},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, middleware::from_fn, web};
use std::sync::Arc;

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "OK",
        "message": "Backend is running",
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/api/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    cfg.service(web::resource("/api/health").route(web::get().to(health)));

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/user")
                    .service(web::resource("/profile").route(web::get().to(user::get_profile)))
                    .service(web::resource("/pay").route(web::get().to(user::get_pay))),
            )
            .service(
                web::scope("/projects")
                    .service(web::resource("").route(web::get().to(project::fetch_projects)))
                    .service(
                        web::resource("/details").route(web::post().to(project::project_details)),
                    ),
            )
            .service(
                web::scope("/shifts")
                    .service(web::resource("/today").route(web::get().to(shift::today_shifts)))
                    .service(
                        web::resource("/upcoming").route(web::get().to(shift::upcoming_shifts)),
                    )
                    .service(web::resource("/check-in").route(web::post().to(shift::check_in)))
                    .service(web::resource("/checkout").route(web::post().to(shift::checkout))),
            )
            .service(
                web::scope("/manager")
                    .service(
                        web::resource("/check-role").route(web::get().to(manager::check_role)),
                    )
                    .service(
                        web::resource("/projects").route(web::get().to(manager::current_project)),
                    )
                    .service(
                        web::resource("/available-projects")
                            .route(web::get().to(manager::available_projects)),
                    )
                    .service(
                        web::resource("/select-project")
                            .route(web::post().to(manager::select_project)),
                    )
                    .service(
                        web::resource("/create-group").route(web::post().to(manager::create_group)),
                    )
                    .service(
                        web::resource("/employees").route(web::get().to(manager::list_employees)),
                    )
                    .service(
                        web::resource("/add-employee").route(web::post().to(manager::add_employee)),
                    )
                    .service(
                        web::resource("/group-members")
                            .route(web::post().to(manager::group_members)),
                    )
                    .service(web::resource("/groups").route(web::get().to(manager::groups))),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days, stored on the employee row)
//
// API REQUEST
//  └─ Authorization: Bearer access_token
//
// ACCESS EXPIRED
//  └─ POST /api/auth/refresh with refresh_token
//       └─ returns new access_token + rotated refresh_token
