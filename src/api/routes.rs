use actix_cors::Cors;
use actix_web::{web, HttpResponse};

use super::handlers;
use super::middleware::auth::create_auth_middleware;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Health checks
        .route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check))
        .route("/metrics", web::get().to(metrics_endpoint))
        // Login and the OAuth redirect target cannot carry a bearer token
        .service(
            web::scope("/api/auth")
                .wrap(cors())
                .route("/login", web::post().to(handlers::auth::login)),
        )
        .service(
            web::scope("/api/drive")
                .wrap(cors())
                .route("/connect", web::get().to(handlers::drive::connect))
                .route("/callback", web::get().to(handlers::drive::callback)),
        )
        // Everything else requires a valid token
        .service(
            web::scope("/api")
                .wrap(create_auth_middleware())
                .wrap(cors())
                .service(
                    web::scope("/bookings")
                        .route(
                            "/add-new-booking",
                            web::post().to(handlers::bookings::add_new_booking),
                        )
                        .route(
                            "/update-booking/{id}",
                            web::put().to(handlers::bookings::update_booking),
                        )
                        .route(
                            "/bookings-list",
                            web::get().to(handlers::bookings::bookings_list),
                        )
                        .route(
                            "/delete/{id}",
                            web::delete().to(handlers::bookings::delete_booking),
                        ),
                )
                .service(
                    web::scope("/expenses")
                        .route(
                            "/add-new-expense",
                            web::post().to(handlers::expenses::add_new_expense),
                        )
                        .route(
                            "/expenses-all-list",
                            web::get().to(handlers::expenses::expenses_all_list),
                        )
                        .route(
                            "/delete-expense/{id}",
                            web::delete().to(handlers::expenses::delete_expense),
                        ),
                )
                .service(
                    web::scope("/calendar")
                        .route(
                            "/hijri-calendar",
                            web::get().to(handlers::calendar::hijri_calendar),
                        )
                        .route(
                            "/indian-holidays",
                            web::get().to(handlers::calendar::indian_holidays),
                        ),
                ),
        );
}

fn cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|origin, _req_head| {
            origin.as_bytes().starts_with(b"http://localhost")
                || origin.as_bytes().starts_with(b"https://")
        })
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec!["Content-Type", "Authorization"])
        .max_age(3600)
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy"
    }))
}

async fn readiness_check(state: web::Data<crate::api::ApiState>) -> HttpResponse {
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&state.db).await.is_ok();

    if db_healthy {
        HttpResponse::Ok().json(serde_json::json!({
            "status": "ready",
            "checks": {
                "database": "ok"
            }
        }))
    } else {
        HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "not_ready",
            "checks": {
                "database": "failed"
            }
        }))
    }
}

async fn metrics_endpoint() -> HttpResponse {
    use prometheus::{Encoder, TextEncoder};

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(e.to_string());
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}
