//! HTTP handlers and route configuration.

mod auth;
mod authors;
mod comments;
mod health;
mod posts;
mod views;

use actix_web::{HttpRequest, http::header, web};
use chrono::NaiveDate;

use quill_core::ports::ImageFormat;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(json_config())
            .app_data(path_config())
            .app_data(query_config())
            .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/login", web::post().to(auth::login))
            .route("/login-google", web::get().to(auth::login_google))
            .route("/callback-google", web::get().to(auth::callback_google))
            // Session routes
            .route("/logout", web::post().to(auth::logout))
            .route("/me", web::get().to(auth::me))
            // Authors; registration shares the collection path
            .service(
                web::resource("/authors")
                    .route(web::get().to(authors::list))
                    .route(web::post().to(auth::register)),
            )
            .service(
                web::resource("/authors/{id}")
                    .route(web::get().to(authors::get))
                    .route(web::put().to(authors::update))
                    .route(web::delete().to(authors::delete)),
            )
            .route("/authors/{id}/avatar", web::patch().to(authors::upload_avatar))
            // Posts
            .service(
                web::resource("/posts")
                    .route(web::get().to(posts::list))
                    .route(web::post().to(posts::create)),
            )
            .route("/posts/author/{author_id}", web::get().to(posts::by_author))
            .service(
                web::resource("/posts/{id}")
                    .route(web::get().to(posts::get))
                    .route(web::put().to(posts::update))
                    .route(web::delete().to(posts::delete)),
            )
            .route("/posts/{id}/cover", web::patch().to(posts::upload_cover))
            // Comments
            .service(
                web::resource("/posts/{id}/comments")
                    .route(web::get().to(comments::list))
                    .route(web::post().to(comments::create)),
            )
            .service(
                web::resource([
                    "/posts/{id}/comments/{comment_id}",
                    "/posts/{id}/comment/{comment_id}",
                ])
                .route(web::get().to(comments::get))
                .route(web::put().to(comments::update))
                .route(web::delete().to(comments::delete)),
            ),
    );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Unparsable path parameter");
        AppError::NotFound("Resource not found".to_string()).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Argon2 runs on the blocking pool.
pub(crate) async fn hash_password(state: &AppState, password: String) -> AppResult<String> {
    let passwords = state.passwords.clone();
    Ok(web::block(move || passwords.hash(&password)).await??)
}

pub(crate) async fn verify_password(
    state: &AppState,
    password: String,
    hash: String,
) -> AppResult<bool> {
    let passwords = state.passwords.clone();
    Ok(web::block(move || passwords.verify(&password, &hash)).await??)
}

pub(crate) fn parse_birth_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("birthDate must be a YYYY-MM-DD date".to_string()))
}

/// Upload format from the request's `Content-Type`.
pub(crate) fn image_format(req: &HttpRequest) -> AppResult<ImageFormat> {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(ImageFormat::detect)
        .ok_or_else(|| {
            AppError::BadRequest("Only jpg, jpeg and png images are accepted".to_string())
        })
}
