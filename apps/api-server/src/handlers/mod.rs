//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod health;
mod locations;
mod posts;
mod profiles;

#[cfg(test)]
pub(crate) mod testing;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Posts and their comments
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/{post_id}", web::get().to(posts::get_post))
                    .route("/{post_id}", web::put().to(posts::update_post))
                    .route("/{post_id}", web::delete().to(posts::delete_post))
                    .route(
                        "/{post_id}/comments",
                        web::post().to(comments::create_comment),
                    )
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::put().to(comments::update_comment),
                    )
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::delete().to(comments::delete_comment),
                    ),
            )
            // Category browsing
            .service(
                web::scope("/categories")
                    .route("", web::get().to(categories::list_categories))
                    .route("/{slug}/posts", web::get().to(categories::category_posts)),
            )
            .route("/locations", web::get().to(locations::list_locations))
            // Public profiles and the caller's own account
            .service(
                web::scope("/profiles")
                    .route("/{username}", web::get().to(profiles::get_profile))
                    .route("/{username}/posts", web::get().to(profiles::profile_posts)),
            )
            .route("/profile", web::put().to(profiles::update_profile)),
    );
}
