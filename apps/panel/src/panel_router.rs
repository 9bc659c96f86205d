use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use hearthware_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let cors_layer = cors::build_cors_layer(frontend_url)?;

    let admin_routes = Router::new()
        .route(
            "/api/admin/products",
            get(handlers::products::list_products_handler)
                .post(handlers::products::create_product_handler),
        )
        .route(
            "/api/admin/products/summary",
            get(handlers::products::product_summary_handler),
        )
        .route(
            "/api/admin/products/{product_id}",
            put(handlers::products::update_product_handler)
                .delete(handlers::products::delete_product_handler),
        )
        .route(
            "/api/admin/products/{product_id}/active",
            put(handlers::products::set_product_active_handler),
        )
        .route(
            "/api/admin/enquiries",
            get(handlers::enquiries::list_enquiries_handler),
        )
        .route(
            "/api/admin/enquiries/summary",
            get(handlers::enquiries::enquiry_summary_handler),
        )
        .route(
            "/api/admin/enquiries/{enquiry_id}",
            delete(handlers::enquiries::delete_enquiry_handler),
        )
        .route(
            "/api/admin/enquiries/{enquiry_id}/status",
            put(handlers::enquiries::update_enquiry_status_handler),
        )
        .route(
            "/api/admin/enquiries/{enquiry_id}/respond",
            post(handlers::enquiries::respond_enquiry_handler),
        )
        .route(
            "/api/admin/blogs",
            get(handlers::blogs::list_blogs_handler).post(handlers::blogs::create_blog_handler),
        )
        .route(
            "/api/admin/blogs/import-legacy",
            post(handlers::blogs::import_legacy_blogs_handler),
        )
        .route(
            "/api/admin/blogs/{post_id}",
            put(handlers::blogs::update_blog_handler).delete(handlers::blogs::delete_blog_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_admin,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/products",
            get(handlers::products::list_public_products_handler),
        )
        .route(
            "/api/enquiries",
            post(handlers::enquiries::submit_enquiry_handler),
        )
        .route(
            "/api/blogs",
            get(handlers::blogs::list_published_blogs_handler),
        )
        .route(
            "/api/blogs/{post_id}",
            get(handlers::blogs::get_published_blog_handler),
        )
        .route(
            "/api/preferences",
            get(handlers::preferences::get_preferences_handler)
                .put(handlers::preferences::save_preferences_handler),
        )
        .route("/api/auth/login", post(handlers::auth::login_handler))
        .route("/api/auth/logout", post(handlers::auth::logout_handler))
        .route("/api/auth/status", get(handlers::auth::status_handler))
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
