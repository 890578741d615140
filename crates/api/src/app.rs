use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_administrator, require_elevated, require_standard,
    resolve_identity, security_headers_middleware, trace_id,
};
use crate::routes::{
    auth, classify, containers, dashboard, deliveries, events, health, materials, profile,
    rewards, users,
};
use crate::services::auth::AuthService;
use crate::services::classifier::{HttpClassifier, ImageClassifier};
use crate::services::cookies::CookieHelper;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub auth: AuthService,
    pub cookies: CookieHelper,
    /// None when classification is disabled or not configured.
    pub classifier: Option<Arc<dyn ImageClassifier>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let auth_service = AuthService::new(pool.clone(), &config.jwt, &config.session);
    let cookies = CookieHelper::new(
        config.cookies.clone(),
        config.jwt.token_expiry_secs,
        config.session.expiry_secs,
    );
    let classifier: Option<Arc<dyn ImageClassifier>> = HttpClassifier::from_config(
        &config.classifier,
    )
    .map(|c| Arc::new(c) as Arc<dyn ImageClassifier>);

    let state = AppState {
        pool,
        config: config.clone(),
        auth: auth_service,
        cookies,
        classifier,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Layers for route groups. route_layer stacks outermost-last, so the
    // identity resolver is applied after the role gate to run before it.
    let identity = middleware::from_fn_with_state(state.clone(), resolve_identity);
    let admin_only = middleware::from_fn(require_administrator);
    let elevated_only = middleware::from_fn(require_elevated);
    let standard_only = middleware::from_fn(require_standard);

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route(
            "/api/v1/containers/nearby",
            get(containers::nearby_containers),
        );

    // Mixed-access collection roots: the read is public, the write is gated.
    let catalog_routes = Router::new()
        .route(
            "/api/v1/containers",
            get(containers::list_containers).merge(
                post(containers::create_container)
                    .route_layer(elevated_only.clone())
                    .route_layer(identity.clone()),
            ),
        )
        .route(
            "/api/v1/containers/:container_id",
            get(containers::get_container)
                .merge(
                    put(containers::update_container)
                        .route_layer(elevated_only.clone())
                        .route_layer(identity.clone()),
                )
                .merge(
                    delete(containers::delete_container)
                        .route_layer(admin_only.clone())
                        .route_layer(identity.clone()),
                ),
        )
        .route(
            "/api/v1/materials",
            get(materials::list_materials).merge(
                post(materials::create_material)
                    .route_layer(admin_only.clone())
                    .route_layer(identity.clone()),
            ),
        )
        .route(
            "/api/v1/materials/:material_id",
            put(materials::update_material)
                .route_layer(admin_only.clone())
                .route_layer(identity.clone()),
        )
        .route(
            "/api/v1/events",
            get(events::list_events).merge(
                post(events::create_event)
                    .route_layer(elevated_only.clone())
                    .route_layer(identity.clone()),
            ),
        )
        .route(
            "/api/v1/events/:event_id",
            get(events::get_event).merge(
                put(events::update_event)
                    .merge(delete(events::delete_event))
                    .route_layer(elevated_only.clone())
                    .route_layer(identity.clone()),
            ),
        )
        .route(
            "/api/v1/events/:event_id/points",
            post(events::award_points)
                .route_layer(elevated_only.clone())
                .route_layer(identity.clone()),
        )
        .route(
            "/api/v1/rewards",
            get(rewards::list_rewards).merge(
                post(rewards::create_reward)
                    .route_layer(admin_only.clone())
                    .route_layer(identity.clone()),
            ),
        )
        .route(
            "/api/v1/rewards/:reward_id",
            get(rewards::get_reward).merge(
                put(rewards::update_reward)
                    .route_layer(admin_only.clone())
                    .route_layer(identity.clone()),
            ),
        );

    // Routes for any authenticated user, either scheme
    let authenticated_routes = Router::new()
        .route("/api/v1/auth/session", get(auth::session))
        .route(
            "/api/v1/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/api/v1/users/:user_id", get(users::get_user))
        .route(
            "/api/v1/rewards/redemptions/mine",
            get(rewards::list_my_redemptions),
        )
        .route("/api/v1/classify", post(classify::classify))
        .route_layer(identity.clone());

    // Routes for standard users recording their own recycling
    let standard_routes = Router::new()
        .route("/api/v1/deliveries/mine", get(deliveries::list_my_deliveries))
        .route(
            "/api/v1/deliveries/requests",
            post(deliveries::create_pickup_request),
        )
        .route(
            "/api/v1/rewards/:reward_id/redeem",
            post(rewards::redeem_reward),
        )
        .route_layer(standard_only.clone())
        .route_layer(identity.clone());

    // The delivery collection root: standard users create, operators list.
    let delivery_root = Router::new().route(
        "/api/v1/deliveries",
        post(deliveries::create_delivery)
            .route_layer(standard_only.clone())
            .route_layer(identity.clone())
            .merge(
                get(deliveries::list_all_deliveries)
                    .route_layer(elevated_only.clone())
                    .route_layer(identity.clone()),
            ),
    );

    // Operator/administrator pickup processing
    let operator_routes = Router::new()
        .route(
            "/api/v1/deliveries/:delivery_id/confirm",
            post(deliveries::confirm_pickup),
        )
        .route(
            "/api/v1/deliveries/:delivery_id/reject",
            post(deliveries::reject_pickup),
        )
        .route_layer(elevated_only.clone())
        .route_layer(identity.clone());

    // Administrator-only routes
    let admin_routes = Router::new()
        .route("/api/v1/users", get(users::list_users))
        .route("/api/v1/dashboard", get(dashboard::dashboard))
        .route_layer(admin_only.clone())
        .route_layer(identity.clone());

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(catalog_routes)
        .merge(authenticated_routes)
        .merge(standard_routes)
        .merge(delivery_root)
        .merge(operator_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware)) // Security headers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
