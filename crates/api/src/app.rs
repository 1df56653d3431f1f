use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use domain::services::GuestNotifier;
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin, require_manager,
    require_staff, security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    auth, dashboard, employees, health, notifications, reservations, settings, stats, tables,
};
use crate::services::EmailService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub email: EmailService,
    /// Guest notifications sent by reservation lifecycle actions.
    pub notifier: Arc<dyn GuestNotifier>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Result<Self, JwtError> {
        let jwt = JwtConfig::with_leeway(
            &config.jwt.secret,
            config.jwt.session_expiry_secs,
            config.jwt.leeway_secs,
        )?;

        // 0 disables public rate limiting
        let rate_limiter = (config.security.rate_limit_per_minute > 0).then(|| {
            Arc::new(RateLimiterState::new(
                config.security.rate_limit_per_minute,
                config.security.trust_forwarded_for,
            ))
        });

        let email = EmailService::new(config.email.clone());

        Ok(Self {
            pool,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            notifier: Arc::new(email.clone()),
            email,
            rate_limiter,
        })
    }

    /// Replace the guest notifier, e.g. with a mock in tests.
    pub fn with_notifier(mut self, notifier: Arc<dyn GuestNotifier>) -> Self {
        self.notifier = notifier;
        self
    }
}

pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
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

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/settings", get(settings::get_settings));

    // Unauthenticated writes, limited per client IP
    let limited_routes = Router::new()
        .route("/api/reservations", post(reservations::create_reservation))
        .route("/api/auth/login-link", post(auth::request_login_link))
        .route("/api/auth/verify", post(auth::verify))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    let staff_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/dashboard/overview", get(dashboard::overview))
        .route("/api/reservations", get(reservations::list_reservations))
        .route(
            "/api/reservations/:id",
            get(reservations::get_reservation).patch(reservations::update_reservation),
        )
        .route("/api/reservations/:id/table", put(reservations::assign_table))
        .route(
            "/api/reservations/:id/confirm",
            post(reservations::confirm_reservation),
        )
        .route(
            "/api/reservations/:id/cancel",
            post(reservations::cancel_reservation),
        )
        .route("/api/reservations/:id/arrive", post(reservations::mark_arrived))
        .route(
            "/api/send-confirmation-email",
            post(notifications::send_confirmation_email),
        )
        .route(
            "/api/send-rejection-email",
            post(notifications::send_rejection_email),
        )
        .route("/api/tables", get(tables::list_tables))
        .route("/api/tables/:id", get(tables::get_table))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff));

    // Role check runs after require_staff (outermost layer runs first)
    let manager_routes = Router::new()
        .route(
            "/api/reservations/:id",
            axum::routing::delete(reservations::delete_reservation),
        )
        .route("/api/tables", post(tables::create_table))
        .route(
            "/api/tables/:id",
            axum::routing::patch(tables::update_table).delete(tables::delete_table),
        )
        .route("/api/stats", get(stats::get_stats))
        .route_layer(middleware::from_fn(require_manager))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff));

    let admin_routes = Router::new()
        .route(
            "/api/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/api/employees/:id",
            get(employees::get_employee)
                .patch(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .route("/api/employees/:id/invite", post(employees::resend_invite))
        .route("/api/settings", put(settings::update_settings))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff));

    Router::new()
        .merge(public_routes)
        .merge(limited_routes)
        .merge(staff_routes)
        .merge(manager_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
