//! Common test utilities for integration tests.
//!
//! Tests run against a real PostgreSQL database given by `TEST_DATABASE_URL`.
//! When the variable is unset, `create_test_pool` returns `None` and the
//! calling test exits early.
//!
//! Tests in one binary run in parallel against the same database, so every
//! helper creates uniquely named rows instead of truncating tables.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate};
use domain::models::{Employee, EmployeeRole, RestaurantTable};
use domain::services::GuestNotifier;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use persistence::entities::{EmployeeStatusDb, TableStatusDb};
use persistence::repositories::{EmployeeRepository, TableRepository};
use rand::Rng;
use reservation_api::{
    app::{create_router, AppState},
    config::{
        AdminBootstrapConfig, Config, DatabaseConfig, EmailConfig, JwtAuthConfig, LimitsConfig,
        LoggingConfig, SecurityConfig, ServerConfig,
    },
};
use serde_json::Value;
use shared::jwt::JwtConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-with-enough-bytes";

/// Connect to the test database and apply migrations.
pub async fn create_test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: std::env::var("TEST_DATABASE_URL").unwrap_or_default(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
            rate_limit_per_minute: 0, // Disable rate limiting for tests
            hsts_enabled: false,
            trust_forwarded_for: false,
        },
        limits: LimitsConfig {
            max_party_size: 10,
            login_link_ttl_minutes: 15,
            invite_ttl_hours: 72,
        },
        jwt: JwtAuthConfig {
            secret: TEST_JWT_SECRET.to_string(),
            session_expiry_secs: 3600,
            leeway_secs: 30,
        },
        email: EmailConfig {
            base_url: "https://staff.test".to_string(),
            ..EmailConfig::default()
        },
        admin: AdminBootstrapConfig::default(),
    }
}

/// Router with email disabled; guest notices are skipped.
pub fn create_test_app(pool: PgPool) -> Router {
    create_test_app_with_config(test_config(), pool)
}

pub fn create_test_app_with_config(config: Config, pool: PgPool) -> Router {
    let state = AppState::new(config, pool).expect("Failed to build app state");
    create_router(state)
}

/// Router whose guest notices go to the given notifier.
pub fn create_test_app_with_notifier(pool: PgPool, notifier: Arc<dyn GuestNotifier>) -> Router {
    let state = AppState::new(test_config(), pool)
        .expect("Failed to build app state")
        .with_notifier(notifier);
    create_router(state)
}

pub fn unique_test_email() -> String {
    format!("test_{}@example.com", uuid::Uuid::new_v4().simple())
}

/// A date far enough ahead that no closed date or test setting touches it.
pub fn future_date(days_ahead: i64) -> NaiveDate {
    chrono::Local::now().date_naive() + Duration::days(days_ahead)
}

/// A staff member with a valid session token.
pub struct TestStaff {
    pub employee: Employee,
    pub token: String,
}

impl TestStaff {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Create an employee directly in the database and mint a session for it.
pub async fn create_staff(pool: &PgPool, role: EmployeeRole) -> TestStaff {
    create_staff_with_status(pool, role, EmployeeStatusDb::Active).await
}

pub async fn create_staff_with_status(
    pool: &PgPool,
    role: EmployeeRole,
    status: EmployeeStatusDb,
) -> TestStaff {
    let employee: Employee = EmployeeRepository::new(pool.clone())
        .create(
            &format!("Test {}", role),
            &unique_test_email(),
            role.into(),
            status,
        )
        .await
        .expect("Failed to create employee")
        .into();

    let jwt = JwtConfig::new(TEST_JWT_SECRET, 3600).expect("Invalid test secret");
    let (token, _) = jwt
        .generate_session_token(employee.id)
        .expect("Failed to sign session");

    TestStaff { employee, token }
}

/// Insert a table with a random number outside the range the API accepts,
/// so parallel tests never collide.
pub async fn create_table(pool: &PgPool, capacity: i32) -> RestaurantTable {
    let repo = TableRepository::new(pool.clone());
    loop {
        let number = rand::thread_rng().gen_range(1_000..2_000_000_000);
        match repo
            .create(number, capacity, TableStatusDb::Available)
            .await
        {
            Ok(table) => return table.into(),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some("23505") => continue,
            Err(e) => panic!("Failed to create table: {}", e),
        }
    }
}

pub async fn find_table(pool: &PgPool, id: uuid::Uuid) -> RestaurantTable {
    TableRepository::new(pool.clone())
        .find_by_id(id)
        .await
        .expect("Failed to load table")
        .expect("Table not found")
        .into()
}

/// Booking payload for `POST /api/reservations`.
pub fn booking_payload(date: NaiveDate, guests: i32) -> Value {
    serde_json::json!({
        "first_name": FirstName().fake::<String>(),
        "last_name": LastName().fake::<String>(),
        "email": unique_test_email(),
        "phone": "+1 555 123 4567",
        "date": date.to_string(),
        "time": "19:00",
        "guests": guests,
        "remark": "Window seat please"
    })
}

/// Book through the public endpoint and return the reservation id.
pub async fn book(app: &Router, date: NaiveDate, guests: i32) -> String {
    let (status, json) = send(
        app,
        Method::POST,
        "/api/reservations",
        None,
        Some(booking_payload(date, guests)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "booking failed: {}", json);
    json["data"]["id"]
        .as_str()
        .unwrap_or_else(|| panic!("Missing data.id in response: {}", json))
        .to_string()
}

/// Send a request and return the status with the parsed JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&TestStaff>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(staff) = auth {
        builder = builder.header(header::AUTHORIZATION, staff.bearer());
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!(
                "Non-JSON response. Status: {}, Body: {:?}",
                status,
                String::from_utf8_lossy(&bytes)
            )
        })
    };

    (status, json)
}
