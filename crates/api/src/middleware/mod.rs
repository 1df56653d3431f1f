//! HTTP middleware components.

pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod rbac;
pub mod security_headers;
pub mod staff_auth;
pub mod trace_id;

pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use rate_limit::{rate_limit_middleware, RateLimiterState};
pub use rbac::{require_admin, require_manager};
pub use security_headers::security_headers_middleware;
pub use staff_auth::{require_staff, StaffContext};
pub use trace_id::{trace_id, RequestId, REQUEST_ID_HEADER};
