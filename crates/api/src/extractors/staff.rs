//! Staff context extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::middleware::staff_auth::StaffContext;

/// Reads the `StaffContext` inserted by `require_staff`.
///
/// Handlers on routes without that layer get `401`.
#[async_trait]
impl<S> FromRequestParts<S> for StaffContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<StaffContext>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use domain::models::EmployeeRole;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_extracts_from_extensions() {
        let ctx = StaffContext {
            employee_id: Uuid::new_v4(),
            email: "sam@x.com".to_string(),
            name: "Sam".to_string(),
            role: EmployeeRole::Waiter,
        };
        let mut req = Request::builder().body(()).unwrap();
        req.extensions_mut().insert(ctx.clone());
        let (mut parts, _) = req.into_parts();

        let extracted = StaffContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted.employee_id, ctx.employee_id);
    }

    #[tokio::test]
    async fn test_missing_context_rejected() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let result = StaffContext::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }
}
