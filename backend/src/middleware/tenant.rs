//! Tenant scoping
//!
//! Every ledger operation is scoped to one tenant, carried explicitly on each
//! request in the `X-Tenant-Id` header.

use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;

pub const TENANT_HEADER: &str = "x-tenant-id";

/// Tenant id extracted from the request headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tenant(pub Uuid);

impl Tenant {
    fn from_parts(parts: &Parts) -> Result<Self, AppError> {
        let raw = parts
            .headers
            .get(TENANT_HEADER)
            .ok_or_else(|| AppError::MissingTenant("X-Tenant-Id header is required".to_string()))?
            .to_str()
            .map_err(|_| AppError::MissingTenant("X-Tenant-Id is not valid ASCII".to_string()))?;

        Uuid::parse_str(raw.trim())
            .map(Tenant)
            .map_err(|_| AppError::MissingTenant(format!("X-Tenant-Id '{}' is not a UUID", raw)))
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Tenant::from_parts(parts)
    }
}
