use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::context::TenantContext;

/// Header carrying the tenant identifier, propagated by the edge gateway.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Attach the tenant context or reject the request.
///
/// A missing or non-uuid tenant header is a client error; no note route
/// runs without a tenant.
pub async fn tenant_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let tenant_id = extract_tenant(req.headers())?;

    req.extensions_mut().insert(TenantContext::new(tenant_id));

    Ok(next.run(req).await)
}

fn extract_tenant(headers: &HeaderMap) -> Result<scribe_core::TenantId, StatusCode> {
    let header = headers.get(TENANT_HEADER).ok_or(StatusCode::BAD_REQUEST)?;

    let header = header.to_str().map_err(|_| StatusCode::BAD_REQUEST)?;

    header.trim().parse().map_err(|_| StatusCode::BAD_REQUEST)
}
