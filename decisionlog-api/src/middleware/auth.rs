/// JWT authentication layer
///
/// Applied with `axum::middleware::from_fn_with_state` to every protected
/// router. On success the caller's [`AuthContext`] is stored in the request
/// extensions for handlers to extract with `Extension<AuthContext>`; on failure
/// the request is answered with 401 before reaching the handler.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use decisionlog_shared::auth::middleware::{authenticate, AuthContext};

use crate::{app::AppState, error::ApiError};

pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth: AuthContext = authenticate(req.headers(), state.jwt_secret()).map_err(|e| {
        tracing::debug!(error = %e, path = %req.uri().path(), "Rejected unauthenticated request");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}
