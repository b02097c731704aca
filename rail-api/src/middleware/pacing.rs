use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Delays each request by the configured pacing interval before it is handed
/// to the store. The store lock is never held while waiting.
pub async fn pacing_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(delay) = state.pacing.delay() {
        tracing::debug!("Pacing {} {} by {:?}", req.method(), req.uri().path(), delay);
        tokio::time::sleep(delay).await;
    }
    next.run(req).await
}
