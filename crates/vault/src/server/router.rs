//! Axum router construction.

use axum::{
    routing::{get, post},
    Router,
};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState) -> Router {
    let routes = Router::new()
        .route("/fields/encrypt", post(handlers::encrypt))
        .route("/fields/decrypt", post(handlers::decrypt))
        .route("/fields/mask", post(handlers::mask))
        .route("/fields/migrate", post(handlers::migrate))
        .route("/fields/rotate", post(handlers::rotate))
        .route("/validate", post(handlers::validate))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found);
    middleware::apply(routes).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = build(AppState::default());
        let req = Request::builder()
            .uri("/unknown")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn health_route_exists() {
        let app = build(AppState::default());
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        // 503 because the key has not been derived yet in the test state.
        assert_eq!(resp.status(), 503);
    }

    #[tokio::test]
    async fn encrypt_requires_post() {
        let app = build(AppState::default());
        let req = Request::builder()
            .uri("/fields/encrypt")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 405);
    }
}
