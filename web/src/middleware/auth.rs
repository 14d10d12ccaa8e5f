use crate::extractors::authenticated_user::AuthenticatedUser;
use axum::{extract::Request, middleware::Next, response::Response};

/// Authentication middleware: requests without a valid bearer token are answered with
/// 401 before reaching the handler. Attach with `from_fn_with_state`.
pub async fn require_auth(
    AuthenticatedUser(_user): AuthenticatedUser,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn test_handler() -> &'static str {
        "authenticated"
    }

    fn app(state: crate::AppState) -> Router {
        Router::new()
            .route("/test", get(test_handler))
            .route_layer(from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
    }

    #[tokio::test]
    async fn returns_401_without_token() {
        let app = app(test_support::app_state("http://127.0.0.1:9"));

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn returns_401_with_garbage_token() {
        let app = app(test_support::app_state("http://127.0.0.1:9"));

        let request = Request::builder()
            .uri("/test")
            .header(AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[cfg(feature = "mock")]
    #[tokio::test]
    async fn allows_known_user_to_proceed() {
        use crate::extractors::authenticated_user::tests::token_for;
        use domain::roles::Role;
        use sea_orm::{DatabaseBackend, MockDatabase};

        let user = test_support::user(Role::Client);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user.clone()]])
            .into_connection();
        let app = app(test_support::app_state_with(
            test_support::config("http://127.0.0.1:9"),
            db,
        ));

        let request = Request::builder()
            .uri("/test")
            .header(
                AUTHORIZATION,
                format!("Bearer {}", token_for(&user.id.to_string())),
            )
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[cfg(feature = "mock")]
    #[tokio::test]
    async fn token_for_deleted_user_is_rejected() {
        use crate::extractors::authenticated_user::tests::token_for;
        use domain::users;
        use sea_orm::{DatabaseBackend, MockDatabase};

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();
        let app = app(test_support::app_state_with(
            test_support::config("http://127.0.0.1:9"),
            db,
        ));

        let request = Request::builder()
            .uri("/test")
            .header(
                AUTHORIZATION,
                format!("Bearer {}", token_for(&domain::Id::new_v4().to_string())),
            )
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
