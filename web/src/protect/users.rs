use crate::protect::{Predicate, UserIsSeller};
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};

/// Only sellers may create meetings, obtain a host ZAK or send contracts.
/// Intended to be given to axum::middleware::from_fn_with_state in the router
pub(crate) async fn seller(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let checks = vec![Predicate::new(UserIsSeller, vec![])];
    crate::protect::authorize(&app_state, user, request, next, checks).await
}
