use crate::protect::{Predicate, UserIsHost};
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState, Error};
use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::IntoResponse,
};
use domain::{meeting as MeetingApi, Id};
use log::*;

/// Checks that the authenticated user hosts the meeting named by `id` before its status
/// may change. An unknown meeting is answered with 404.
/// Intended to be given to axum::middleware::from_fn_with_state in the router
pub(crate) async fn update_status(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Id>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    match MeetingApi::find_by_id(app_state.db_conn_ref(), id).await {
        Ok(meeting) => {
            let checks = vec![Predicate::new(UserIsHost, vec![meeting.host_user_id])];
            crate::protect::authorize(&app_state, user, request, next, checks)
                .await
                .into_response()
        }
        Err(err) => {
            error!("Meeting {id} could not be loaded for authorization: {err}");
            Error::from(err).into_response()
        }
    }
}
