//! Authorization rules, applied as route middleware after authentication.
//!
//! Each submodule holds the middleware for one resource. Rules are small [`Check`]
//! implementations combined through [`authorize`].

pub(crate) mod meetings;
pub(crate) mod users;

use crate::{AppState, Error};
use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::IntoResponse};
use domain::{roles::Role, Id};

/// A single authorization rule: may the authenticated user proceed?
///
/// ```rust,ignore
/// #[async_trait]
/// impl Check for UserIsSeller {
///     async fn eval(&self, _app: &AppState, user: &domain::users::Model, _args: Vec<Id>) -> bool {
///         user.role == Role::Seller
///     }
/// }
/// ```
#[async_trait]
pub trait Check: Send + Sync {
    async fn eval(&self, app: &AppState, user: &domain::users::Model, args: Vec<Id>) -> bool;
}

/// A [`Check`] together with the arguments it is evaluated with.
pub(crate) struct Predicate {
    predicate: Box<dyn Check>,
    args: Vec<Id>,
}

impl Predicate {
    pub(crate) fn new<C: Check + 'static>(predicate: C, args: Vec<Id>) -> Self {
        Self {
            predicate: Box::new(predicate),
            args,
        }
    }

    pub(crate) async fn check(&self, app_state: &AppState, user: &domain::users::Model) -> bool {
        self.predicate
            .eval(app_state, user, self.args.clone())
            .await
    }
}

/// Evaluates `checks` in order and answers 403 at the first that fails; otherwise runs
/// the wrapped handler.
pub(crate) async fn authorize(
    app_state: &AppState,
    authenticated_user: domain::users::Model,
    request: Request,
    next: Next,
    checks: Vec<Predicate>,
) -> impl IntoResponse {
    for check in checks {
        if !check.check(app_state, &authenticated_user).await {
            return Error::Forbidden.into_response();
        }
    }
    next.run(request).await
}

pub struct UserIsSeller;

#[async_trait]
impl Check for UserIsSeller {
    async fn eval(
        &self,
        _app_state: &AppState,
        authenticated_user: &domain::users::Model,
        _args: Vec<Id>,
    ) -> bool {
        authenticated_user.role == Role::Seller
    }
}

/// Passes when `args[0]`, the host id of an already loaded meeting, is the authenticated user.
pub struct UserIsHost;

#[async_trait]
impl Check for UserIsHost {
    async fn eval(
        &self,
        _app_state: &AppState,
        authenticated_user: &domain::users::Model,
        args: Vec<Id>,
    ) -> bool {
        args.first() == Some(&authenticated_user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn only_sellers_pass_seller_check() {
        let state = test_support::app_state("http://127.0.0.1:9");

        assert!(
            UserIsSeller
                .eval(&state, &test_support::user(Role::Seller), vec![])
                .await
        );
        assert!(
            !UserIsSeller
                .eval(&state, &test_support::user(Role::Client), vec![])
                .await
        );
    }

    #[tokio::test]
    async fn host_check_compares_host_id() {
        let state = test_support::app_state("http://127.0.0.1:9");
        let seller = test_support::user(Role::Seller);

        let predicate = Predicate::new(UserIsHost, vec![seller.id]);
        assert!(predicate.check(&state, &seller).await);

        let predicate = Predicate::new(UserIsHost, vec![Id::new_v4()]);
        assert!(!predicate.check(&state, &seller).await);
    }
}
