//! Request session and role gating.
//!
//! Authentication happens upstream. By the time a request reaches us it carries the id of
//! the signed-in user in the `x-user-id` header; the role is read from that user's row.

use crate::{
    api::{AppState, error::ApiResult},
    core::user,
    entities::Role,
    errors::Error,
};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// Id from the `x-user-id` header
    pub user_id: i64,
    /// Role stored on the user's row
    pub role: Role,
}

/// Resolves the caller from the `x-user-id` header and stores a [`Session`] on the request.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> ApiResult<Response> {
    let user_id = extract_user_id(req.headers()).ok_or(Error::Unauthorized)?;
    let user = user::get_user_by_id(&state.db, user_id)
        .await?
        .ok_or(Error::Unauthorized)?;

    req.extensions_mut().insert(Session {
        user_id: user.id,
        role: user.role,
    });
    Ok(next.run(req).await)
}

fn extract_user_id(headers: &HeaderMap) -> Option<i64> {
    headers
        .get(USER_ID_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Lets only `admin` sessions through.
pub async fn require_admin(req: Request, next: Next) -> ApiResult<Response> {
    require_role(Role::Admin, req, next).await
}

/// Lets only `user` sessions through.
pub async fn require_user(req: Request, next: Next) -> ApiResult<Response> {
    require_role(Role::User, req, next).await
}

async fn require_role(role: Role, req: Request, next: Next) -> ApiResult<Response> {
    let session = req
        .extensions()
        .get::<Session>()
        .copied()
        .ok_or(Error::Unauthorized)?;

    if session.role != role {
        return Err(Error::Forbidden {
            message: format!("this area requires the {} role", role.as_str()),
        }
        .into());
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_user_id() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_user_id(&headers), None);

        headers.insert(USER_ID_HEADER, HeaderValue::from_static(" 42 "));
        assert_eq!(extract_user_id(&headers), Some(42));

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("abc"));
        assert_eq!(extract_user_id(&headers), None);
    }
}
