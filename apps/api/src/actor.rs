use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use santiye_core::{ActorContext, AppError, RequestOrigin, UserId};
use uuid::Uuid;

use crate::error::ApiError;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_NAME_HEADER: &str = "x-actor-name";

/// Acting user and request origin resolved from request headers.
#[derive(Debug, Clone)]
pub struct RequestActor(pub ActorContext);

impl<S> FromRequestParts<S> for RequestActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(address)| *address);

        actor_from_headers(&parts.headers, peer)
            .map(Self)
            .map_err(ApiError::from)
    }
}

fn actor_from_headers(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
) -> Result<ActorContext, AppError> {
    let actor_id = header_value(headers, ACTOR_ID_HEADER)
        .ok_or_else(|| AppError::Validation(format!("{ACTOR_ID_HEADER} header is required")))?;
    let user_id = Uuid::parse_str(&actor_id)
        .map(UserId::from_uuid)
        .map_err(|error| {
            AppError::Validation(format!("invalid {ACTOR_ID_HEADER} '{actor_id}': {error}"))
        })?;
    let display_name = header_value(headers, ACTOR_NAME_HEADER).unwrap_or(actor_id);

    let ip_address = header_value(headers, "x-forwarded-for")
        .and_then(|value| {
            value
                .split(',')
                .next()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned)
        })
        .or_else(|| peer.map(|address| address.ip().to_string()));
    let user_agent = header_value(headers, "user-agent");

    Ok(ActorContext::new(
        user_id,
        display_name,
        RequestOrigin::new(ip_address, user_agent),
    ))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}
