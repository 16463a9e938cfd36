use super::error::*;
use super::handler;
use super::handler::ContentQuery;
use crate::application_port::AuthService;
use crate::domain_model::{PaginationLimits, Subject};
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, http};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let login = warp::post()
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::login);

    let refresh = warp::post()
        .and(warp::path("refresh"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::refresh);

    let logout = warp::post()
        .and(warp::path("logout"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::logout);

    let content_get = warp::get()
        .and(warp::path("content"))
        .and(warp::path::end())
        .and(warp::query::<ContentQuery>())
        .and(with_limits(server.pagination_limits()))
        .and(with(server.content_service.clone()))
        .and_then(handler::get_content);

    let content_post = warp::post()
        .and(warp::path("content"))
        .and(warp::path::end())
        .and(with_verification(server.auth_service.clone()))
        .and(warp::body::json())
        .and(with(server.content_service.clone()))
        .and_then(handler::update_content);

    let health = warp::get()
        .and(warp::path("health"))
        .and(warp::path::end())
        .and(with(server.clone()))
        .and_then(handler::health);

    let seed = warp::post()
        .and(warp::path("seed"))
        .and(warp::path::end())
        .and(with(server.clone()))
        .and_then(handler::seed);

    login
        .or(refresh)
        .or(logout)
        .or(content_get)
        .or(content_post)
        .or(health)
        .or(seed)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

fn with_limits(
    limits: PaginationLimits,
) -> impl Filter<Extract = (PaginationLimits,), Error = Infallible> + Clone {
    warp::any().map(move || limits)
}

/// Protect a route: resolve the Authorization header to the token's subject
/// or reject before the handler runs.
fn with_verification(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (Subject,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>(http::header::AUTHORIZATION.as_str()).and_then(
        move |header: Option<String>| {
            let auth_service = auth_service.clone();
            async move {
                let token =
                    handler::bearer_token(header).map_err(|e| reject_with(ApiRejection::from(e)))?;
                let subject = auth_service
                    .verify_access(&token)
                    .await
                    .map_err(|e| reject_with(ApiRejection::from(e)))?;
                Ok::<Subject, warp::Rejection>(subject)
            }
        },
    )
}
