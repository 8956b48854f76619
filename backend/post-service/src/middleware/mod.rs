/// HTTP middleware utilities for post-service
///
/// Session auth resolves a bearer token against the sessions table and
/// makes the current user's id available to handlers. Token minting and
/// renewal belong to the identity layer, not this service.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;
use std::rc::Rc;
use uuid::Uuid;

use crate::db::session_repo;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct UserId(pub Uuid);

pub struct SessionAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(str::to_owned)
                .ok_or_else(|| AppError::Unauthorized("Missing session token".to_string()))?;

            let pool = req
                .app_data::<web::Data<PgPool>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("Database pool not configured".to_string()))?;

            let user_id = session_repo::find_user_by_token(pool.get_ref(), &token)
                .await
                .map_err(|err| {
                    tracing::warn!("session lookup failed: {}", err);
                    AppError::Internal("Session lookup failed".to_string())
                })?
                .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))?;

            req.extensions_mut().insert(UserId(user_id));

            service.call(req).await
        })
    }
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<UserId>()
                .cloned()
                .ok_or_else(|| AppError::Unauthorized("User ID missing".to_string()).into()),
        )
    }
}
