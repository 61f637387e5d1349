//! HTTP middleware for chronicle-service.
//!
//! Identity is parsed once per request from the session token (cookie or
//! Bearer header) issued by the external identity provider. Handlers that
//! mutate state sit behind [`LoginRequired`], which redirects anonymous
//! requests to the login entry point with the original path preserved in a
//! `next` parameter.

pub mod permissions;

pub use permissions::*;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{error::ErrorUnauthorized, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

/// Extracted user identifier stored in request extensions after identity
/// parsing.
#[derive(Debug, Clone)]
pub struct UserId(pub Uuid);

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<UserId>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("User ID missing")),
        )
    }
}

/// Identity of the requester when present. Used by public views that adapt
/// to an authenticated viewer (follow status on profiles).
#[derive(Debug, Clone)]
pub struct MaybeUserId(pub Option<Uuid>);

impl FromRequest for MaybeUserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(MaybeUserId(
            req.extensions().get::<UserId>().map(|user| user.0),
        )))
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[allow(dead_code)]
    exp: usize,
}

/// Name of the session cookie set by the identity provider.
pub const SESSION_COOKIE: &str = "session";

fn decode_user_id(token: &str, secret: &str) -> Option<Uuid> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .ok()?;

    Uuid::parse_str(&data.claims.sub).ok()
}

/// Login redirect target carrying the original path and query.
pub fn login_redirect(login_url: &str, next: &str) -> String {
    format!("{}?next={}", login_url, urlencoding::encode(next))
}

// =====================================================================
// Identity parsing
// =====================================================================

/// Validates the session token on every request and stores [`UserId`] in the
/// request extensions when it checks out. Never rejects a request by itself.
pub struct IdentityParser {
    secret: Rc<String>,
}

impl IdentityParser {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Rc::new(secret.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityParser
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityParserService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityParserService {
            service: Rc::new(service),
            secret: self.secret.clone(),
        }))
    }
}

pub struct IdentityParserService<S> {
    service: Rc<S>,
    secret: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for IdentityParserService<S>
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
        let secret = self.secret.clone();

        Box::pin(async move {
            let token = req
                .request()
                .cookie(SESSION_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .or_else(|| {
                    req.headers()
                        .get(header::AUTHORIZATION)
                        .and_then(|h| h.to_str().ok())
                        .and_then(|h| h.strip_prefix("Bearer "))
                        .map(str::to_string)
                });

            if let Some(user_id) = token.and_then(|t| decode_user_id(&t, &secret)) {
                req.extensions_mut().insert(UserId(user_id));
            }

            service.call(req).await
        })
    }
}

// =====================================================================
// Login gate
// =====================================================================

/// Redirects anonymous requests to the login entry point, preserving the
/// original path and query as the `next` parameter. Relies on
/// [`IdentityParser`] running first.
pub struct LoginRequired {
    login_url: Rc<String>,
}

impl LoginRequired {
    pub fn new(login_url: impl Into<String>) -> Self {
        Self {
            login_url: Rc::new(login_url.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for LoginRequired
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = LoginRequiredService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoginRequiredService {
            service: Rc::new(service),
            login_url: self.login_url.clone(),
        }))
    }
}

pub struct LoginRequiredService<S> {
    service: Rc<S>,
    login_url: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for LoginRequiredService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let login_url = self.login_url.clone();

        Box::pin(async move {
            let authenticated = req.extensions().get::<UserId>().is_some();
            if authenticated {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            let next = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| req.uri().path().to_string());
            let location = login_redirect(&login_url, &next);

            let response = HttpResponse::Found()
                .insert_header((header::LOCATION, location))
                .finish()
                .map_into_right_body();

            Ok(req.into_response(response))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: usize,
    }

    fn token_for(user_id: Uuid, secret: &str) -> String {
        let claims = TestClaims {
            sub: user_id.to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    async fn whoami(user: UserId) -> String {
        user.0.to_string()
    }

    #[::core::prelude::v1::test]
    fn login_redirect_encodes_path_and_query() {
        let location = login_redirect("/auth/login", "/posts/5/edit?page=2");
        assert_eq!(location, "/auth/login?next=%2Fposts%2F5%2Fedit%3Fpage%3D2");
    }

    #[actix_web::test]
    async fn anonymous_request_is_redirected_with_next() {
        let app = test::init_service(
            App::new().wrap(IdentityParser::new("secret")).service(
                web::scope("/follow")
                    .wrap(LoginRequired::new("/auth/login"))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/follow?page=2").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), actix_web::http::StatusCode::FOUND);
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|h| h.to_str().ok())
            .unwrap();
        assert_eq!(location, "/auth/login?next=%2Ffollow%3Fpage%3D2");
    }

    #[actix_web::test]
    async fn bearer_token_passes_the_gate() {
        let user_id = Uuid::new_v4();
        let app = test::init_service(
            App::new().wrap(IdentityParser::new("secret")).service(
                web::scope("/follow")
                    .wrap(LoginRequired::new("/auth/login"))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/follow")
            .insert_header((
                header::AUTHORIZATION,
                format!("Bearer {}", token_for(user_id, "secret")),
            ))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert!(res.status().is_success());
        let body = test::read_body(res).await;
        assert_eq!(&body[..], user_id.to_string().as_bytes());
    }

    #[actix_web::test]
    async fn tampered_token_stays_anonymous() {
        let user_id = Uuid::new_v4();
        let app = test::init_service(
            App::new().wrap(IdentityParser::new("secret")).service(
                web::scope("/follow")
                    .wrap(LoginRequired::new("/auth/login"))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/follow")
            .insert_header((
                header::AUTHORIZATION,
                format!("Bearer {}", token_for(user_id, "other-secret")),
            ))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), actix_web::http::StatusCode::FOUND);
    }
}
