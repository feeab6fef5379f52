/*!
 * 固定窗口速率限制
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RateLimit;
 *
 * App::new().service(
 *     web::scope("/api/v1/auth")
 *         .wrap(RateLimit::login())
 *         .route("/login", web::post().to(login_handler)),
 * )
 * ```
 *
 * 已认证请求按用户计数，未登录请求按客户端 IP 计数。
 * 窗口在首个请求时打开，`window_secs` 秒后关闭；超限返回 429，
 * `Retry-After` 为窗口剩余秒数。放行的响应带
 * `X-RateLimit-Limit` 与 `X-RateLimit-Remaining` 头。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

/// 限制器允许的最长窗口；空闲超过该时长的计数会被清除
const MAX_WINDOW_SECS: u64 = 300;

static WINDOWS: Lazy<Cache<String, Window>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(MAX_WINDOW_SECS))
        .max_capacity(100_000)
        .build()
});

/// 自 `opened_at` 起的请求计数
#[derive(Debug, Clone, Copy)]
struct Window {
    opened_at: Instant,
    hits: u32,
}

impl Window {
    /// 计入一次请求，旧窗口已过期时开启新窗口
    fn hit(previous: Option<Window>, now: Instant, length: Duration) -> Window {
        match previous {
            Some(window) if now.duration_since(window.opened_at) < length => Window {
                hits: window.hits.saturating_add(1),
                ..window
            },
            _ => Window {
                opened_at: now,
                hits: 1,
            },
        }
    }

    /// 距窗口关闭的整秒数，至少为 1
    fn retry_after(&self, now: Instant, length: Duration) -> u64 {
        let left = length.saturating_sub(now.duration_since(self.opened_at));
        (left.as_secs() + u64::from(left.subsec_nanos() > 0)).max(1)
    }
}

#[derive(Debug, Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: &'static str,
}

impl RateLimit {
    /// `window_secs` 上限为五分钟
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, MAX_WINDOW_SECS),
            key_prefix: "",
        }
    }

    pub fn with_prefix(mut self, prefix: &'static str) -> Self {
        self.key_prefix = prefix;
        self
    }

    /// 登录：5次/分钟/IP
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 注册：3次/分钟/IP
    pub fn register() -> Self {
        Self::new(3, 60).with_prefix("register")
    }

    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 学生 CSV 导入：5次/分钟/用户
    pub fn import() -> Self {
        Self::new(5, 60).with_prefix("import")
    }

    pub fn api() -> Self {
        Self::new(100, 60).with_prefix("api")
    }

    fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    fn key(&self, caller: &str) -> String {
        if self.key_prefix.is_empty() {
            caller.to_string()
        } else {
            format!("{}:{caller}", self.key_prefix)
        }
    }
}

/// 已认证为 `user:<id>`，否则为 `ip:<addr>`
fn caller_key(req: &ServiceRequest) -> String {
    if let Some(user_id) = req.extensions().get::<User>().map(|user| user.id) {
        return format!("user:{user_id}");
    }
    format!("ip:{}", client_ip(req))
}

/// 依次取对端地址、`X-Forwarded-For` 第一跳、`X-Real-IP` 中
/// 第一个合法的 IP
fn client_ip(req: &ServiceRequest) -> String {
    let peer = req
        .connection_info()
        .realip_remote_addr()
        .map(str::to_owned);
    let forwarded = header_value(req, "X-Forwarded-For").and_then(|v| v.split(',').next());

    let valid = peer
        .as_deref()
        .into_iter()
        .chain(forwarded)
        .chain(header_value(req, "X-Real-IP"))
        .map(str::trim)
        .find(|ip| ip.parse::<IpAddr>().is_ok())
        .map(str::to_owned);
    valid.or(peer).unwrap_or_else(|| "unknown".to_string())
}

fn header_value<'a>(req: &'a ServiceRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let key = limit.key(&caller_key(&req));
            let length = limit.window();
            let now = Instant::now();

            let window = WINDOWS
                .entry(key.clone())
                .and_upsert_with(|previous| {
                    ready(Window::hit(previous.map(|e| e.into_value()), now, length))
                })
                .await
                .into_value();

            if window.hits > limit.max_requests {
                warn!(
                    "Rate limit exceeded for {} ({} hits, limit {})",
                    key, window.hits, limit.max_requests
                );
                let retry_after = window.retry_after(now, length);
                return Ok(req.into_response(too_many_requests(retry_after).map_into_right_body()));
            }

            let remaining = limit.max_requests - window.hits;
            let mut res = srv.call(req).await?.map_into_left_body();
            let headers = res.headers_mut();
            headers.insert(
                HeaderName::from_static("x-ratelimit-limit"),
                HeaderValue::from(limit.max_requests),
            );
            headers.insert(
                HeaderName::from_static("x-ratelimit-remaining"),
                HeaderValue::from(remaining),
            );
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::{TestRequest, call_service, init_service};
    use actix_web::{App, web};

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key("ip:1.2.3.4"), "login:ip:1.2.3.4");

        let register = RateLimit::register();
        assert_eq!(register.max_requests, 3);

        let import = RateLimit::import();
        assert_eq!(import.key("user:7"), "import:user:7");

        assert_eq!(RateLimit::new(1, 3600).window_secs, MAX_WINDOW_SECS);
        assert_eq!(RateLimit::new(1, 0).key("ip:::1"), "ip:::1");
    }

    #[test]
    fn test_window_counts_until_it_lapses() {
        let start = Instant::now();
        let length = Duration::from_secs(60);

        let first = Window::hit(None, start, length);
        let second = Window::hit(Some(first), start + Duration::from_secs(59), length);
        assert_eq!(second.hits, 2);
        assert_eq!(second.opened_at, start);

        let fresh = Window::hit(Some(second), start + length, length);
        assert_eq!(fresh.hits, 1);
        assert_eq!(fresh.opened_at, start + length);
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let start = Instant::now();
        let length = Duration::from_secs(60);
        let window = Window::hit(None, start, length);

        assert_eq!(window.retry_after(start, length), 60);
        assert_eq!(window.retry_after(start + Duration::from_millis(100), length), 60);
        assert_eq!(window.retry_after(start + Duration::from_secs(59), length), 1);
        assert_eq!(window.retry_after(start + Duration::from_secs(90), length), 1);
    }

    #[actix_web::test]
    async fn test_requests_over_limit_are_rejected() {
        let app = init_service(
            App::new().service(
                web::scope("/limited")
                    .wrap(RateLimit::new(2, 60).with_prefix("test_over_limit"))
                    .route("", web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        for remaining in ["1", "0"] {
            let res = call_service(&app, TestRequest::get().uri("/limited").to_request()).await;
            assert_eq!(res.status(), StatusCode::OK);
            assert_eq!(
                res.headers().get("X-RateLimit-Remaining").and_then(|v| v.to_str().ok()),
                Some(remaining)
            );
            assert_eq!(
                res.headers().get("X-RateLimit-Limit").and_then(|v| v.to_str().ok()),
                Some("2")
            );
        }

        let res = call_service(&app, TestRequest::get().uri("/limited").to_request()).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after: u64 = res
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap();
        assert!((1..=60).contains(&retry_after));
    }

    #[actix_web::test]
    async fn test_prefixes_count_separately() {
        let app = init_service(
            App::new()
                .service(
                    web::scope("/a")
                        .wrap(RateLimit::new(1, 60).with_prefix("test_prefix_a"))
                        .route("", web::get().to(HttpResponse::Ok)),
                )
                .service(
                    web::scope("/b")
                        .wrap(RateLimit::new(1, 60).with_prefix("test_prefix_b"))
                        .route("", web::get().to(HttpResponse::Ok)),
                ),
        )
        .await;

        let res = call_service(&app, TestRequest::get().uri("/a").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let res = call_service(&app, TestRequest::get().uri("/b").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let res = call_service(&app, TestRequest::get().uri("/a").to_request()).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
