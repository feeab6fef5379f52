/*!
 * 页面守卫：`/app/{school_slug}/...`
 *
 * 浏览器导航不带 Bearer 令牌，因此从刷新令牌 Cookie 中解析用户。
 * 未登录的访问者重定向到 `/login?next=<path>`；
 * 学校不存在、已停用或访问者不是该校的有效成员时重定向到 `/app`。
 * 通过后 `User` 与 `School` 会写入请求扩展。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::LOCATION,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, warn};

use crate::models::schools::entities::School;
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::jwt::{JwtUtils, REFRESH_TOKEN_COOKIE};

const SLUG_PARAM: &str = "school_slug";

#[derive(Clone)]
pub struct RequireSchoolMember;

enum GateOutcome {
    Allowed(User, School),
    Login,
    SchoolPicker,
}

fn redirect(location: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location))
        .finish()
}

/// `/login?next=<path>`，路径做百分号编码
fn login_location(path_and_query: &str) -> String {
    let mut encoded = String::with_capacity(path_and_query.len());
    for byte in path_and_query.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    format!("/login?next={encoded}")
}

/// 优先取作用域参数中的 slug，否则取路径的第二段
fn school_slug(req: &ServiceRequest) -> Option<String> {
    req.match_info()
        .get(SLUG_PARAM)
        .map(str::to_string)
        .or_else(|| req.path().split('/').nth(2).map(str::to_string))
        .filter(|slug| !slug.is_empty())
}

async fn resolve(req: &ServiceRequest) -> GateOutcome {
    let Some(storage) = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
    else {
        warn!("Storage not found in app data");
        return GateOutcome::SchoolPicker;
    };

    let user_id = req
        .cookie(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .and_then(|token| JwtUtils::verify_refresh_token(&token).ok())
        .and_then(|claims| JwtUtils::user_id(&claims));
    let Some(user_id) = user_id else {
        return GateOutcome::Login;
    };

    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.is_active() => user,
        Ok(_) => return GateOutcome::Login,
        Err(e) => {
            warn!("Page gate failed to load user {}: {}", user_id, e);
            return GateOutcome::Login;
        }
    };

    let Some(slug) = school_slug(req) else {
        return GateOutcome::SchoolPicker;
    };

    let school = match storage.get_school_by_slug(&slug).await {
        Ok(Some(school)) if school.is_active || user.is_platform_admin() => school,
        Ok(_) => {
            debug!("Unknown or inactive school slug {}", slug);
            return GateOutcome::SchoolPicker;
        }
        Err(e) => {
            warn!("Page gate failed to load school {}: {}", slug, e);
            return GateOutcome::SchoolPicker;
        }
    };

    if user.is_platform_admin() {
        return GateOutcome::Allowed(user, school);
    }

    match storage.get_membership(school.id, user.id).await {
        Ok(Some(member)) if member.is_active => GateOutcome::Allowed(user, school),
        Ok(_) => {
            debug!("User {} is not a member of {}", user.id, school.slug);
            GateOutcome::SchoolPicker
        }
        Err(e) => {
            warn!("Page gate failed to load membership: {}", e);
            GateOutcome::SchoolPicker
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireSchoolMember
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireSchoolMemberMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSchoolMemberMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireSchoolMemberMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireSchoolMemberMiddleware<S>
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
        Box::pin(async move {
            match resolve(&req).await {
                GateOutcome::Allowed(user, school) => {
                    req.extensions_mut().insert(user);
                    req.extensions_mut().insert(school);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                GateOutcome::Login => {
                    let target = req
                        .uri()
                        .path_and_query()
                        .map(|pq| pq.as_str().to_string())
                        .unwrap_or_else(|| req.path().to_string());
                    Ok(req.into_response(
                        redirect(login_location(&target)).map_into_right_body(),
                    ))
                }
                GateOutcome::SchoolPicker => Ok(
                    req.into_response(redirect("/app".to_string()).map_into_right_body()),
                ),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_login_location_encodes_query() {
        assert_eq!(
            login_location("/app/hillside/students"),
            "/login?next=/app/hillside/students"
        );
        assert_eq!(
            login_location("/app/hillside/fees?tab=unpaid&page=2"),
            "/login?next=/app/hillside/fees%3Ftab%3Dunpaid%26page%3D2"
        );
    }

    #[test]
    fn test_slug_from_path_fallback() {
        let req = TestRequest::with_uri("/app/hillside/attendance").to_srv_request();
        assert_eq!(school_slug(&req).as_deref(), Some("hillside"));

        let req = TestRequest::with_uri("/app").to_srv_request();
        assert_eq!(school_slug(&req), None);
    }

    #[actix_web::test]
    async fn test_anonymous_visitor_is_sent_to_login() {
        use actix_web::{App, http::StatusCode, test};

        let app = test::init_service(
            App::new().service(
                web::scope("/app/{school_slug}")
                    .wrap(RequireSchoolMember)
                    .default_service(web::to(HttpResponse::Ok)),
            ),
        )
        .await;

        let storage_missing = test::call_service(
            &app,
            TestRequest::with_uri("/app/hillside/students").to_request(),
        )
        .await;
        // 没有存储时守卫无法解析任何内容
        assert_eq!(storage_missing.status(), StatusCode::FOUND);
    }
}
