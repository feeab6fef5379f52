use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::debug;

use crate::cache::ObjectCache;
use crate::middlewares::require_jwt::{bearer_token, user_cache_key};
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

/// 使刷新令牌 Cookie 过期，并清除当前访问令牌对应的用户缓存。
/// 没有会话时同样返回成功。
pub async fn handle_signout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    if let Some(token) = bearer_token(request.headers())
        && let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>()
    {
        cache.remove(&user_cache_key(token)).await;
        debug!("Evicted cached user for signed-out token");
    }

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::<()>::success_empty("Signed out")))
}
