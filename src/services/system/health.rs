use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use chrono::{DateTime, Utc};

use super::SystemService;
use crate::models::system::responses::{SystemHealthResponse, SystemInfoResponse};
use crate::models::{ApiResponse, AppStartTime};

fn uptime_seconds(started_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - started_at).num_seconds().max(0)
}

/// 存活探测，无需认证，不访问存储
pub async fn health(
    _service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let started_at = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| start.start_datetime)
        .unwrap_or_else(Utc::now);

    let response = SystemHealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime_seconds(started_at, Utc::now()),
        started_at,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Service is healthy")))
}

pub async fn info(service: &SystemService, _request: &HttpRequest) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let response = SystemInfoResponse {
        system_name: config.app.system_name.clone(),
        environment: config.app.environment.clone(),
        max_payload_size: config.server.limits.max_payload_size,
        max_import_size: config.server.limits.max_import_size,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "System info retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use chrono::Duration;

    #[test]
    fn test_uptime_seconds() {
        let start = Utc::now();
        assert_eq!(uptime_seconds(start, start + Duration::seconds(90)), 90);
        assert_eq!(uptime_seconds(start, start - Duration::seconds(5)), 0);
    }

    #[actix_web::test]
    async fn test_health_reports_version() {
        let start = AppStartTime {
            start_datetime: Utc::now() - Duration::seconds(30),
        };
        let request = TestRequest::default()
            .app_data(web::Data::new(start))
            .to_http_request();

        let resp = health(&SystemService::new_lazy(), &request).await.unwrap();
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["version"], env!("CARGO_PKG_VERSION"));
        assert!(json["data"]["uptime_seconds"].as_i64().unwrap() >= 30);
    }
}
