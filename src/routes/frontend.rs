//! 内嵌的单页前端
//!
//! 资源通过 `rust-embed` 从 `frontend/dist/` 编译进二进制；开发时
//! `./frontend-custom/` 中的文件优先。未知路径回退到 `index.html`，
//! 以支持前端路由。`/app/{school_slug}` 下的页面只对该校成员开放。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::path::Path;

use crate::config::AppConfig;
use crate::middlewares;

#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

fn extension(path: &str) -> &str {
    Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
}

fn get_mime_type(path: &str) -> &'static str {
    match extension(path) {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "webmanifest" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "pdf" => "application/pdf",
        "csv" => "text/csv; charset=utf-8",
        "txt" => "text/plain; charset=utf-8",
        "wasm" => "application/wasm",
        "map" => "application/json",
        _ => "application/octet-stream",
    }
}

/// 带哈希的构建产物可以永久缓存
fn should_cache(path: &str) -> bool {
    matches!(
        extension(path),
        "js" | "css" | "woff" | "woff2" | "ttf" | "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp"
    )
}

/// 填充页面外壳中的 `%SYSTEM_NAME%` 与 `%BASE_PATH%` 占位符
fn process_html(content: &[u8], config: &AppConfig) -> Vec<u8> {
    String::from_utf8_lossy(content)
        .replace("%SYSTEM_NAME%", &config.app.system_name)
        .replace("%BASE_PATH%", "")
        .into_bytes()
}

fn try_custom_file(path: &str) -> Option<Vec<u8>> {
    std::fs::read(format!("./frontend-custom/{path}")).ok()
}

fn get_file(path: &str) -> Option<Vec<u8>> {
    try_custom_file(path).or_else(|| FrontendAssets::get(path).map(|f| f.data.to_vec()))
}

/// 拒绝越出资源根目录的路径
fn is_safe_path(path: &str) -> bool {
    !path.split('/').any(|segment| segment == "..")
}

pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let path = req.match_info().query("tail").trim_start_matches('/');
    let config = AppConfig::get();

    let (content, file_path) = if path.is_empty() || !is_safe_path(path) {
        (get_file("index.html"), "index.html")
    } else if let Some(content) = get_file(path) {
        (Some(content), path)
    } else {
        (get_file("index.html"), "index.html")
    };

    let Some(mut data) = content else {
        return Ok(HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(
                r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>SchoolHub</title>
</head>
<body>
    <h1>Frontend Not Found</h1>
    <p>The frontend assets have not been built or embedded.</p>
    <pre>cd frontend && npm run build</pre>
</body>
</html>"#,
            ));
    };

    let mime = get_mime_type(file_path);
    if mime.starts_with("text/html") {
        data = process_html(&data, config);
    }

    let mut response = HttpResponse::Ok();
    response.content_type(mime);
    if should_cache(file_path) {
        response.insert_header(("Cache-Control", "public, max-age=31536000, immutable"));
    } else {
        response.insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"));
    }

    Ok(response.body(data))
}

/// 最后注册：未被任何 API 作用域匹配的请求都落到这里
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/app/{school_slug}")
            .wrap(middlewares::RequireSchoolMember)
            .route("", web::get().to(serve_frontend))
            .route("/{tail:.*}", web::get().to(serve_frontend)),
    )
    .route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_mime_type() {
        assert_eq!(get_mime_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(
            get_mime_type("assets/app.js"),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(get_mime_type("style.css"), "text/css; charset=utf-8");
        assert_eq!(get_mime_type("logo.png"), "image/png");
        assert_eq!(get_mime_type("students.csv"), "text/csv; charset=utf-8");
        assert_eq!(get_mime_type("unknown.xyz"), "application/octet-stream");
        assert_eq!(get_mime_type("no-extension"), "application/octet-stream");
    }

    #[test]
    fn test_should_cache() {
        assert!(should_cache("assets/app.js"));
        assert!(should_cache("logo.svg"));
        assert!(!should_cache("index.html"));
        assert!(!should_cache("manifest.json"));
    }

    #[test]
    fn test_is_safe_path() {
        assert!(is_safe_path("assets/app.js"));
        assert!(!is_safe_path("../Cargo.toml"));
        assert!(!is_safe_path("assets/../../secret"));
    }
}
