//! 通过服务层和页面守卫验证学校范围的访问控制，使用内存 SQLite 数据库

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test::{TestRequest, call_service, init_service};
use actix_web::{App, HttpMessage, HttpRequest, HttpResponse, web};

use schoolhub::middlewares::RequireSchoolMember;
use schoolhub::models::ErrorCode;
use schoolhub::models::members::entities::SchoolRole;
use schoolhub::models::members::permissions::Permission;
use schoolhub::models::members::requests::{AddStaffRequest, UpdateStaffRequest};
use schoolhub::models::schools::requests::{CreateSchoolRequest, UpdateSchoolRequest};
use schoolhub::models::users::entities::{User, UserRole, UserStatus};
use schoolhub::models::users::requests::CreateUserRequest;
use schoolhub::services::StaffService;
use schoolhub::services::tenant;
use schoolhub::storage::Storage;
use schoolhub::storage::sea_orm_storage::SeaOrmStorage;
use schoolhub::utils::jwt::{JwtUtils, REFRESH_TOKEN_COOKIE};

struct Fixture {
    storage: Arc<dyn Storage>,
    school_id: i64,
    owner: User,
    principal: User,
    teacher: User,
    outsider: User,
}

async fn user(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
            role,
            status: UserStatus::Active,
            display_name: None,
        })
        .await
        .unwrap()
}

/// 由 `owner`（管理员）创建的 Hillside，另有一名校长和一名教师
async fn fixture() -> Fixture {
    let storage: Arc<dyn Storage> = Arc::new(
        SeaOrmStorage::connect(":memory:", 1, 5)
            .await
            .expect("in-memory database"),
    );
    let owner = user(&storage, "owner", UserRole::User).await;
    let principal = user(&storage, "principal", UserRole::User).await;
    let teacher = user(&storage, "teacher", UserRole::User).await;
    let outsider = user(&storage, "outsider", UserRole::User).await;

    let school_id = storage
        .create_school(
            owner.id,
            CreateSchoolRequest {
                name: "Hillside".to_string(),
                slug: "hillside".to_string(),
                address: None,
                phone: None,
                email: None,
            },
        )
        .await
        .unwrap()
        .id;
    storage
        .add_staff(school_id, principal.id, SchoolRole::Principal)
        .await
        .unwrap();
    storage
        .add_staff(school_id, teacher.id, SchoolRole::Teacher)
        .await
        .unwrap();

    Fixture {
        storage,
        school_id,
        owner,
        principal,
        teacher,
        outsider,
    }
}

fn request_as(storage: &Arc<dyn Storage>, user: Option<&User>) -> HttpRequest {
    let req = TestRequest::default()
        .app_data(web::Data::new(storage.clone()))
        .to_http_request();
    if let Some(user) = user {
        req.extensions_mut().insert(user.clone());
    }
    req
}

async fn error_code(resp: HttpResponse) -> i64 {
    let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    json["code"].as_i64().unwrap()
}

async fn deactivate_school(storage: &Arc<dyn Storage>, school_id: i64) {
    storage
        .update_school(
            school_id,
            UpdateSchoolRequest {
                name: None,
                address: None,
                phone: None,
                email: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap()
        .unwrap();
}

async fn member_role(fx: &Fixture, user: &User) -> SchoolRole {
    fx.storage
        .get_membership(fx.school_id, user.id)
        .await
        .unwrap()
        .unwrap()
        .role
}

async fn member_id(fx: &Fixture, user: &User) -> i64 {
    fx.storage
        .get_membership(fx.school_id, user.id)
        .await
        .unwrap()
        .unwrap()
        .id
}

#[actix_web::test]
async fn test_tenant_requires_authentication_and_school_id() {
    let fx = fixture().await;

    let anonymous = request_as(&fx.storage, None);
    let resp = tenant::require_member(&anonymous, &fx.storage, Some(fx.school_id))
        .await
        .unwrap_err();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = request_as(&fx.storage, Some(&fx.teacher));
    let resp = tenant::require_member(&req, &fx.storage, None)
        .await
        .unwrap_err();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, ErrorCode::SchoolIdRequired as i64);
}

#[actix_web::test]
async fn test_tenant_unknown_school_and_outsider() {
    let fx = fixture().await;

    let req = request_as(&fx.storage, Some(&fx.teacher));
    let resp = tenant::require_member(&req, &fx.storage, Some(fx.school_id + 100))
        .await
        .unwrap_err();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(resp).await, ErrorCode::SchoolNotFound as i64);

    let req = request_as(&fx.storage, Some(&fx.outsider));
    let resp = tenant::require_member(&req, &fx.storage, Some(fx.school_id))
        .await
        .unwrap_err();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(resp).await, ErrorCode::NotSchoolMember as i64);
}

#[actix_web::test]
async fn test_tenant_permission_follows_role() {
    let fx = fixture().await;
    let req = request_as(&fx.storage, Some(&fx.teacher));

    let ctx = tenant::authorize(
        &req,
        &fx.storage,
        Some(fx.school_id),
        Permission::RecordAttendance,
    )
    .await
    .unwrap();
    assert_eq!(ctx.role(), Some(SchoolRole::Teacher));

    let resp = tenant::authorize(&req, &fx.storage, Some(fx.school_id), Permission::ManageFees)
        .await
        .unwrap_err();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(resp).await, ErrorCode::PermissionDenied as i64);
}

#[actix_web::test]
async fn test_platform_admin_passes_without_membership() {
    let fx = fixture().await;
    let root = user(&fx.storage, "root", UserRole::Admin).await;
    let req = request_as(&fx.storage, Some(&root));

    let ctx = tenant::authorize(&req, &fx.storage, Some(fx.school_id), Permission::ManageSchool)
        .await
        .unwrap();
    assert!(ctx.membership.is_none());
}

#[actix_web::test]
async fn test_deactivated_school_is_hidden_from_members() {
    let fx = fixture().await;
    let root = user(&fx.storage, "root", UserRole::Admin).await;
    deactivate_school(&fx.storage, fx.school_id).await;

    let req = request_as(&fx.storage, Some(&fx.owner));
    let resp = tenant::require_member(&req, &fx.storage, Some(fx.school_id))
        .await
        .unwrap_err();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = request_as(&fx.storage, Some(&root));
    assert!(
        tenant::require_member(&req, &fx.storage, Some(fx.school_id))
            .await
            .is_ok()
    );
}

#[actix_web::test]
async fn test_principal_cannot_promote_self_to_admin() {
    let fx = fixture().await;
    let service = StaffService::new_lazy();
    let req = request_as(&fx.storage, Some(&fx.principal));
    let own_membership = member_id(&fx, &fx.principal).await;

    let resp = service
        .update_staff(
            &req,
            own_membership,
            UpdateStaffRequest {
                school_id: Some(fx.school_id),
                role: Some(SchoolRole::Admin),
                is_active: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(resp).await, ErrorCode::PermissionDenied as i64);
    assert_eq!(member_role(&fx, &fx.principal).await, SchoolRole::Principal);
}

#[actix_web::test]
async fn test_principal_cannot_touch_admin_memberships() {
    let fx = fixture().await;
    let service = StaffService::new_lazy();
    let req = request_as(&fx.storage, Some(&fx.principal));
    let owner_membership = member_id(&fx, &fx.owner).await;

    let resp = service
        .update_staff(
            &req,
            owner_membership,
            UpdateStaffRequest {
                school_id: Some(fx.school_id),
                role: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = service
        .add_staff(
            &req,
            AddStaffRequest {
                school_id: Some(fx.school_id),
                identifier: fx.outsider.username.clone(),
                role: SchoolRole::Admin,
            },
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(
        fx.storage
            .get_membership(fx.school_id, fx.outsider.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[actix_web::test]
async fn test_principal_still_manages_other_staff() {
    let fx = fixture().await;
    let service = StaffService::new_lazy();
    let req = request_as(&fx.storage, Some(&fx.principal));

    let resp = service
        .add_staff(
            &req,
            AddStaffRequest {
                school_id: Some(fx.school_id),
                identifier: fx.outsider.email.clone(),
                role: SchoolRole::Teacher,
            },
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let teacher_membership = member_id(&fx, &fx.teacher).await;
    let resp = service
        .update_staff(
            &req,
            teacher_membership,
            UpdateStaffRequest {
                school_id: Some(fx.school_id),
                role: Some(SchoolRole::Accountant),
                is_active: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(member_role(&fx, &fx.teacher).await, SchoolRole::Accountant);
}

#[actix_web::test]
async fn test_school_admin_can_promote_principal() {
    let fx = fixture().await;
    let service = StaffService::new_lazy();
    let req = request_as(&fx.storage, Some(&fx.owner));
    let principal_membership = member_id(&fx, &fx.principal).await;

    let resp = service
        .update_staff(
            &req,
            principal_membership,
            UpdateStaffRequest {
                school_id: Some(fx.school_id),
                role: Some(SchoolRole::Admin),
                is_active: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(member_role(&fx, &fx.principal).await, SchoolRole::Admin);
}

fn refresh_cookie(user: &User) -> Cookie<'static> {
    let token = JwtUtils::generate_refresh_token(user.id, user.role.as_str(), None).unwrap();
    Cookie::new(REFRESH_TOKEN_COOKIE, token)
}

fn location(res: &actix_web::dev::ServiceResponse) -> Option<&str> {
    res.headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

#[actix_web::test]
async fn test_page_gate_redirects_to_school_picker() {
    let fx = fixture().await;
    let app = init_service(
        App::new().app_data(web::Data::new(fx.storage.clone())).service(
            web::scope("/app/{school_slug}")
                .wrap(RequireSchoolMember)
                .default_service(web::to(HttpResponse::Ok)),
        ),
    )
    .await;

    let res = call_service(
        &app,
        TestRequest::with_uri("/app/hillside/students")
            .cookie(refresh_cookie(&fx.teacher))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = call_service(
        &app,
        TestRequest::with_uri("/app/nowhere/students")
            .cookie(refresh_cookie(&fx.teacher))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), Some("/app"));

    let res = call_service(
        &app,
        TestRequest::with_uri("/app/hillside/students")
            .cookie(refresh_cookie(&fx.outsider))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), Some("/app"));

    let res = call_service(
        &app,
        TestRequest::with_uri("/app/hillside/students").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), Some("/login?next=/app/hillside/students"));

    deactivate_school(&fx.storage, fx.school_id).await;
    let res = call_service(
        &app,
        TestRequest::with_uri("/app/hillside/students")
            .cookie(refresh_cookie(&fx.teacher))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), Some("/app"));
}
