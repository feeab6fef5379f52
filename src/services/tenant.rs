//! API 请求的租户解析
//!
//! 请求通过 `school_id` 指定学校，调用者必须是该校的有效成员
//! 并拥有所需权限；平台管理员无需成员身份即可通过。
//! 已停用的学校只对平台管理员可见。

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use tracing::{error, warn};

use crate::middlewares::RequireJWT;
use crate::models::members::entities::{SchoolMember, SchoolRole};
use crate::models::members::permissions::Permission;
use crate::models::schools::entities::School;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 解析出的学校以及在其中操作的调用者
#[derive(Debug, Clone)]
pub struct SchoolContext {
    pub school: School,
    pub user: User,
    /// 平台管理员无成员身份操作时为 `None`
    pub membership: Option<SchoolMember>,
}

impl SchoolContext {
    pub fn school_id(&self) -> i64 {
        self.school.id
    }

    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    pub fn role(&self) -> Option<SchoolRole> {
        self.membership.as_ref().map(|m| m.role)
    }

    pub fn can(&self, permission: Permission) -> bool {
        if self.user.is_platform_admin() {
            return true;
        }
        self.role()
            .map(|role| role.has_permission(permission))
            .unwrap_or(false)
    }
}

/// 解析学校并校验有效成员身份
pub async fn require_member(
    request: &HttpRequest,
    storage: &Arc<dyn Storage>,
    school_id: Option<i64>,
) -> Result<SchoolContext, HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Err(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    let Some(school_id) = school_id else {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SchoolIdRequired,
            "school_id is required",
        )));
    };

    let school = match storage.get_school_by_id(school_id).await {
        Ok(Some(school)) if school.is_active || user.is_platform_admin() => school,
        Ok(_) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SchoolNotFound,
                "School not found",
            )));
        }
        Err(e) => {
            error!("Failed to load school {}: {}", school_id, e);
            return Err(internal_error("Failed to resolve school"));
        }
    };

    let membership = match storage.get_membership(school_id, user.id).await {
        Ok(member) => member.filter(|m| m.is_active),
        Err(e) => {
            error!(
                "Failed to load membership of user {} in school {}: {}",
                user.id, school_id, e
            );
            return Err(internal_error("Failed to resolve membership"));
        }
    };

    if membership.is_none() && !user.is_platform_admin() {
        warn!(
            "User {} is not a member of school {}",
            user.id, school_id
        );
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::NotSchoolMember,
            "You are not a member of this school",
        )));
    }

    Ok(SchoolContext {
        school,
        user,
        membership,
    })
}

/// 在 [`require_member`] 的基础上按成员角色校验权限
pub async fn authorize(
    request: &HttpRequest,
    storage: &Arc<dyn Storage>,
    school_id: Option<i64>,
    permission: Permission,
) -> Result<SchoolContext, HttpResponse> {
    let ctx = require_member(request, storage, school_id).await?;

    if !ctx.can(permission) {
        warn!(
            "User {} (role {:?}) denied {:?} in school {}",
            ctx.user_id(),
            ctx.role(),
            permission,
            ctx.school_id()
        );
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::PermissionDenied,
            "You do not have permission to perform this action",
        )));
    }

    Ok(ctx)
}

/// `user_id` 是否为该校的有效教职工
pub async fn is_active_member(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    user_id: i64,
) -> Result<bool, HttpResponse> {
    match storage.get_membership(school_id, user_id).await {
        Ok(member) => Ok(member.is_some_and(|m| m.is_active)),
        Err(e) => {
            error!("Failed to load membership: {}", e);
            Err(internal_error("Failed to resolve membership"))
        }
    }
}

fn internal_error(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        message,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn user(role: UserRole) -> User {
        User {
            id: 7,
            username: "carol".into(),
            email: "carol@example.com".into(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn school() -> School {
        School {
            id: 3,
            name: "Hillside".into(),
            slug: "hillside".into(),
            address: None,
            phone: None,
            email: None,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn member(role: SchoolRole) -> SchoolMember {
        SchoolMember {
            id: 1,
            school_id: 3,
            user_id: 7,
            role,
            is_active: true,
            joined_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_platform_admin_can_everything_without_membership() {
        let ctx = SchoolContext {
            school: school(),
            user: user(UserRole::Admin),
            membership: None,
        };
        assert!(ctx.can(Permission::ManageSchool));
        assert!(ctx.can(Permission::RecordPayments));
        assert_eq!(ctx.role(), None);
    }

    #[test]
    fn test_member_permissions_follow_role() {
        let ctx = SchoolContext {
            school: school(),
            user: user(UserRole::User),
            membership: Some(member(SchoolRole::Teacher)),
        };
        assert!(ctx.can(Permission::RecordAttendance));
        assert!(!ctx.can(Permission::ManageFees));
        assert_eq!(ctx.school_id(), 3);
        assert_eq!(ctx.user_id(), 7);
    }

    #[test]
    fn test_no_membership_means_no_permissions() {
        let ctx = SchoolContext {
            school: school(),
            user: user(UserRole::User),
            membership: None,
        };
        assert!(!ctx.can(Permission::ViewStudents));
    }
}
