pub mod add;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::members::entities::SchoolRole;
use crate::models::members::requests::{AddStaffRequest, StaffListQuery, UpdateStaffRequest};
use crate::models::{ErrorCode, SchoolScopeQuery};
use crate::services::forbidden;
use crate::services::tenant::SchoolContext;
use crate::storage::Storage;

/// 授予、撤销或修改 `admin` 成员身份仅限学校管理员
/// 和平台管理员。
pub(crate) fn can_manage_admins(ctx: &SchoolContext) -> bool {
    ctx.user.is_platform_admin() || ctx.role() == Some(SchoolRole::Admin)
}

pub(crate) fn admin_change_denied() -> HttpResponse {
    forbidden(
        ErrorCode::PermissionDenied,
        "Only school admins can manage admin memberships",
    )
}

pub struct StaffService {
    storage: Option<Arc<dyn Storage>>,
}

impl StaffService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_staff(
        &self,
        request: &HttpRequest,
        query: StaffListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_staff(self, request, query).await
    }

    pub async fn add_staff(
        &self,
        request: &HttpRequest,
        staff: AddStaffRequest,
    ) -> ActixResult<HttpResponse> {
        add::add_staff(self, request, staff).await
    }

    pub async fn update_staff(
        &self,
        request: &HttpRequest,
        member_id: i64,
        update: UpdateStaffRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_staff(self, request, member_id, update).await
    }

    /// 软删除：停用该成员身份
    pub async fn remove_staff(
        &self,
        request: &HttpRequest,
        member_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        let update = UpdateStaffRequest {
            school_id: scope.school_id,
            role: None,
            is_active: Some(false),
        };
        update::update_staff(self, request, member_id, update).await
    }
}
