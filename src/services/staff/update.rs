use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{StaffService, admin_change_denied, can_manage_admins};
use crate::errors::SchoolHubError;
use crate::models::members::entities::SchoolRole;
use crate::models::members::permissions::Permission;
use crate::models::members::requests::UpdateStaffRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found, tenant};

pub async fn update_staff(
    service: &StaffService,
    request: &HttpRequest,
    member_id: i64,
    update: UpdateStaffRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx =
        match tenant::authorize(request, &storage, update.school_id, Permission::ManageStaff).await
        {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

    if !can_manage_admins(&ctx) {
        let target = match storage.get_staff_member(ctx.school_id(), member_id).await {
            Ok(Some(member)) => member,
            Ok(None) => return Ok(not_found(ErrorCode::MemberNotFound, "Staff member not found")),
            Err(e) => return Ok(error_response("Failed to update staff member", &e)),
        };
        if target.role == SchoolRole::Admin || update.role == Some(SchoolRole::Admin) {
            warn!(
                "User {} tried to change admin membership {} in school {}",
                ctx.user_id(),
                member_id,
                ctx.school_id()
            );
            return Ok(admin_change_denied());
        }
    }

    match storage
        .update_staff(ctx.school_id(), member_id, update.role, update.is_active)
        .await
    {
        Ok(Some(member)) => {
            info!(
                "Membership {} in school {} updated by user {}",
                member.id,
                ctx.school_id(),
                ctx.user_id()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                member,
                "Staff member updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::MemberNotFound, "Staff member not found")),
        Err(SchoolHubError::Validation(msg)) => Ok(bad_request(ErrorCode::LastAdminRequired, msg)),
        Err(e) => Ok(error_response("Failed to update staff member", &e)),
    }
}
