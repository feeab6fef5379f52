use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{StaffService, admin_change_denied, can_manage_admins};
use crate::models::members::entities::SchoolRole;
use crate::models::members::permissions::Permission;
use crate::models::members::requests::AddStaffRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, error_response, not_found, tenant};

pub async fn add_staff(
    service: &StaffService,
    request: &HttpRequest,
    staff: AddStaffRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx =
        match tenant::authorize(request, &storage, staff.school_id, Permission::ManageStaff).await
        {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

    if staff.role == SchoolRole::Admin && !can_manage_admins(&ctx) {
        warn!(
            "User {} tried to add an admin to school {}",
            ctx.user_id(),
            ctx.school_id()
        );
        return Ok(admin_change_denied());
    }

    let identifier = staff.identifier.trim();
    if identifier.is_empty() {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "identifier must be a username or email",
        ));
    }

    let user = match storage.get_user_by_username_or_email(identifier).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Ok(error_response("Failed to add staff member", &e)),
    };

    match storage.add_staff(ctx.school_id(), user.id, staff.role).await {
        Ok(member) => {
            info!(
                "User {} added to school {} as {} by user {}",
                user.id,
                ctx.school_id(),
                member.role,
                ctx.user_id()
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(member, "Staff member added successfully")))
        }
        Err(e) if e.is_unique_violation() => Ok(conflict(
            ErrorCode::MemberAlreadyExists,
            "User is already an active member of this school",
        )),
        Err(e) => Ok(error_response("Failed to add staff member", &e)),
    }
}
