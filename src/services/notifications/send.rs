use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::NotificationService;
use crate::models::members::permissions::Permission;
use crate::models::notifications::requests::SendNotificationRequest;
use crate::models::notifications::responses::SendNotificationResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, tenant};
use crate::utils::validate::validate_required_text;

const MAX_TITLE_LEN: usize = 200;
const MAX_MESSAGE_LEN: usize = 5000;

fn validate_send(notification: &mut SendNotificationRequest) -> Result<(), String> {
    notification.title = notification.title.trim().to_string();
    notification.message = notification.message.trim().to_string();
    validate_required_text("title", &notification.title, MAX_TITLE_LEN)?;
    validate_required_text("message", &notification.message, MAX_MESSAGE_LEN)?;
    if notification.user_ids.is_empty() && notification.roles.is_empty() {
        return Err("user_ids or roles must name at least one recipient".to_string());
    }
    notification.user_ids.sort_unstable();
    notification.user_ids.dedup();
    Ok(())
}

/// 显式指定但不在解析结果中的用户
fn non_members(requested: &[i64], resolved: &[i64]) -> Vec<i64> {
    requested
        .iter()
        .copied()
        .filter(|id| !resolved.contains(id))
        .collect()
}

pub async fn send_notification(
    service: &NotificationService,
    request: &HttpRequest,
    mut notification: SendNotificationRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        notification.school_id,
        Permission::SendNotifications,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = validate_send(&mut notification) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let mut recipients = match storage
        .resolve_member_user_ids(ctx.school_id(), &notification.user_ids, &notification.roles)
        .await
    {
        Ok(ids) => ids,
        Err(e) => return Ok(error_response("Failed to resolve recipients", &e)),
    };
    recipients.sort_unstable();
    recipients.dedup();

    let missing = non_members(&notification.user_ids, &recipients);
    if !missing.is_empty() {
        return Ok(bad_request(
            ErrorCode::NotSchoolMember,
            format!("Users {missing:?} are not active members of this school"),
        ));
    }
    if recipients.is_empty() {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "No active members match the requested roles",
        ));
    }

    match storage
        .create_notifications(
            ctx.school_id(),
            &recipients,
            &notification.title,
            &notification.message,
            notification.kind,
        )
        .await
    {
        Ok(created) => {
            info!(
                "User {} sent {:?} notification to {} recipients in school {}",
                ctx.user_id(),
                notification.kind,
                created,
                ctx.school_id()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                SendNotificationResponse { created },
                "Notification sent successfully",
            )))
        }
        Err(e) => Ok(error_response("Failed to send notification", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::members::entities::SchoolRole;
    use crate::models::notifications::entities::NotificationKind;

    fn request(user_ids: Vec<i64>, roles: Vec<SchoolRole>) -> SendNotificationRequest {
        SendNotificationRequest {
            school_id: Some(1),
            title: " Sports day ".into(),
            message: " Friday, bring kit ".into(),
            kind: NotificationKind::Announcement,
            user_ids,
            roles,
        }
    }

    #[test]
    fn test_validate_send_needs_recipients() {
        assert!(validate_send(&mut request(vec![], vec![])).is_err());
        assert!(validate_send(&mut request(vec![], vec![SchoolRole::Teacher])).is_ok());
    }

    #[test]
    fn test_validate_send_trims_and_dedups() {
        let mut notification = request(vec![3, 1, 3], vec![]);
        validate_send(&mut notification).unwrap();
        assert_eq!(notification.title, "Sports day");
        assert_eq!(notification.message, "Friday, bring kit");
        assert_eq!(notification.user_ids, vec![1, 3]);
    }

    #[test]
    fn test_non_members() {
        assert_eq!(non_members(&[1, 2, 3], &[1, 3, 9]), vec![2]);
        assert!(non_members(&[], &[1]).is_empty());
    }
}
