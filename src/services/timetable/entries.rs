use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveTime;
use tracing::info;

use super::TimetableService;
use crate::models::members::permissions::Permission;
use crate::models::timetable::entities::{TimetableEntry, slots_overlap};
use crate::models::timetable::requests::{
    CreateTimetableEntryRequest, TimetableQuery, UpdateTimetableEntryRequest,
};
use crate::models::{ApiResponse, ErrorCode, SchoolScopeQuery};
use crate::services::students::{check_class, clean};
use crate::services::{bad_request, conflict, error_response, not_found, tenant};
use crate::storage::Storage;

/// 课表条目在一周中的位置
#[derive(Debug, Clone, Copy)]
struct Slot {
    id: Option<i64>,
    class_id: i64,
    teacher_id: Option<i64>,
    day_of_week: i32,
    start_time: NaiveTime,
    end_time: NaiveTime,
}

fn validate_slot(slot: &Slot) -> Result<(), &'static str> {
    if !(1..=7).contains(&slot.day_of_week) {
        return Err("day_of_week must be between 1 (Monday) and 7 (Sunday)");
    }
    if slot.start_time >= slot.end_time {
        return Err("start_time must be before end_time");
    }
    Ok(())
}

/// 第一个与班级或教师时间重叠的已有条目
fn find_clash<'a>(slot: &Slot, existing: &'a [TimetableEntry]) -> Option<&'a TimetableEntry> {
    existing.iter().find(|entry| {
        Some(entry.id) != slot.id
            && entry.day_of_week == slot.day_of_week
            && (entry.class_id == slot.class_id
                || (slot.teacher_id.is_some() && entry.teacher_id == slot.teacher_id))
            && slots_overlap(
                slot.start_time,
                slot.end_time,
                entry.start_time,
                entry.end_time,
            )
    })
}

async fn check_slot(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    slot: &Slot,
) -> Result<(), HttpResponse> {
    if let Err(msg) = validate_slot(slot) {
        return Err(bad_request(ErrorCode::BadRequest, msg));
    }

    let existing = storage
        .list_timetable_day(school_id, slot.day_of_week, slot.class_id, slot.teacher_id)
        .await
        .map_err(|e| error_response("Failed to load timetable", &e))?;

    match find_clash(slot, &existing) {
        Some(entry) if entry.class_id == slot.class_id => Err(conflict(
            ErrorCode::TimetableConflict,
            "The class already has a lesson in this slot",
        )),
        Some(_) => Err(conflict(
            ErrorCode::TimetableConflict,
            "The teacher already has a lesson in this slot",
        )),
        None => Ok(()),
    }
}

async fn check_subject(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    subject_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_subject(school_id, subject_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(bad_request(
            ErrorCode::SubjectNotFound,
            "Subject does not belong to this school",
        )),
        Err(e) => Err(error_response("Failed to load subject", &e)),
    }
}

async fn check_teacher(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    teacher_id: Option<i64>,
) -> Result<(), HttpResponse> {
    let Some(teacher_id) = teacher_id else {
        return Ok(());
    };
    if tenant::is_active_member(storage, school_id, teacher_id).await? {
        Ok(())
    } else {
        Err(bad_request(
            ErrorCode::NotSchoolMember,
            "Teacher is not an active member of this school",
        ))
    }
}

pub async fn list_entries(
    service: &TimetableService,
    request: &HttpRequest,
    query: TimetableQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        query.school_id,
        Permission::ViewTimetable,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage.list_timetable(ctx.school_id(), query).await {
        Ok(entries) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(entries, "Timetable retrieved successfully"))),
        Err(e) => Ok(error_response("Failed to list timetable", &e)),
    }
}

pub async fn create_entry(
    service: &TimetableService,
    request: &HttpRequest,
    mut entry: CreateTimetableEntryRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        entry.school_id,
        Permission::ManageTimetable,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let school_id = ctx.school_id();

    entry.room = clean(entry.room);
    let slot = Slot {
        id: None,
        class_id: entry.class_id,
        teacher_id: entry.teacher_id,
        day_of_week: entry.day_of_week,
        start_time: entry.start_time,
        end_time: entry.end_time,
    };
    if let Err(msg) = validate_slot(&slot) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(resp) = check_class(&storage, school_id, Some(entry.class_id)).await {
        return Ok(resp);
    }
    if let Err(resp) = check_subject(&storage, school_id, entry.subject_id).await {
        return Ok(resp);
    }
    if let Err(resp) = check_teacher(&storage, school_id, entry.teacher_id).await {
        return Ok(resp);
    }
    if let Err(resp) = check_slot(&storage, school_id, &slot).await {
        return Ok(resp);
    }

    match storage.create_timetable_entry(school_id, entry).await {
        Ok(entry) => {
            info!(
                "Timetable entry {} created for class {} in school {}",
                entry.id, entry.class_id, school_id
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(entry, "Timetable entry created successfully")))
        }
        Err(e) => Ok(error_response("Failed to create timetable entry", &e)),
    }
}

pub async fn update_entry(
    service: &TimetableService,
    request: &HttpRequest,
    entry_id: i64,
    mut update: UpdateTimetableEntryRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        update.school_id,
        Permission::ManageTimetable,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let school_id = ctx.school_id();

    let current = match storage.get_timetable_entry(school_id, entry_id).await {
        Ok(Some(entry)) => entry,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::TimetableEntryNotFound,
                "Timetable entry not found",
            ));
        }
        Err(e) => return Ok(error_response("Failed to load timetable entry", &e)),
    };

    update.room = clean(update.room);
    if let Some(subject_id) = update.subject_id
        && let Err(resp) = check_subject(&storage, school_id, subject_id).await
    {
        return Ok(resp);
    }
    if let Err(resp) = check_teacher(&storage, school_id, update.teacher_id).await {
        return Ok(resp);
    }

    let slot = Slot {
        id: Some(current.id),
        class_id: current.class_id,
        teacher_id: update.teacher_id.or(current.teacher_id),
        day_of_week: update.day_of_week.unwrap_or(current.day_of_week),
        start_time: update.start_time.unwrap_or(current.start_time),
        end_time: update.end_time.unwrap_or(current.end_time),
    };
    if let Err(resp) = check_slot(&storage, school_id, &slot).await {
        return Ok(resp);
    }

    match storage
        .update_timetable_entry(school_id, entry_id, update)
        .await
    {
        Ok(Some(entry)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(entry, "Timetable entry updated successfully"))),
        Ok(None) => Ok(not_found(
            ErrorCode::TimetableEntryNotFound,
            "Timetable entry not found",
        )),
        Err(e) => Ok(error_response("Failed to update timetable entry", &e)),
    }
}

pub async fn delete_entry(
    service: &TimetableService,
    request: &HttpRequest,
    entry_id: i64,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        scope.school_id,
        Permission::ManageTimetable,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage
        .delete_timetable_entry(ctx.school_id(), entry_id)
        .await
    {
        Ok(true) => {
            info!(
                "Timetable entry {} deleted in school {}",
                entry_id,
                ctx.school_id()
            );
            Ok(HttpResponse::Ok()
                .json(ApiResponse::<()>::success_empty("Timetable entry deleted successfully")))
        }
        Ok(false) => Ok(not_found(
            ErrorCode::TimetableEntryNotFound,
            "Timetable entry not found",
        )),
        Err(e) => Ok(error_response("Failed to delete timetable entry", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn entry(id: i64, class_id: i64, teacher_id: Option<i64>, start: u32, end: u32) -> TimetableEntry {
        TimetableEntry {
            id,
            school_id: 1,
            class_id,
            subject_id: 1,
            teacher_id,
            day_of_week: 1,
            start_time: t(start),
            end_time: t(end),
            room: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn slot(id: Option<i64>, class_id: i64, teacher_id: Option<i64>, start: u32, end: u32) -> Slot {
        Slot {
            id,
            class_id,
            teacher_id,
            day_of_week: 1,
            start_time: t(start),
            end_time: t(end),
        }
    }

    #[test]
    fn test_validate_slot() {
        assert!(validate_slot(&slot(None, 1, None, 8, 9)).is_ok());
        assert!(validate_slot(&slot(None, 1, None, 9, 9)).is_err());
        assert!(validate_slot(&slot(None, 1, None, 10, 9)).is_err());

        let mut sunday = slot(None, 1, None, 8, 9);
        sunday.day_of_week = 7;
        assert!(validate_slot(&sunday).is_ok());
        sunday.day_of_week = 8;
        assert!(validate_slot(&sunday).is_err());
        sunday.day_of_week = 0;
        assert!(validate_slot(&sunday).is_err());
    }

    #[test]
    fn test_class_clash() {
        let existing = vec![entry(1, 10, None, 8, 9)];
        assert!(find_clash(&slot(None, 10, None, 8, 10), &existing).is_some());
        assert!(find_clash(&slot(None, 10, None, 9, 10), &existing).is_none());
        assert!(find_clash(&slot(None, 11, None, 8, 9), &existing).is_none());
    }

    #[test]
    fn test_teacher_clash() {
        let existing = vec![entry(1, 10, Some(5), 8, 9)];
        assert!(find_clash(&slot(None, 11, Some(5), 8, 9), &existing).is_some());
        assert!(find_clash(&slot(None, 11, Some(6), 8, 9), &existing).is_none());
        assert!(find_clash(&slot(None, 11, None, 8, 9), &existing).is_none());
    }

    #[test]
    fn test_update_ignores_itself() {
        let existing = vec![entry(1, 10, Some(5), 8, 9)];
        assert!(find_clash(&slot(Some(1), 10, Some(5), 8, 10), &existing).is_none());
        assert!(find_clash(&slot(Some(2), 10, Some(5), 8, 10), &existing).is_some());
    }
}
