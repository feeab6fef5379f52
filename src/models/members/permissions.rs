//! 角色到权限的静态映射表

use serde::Serialize;
use ts_rs::TS;

use super::entities::SchoolRole;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/member.ts")]
pub enum Permission {
    ManageSchool,
    ManageStaff,
    ViewStudents,
    ManageStudents,
    ManageClasses,
    ManageAcademics,
    RecordAttendance,
    ViewAttendance,
    EnterMarks,
    ViewMarks,
    GenerateReports,
    ManageFees,
    ViewFees,
    RecordPayments,
    ManageTimetable,
    ViewTimetable,
    ManageDiscipline,
    ViewDiscipline,
    SendNotifications,
}

use Permission::*;

const ALL_PERMISSIONS: &[Permission] = &[
    ManageSchool,
    ManageStaff,
    ViewStudents,
    ManageStudents,
    ManageClasses,
    ManageAcademics,
    RecordAttendance,
    ViewAttendance,
    EnterMarks,
    ViewMarks,
    GenerateReports,
    ManageFees,
    ViewFees,
    RecordPayments,
    ManageTimetable,
    ViewTimetable,
    ManageDiscipline,
    ViewDiscipline,
    SendNotifications,
];

const PRINCIPAL_PERMISSIONS: &[Permission] = &[
    ManageStaff,
    ViewStudents,
    ManageStudents,
    ManageClasses,
    ManageAcademics,
    RecordAttendance,
    ViewAttendance,
    EnterMarks,
    ViewMarks,
    GenerateReports,
    ViewFees,
    ManageTimetable,
    ViewTimetable,
    ManageDiscipline,
    ViewDiscipline,
    SendNotifications,
];

const TEACHER_PERMISSIONS: &[Permission] = &[
    ViewStudents,
    RecordAttendance,
    ViewAttendance,
    EnterMarks,
    ViewMarks,
    ViewTimetable,
    ManageDiscipline,
    ViewDiscipline,
];

const ACCOUNTANT_PERMISSIONS: &[Permission] = &[
    ViewStudents,
    ManageFees,
    ViewFees,
    RecordPayments,
    ViewTimetable,
];

const STAFF_PERMISSIONS: &[Permission] = &[ViewStudents, ViewAttendance, ViewTimetable];

impl SchoolRole {
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            SchoolRole::Admin => ALL_PERMISSIONS,
            SchoolRole::Principal => PRINCIPAL_PERMISSIONS,
            SchoolRole::Teacher => TEACHER_PERMISSIONS,
            SchoolRole::Accountant => ACCOUNTANT_PERMISSIONS,
            SchoolRole::Staff => STAFF_PERMISSIONS,
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_holds_everything() {
        for p in ALL_PERMISSIONS {
            assert!(SchoolRole::Admin.has_permission(*p), "{p:?}");
        }
    }

    #[test]
    fn test_teacher_cannot_touch_money() {
        assert!(SchoolRole::Teacher.has_permission(RecordAttendance));
        assert!(SchoolRole::Teacher.has_permission(EnterMarks));
        assert!(!SchoolRole::Teacher.has_permission(ManageFees));
        assert!(!SchoolRole::Teacher.has_permission(RecordPayments));
        assert!(!SchoolRole::Teacher.has_permission(ManageStaff));
    }

    #[test]
    fn test_accountant_is_finance_only() {
        assert!(SchoolRole::Accountant.has_permission(RecordPayments));
        assert!(SchoolRole::Accountant.has_permission(ManageFees));
        assert!(!SchoolRole::Accountant.has_permission(EnterMarks));
        assert!(!SchoolRole::Accountant.has_permission(RecordAttendance));
    }

    #[test]
    fn test_only_admin_manages_school() {
        for role in SchoolRole::ALL {
            assert_eq!(
                role.has_permission(ManageSchool),
                *role == SchoolRole::Admin,
                "{role}"
            );
        }
    }

    #[test]
    fn test_every_role_can_view_students() {
        for role in SchoolRole::ALL {
            assert!(role.has_permission(ViewStudents), "{role}");
        }
    }
}
