pub mod academics;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod discipline;
pub mod exams;
pub mod fees;
pub mod frontend;
pub mod notifications;
pub mod schools;
pub mod students;
pub mod system;
pub mod timetable;

pub use academics::configure_academic_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use dashboard::configure_dashboard_routes;
pub use discipline::configure_discipline_routes;
pub use exams::configure_exam_routes;
pub use fees::configure_fee_routes;
pub use frontend::configure_frontend_routes;
pub use notifications::configure_notification_routes;
pub use schools::configure_school_routes;
pub use students::configure_student_routes;
pub use system::configure_system_routes;
pub use timetable::configure_timetable_routes;
