pub mod booking;
pub mod overview;

pub use booking::AppointmentBookingService;
pub use overview::AppointmentOverviewService;
