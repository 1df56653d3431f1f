//! Domain services for the reservation backend.
//!
//! Services contain business logic that operates on domain models.

pub mod lifecycle;
pub mod notification;

pub use lifecycle::{
    plan_transition, LifecycleError, ReservationAction, TableStatusChange, TransitionPlan,
};

pub use notification::{
    ConfirmationNotice, GuestNotice, GuestNotifier, MockGuestNotifier, NotificationReport,
    NotificationResult, NotificationStatus, RejectionNotice,
};
