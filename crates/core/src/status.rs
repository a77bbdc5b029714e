//! Well-known status and kind constants stored as TEXT columns.
//!
//! Kept as string constants (matching the wire format) rather than database
//! enums so the same values flow unchanged through JSON responses, the client
//! crate, and SQL filters.

/// Task waiting to be accepted by an employee.
pub const TASK_STATUS_OPEN: &str = "open";
/// Task accepted by exactly one employee.
pub const TASK_STATUS_ASSIGNED: &str = "assigned";
/// Assignee has submitted evidence, pending review.
pub const TASK_STATUS_SUBMITTED: &str = "submitted";
/// Submission approved; points credited.
pub const TASK_STATUS_COMPLETED: &str = "completed";
/// Task withdrawn by an administrator.
pub const TASK_STATUS_CANCELLED: &str = "cancelled";

pub const REVIEW_STATUS_PENDING: &str = "pending";
pub const REVIEW_STATUS_APPROVED: &str = "approved";
pub const REVIEW_STATUS_REJECTED: &str = "rejected";

/// Points credited for an approved submission. Only `earned` records count
/// toward monthly distribution totals.
pub const POINT_KIND_EARNED: &str = "earned";
pub const POINT_KIND_BONUS: &str = "bonus";
pub const POINT_KIND_DEDUCTION: &str = "deduction";

/// Notification emitted when a submission enters review.
pub const NOTIFICATION_KIND_SUBMISSION_PENDING: &str = "submission_pending";
