mod delivery;
mod scheduler;

pub use delivery::{Notification, NotificationChannel, NotificationPermission};
pub use scheduler::{DeliveryGuarantee, NotificationScheduler};
