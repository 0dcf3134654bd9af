pub mod model;
pub mod notification;

pub use model::{ClientRef, JobConfig, PolicyRef};
pub use notification::{NotificationLevel, NotifyTarget};
