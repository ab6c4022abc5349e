// SPDX-License-Identifier: MPL-2.0
//! Toast notifications for outcomes that need no dedicated banner, such as a
//! missing scanner bridge or a finished upload.
//!
//! ```ignore
//! manager.push(Notification::success("notification-upload-success"));
//! let overlay = Toast::view_overlay(&manager, &i18n).map(Message::Notification);
//! ```

mod manager;
mod notification;
mod toast;

pub use manager::{Manager, Message as NotificationMessage};
pub use notification::{Notification, Severity};
pub use toast::Toast;
