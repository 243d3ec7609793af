//! Section view models.
//!
//! Pure shaping of fetched rows into what each page section shows. Nothing
//! here renders markup or touches the network, except the access gate which
//! checks a live list.

pub mod access;
pub mod categories;
pub mod dialogs;
pub mod imagery;
pub mod options;
pub mod reviews;
pub mod services;
pub mod team;

use serde::Serialize;

pub use access::{AccessError, AccessGate};
pub use categories::HomeCategory;
pub use dialogs::{DialogSchedule, ScheduledDialog};
pub use imagery::{hero_images, logo_images, portfolio_images};
pub use options::{FilterMode, RenderOptions, SCROLL_OFFSET};
pub use reviews::ReviewCard;
pub use services::ServiceCatalog;
pub use team::ProfileCard;

/// A section's content, or the notice shown in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    Ready(T),
    Unavailable { message: &'static str },
}

impl<T> Section<T> {
    pub fn unavailable(message: &'static str) -> Self {
        Section::Unavailable { message }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready(_))
    }
}
