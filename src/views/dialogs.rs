//! Timed announcement dialogs.
//!
//! # Schedule
//! ```text
//! dialog i (not dismissed this session):
//!     wait   = timeInSeconds (default 5s)
//!     offset = 30 + 20·i px from bottom and left
//!     z      = 2000 + i
//! ```

use std::collections::HashSet;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::data::Row;

pub const DEFAULT_WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledDialog {
    pub id: String,
    pub title: String,
    pub description: String,
    pub action: String,
    pub cta: String,
    #[serde(with = "millis")]
    pub wait: Duration,
    pub dismiss_key: String,
    pub offset_px: u32,
    pub z_index: u32,
}

/// Dialogs due to be shown this session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DialogSchedule {
    pub dialogs: Vec<ScheduledDialog>,
}

impl DialogSchedule {
    /// Plan every dialog whose dismissal key is not in `dismissed`.
    pub fn plan(rows: &[Row], dismissed: &HashSet<String>) -> Self {
        let dialogs = rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| {
                let title = row.field("title");
                let dismiss_key = dismiss_key(title);
                if dismissed.contains(&dismiss_key) {
                    return None;
                }
                let index = index as u32;
                Some(ScheduledDialog {
                    id: format!("dialog-{}", index),
                    title: title.to_string(),
                    description: row.field("description").to_string(),
                    action: row.field("action").to_string(),
                    cta: row.field("cta").to_string(),
                    wait: wait(row.field("timeInSeconds")),
                    dismiss_key,
                    offset_px: 30 + index * 20,
                    z_index: 2000 + index,
                })
            })
            .collect();

        Self { dialogs }
    }

    /// Delay before `dialog` appears.
    pub fn wait(&self, dialog: &ScheduledDialog) -> Duration {
        dialog.wait
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }
}

/// Session key recording that a dialog was closed.
///
/// Titles within Latin-1 are encoded one byte per character, matching the
/// browser's `btoa`. Titles with wider characters fall back to UTF-8 bytes.
pub fn dismiss_key(title: &str) -> String {
    let latin1: Option<Vec<u8>> = title.chars().map(|c| u8::try_from(c).ok()).collect();
    let encoded = STANDARD.encode(latin1.as_deref().unwrap_or(title.as_bytes()));
    format!("dismissed_dialog_{}", &encoded[..encoded.len().min(10)])
}

/// Leading integer of `timeInSeconds`; zero or unparseable means the default.
fn wait(raw: &str) -> Duration {
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<u64>() {
        Ok(0) | Err(_) => DEFAULT_WAIT,
        Ok(secs) => Duration::from_secs(secs),
    }
}

mod millis {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}
