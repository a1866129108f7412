use serde::{Deserialize, Serialize};

/// Default office start when neither the profile nor the settings give one.
pub const DEFAULT_OFFICE_START: &str = "09:00";
/// Default office end when neither the profile nor the settings give one.
pub const DEFAULT_OFFICE_END: &str = "18:00";

/// The part of a counselor record the booking engine reads.
///
/// Owned by the counselor service; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounselorProfile {
    #[serde(alias = "_id", alias = "counselorId")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "image", alias = "profileImage")]
    pub image_url: Option<String>,
    /// Weekday names such as "Monday" or "mon". Empty means every day.
    #[serde(default)]
    pub working_days: Vec<String>,
    #[serde(default)]
    pub office_start_time: Option<String>,
    #[serde(default)]
    pub office_end_time: Option<String>,
}

impl CounselorProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            image_url: None,
            working_days: Vec::new(),
            office_start_time: None,
            office_end_time: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_working_days<I, S>(mut self, days: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.working_days = days.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_office_hours(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.office_start_time = Some(start.into());
        self.office_end_time = Some(end.into());
        self
    }
}
