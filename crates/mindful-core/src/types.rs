use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// 12-hour clock format used for reminder times, e.g. `08:00 AM`.
pub const REMINDER_TIME_FORMAT: &str = "%I:%M %p";

// =============================================================================
// Navigation
// =============================================================================

/// The page currently shown to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// The AI diary.
    #[default]
    Home,
    /// Medicine reminders.
    Reminders,
    /// Emergency contacts.
    Contacts,
    /// The medical profile form.
    MedicalDetails,
}

impl Page {
    /// Every page, in sidebar order.
    pub const ALL: [Page; 4] = [
        Page::Home,
        Page::Reminders,
        Page::Contacts,
        Page::MedicalDetails,
    ];

    /// Human-readable title for navigation chrome.
    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home / AI Diary",
            Page::Reminders => "Medicine Reminders",
            Page::Contacts => "Emergency Contacts",
            Page::MedicalDetails => "My Medical Details",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Home => write!(f, "home"),
            Page::Reminders => write!(f, "reminders"),
            Page::Contacts => write!(f, "contacts"),
            Page::MedicalDetails => write!(f, "medical_details"),
        }
    }
}

// =============================================================================
// Records
// =============================================================================

/// A medicine reminder. Immutable once added to a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Medicine name. Required.
    pub medicine: String,
    /// Free-form dosage, e.g. "1 pill".
    pub dosage: String,
    /// Time of day on a 12-hour clock, e.g. "08:00 AM".
    pub time: String,
}

impl Reminder {
    /// Build a reminder from a time of day, formatting it on a 12-hour clock.
    pub fn at(medicine: impl Into<String>, dosage: impl Into<String>, time: NaiveTime) -> Self {
        Self {
            medicine: medicine.into(),
            dosage: dosage.into(),
            time: time.format(REMINDER_TIME_FORMAT).to_string(),
        }
    }

    /// Build a reminder from an already formatted time string.
    pub fn new(
        medicine: impl Into<String>,
        dosage: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            medicine: medicine.into(),
            dosage: dosage.into(),
            time: time.into(),
        }
    }
}

/// An emergency contact. Immutable once added to a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Display name. Required.
    pub name: String,
    /// Phone number as typed by the user.
    pub number: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
        }
    }

    /// `tel:` link for a "Call Now" button.
    pub fn call_url(&self) -> String {
        format!("tel:{}", self.number)
    }
}

/// The user's medical profile. All fields default to empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalProfile {
    pub doctor_name: String,
    pub doctor_contact: String,
    pub blood_type: String,
    pub allergies: String,
    pub conditions: String,
}

/// A diary entry with its computed polarity. Never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub text: String,
    /// Sentiment polarity in [-1.0, 1.0].
    pub polarity: f64,
}
