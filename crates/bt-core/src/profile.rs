//! Baby profile and display preferences.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::ValidationError;
use crate::units::{HeightUnit, VolumeUnit, WeightUnit};

/// Reminder interval used when none is stored.
pub const DEFAULT_REMINDER_INTERVAL_MINUTES: u32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Boy,
    Girl,
    #[default]
    Neutral,
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "boy" => Ok(Self::Boy),
            "girl" => Ok(Self::Girl),
            "neutral" => Ok(Self::Neutral),
            _ => Err(ValidationError::InvalidValue {
                field: "gender",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Boy => "boy",
            Self::Girl => "girl",
            Self::Neutral => "neutral",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    Rose,
    Blue,
    Green,
    Yellow,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sleepy,
    Curious,
    #[default]
    Calm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarConfig {
    pub color_theme: ColorTheme,
    pub mood: Mood,
}

/// Who the tracker is for, and how values are displayed.
///
/// Every field except `name` has a default, so partially stored profiles
/// load cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BabyProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub volume_unit: VolumeUnit,
    #[serde(default)]
    pub weight_unit: WeightUnit,
    #[serde(default)]
    pub height_unit: HeightUnit,
    #[serde(default)]
    pub reminders_enabled: bool,
    #[serde(default = "default_interval")]
    pub reminder_interval_minutes: u32,
    #[serde(default)]
    pub avatar_config: AvatarConfig,
    #[serde(default)]
    pub personality_tags: Vec<String>,
}

const fn default_interval() -> u32 {
    DEFAULT_REMINDER_INTERVAL_MINUTES
}

impl BabyProfile {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            birth_date: None,
            gender: Gender::default(),
            volume_unit: VolumeUnit::default(),
            weight_unit: WeightUnit::default(),
            height_unit: HeightUnit::default(),
            reminders_enabled: false,
            reminder_interval_minutes: DEFAULT_REMINDER_INTERVAL_MINUTES,
            avatar_config: AvatarConfig::default(),
            personality_tags: Vec::new(),
        }
    }

    /// Fills defaults serde can't express: a stored zero interval counts as unset.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        if self.reminder_interval_minutes == 0 {
            self.reminder_interval_minutes = DEFAULT_REMINDER_INTERVAL_MINUTES;
        }
        self
    }

    /// Age label relative to `today`, or `None` without a birth date.
    #[must_use]
    pub fn age_label(&self, today: NaiveDate) -> Option<String> {
        self.birth_date.map(|birth| age_label(birth, today))
    }
}

/// Formats an age as days, weeks, months+weeks, or years.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    reason = "day counts are small"
)]
pub fn age_label(birth: NaiveDate, today: NaiveDate) -> String {
    let days = (today - birth).num_days().abs();
    if days < 7 {
        return format!("{days} days");
    }
    if days < 30 {
        return format!("{} weeks", days / 7);
    }
    if days < 365 {
        let days = days as f64;
        let months = (days / 30.44).floor() as i64;
        let weeks = ((days % 30.44) / 7.0).floor() as i64;
        return if weeks > 0 {
            format!("{months}m {weeks}w")
        } else {
            format!("{months}m")
        };
    }
    format!("{} years", days / 365)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_fields_are_defaulted_on_load() {
        let profile: BabyProfile = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(profile.volume_unit, VolumeUnit::Ml);
        assert_eq!(profile.weight_unit, WeightUnit::Kg);
        assert_eq!(profile.height_unit, HeightUnit::Cm);
        assert!(!profile.reminders_enabled);
        assert_eq!(profile.reminder_interval_minutes, 180);
        assert_eq!(profile.avatar_config.color_theme, ColorTheme::Neutral);
        assert_eq!(profile.avatar_config.mood, Mood::Calm);
        assert!(profile.personality_tags.is_empty());
    }

    #[test]
    fn zero_interval_is_treated_as_unset() {
        let profile: BabyProfile =
            serde_json::from_str(r#"{"name":"Ada","reminderIntervalMinutes":0}"#).unwrap();
        assert_eq!(profile.with_defaults().reminder_interval_minutes, 180);
    }

    #[test]
    fn stored_values_survive() {
        let json = r#"{"name":"Ada","birthDate":"2025-03-01","gender":"GIRL","volumeUnit":"OZ","remindersEnabled":true,"reminderIntervalMinutes":150}"#;
        let profile: BabyProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.birth_date, Some(date(2025, 3, 1)));
        assert_eq!(profile.gender, Gender::Girl);
        assert_eq!(profile.volume_unit, VolumeUnit::Oz);
        assert!(profile.reminders_enabled);
        assert_eq!(profile.reminder_interval_minutes, 150);
    }

    #[test]
    fn age_label_scales() {
        let birth = date(2025, 1, 1);
        assert_eq!(age_label(birth, date(2025, 1, 4)), "3 days");
        assert_eq!(age_label(birth, date(2025, 1, 22)), "3 weeks");
        assert_eq!(age_label(birth, date(2025, 3, 2)), "1m 4w");
        assert_eq!(age_label(birth, date(2025, 4, 3)), "3m");
        assert_eq!(age_label(birth, date(2027, 6, 1)), "2 years");
    }
}
