//! The baby profile.

use std::io::Write;

use anyhow::{Result, bail};
use bt_core::profile::Gender;
use bt_core::{BabyProfile, HeightUnit, StateStore, Tracker, VolumeUnit, WeightUnit};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use clap::builder::BoolishValueParser;

use super::util::Clock;

#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// Show the profile.
    Show {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Create or change the profile. Unset fields keep their value.
    Set(ProfileFields),
}

#[derive(Debug, Default, Args)]
pub struct ProfileFields {
    #[arg(long)]
    pub name: Option<String>,

    /// YYYY-MM-DD.
    #[arg(long)]
    pub birth_date: Option<NaiveDate>,

    /// boy, girl or neutral.
    #[arg(long)]
    pub gender: Option<Gender>,

    /// ml or oz.
    #[arg(long)]
    pub volume_unit: Option<VolumeUnit>,

    /// kg or lb.
    #[arg(long)]
    pub weight_unit: Option<WeightUnit>,

    /// cm or in.
    #[arg(long)]
    pub height_unit: Option<HeightUnit>,

    /// Turn feeding reminders on or off.
    #[arg(long, value_parser = BoolishValueParser::new())]
    pub reminders: Option<bool>,

    /// Minutes between feeds before a reminder.
    #[arg(long)]
    pub interval: Option<u32>,

    /// Comma-separated personality tags.
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,
}

pub fn run<W: Write, S: StateStore>(
    writer: &mut W,
    action: &ProfileAction,
    tracker: &mut Tracker<S>,
    clock: &Clock,
) -> Result<()> {
    match action {
        ProfileAction::Show { json } => match tracker.profile() {
            Some(profile) if *json => {
                writeln!(writer, "{}", serde_json::to_string_pretty(profile)?)?;
            }
            Some(profile) => show(writer, profile, clock)?,
            None => writeln!(
                writer,
                "No profile yet. Create one with `bt profile set --name <NAME>`."
            )?,
        },
        ProfileAction::Set(ProfileFields {
            name,
            birth_date,
            gender,
            volume_unit,
            weight_unit,
            height_unit,
            reminders,
            interval,
            tags,
        }) => {
            let mut profile = match (tracker.profile().cloned(), name) {
                (Some(profile), _) => profile,
                (None, Some(name)) => BabyProfile::new(name.as_str()),
                (None, None) => bail!("a new profile needs --name"),
            };
            if let Some(name) = name {
                if name.trim().is_empty() {
                    bail!("name cannot be empty");
                }
                profile.name = name.trim().to_string();
            }
            if birth_date.is_some() {
                profile.birth_date = *birth_date;
            }
            if let Some(gender) = gender {
                profile.gender = *gender;
            }
            if let Some(unit) = volume_unit {
                profile.volume_unit = *unit;
            }
            if let Some(unit) = weight_unit {
                profile.weight_unit = *unit;
            }
            if let Some(unit) = height_unit {
                profile.height_unit = *unit;
            }
            if let Some(enabled) = reminders {
                profile.reminders_enabled = *enabled;
            }
            if let Some(minutes) = interval {
                profile.reminder_interval_minutes = *minutes;
            }
            if let Some(tags) = tags {
                profile.personality_tags = tags
                    .iter()
                    .map(|tag| tag.trim().to_string())
                    .filter(|tag| !tag.is_empty())
                    .collect();
            }

            tracker.set_profile(profile);
            if let Some(profile) = tracker.profile() {
                show(writer, profile, clock)?;
            }
        }
    }
    Ok(())
}

fn show<W: Write>(writer: &mut W, profile: &BabyProfile, clock: &Clock) -> Result<()> {
    match profile.age_label(clock.today()) {
        Some(age) => writeln!(writer, "{} ({}), {age}", profile.name, profile.gender)?,
        None => writeln!(writer, "{} ({})", profile.name, profile.gender)?,
    }
    if let Some(birth) = profile.birth_date {
        writeln!(writer, "Born:      {}", birth.format("%Y-%m-%d"))?;
    }
    writeln!(
        writer,
        "Units:     {}, {}, {}",
        profile.volume_unit, profile.weight_unit, profile.height_unit
    )?;
    if profile.reminders_enabled {
        writeln!(
            writer,
            "Reminders: every {} min",
            profile.reminder_interval_minutes
        )?;
    } else {
        writeln!(writer, "Reminders: off")?;
    }
    if !profile.personality_tags.is_empty() {
        writeln!(writer, "Tags:      {}", profile.personality_tags.join(", "))?;
    }
    Ok(())
}
