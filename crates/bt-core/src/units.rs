//! Display unit conversions.
//!
//! Everything is stored metric (mL, kg, cm); these helpers convert at the edges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// Millilitres in one US fluid ounce.
pub const ML_PER_FL_OZ: f64 = 29.5735;
/// Pounds in one kilogram.
pub const LB_PER_KG: f64 = 2.20462;
/// Centimetres in one inch.
pub const CM_PER_IN: f64 = 2.54;

#[must_use]
pub fn ml_to_oz(ml: f64) -> f64 {
    ml / ML_PER_FL_OZ
}

#[must_use]
pub fn oz_to_ml(oz: f64) -> f64 {
    oz * ML_PER_FL_OZ
}

#[must_use]
pub fn kg_to_lb(kg: f64) -> f64 {
    kg * LB_PER_KG
}

#[must_use]
pub fn lb_to_kg(lb: f64) -> f64 {
    lb / LB_PER_KG
}

#[must_use]
pub fn cm_to_in(cm: f64) -> f64 {
    cm / CM_PER_IN
}

#[must_use]
pub fn in_to_cm(inches: f64) -> f64 {
    inches * CM_PER_IN
}

/// Volume display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VolumeUnit {
    #[default]
    #[serde(rename = "ML")]
    Ml,
    #[serde(rename = "OZ")]
    Oz,
}

impl VolumeUnit {
    /// Converts a stored mL value into this unit.
    #[must_use]
    pub fn from_ml(self, ml: f64) -> f64 {
        match self {
            Self::Ml => ml,
            Self::Oz => ml_to_oz(ml),
        }
    }

    /// Converts a value in this unit into mL.
    #[must_use]
    pub fn to_ml(self, value: f64) -> f64 {
        match self {
            Self::Ml => value,
            Self::Oz => oz_to_ml(value),
        }
    }

    /// Renders a stored mL value: whole millilitres, or ounces to one decimal.
    #[must_use]
    pub fn format(self, ml: f64) -> String {
        match self {
            Self::Ml => format!("{} ml", ml.round()),
            Self::Oz => format!("{:.1} oz", ml_to_oz(ml)),
        }
    }
}

/// Weight display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "KG")]
    Kg,
    #[serde(rename = "LB")]
    Lb,
}

impl WeightUnit {
    #[must_use]
    pub fn from_kg(self, kg: f64) -> f64 {
        match self {
            Self::Kg => kg,
            Self::Lb => kg_to_lb(kg),
        }
    }

    #[must_use]
    pub fn to_kg(self, value: f64) -> f64 {
        match self {
            Self::Kg => value,
            Self::Lb => lb_to_kg(value),
        }
    }

    #[must_use]
    pub fn format(self, kg: f64) -> String {
        match self {
            Self::Kg => format!("{kg} kg"),
            Self::Lb => format!("{:.2} lb", kg_to_lb(kg)),
        }
    }
}

/// Height display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeightUnit {
    #[default]
    #[serde(rename = "CM")]
    Cm,
    #[serde(rename = "IN")]
    In,
}

impl HeightUnit {
    #[must_use]
    pub fn from_cm(self, cm: f64) -> f64 {
        match self {
            Self::Cm => cm,
            Self::In => cm_to_in(cm),
        }
    }

    #[must_use]
    pub fn to_cm(self, value: f64) -> f64 {
        match self {
            Self::Cm => value,
            Self::In => in_to_cm(value),
        }
    }

    #[must_use]
    pub fn format(self, cm: f64) -> String {
        match self {
            Self::Cm => format!("{cm} cm"),
            Self::In => format!("{:.1} in", cm_to_in(cm)),
        }
    }
}

macro_rules! unit_strings {
    ($ty:ident, $field:literal, $( $variant:ident => $text:literal ),+ $(,)?) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( Self::$variant => f.write_str($text), )+
                }
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($text) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(ValidationError::InvalidValue {
                    field: $field,
                    value: s.to_string(),
                })
            }
        }
    };
}

unit_strings!(VolumeUnit, "volume unit", Ml => "ml", Oz => "oz");
unit_strings!(WeightUnit, "weight unit", Kg => "kg", Lb => "lb");
unit_strings!(HeightUnit, "height unit", Cm => "cm", In => "in");
