use serde::{Deserialize, Serialize};

use super::loader::{RawEntry, RawSample};
use crate::error::CatalogError;

/// Published masses are in grams; the catalog stores kilograms.
const GRAMS_PER_KILOGRAM: f64 = 1000.0;

// Attribute names of the engine-list schema
const CODE: &str = "code";
const TYPE: &str = "Type";
const DIAMETER: &str = "dia";
const LENGTH: &str = "len";
const INITIAL_WEIGHT: &str = "initWt";
const PROPELLANT_WEIGHT: &str = "propWt";
const DELAYS: &str = "delays";
const AVG_THRUST: &str = "avgThrust";
const PEAK_THRUST: &str = "peakThrust";
const BURN_TIME: &str = "burn-time";

/// A canonical catalog record for one motor variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motor {
    pub manufacturer: String,
    pub name: String,
    #[serde(rename = "tpe", alias = "type")]
    pub motor_type: String,
    /// Millimeters
    pub diameter: f64,
    /// Millimeters
    pub length: f64,
    /// Kilograms
    pub mass: f64,
    /// Kilograms
    pub prop_mass: f64,
    pub delays: Vec<f64>,
    pub avg_thrust: f64,
    pub peak_thrust: f64,
    pub burn_time: f64,
    /// (seconds, newtons) pairs
    pub data: Vec<[f64; 2]>,
}

/// The `delays` attribute, either absent or a comma-separated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayList<'a> {
    Absent,
    Listed(&'a str),
}

impl<'a> DelayList<'a> {
    /// Only an empty attribute counts as absent; whitespace is a (bad) list.
    pub fn from_attribute(raw: Option<&'a str>) -> Self {
        match raw {
            Some(value) if !value.is_empty() => DelayList::Listed(value),
            _ => DelayList::Absent,
        }
    }

    pub fn parse(self) -> Result<Vec<f64>, FieldError> {
        match self {
            DelayList::Absent => Ok(Vec::new()),
            DelayList::Listed(raw) => raw
                .split(',')
                .map(|token| parse_number(DELAYS, token))
                .collect(),
        }
    }
}

/// A field-level failure, before document context is attached.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    Missing { field: String },
    InvalidNumber { field: String, value: String },
    Implausible { reason: String },
}

impl FieldError {
    /// Attach the document and entry position the failure occurred in.
    pub fn at(self, document: &str, entry: usize) -> CatalogError {
        let document = document.to_string();
        match self {
            FieldError::Missing { field } => CatalogError::MissingField {
                document,
                entry,
                field,
            },
            FieldError::InvalidNumber { field, value } => CatalogError::InvalidNumericField {
                document,
                entry,
                field,
                value,
            },
            FieldError::Implausible { reason } => CatalogError::ImplausibleRecord {
                document,
                entry,
                reason,
            },
        }
    }
}

/// Converts raw entries into catalog records.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    strict: bool,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also reject records whose fields contradict each other
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn normalize(&self, manufacturer: &str, entry: &RawEntry) -> Result<Motor, FieldError> {
        let motor = Motor {
            manufacturer: manufacturer.to_string(),
            name: required_str(entry, CODE)?.to_string(),
            motor_type: required_str(entry, TYPE)?.to_string(),
            diameter: required_number(entry, DIAMETER)?,
            length: required_number(entry, LENGTH)?,
            mass: required_number(entry, INITIAL_WEIGHT)? / GRAMS_PER_KILOGRAM,
            prop_mass: required_number(entry, PROPELLANT_WEIGHT)? / GRAMS_PER_KILOGRAM,
            delays: DelayList::from_attribute(entry.get(DELAYS)).parse()?,
            avg_thrust: required_number(entry, AVG_THRUST)?,
            peak_thrust: required_number(entry, PEAK_THRUST)?,
            burn_time: required_number(entry, BURN_TIME)?,
            data: thrust_curve(&entry.samples)?,
        };

        if self.strict {
            check_plausible(&motor)?;
        }
        Ok(motor)
    }
}

fn required_str<'a>(entry: &'a RawEntry, field: &str) -> Result<&'a str, FieldError> {
    entry.get(field).ok_or_else(|| FieldError::Missing {
        field: field.to_string(),
    })
}

fn required_number(entry: &RawEntry, field: &str) -> Result<f64, FieldError> {
    match entry.get(field) {
        Some(raw) => parse_number(field, raw),
        None => Err(FieldError::InvalidNumber {
            field: field.to_string(),
            value: String::new(),
        }),
    }
}

/// Parse a finite float. NaN and infinities cannot be written to the catalog.
fn parse_number(field: &str, raw: &str) -> Result<f64, FieldError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FieldError::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

fn thrust_curve(samples: &[RawSample]) -> Result<Vec<[f64; 2]>, FieldError> {
    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let t = sample_value(i, "t", sample.t.as_deref())?;
            let f = sample_value(i, "f", sample.f.as_deref())?;
            Ok([t, f])
        })
        .collect()
}

fn sample_value(index: usize, attribute: &str, raw: Option<&str>) -> Result<f64, FieldError> {
    let field = format!("data[{}].{}", index, attribute);
    match raw {
        Some(raw) => parse_number(&field, raw),
        None => Err(FieldError::InvalidNumber {
            field,
            value: String::new(),
        }),
    }
}

fn check_plausible(motor: &Motor) -> Result<(), FieldError> {
    if motor.peak_thrust < motor.avg_thrust {
        return Err(FieldError::Implausible {
            reason: format!(
                "peak thrust {} N is below average thrust {} N",
                motor.peak_thrust, motor.avg_thrust
            ),
        });
    }
    if motor.prop_mass > motor.mass {
        return Err(FieldError::Implausible {
            reason: format!(
                "propellant mass {} kg exceeds total mass {} kg",
                motor.prop_mass, motor.mass
            ),
        });
    }
    if let Some(i) = motor.data.windows(2).position(|w| w[1][0] < w[0][0]) {
        return Err(FieldError::Implausible {
            reason: format!("thrust curve time decreases at sample {}", i + 1),
        });
    }
    Ok(())
}
