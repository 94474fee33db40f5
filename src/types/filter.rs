//! Search filters for the sensor (traffic registration point) query.
//!
//! Every key is optional. A key that is not set is left out of the query entirely and the
//! service falls back to matching everything along that dimension.

use bon::Builder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown {kind} '{value}'")]
pub struct ParseFilterError {
    kind: &'static str,
    value: String,
}

/// Road category a sensor is located on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoadCategory {
    /// `E`: European route.
    European,
    /// `R`: National road.
    National,
    /// `F`: County road.
    County,
    /// `K`: Municipal road.
    Municipal,
    /// `P`: Private road.
    Private,
}

impl RoadCategory {
    pub fn code(&self) -> &'static str {
        match self {
            RoadCategory::European => "E",
            RoadCategory::National => "R",
            RoadCategory::County => "F",
            RoadCategory::Municipal => "K",
            RoadCategory::Private => "P",
        }
    }
}

impl fmt::Display for RoadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for RoadCategory {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "E" => Ok(RoadCategory::European),
            "R" => Ok(RoadCategory::National),
            "F" => Ok(RoadCategory::County),
            "K" => Ok(RoadCategory::Municipal),
            "P" => Ok(RoadCategory::Private),
            _ => Err(ParseFilterError {
                kind: "road category",
                value: s.to_string(),
            }),
        }
    }
}

/// What a sensor counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrafficType {
    Vehicle,
    Bicycle,
}

impl TrafficType {
    pub fn code(&self) -> &'static str {
        match self {
            TrafficType::Vehicle => "VEHICLE",
            TrafficType::Bicycle => "BICYCLE",
        }
    }
}

impl fmt::Display for TrafficType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for TrafficType {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VEHICLE" => Ok(TrafficType::Vehicle),
            "BICYCLE" => Ok(TrafficType::Bicycle),
            _ => Err(ParseFilterError {
                kind: "traffic type",
                value: s.to_string(),
            }),
        }
    }
}

/// Whether a sensor counts around the clock or only during campaigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationFrequency {
    Continuous,
    Periodic,
}

impl RegistrationFrequency {
    pub fn code(&self) -> &'static str {
        match self {
            RegistrationFrequency::Continuous => "CONTINUOUS",
            RegistrationFrequency::Periodic => "PERIODIC",
        }
    }
}

impl fmt::Display for RegistrationFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for RegistrationFrequency {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONTINUOUS" => Ok(RegistrationFrequency::Continuous),
            "PERIODIC" => Ok(RegistrationFrequency::Periodic),
            _ => Err(ParseFilterError {
                kind: "registration frequency",
                value: s.to_string(),
            }),
        }
    }
}

/// Filters applied to the sensor search.
///
/// # Examples
///
/// ```
/// use trafikkdata::{RoadCategory, SearchFilter, TrafficType};
/// use std::collections::BTreeSet;
///
/// let filter = SearchFilter::builder()
///     .road_categories(BTreeSet::from([RoadCategory::European]))
///     .traffic_type(TrafficType::Vehicle)
///     .is_operational(true)
///     .build();
/// assert!(filter.county_numbers.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Builder)]
pub struct SearchFilter {
    /// `roadCategoryIds`: only sensors on these road categories.
    pub road_categories: Option<BTreeSet<RoadCategory>>,
    /// `countyNumbers`: only sensors in these counties.
    ///
    /// Codes at the time of writing: 3 Oslo, 11 Rogaland, 15 Møre og Romsdal,
    /// 18 Nordland, 30 Viken, 34 Innlandet, 38 Vestfold og Telemark, 42 Agder,
    /// 46 Vestland, 50 Trøndelag, 54 Troms og Finnmark.
    pub county_numbers: Option<BTreeSet<u32>>,
    /// `isOperational`: only sensors that are (or are not) currently operational.
    pub is_operational: Option<bool>,
    /// `trafficType`: vehicle or bicycle counters.
    pub traffic_type: Option<TrafficType>,
    /// `registrationFrequency`: continuous or periodic counters.
    pub registration_frequency: Option<RegistrationFrequency>,
}

impl SearchFilter {
    /// A filter that matches every sensor.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
