//! Time granularity for temporal expression values.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use common_error::{StrataError, StrataResult};

/// Granularity attached to a date or timestamp value.
///
/// A temporal value is *granular* iff it carries a timeframe. Granular
/// values compare against non-granular ones by truncating the non-granular
/// side to this unit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// Second granularity.
    Second,
    /// Minute granularity.
    Minute,
    /// Hour granularity.
    Hour,
    /// Day granularity.
    Day,
    /// Week granularity.
    Week,
    /// Month granularity.
    Month,
    /// Quarter granularity.
    Quarter,
    /// Year granularity.
    Year,
}

impl Timeframe {
    /// Get the lowercase name of this timeframe.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Get the SQL truncation unit keyword for this timeframe.
    pub const fn sql_unit(&self) -> &'static str {
        match self {
            Self::Second => "SECOND",
            Self::Minute => "MINUTE",
            Self::Hour => "HOUR",
            Self::Day => "DAY",
            Self::Week => "WEEK",
            Self::Month => "MONTH",
            Self::Quarter => "QUARTER",
            Self::Year => "YEAR",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Timeframe {
    type Err = StrataError;

    fn from_str(s: &str) -> StrataResult<Self> {
        match s {
            "second" => Ok(Self::Second),
            "minute" => Ok(Self::Minute),
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            _ => Err(StrataError::type_error(format!(
                "unknown timeframe '{s}'"
            ))),
        }
    }
}
