// Age buckets: whole-day age from a creation instant, then one of eight ordinal groups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal age bucket. Upper bounds are inclusive; `Over730Days` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "7 days")]
    Days7,
    #[serde(rename = "15 days")]
    Days15,
    #[serde(rename = "30 days")]
    Days30,
    #[serde(rename = "90 days")]
    Days90,
    #[serde(rename = "180 days")]
    Days180,
    #[serde(rename = "365 days")]
    Days365,
    #[serde(rename = "730 days")]
    Days730,
    #[serde(rename = "> 730 days")]
    Over730Days,
}

impl AgeGroup {
    /// All buckets, youngest first.
    pub const ALL: [AgeGroup; 8] = [
        AgeGroup::Days7,
        AgeGroup::Days15,
        AgeGroup::Days30,
        AgeGroup::Days90,
        AgeGroup::Days180,
        AgeGroup::Days365,
        AgeGroup::Days730,
        AgeGroup::Over730Days,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Days7 => "7 days",
            AgeGroup::Days15 => "15 days",
            AgeGroup::Days30 => "30 days",
            AgeGroup::Days90 => "90 days",
            AgeGroup::Days180 => "180 days",
            AgeGroup::Days365 => "365 days",
            AgeGroup::Days730 => "730 days",
            AgeGroup::Over730Days => "> 730 days",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps an age in whole days to its bucket. Total over u32.
pub fn classify(age_days: u32) -> AgeGroup {
    match age_days {
        0..=7 => AgeGroup::Days7,
        8..=15 => AgeGroup::Days15,
        16..=30 => AgeGroup::Days30,
        31..=90 => AgeGroup::Days90,
        91..=180 => AgeGroup::Days180,
        181..=365 => AgeGroup::Days365,
        366..=730 => AgeGroup::Days730,
        _ => AgeGroup::Over730Days,
    }
}

/// Whole days elapsed from `created` to `now`, truncating partial days.
/// Instants after `now` (clock skew) count as zero.
pub fn age_in_days(created: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = (now - created).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}
