//! Threshold classification of a household-day.
//!
//! Activity is judged against the per-record norms, regularity against fixed
//! correlation cut-offs, and the overall status is the worst of the two on a
//! shared severity scale.

use crate::domain::{ColorTag, DailyMetricRecord, Level};

pub const REGULARITY_LOW: f64 = 0.30;
pub const REGULARITY_NORMAL: f64 = 0.50;
pub const REGULARITY_HIGH: f64 = 0.70;

/// A level label that has no place on the severity scale.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("no severity rank for level '{label}'")]
pub struct LookupKeyError {
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Abnormal,
    Low,
    Active,
    High,
    Unknown,
}

impl ActivityLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Abnormal => "Abnormal",
            Self::Low => "Low",
            Self::Active => "Active",
            Self::High => "High",
            Self::Unknown => "Unknown",
        }
    }

    pub fn color(self) -> ColorTag {
        match self {
            Self::Abnormal => ColorTag::Red,
            Self::Low => ColorTag::Yellow,
            Self::Active => ColorTag::Blue,
            Self::High => ColorTag::Green,
            Self::Unknown => ColorTag::Gray,
        }
    }

    pub fn level(self) -> Level {
        Level::new(self.label(), self.color())
    }

    /// Default activity axis mapping onto the severity scale.
    pub fn rank(self) -> Result<SeverityRank, LookupKeyError> {
        match self {
            Self::Abnormal => Ok(SeverityRank::Abnormal),
            Self::Low => Ok(SeverityRank::Low),
            Self::Active => Ok(SeverityRank::Active),
            Self::High => Ok(SeverityRank::High),
            Self::Unknown => Err(LookupKeyError { label: self.label() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegularityLevel {
    Abnormal,
    Low,
    Normal,
    High,
    Unknown,
}

impl RegularityLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Abnormal => "Abnormal",
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
            Self::Unknown => "Unknown",
        }
    }

    pub fn color(self) -> ColorTag {
        match self {
            Self::Abnormal => ColorTag::Red,
            Self::Low => ColorTag::Yellow,
            Self::Normal => ColorTag::Blue,
            Self::High => ColorTag::Green,
            Self::Unknown => ColorTag::Gray,
        }
    }

    pub fn level(self) -> Level {
        Level::new(self.label(), self.color())
    }

    /// Default regularity axis mapping onto the severity scale.
    pub fn rank(self) -> Result<SeverityRank, LookupKeyError> {
        match self {
            Self::Abnormal => Ok(SeverityRank::Abnormal),
            Self::Low => Ok(SeverityRank::Low),
            Self::Normal => Ok(SeverityRank::Normal),
            Self::High => Ok(SeverityRank::High),
            Self::Unknown => Err(LookupKeyError { label: self.label() }),
        }
    }
}

/// Shared severity scale; lower is worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SeverityRank {
    Abnormal = 1,
    Low = 2,
    Normal = 3,
    Active = 4,
    High = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Attention,
    /// Worst axis is `Low`.
    NormalLow,
    /// Worst axis is `Normal`.
    Normal,
    Active,
    High,
}

impl Status {
    pub fn from_rank(rank: SeverityRank) -> Self {
        match rank {
            SeverityRank::Abnormal => Self::Attention,
            SeverityRank::Low => Self::NormalLow,
            SeverityRank::Normal => Self::Normal,
            SeverityRank::Active => Self::Active,
            SeverityRank::High => Self::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Attention => "Attention",
            Self::NormalLow | Self::Normal => "Normal",
            Self::Active => "Active",
            Self::High => "High",
        }
    }

    pub fn color(self) -> ColorTag {
        match self {
            Self::Attention => ColorTag::Red,
            Self::NormalLow => ColorTag::Yellow,
            Self::Normal | Self::Active => ColorTag::Blue,
            Self::High => ColorTag::Green,
        }
    }

    pub fn level(self) -> Level {
        Level::new(self.label(), self.color())
    }
}

/// Activity against the record's own norms. Branches are tried in order and
/// every bound is closed on the upper side, so out-of-order norms resolve to
/// whichever branch matches first. NaN falls through to `Unknown`.
pub fn activity_level(active_score: f64, low_norm: f64, norm_score: f64, high_norm: f64) -> ActivityLevel {
    if active_score <= low_norm {
        ActivityLevel::Abnormal
    } else if low_norm < active_score && active_score <= norm_score {
        ActivityLevel::Low
    } else if norm_score < active_score && active_score <= high_norm {
        ActivityLevel::Active
    } else if active_score > high_norm {
        ActivityLevel::High
    } else {
        ActivityLevel::Unknown
    }
}

/// Regularity against fixed correlation cut-offs.
pub fn regularity_level(corr_coef: f64) -> RegularityLevel {
    if corr_coef < REGULARITY_LOW {
        RegularityLevel::Abnormal
    } else if (REGULARITY_LOW..REGULARITY_NORMAL).contains(&corr_coef) {
        RegularityLevel::Low
    } else if (REGULARITY_NORMAL..REGULARITY_HIGH).contains(&corr_coef) {
        RegularityLevel::Normal
    } else if corr_coef >= REGULARITY_HIGH {
        RegularityLevel::High
    } else {
        RegularityLevel::Unknown
    }
}

/// Worst-of-both status, with an explicit mapping per axis.
pub fn resolve_status_with<A, R, FA, FR>(
    activity: A,
    regularity: R,
    rank_activity: FA,
    rank_regularity: FR,
) -> Result<Status, LookupKeyError>
where
    FA: Fn(A) -> Result<SeverityRank, LookupKeyError>,
    FR: Fn(R) -> Result<SeverityRank, LookupKeyError>,
{
    let lowest = rank_activity(activity)?.min(rank_regularity(regularity)?);
    Ok(Status::from_rank(lowest))
}

pub fn resolve_status(activity: ActivityLevel, regularity: RegularityLevel) -> Result<Status, LookupKeyError> {
    resolve_status_with(activity, regularity, ActivityLevel::rank, RegularityLevel::rank)
}

/// All three outcomes for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub activity: ActivityLevel,
    pub regularity: RegularityLevel,
    pub status: Status,
}

pub fn classify(record: &DailyMetricRecord) -> Result<Classification, LookupKeyError> {
    let activity = activity_level(
        record.active_score,
        record.low_norm,
        record.norm_active_score,
        record.high_norm,
    );
    let regularity = regularity_level(record.correlation_coefficient);
    let status = resolve_status(activity, regularity)?;

    Ok(Classification {
        activity,
        regularity,
        status,
    })
}
