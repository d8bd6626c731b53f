//! Observation and visit records.
//!
//! An [`Observation`] is one cleaned, clustered and labelled geotagged post
//! from a user's history.  A [`Visit`] is one event in a (simulated or
//! observed) trajectory, ordered per user by `(day, timeslot)`.

use std::fmt;
use std::str::FromStr;

use crate::{GeoPoint, MvError, RegionId, UserId};

// ── VisitKind ─────────────────────────────────────────────────────────────────

/// Whether a visit went to a known region or to a freshly explored point.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VisitKind {
    /// Return to one of the user's clustered regions.
    Region,
    /// Exploration step to a location with no fixed region.
    Point,
}

impl fmt::Display for VisitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VisitKind::Region => "region",
            VisitKind::Point  => "point",
        })
    }
}

impl FromStr for VisitKind {
    type Err = MvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "region" => Ok(VisitKind::Region),
            "point"  => Ok(VisitKind::Point),
            other    => Err(MvError::Parse(format!("unknown visit kind {other:?}"))),
        }
    }
}

// ── Label ─────────────────────────────────────────────────────────────────────

/// Semantic label attached to an observation's region.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Label {
    Home,
    Work,
    #[default]
    Other,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Label::Home  => "home",
            Label::Work  => "work",
            Label::Other => "other",
        })
    }
}

impl FromStr for Label {
    type Err = MvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home"  => Ok(Label::Home),
            "work"  => Ok(Label::Work),
            "other" => Ok(Label::Other),
            other   => Err(MvError::Parse(format!("unknown label {other:?}"))),
        }
    }
}

// ── Observation ───────────────────────────────────────────────────────────────

/// One historical geotagged observation of a user.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    pub user:        UserId,
    pub tweet_id:    u64,
    /// Creation time, Unix seconds (UTC).
    pub created_at:  i64,
    pub location:    GeoPoint,
    /// Day of week, `0` = Sunday.
    pub weekday:     u8,
    pub hour_of_day: u8,
    pub region:      RegionId,
    pub label:       Label,
}

impl Observation {
    /// Monday through Friday.
    #[inline]
    pub fn is_weekday(&self) -> bool {
        (1..=5).contains(&self.weekday)
    }
}

// ── Visit ─────────────────────────────────────────────────────────────────────

/// One event of a trajectory.
///
/// For simulated trajectories `timeslot` 0 of every day is the user's home.
/// Observed visits carry their creation time in `created_at`, which enables
/// elapsed-time filtering of consecutive visits; simulated visits leave it
/// `None`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Visit {
    pub user:       UserId,
    pub day:        u32,
    pub timeslot:   u32,
    pub kind:       VisitKind,
    pub location:   GeoPoint,
    /// `RegionId::UNCLUSTERED` for unclustered exploration points.
    pub region:     RegionId,
    pub created_at: Option<i64>,
}

impl Visit {
    /// Chronological sort key within one user's trajectory.
    #[inline]
    pub fn order_key(&self) -> (UserId, u32, u32) {
        (self.user, self.day, self.timeslot)
    }
}
