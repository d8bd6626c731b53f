//! Flat row types shared by every backend.

use mv_core::{GeoPoint, RegionId, UserId, Visit, VisitKind};
use serde::{Deserialize, Serialize};

/// One visit as stored on disk.
///
/// Column names follow the visit table layout:
/// `userid, day, timeslot, kind, latitude, longitude, region`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRow {
    pub userid:    u64,
    pub day:       u32,
    pub timeslot:  u32,
    /// `"region"` or `"point"`.
    pub kind:      String,
    pub latitude:  f64,
    pub longitude: f64,
    /// `-1` for unclustered exploration points.
    pub region:    i64,
}

impl From<&Visit> for VisitRow {
    fn from(v: &Visit) -> Self {
        Self {
            userid:    v.user.0,
            day:       v.day,
            timeslot:  v.timeslot,
            kind:      v.kind.to_string(),
            latitude:  v.location.lat,
            longitude: v.location.lon,
            region:    v.region.0,
        }
    }
}

impl VisitRow {
    /// Back to a [`Visit`]; the creation time is not stored.
    pub fn into_visit(self) -> Result<Visit, String> {
        let kind = self.kind.parse::<VisitKind>().map_err(|e| e.to_string())?;
        Ok(Visit {
            user:       UserId(self.userid),
            day:        self.day,
            timeslot:   self.timeslot,
            kind,
            location:   GeoPoint::new(self.latitude, self.longitude),
            region:     RegionId(self.region),
            created_at: None,
        })
    }
}

/// One origin-destination cell, addressed by zone label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdmRow {
    pub ozone: String,
    pub dzone: String,
    pub value: f64,
}
