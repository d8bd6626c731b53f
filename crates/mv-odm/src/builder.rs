//! Visit sequences → zone-level origin-destination matrix.

use std::collections::HashMap;

use tracing::{debug, info};

use mv_core::{RegionId, UserId, Visit, VisitKind, ZoneId};
use mv_spatial::{Projection, ZoneSet};

use crate::{Odm, OdmError, OdmResult};

// ── Alignment ─────────────────────────────────────────────────────────────────

/// A visit that has been assigned to a zone.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZonedVisit {
    pub user:       UserId,
    pub day:        u32,
    pub timeslot:   u32,
    pub zone:       ZoneId,
    pub created_at: Option<i64>,
}

/// How many visits could not be assigned to a zone.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AlignmentReport {
    pub visits:          usize,
    pub region_dropped:  usize,
    pub point_dropped:   usize,
}

impl AlignmentReport {
    pub fn dropped(&self) -> usize {
        self.region_dropped + self.point_dropped
    }
}

// ── OdmBuilder ────────────────────────────────────────────────────────────────

/// Builds normalized ODMs from visit tables against one zone set.
///
/// # Steps
///
/// 1. Project visit coordinates into the zones' CRS.
/// 2. Locate region visits once per `(user, region)` using the pair's first
///    visit, and apply that zone to all of the pair's visits.  Point visits
///    (and unclustered region visits) are located individually.  Visits in
///    no zone are dropped.
/// 3. Sort by `(user, day, timeslot)`.
/// 4. Pair each visit with the user's next one; with a time threshold set,
///    pairs further apart than the threshold are discarded.
/// 5. Count pairs per `(origin, destination)` zone and normalize.
pub struct OdmBuilder<'z, P: Projection> {
    zones:          &'z ZoneSet,
    projection:     P,
    time_threshold: Option<i64>,
}

impl<'z, P: Projection> OdmBuilder<'z, P> {
    pub fn new(zones: &'z ZoneSet, projection: P) -> Self {
        Self { zones, projection, time_threshold: None }
    }

    /// Discard consecutive visits more than `seconds` apart.
    ///
    /// Applies only where both visits carry a creation time.
    pub fn time_threshold(mut self, seconds: i64) -> Self {
        self.time_threshold = Some(seconds);
        self
    }

    /// Assign visits to zones (steps 1–3).
    pub fn align(&self, visits: &[Visit]) -> (Vec<ZonedVisit>, AlignmentReport) {
        let mut ordered: Vec<&Visit> = visits.iter().collect();
        ordered.sort_by_key(|v| v.order_key());

        let mut report = AlignmentReport { visits: visits.len(), ..AlignmentReport::default() };
        let mut region_zones: HashMap<(UserId, RegionId), Option<ZoneId>> = HashMap::new();
        let mut aligned = Vec::with_capacity(visits.len());

        for v in ordered {
            let per_region = v.kind == VisitKind::Region && v.region.is_clustered();
            let zone = if per_region {
                *region_zones
                    .entry((v.user, v.region))
                    .or_insert_with(|| self.zones.locate(self.projection.project(v.location)))
            } else {
                self.zones.locate(self.projection.project(v.location))
            };

            match zone {
                Some(zone) => aligned.push(ZonedVisit {
                    user: v.user,
                    day: v.day,
                    timeslot: v.timeslot,
                    zone,
                    created_at: v.created_at,
                }),
                None if per_region => report.region_dropped += 1,
                None => report.point_dropped += 1,
            }
        }

        info!(
            visits = report.visits,
            region_dropped = report.region_dropped,
            point_dropped = report.point_dropped,
            "visits aligned to zones"
        );
        (aligned, report)
    }

    /// Consecutive same-user zone pairs (step 4).
    pub fn gaps(&self, aligned: &[ZonedVisit]) -> Vec<(ZoneId, ZoneId)> {
        let mut too_long = 0usize;
        let gaps: Vec<_> = aligned
            .windows(2)
            .filter(|w| w[0].user == w[1].user)
            .filter(|w| match (self.time_threshold, w[0].created_at, w[1].created_at) {
                (Some(limit), Some(a), Some(b)) if b - a > limit => {
                    too_long += 1;
                    false
                }
                _ => true,
            })
            .map(|w| (w[0].zone, w[1].zone))
            .collect();
        if too_long > 0 {
            debug!(too_long, "gaps over the time threshold discarded");
        }
        gaps
    }

    /// Full pipeline: visits → normalized ODM.
    pub fn build(&self, visits: &[Visit]) -> OdmResult<Odm> {
        let (aligned, _) = self.align(visits);
        let gaps = self.gaps(&aligned);
        if gaps.is_empty() {
            return Err(OdmError::Empty("no consecutive visits inside the zone set"));
        }

        let mut odm = Odm::zeros(self.zones.len());
        for (o, d) in gaps {
            odm.add(o, d, 1.0);
        }
        odm.normalized()
    }
}
