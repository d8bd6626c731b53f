//! A synthetic city: a square grid of zones and a population of users with
//! labelled, clustered observation histories.

use mv_core::{GeoPoint, Label, Observation, RegionId, SimRng, UserId};
use mv_spatial::{LocalTangentPlane, PlanarPoint, SpatialResult, Zone, ZoneSet, ZoneSetBuilder};

/// Cells per side of the zone grid.
pub const GRID: usize = 6;
/// Zone edge length in metres.
pub const CELL_M: f64 = 2_000.0;
/// Monday 2019-05-06 00:00 UTC.
const START_UNIX_SECS: i64 = 1_557_100_800;
const DAYS: u32 = 28;

pub struct City {
    pub zones: ZoneSet,
    pub plane: LocalTangentPlane,
}

/// One of a user's clustered places.
struct Anchor {
    location: GeoPoint,
    label:    Label,
}

impl City {
    /// Grid centred on `centre`; zones are labelled `"<row><col>"`.
    pub fn new(centre: GeoPoint) -> SpatialResult<Self> {
        let plane = LocalTangentPlane::new(centre);
        let half = GRID as f64 * CELL_M / 2.0;
        let mut b = ZoneSetBuilder::new();
        for row in 0..GRID {
            for col in 0..GRID {
                let min = PlanarPoint::new(col as f64 * CELL_M - half, row as f64 * CELL_M - half);
                let max = PlanarPoint::new(min.x + CELL_M, min.y + CELL_M);
                b.add_zone(Zone::rectangle(format!("{row}{col}"), min, max));
            }
        }
        Ok(Self { zones: b.build()?, plane })
    }

    /// A uniformly random point of the city, biased towards the centre by
    /// averaging two draws.
    fn random_point(&self, rng: &mut SimRng) -> GeoPoint {
        let half = GRID as f64 * CELL_M / 2.0;
        let mut coord = || (rng.gen_range(-half..half) + rng.gen_range(-half..half)) / 2.0;
        let (x, y) = (coord(), coord());
        self.plane.unproject(PlanarPoint::new(x, y))
    }

    /// Four weeks of observations for each of `users` users.
    ///
    /// Every user has a home, a workplace and one to three other places;
    /// a few observations fall outside any cluster (`RegionId::UNCLUSTERED`).
    pub fn observations(&self, users: u64, rng: &mut SimRng) -> Vec<Observation> {
        let mut out = Vec::new();
        for u in 0..users {
            let mut anchors = vec![
                Anchor { location: self.random_point(rng), label: Label::Home },
                Anchor { location: self.random_point(rng), label: Label::Work },
            ];
            for _ in 0..rng.gen_range(1..=3) {
                anchors.push(Anchor { location: self.random_point(rng), label: Label::Other });
            }

            let n = rng.gen_range(30..80u64);
            for k in 0..n {
                let day = rng.gen_range(0..DAYS);
                let hour = rng.gen_range(6..24u32);
                let minute = rng.gen_range(0..60u32);
                let working = (9..17).contains(&hour) && day % 7 < 5;

                let r: f64 = rng.random();
                let (region, anchor) = if r < 0.05 {
                    (RegionId::UNCLUSTERED, None)
                } else if working && r < 0.6 {
                    (RegionId(1), Some(&anchors[1]))
                } else if r < 0.6 {
                    (RegionId(0), Some(&anchors[0]))
                } else {
                    let i = rng.gen_range(0..anchors.len());
                    (RegionId(i as i64), Some(&anchors[i]))
                };
                let (location, label) = match anchor {
                    Some(a) => (a.location, a.label),
                    None => (self.random_point(rng), Label::Other),
                };

                out.push(Observation {
                    user: UserId(u),
                    tweet_id: u * 1_000 + k,
                    created_at: START_UNIX_SECS + day as i64 * 86_400 + hour as i64 * 3_600 + minute as i64 * 60,
                    location,
                    // Day 0 is a Monday.
                    weekday: ((day + 1) % 7) as u8,
                    hour_of_day: hour as u8,
                    region,
                    label,
                });
            }
        }
        out
    }
}
