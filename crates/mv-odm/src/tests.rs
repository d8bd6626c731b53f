//! Unit tests for mv-odm.
//!
//! Zones are a 2 × 2 grid of 1 km squares; visit coordinates are mapped to
//! the plane by `x = lon`, `y = lat` (metres), so fixtures read directly as
//! grid positions.

use mv_core::{GeoPoint, RegionId, UserId, Visit, VisitKind};
use mv_spatial::{PlanarPoint, Zone, ZoneSet, ZoneSetBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// ```text
///  1000..2000 │ 2 │ 3 │
///     0..1000 │ 0 │ 1 │
/// ```
fn grid() -> ZoneSet {
    let mut b = ZoneSetBuilder::new();
    for (label, x, y) in [("10", 0.0, 0.0), ("11", 1000.0, 0.0), ("20", 0.0, 1000.0), ("21", 1000.0, 1000.0)] {
        b.add_zone(Zone::rectangle(label, PlanarPoint::new(x, y), PlanarPoint::new(x + 1000.0, y + 1000.0)));
    }
    b.build().unwrap()
}

fn flat(p: GeoPoint) -> PlanarPoint {
    PlanarPoint::new(p.lon, p.lat)
}

fn visit(user: u64, day: u32, timeslot: u32, kind: VisitKind, x: f64, y: f64, region: i64) -> Visit {
    Visit {
        user: UserId(user),
        day,
        timeslot,
        kind,
        location: GeoPoint::new(y, x),
        region: RegionId(region),
        created_at: None,
    }
}

fn region(user: u64, day: u32, timeslot: u32, x: f64, y: f64, r: i64) -> Visit {
    visit(user, day, timeslot, VisitKind::Region, x, y, r)
}

fn point(user: u64, day: u32, timeslot: u32, x: f64, y: f64) -> Visit {
    visit(user, day, timeslot, VisitKind::Point, x, y, -1)
}

fn assert_close(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "{a} != {b} (±{tol})");
}

// ── Odm ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod odm_tests {
    use mv_core::ZoneId;
    use mv_spatial::ZoneDistances;

    use super::*;
    use crate::{Odm, OdmError};

    #[test]
    fn from_values_validates() {
        assert!(matches!(Odm::from_values(2, vec![0.0; 3]), Err(OdmError::DimensionMismatch { .. })));
        assert!(matches!(Odm::from_values(1, vec![f64::NAN]), Err(OdmError::InvalidValue(0))));
    }

    #[test]
    fn zero_mass_cannot_normalize() {
        assert!(matches!(Odm::zeros(3).normalized(), Err(OdmError::Empty(_))));
    }

    #[test]
    fn margins() {
        let odm = Odm::from_values(2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(odm.row_sums(), vec![3.0, 7.0]);
        assert_eq!(odm.col_sums(), vec![4.0, 6.0]);
        assert_eq!(odm.pairs().count(), 4);
    }

    #[test]
    fn reindex_ground_truth() {
        let zones = grid();
        let rows = [("10", "10", 2.0), ("10", "11", 1.0), ("10", "11", 1.0), ("99", "10", 5.0)];
        let odm = Odm::from_pairs(&zones, rows).unwrap();
        assert!(odm.is_normalized(1e-12));
        assert_eq!(odm.zone_count(), 4);
        assert_close(odm.get(ZoneId(0), ZoneId(0)), 0.5, 1e-12);
        assert_close(odm.get(ZoneId(0), ZoneId(1)), 0.5, 1e-12);
        assert_eq!(odm.get(ZoneId(3), ZoneId(2)), 0.0);
    }

    #[test]
    fn distance_cut_renormalizes() {
        let zones = grid();
        let distances = ZoneDistances::from_zones(&zones);
        let odm = Odm::from_values(4, vec![1.0; 16]).unwrap().normalized().unwrap();

        // Keep only diagonal neighbours (√2 km apart).
        let cut = odm.distance_cut(&distances, 1.2).unwrap();
        assert!(cut.is_normalized(1e-12));
        assert_close(cut.get(ZoneId(0), ZoneId(3)), 0.25, 1e-12);
        assert_eq!(cut.get(ZoneId(0), ZoneId(0)), 0.0);
        assert_eq!(cut.get(ZoneId(0), ZoneId(1)), 0.0);

        assert!(odm.distance_cut(&distances, 100.0).is_err());
    }
}

// ── OdmBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use mv_core::ZoneId;

    use super::*;
    use crate::{OdmBuilder, OdmError};

    #[test]
    fn counts_consecutive_pairs() {
        let zones = grid();
        let visits = vec![
            region(1, 0, 0, 500.0, 500.0, 0),
            region(1, 0, 1, 1500.0, 500.0, 1),
            region(1, 0, 2, 500.0, 500.0, 0),
            region(1, 1, 0, 500.0, 500.0, 0),
        ];
        let odm = OdmBuilder::new(&zones, flat).build(&visits).unwrap();
        assert!(odm.is_normalized(1e-12));
        assert_close(odm.get(ZoneId(0), ZoneId(1)), 1.0 / 3.0, 1e-12);
        assert_close(odm.get(ZoneId(1), ZoneId(0)), 1.0 / 3.0, 1e-12);
        assert_close(odm.get(ZoneId(0), ZoneId(0)), 1.0 / 3.0, 1e-12);
    }

    #[test]
    fn no_gap_between_users() {
        let zones = grid();
        let visits = vec![
            region(1, 0, 0, 500.0, 500.0, 0),
            region(1, 0, 1, 1500.0, 1500.0, 1),
            region(2, 0, 0, 500.0, 1500.0, 0),
            region(2, 0, 1, 1500.0, 500.0, 1),
        ];
        let odm = OdmBuilder::new(&zones, flat).build(&visits).unwrap();
        assert_close(odm.get(ZoneId(0), ZoneId(3)), 0.5, 1e-12);
        assert_close(odm.get(ZoneId(2), ZoneId(1)), 0.5, 1e-12);
        assert_eq!(odm.get(ZoneId(3), ZoneId(2)), 0.0);
    }

    #[test]
    fn input_order_does_not_matter() {
        let zones = grid();
        let mut visits = vec![
            region(1, 0, 0, 500.0, 500.0, 0),
            point(1, 0, 1, 1500.0, 1500.0),
            region(1, 0, 2, 1500.0, 500.0, 1),
        ];
        let forward = OdmBuilder::new(&zones, flat).build(&visits).unwrap();
        visits.reverse();
        let backward = OdmBuilder::new(&zones, flat).build(&visits).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn region_located_by_first_visit() {
        let zones = grid();
        // Region 7's first visit lies in zone 1; a later visit of the same
        // region (different coordinates) inherits zone 1.
        let visits = vec![
            region(1, 0, 0, 500.0, 500.0, 0),
            region(1, 0, 1, 1500.0, 500.0, 7),
            region(1, 0, 2, 500.0, 500.0, 0),
            region(1, 0, 3, 1500.0, 1500.0, 7),
        ];
        let (aligned, report) = OdmBuilder::new(&zones, flat).align(&visits);
        assert_eq!(report.dropped(), 0);
        let zones_seen: Vec<ZoneId> = aligned.iter().map(|v| v.zone).collect();
        assert_eq!(zones_seen, vec![ZoneId(0), ZoneId(1), ZoneId(0), ZoneId(1)]);
    }

    #[test]
    fn points_located_individually() {
        let zones = grid();
        let visits = vec![
            point(1, 0, 0, 500.0, 500.0),
            point(1, 0, 1, 1500.0, 1500.0),
        ];
        let (aligned, _) = OdmBuilder::new(&zones, flat).align(&visits);
        assert_eq!(aligned[0].zone, ZoneId(0));
        assert_eq!(aligned[1].zone, ZoneId(3));
    }

    #[test]
    fn outside_visits_dropped_and_reported() {
        let zones = grid();
        let visits = vec![
            region(1, 0, 0, 500.0, 500.0, 0),
            region(1, 0, 1, 5000.0, 500.0, 1),
            region(1, 0, 2, 5000.0, 500.0, 1),
            point(1, 0, 3, -50.0, 500.0),
            region(1, 0, 4, 1500.0, 500.0, 2),
        ];
        let builder = OdmBuilder::new(&zones, flat);
        let (aligned, report) = builder.align(&visits);
        assert_eq!(report.visits, 5);
        assert_eq!(report.region_dropped, 2);
        assert_eq!(report.point_dropped, 1);
        assert_eq!(aligned.len(), 2);

        // The dropped visits are skipped over: 0 → 1 is the only gap.
        let odm = builder.build(&visits).unwrap();
        assert_eq!(odm.get(ZoneId(0), ZoneId(1)), 1.0);
    }

    #[test]
    fn without_points() {
        let zones = grid();
        let visits = vec![region(1, 0, 0, 500.0, 500.0, 0), region(1, 0, 1, 1500.0, 500.0, 1)];
        let (_, report) = OdmBuilder::new(&zones, flat).align(&visits);
        assert_eq!(report.point_dropped, 0);
        assert!(OdmBuilder::new(&zones, flat).build(&visits).is_ok());
    }

    #[test]
    fn time_threshold_discards_long_gaps() {
        let zones = grid();
        let mut visits = vec![
            region(1, 0, 0, 500.0, 500.0, 0),
            region(1, 0, 1, 1500.0, 500.0, 1),
            region(1, 0, 2, 1500.0, 1500.0, 2),
        ];
        for (v, t) in visits.iter_mut().zip([0, 600, 10_000]) {
            v.created_at = Some(t);
        }

        let all = OdmBuilder::new(&zones, flat).build(&visits).unwrap();
        assert_close(all.get(ZoneId(1), ZoneId(3)), 0.5, 1e-12);

        let short = OdmBuilder::new(&zones, flat).time_threshold(3600).build(&visits).unwrap();
        assert_eq!(short.get(ZoneId(0), ZoneId(1)), 1.0);
        assert_eq!(short.get(ZoneId(1), ZoneId(3)), 0.0);
    }

    #[test]
    fn no_gaps_is_an_error() {
        let zones = grid();
        let visits = vec![region(1, 0, 0, 500.0, 500.0, 0), region(2, 0, 0, 500.0, 500.0, 0)];
        assert!(matches!(OdmBuilder::new(&zones, flat).build(&visits), Err(OdmError::Empty(_))));
        assert!(OdmBuilder::new(&zones, flat).build(&[]).is_err());
    }
}

// ── Gravity & IPF ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod gravity_tests {
    use mv_core::ZoneId;
    use mv_spatial::ZoneDistances;

    use super::*;
    use crate::{ipf, GravityModel, Odm, OdmError};

    #[test]
    fn defaults() {
        let g = GravityModel::default();
        assert_eq!((g.beta, g.max_iter, g.tolerance), (0.03, 5000, 1e-8));
    }

    #[test]
    fn seed_decays_with_distance() {
        let distances = ZoneDistances::from_zones(&grid());
        let seed = GravityModel { beta: 1.0, ..GravityModel::default() }.seed(&distances).unwrap();
        assert!(seed.is_normalized(1e-12));
        assert!(seed.get(ZoneId(0), ZoneId(0)) > seed.get(ZoneId(0), ZoneId(1)));
        assert!(seed.get(ZoneId(0), ZoneId(1)) > seed.get(ZoneId(0), ZoneId(3)));
    }

    #[test]
    fn ipf_matches_margins() {
        let distances = ZoneDistances::from_matrix(3, vec![0.0, 1.0, 2.0, 1.0, 0.0, 1.0, 2.0, 1.0, 0.0]).unwrap();
        let seed = GravityModel::default().seed(&distances).unwrap();
        let production = [0.2, 0.3, 0.5];
        let attraction = [0.4, 0.4, 0.2];

        let out = ipf(seed.as_slice(), &production, &attraction, 5000, 1e-12).unwrap();
        assert!(out.converged);
        let m = Odm::from_values(3, out.matrix).unwrap();
        for (got, want) in m.row_sums().iter().zip(production) {
            assert_close(*got, want, 1e-9);
        }
        for (got, want) in m.col_sums().iter().zip(attraction) {
            assert_close(*got, want, 1e-9);
        }
    }

    #[test]
    fn ipf_non_convergence_still_returns() {
        let seed = [1.0, 1.0, 1.0, 1.0];
        let out = ipf(&seed, &[0.9, 0.1], &[0.1, 0.9], 1, 1e-15).unwrap();
        assert!(!out.converged);
        assert_eq!(out.iterations, 1);
        assert_eq!(out.matrix.len(), 4);
    }

    #[test]
    fn ipf_validates_input() {
        assert!(matches!(ipf(&[1.0; 3], &[1.0, 1.0], &[1.0, 1.0], 10, 1e-8), Err(OdmError::DimensionMismatch { .. })));
        assert!(matches!(ipf(&[1.0; 4], &[1.0, 1.0], &[1.0], 10, 1e-8), Err(OdmError::DimensionMismatch { .. })));
        assert!(matches!(ipf(&[1.0; 4], &[1.0, -1.0], &[1.0, 1.0], 10, 1e-8), Err(OdmError::InvalidValue(_))));
        assert!(ipf(&[1.0; 4], &[1.0, 1.0], &[1.0, 1.0], 10, 0.0).is_err());
    }

    #[test]
    fn gravitate_fills_sparse_matrix() {
        let zones = grid();
        let distances = ZoneDistances::from_zones(&zones);
        let sparse = Odm::from_pairs(&zones, [("10", "11", 3.0), ("21", "20", 1.0)]).unwrap();

        let full = GravityModel::default().gravitate(&sparse, &distances).unwrap();
        assert!(full.is_normalized(1e-9));
        assert!(full.as_slice().iter().all(|v| *v > 0.0));

        // Margins follow the sparse matrix (up to the floor).
        let rows = full.row_sums();
        assert_close(rows[0], 0.75, 1e-5);
        assert_close(rows[3], 0.25, 1e-5);
        let cols = full.col_sums();
        assert_close(cols[1], 0.75, 1e-5);
        assert_close(cols[2], 0.25, 1e-5);
    }

    #[test]
    fn gravitate_rejects_mismatched_zones() {
        let distances = ZoneDistances::from_matrix(2, vec![0.0, 1.0, 1.0, 0.0]).unwrap();
        let sparse = Odm::from_values(3, vec![1.0; 9]).unwrap();
        assert!(GravityModel::default().gravitate(&sparse, &distances).is_err());
    }
}
