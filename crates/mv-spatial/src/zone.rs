//! Zone polygons and the zone set used for spatial aggregation.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) holds the bounding box of every zone.  Locating a
//! point is a bounding-box query followed by an exact point-in-polygon test
//! (`geo`) on the (usually one or two) candidates.

use std::collections::HashMap;

use geo::{Area, BoundingRect, Centroid, Coord, Intersects, MultiPolygon, Point, Rect};
use rstar::{RTree, RTreeObject, AABB};

use mv_core::ZoneId;

use crate::{SpatialError, SpatialResult};

// ── PlanarPoint ───────────────────────────────────────────────────────────────

/// A point in the zones' planar CRS, in metres.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance(self, other: PlanarPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

// ── Zone ──────────────────────────────────────────────────────────────────────

/// One administrative or traffic-analysis zone.
///
/// The geometry is a multipolygon; interior rings are holes, so an enclave
/// (a town inside a surrounding rural zone) belongs only to its own zone.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    /// External zone identifier as it appears in ground-truth tables.
    pub label:    String,
    pub geometry: MultiPolygon<f64>,
}

impl Zone {
    pub fn new(label: impl Into<String>, geometry: impl Into<MultiPolygon<f64>>) -> Self {
        Self { label: label.into(), geometry: geometry.into() }
    }

    /// Axis-aligned rectangle; convenient for grids and tests.
    pub fn rectangle(label: impl Into<String>, min: PlanarPoint, max: PlanarPoint) -> Self {
        let rect = Rect::new(Coord { x: min.x, y: min.y }, Coord { x: max.x, y: max.y });
        Self::new(label, rect.to_polygon())
    }

    /// Point-in-zone test.  Points on the boundary count as inside, and
    /// points inside a hole do not.
    pub fn contains(&self, p: PlanarPoint) -> bool {
        self.geometry.intersects(&Point::from(p))
    }

    /// Area-weighted centroid, holes subtracted.  `None` for an empty
    /// geometry.
    pub fn centroid(&self) -> Option<PlanarPoint> {
        self.geometry.centroid().map(PlanarPoint::from)
    }

    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }

    fn envelope(&self) -> Option<AABB<[f64; 2]>> {
        let rect = self.geometry.bounding_rect()?;
        Some(AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
    }
}

impl From<PlanarPoint> for Point<f64> {
    fn from(p: PlanarPoint) -> Self {
        Point::new(p.x, p.y)
    }
}

impl From<Point<f64>> for PlanarPoint {
    fn from(p: Point<f64>) -> Self {
        PlanarPoint::new(p.x(), p.y())
    }
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Bounding box of one zone, stored in the R-tree.
struct ZoneEntry {
    envelope: AABB<[f64; 2]>,
    id:       ZoneId,
}

impl RTreeObject for ZoneEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

// ── ZoneSet ───────────────────────────────────────────────────────────────────

/// The zones of one reporting scale, addressed by dense [`ZoneId`]s.
///
/// Zone order is insertion order; it defines the row/column order of every
/// origin-destination matrix built against this set.  Do not construct
/// directly; use [`ZoneSetBuilder`].
pub struct ZoneSet {
    zones:     Vec<Zone>,
    centroids: Vec<PlanarPoint>,
    by_label:  HashMap<String, ZoneId>,
    index:     RTree<ZoneEntry>,
}

impl ZoneSet {
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    #[inline]
    pub fn zone(&self, id: ZoneId) -> &Zone {
        &self.zones[id.index()]
    }

    #[inline]
    pub fn label(&self, id: ZoneId) -> &str {
        &self.zones[id.index()].label
    }

    /// Centroid of a zone, computed once when the set is built.
    #[inline]
    pub fn centroid(&self, id: ZoneId) -> PlanarPoint {
        self.centroids[id.index()]
    }

    /// Look up a zone by its external label.
    pub fn find(&self, label: &str) -> Option<ZoneId> {
        self.by_label.get(label).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = ZoneId> + '_ {
        (0..self.zones.len()).map(|i| ZoneId(i as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ZoneId, &Zone)> + '_ {
        self.zones.iter().enumerate().map(|(i, z)| (ZoneId(i as u32), z))
    }

    /// The zone containing `p`, if any.
    ///
    /// When overlapping zones both contain `p`, the lowest `ZoneId` wins so
    /// the result is deterministic.
    pub fn locate(&self, p: PlanarPoint) -> Option<ZoneId> {
        let probe = AABB::from_point([p.x, p.y]);
        self.index
            .locate_in_envelope_intersecting(&probe)
            .filter(|entry| self.zones[entry.id.index()].contains(p))
            .map(|entry| entry.id)
            .min()
    }
}

// ── ZoneSetBuilder ────────────────────────────────────────────────────────────

/// Incremental builder for [`ZoneSet`].
#[derive(Default)]
pub struct ZoneSetBuilder {
    zones: Vec<Zone>,
}

impl ZoneSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a zone and return the `ZoneId` it will receive.
    pub fn add_zone(&mut self, zone: Zone) -> ZoneId {
        let id = ZoneId(self.zones.len() as u32);
        self.zones.push(zone);
        id
    }

    /// Validate labels and geometry and bulk-load the R-tree.
    pub fn build(self) -> SpatialResult<ZoneSet> {
        if self.zones.is_empty() {
            return Err(SpatialError::EmptyZoneSet);
        }

        let mut by_label = HashMap::with_capacity(self.zones.len());
        let mut centroids = Vec::with_capacity(self.zones.len());
        let mut entries = Vec::with_capacity(self.zones.len());
        for (i, zone) in self.zones.iter().enumerate() {
            let id = ZoneId(i as u32);
            let degenerate = || SpatialError::DegenerateZone(zone.label.clone());
            if zone.area() <= 0.0 {
                return Err(degenerate());
            }
            centroids.push(zone.centroid().ok_or_else(degenerate)?);
            entries.push(ZoneEntry { envelope: zone.envelope().ok_or_else(degenerate)?, id });
            if by_label.insert(zone.label.clone(), id).is_some() {
                return Err(SpatialError::DuplicateZone(zone.label.clone()));
            }
        }

        Ok(ZoneSet {
            zones: self.zones,
            centroids,
            by_label,
            index: RTree::bulk_load(entries),
        })
    }
}
