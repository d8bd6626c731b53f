//! Geographic → planar coordinate conversion.

use mv_core::GeoPoint;
use mv_core::geo::EARTH_RADIUS_M;

use crate::PlanarPoint;

/// Converts WGS-84 coordinates into the planar, metre-based CRS of a zone
/// set.
///
/// Exact CRS transformations (e.g. SWEREF99 TM, RD New) belong to the data
/// loading layer; wrap them in a closure or a type implementing this trait.
pub trait Projection: Send + Sync {
    fn project(&self, p: GeoPoint) -> PlanarPoint;
}

impl<F> Projection for F
where
    F: Fn(GeoPoint) -> PlanarPoint + Send + Sync,
{
    #[inline]
    fn project(&self, p: GeoPoint) -> PlanarPoint {
        self(p)
    }
}

/// Equirectangular projection onto the plane tangent at `origin`.
///
/// `x` grows eastwards and `y` northwards, both in metres from `origin`.
/// Distortion stays below 0.1 % within a few hundred kilometres of the
/// origin, which is adequate for metropolitan-scale zone systems.
#[derive(Copy, Clone, Debug)]
pub struct LocalTangentPlane {
    pub origin: GeoPoint,
    cos_lat:    f64,
}

impl LocalTangentPlane {
    pub fn new(origin: GeoPoint) -> Self {
        Self { origin, cos_lat: origin.lat.to_radians().cos() }
    }

    /// Inverse projection.
    pub fn unproject(&self, p: PlanarPoint) -> GeoPoint {
        let lat = self.origin.lat + (p.y / EARTH_RADIUS_M).to_degrees();
        let lon = self.origin.lon + (p.x / (EARTH_RADIUS_M * self.cos_lat)).to_degrees();
        GeoPoint::new(lat, lon)
    }
}

impl Projection for LocalTangentPlane {
    fn project(&self, p: GeoPoint) -> PlanarPoint {
        let x = (p.lon - self.origin.lon).to_radians() * EARTH_RADIUS_M * self.cos_lat;
        let y = (p.lat - self.origin.lat).to_radians() * EARTH_RADIUS_M;
        PlanarPoint::new(x, y)
    }
}
