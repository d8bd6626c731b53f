//! `mv-spatial` — zones, point location, and zone-pair distance grouping.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`zone`]       | `PlanarPoint`, `Zone`, `ZoneSet` (R-tree), `ZoneSetBuilder`|
//! | [`projection`] | `Projection` trait, `LocalTangentPlane`                    |
//! | [`distance`]   | `ZoneDistances`, `DistanceQuantiles`, `DistanceBin`        |
//! | [`error`]      | `SpatialError`, `SpatialResult<T>`                         |
//!
//! Zones are supplied by an external loader in a planar, metre-based CRS as
//! `geo` multipolygons (holes allowed).
//! Visit coordinates arrive as WGS-84 and are brought into the zones' CRS by
//! a [`Projection`]; real CRS transformations plug in through that trait.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod distance;
pub mod error;
pub mod projection;
pub mod zone;


pub use distance::{DistanceBin, DistanceQuantiles, ZoneDistances};
pub use error::{SpatialError, SpatialResult};
pub use projection::{LocalTangentPlane, Projection};
pub use zone::{PlanarPoint, Zone, ZoneSet, ZoneSetBuilder};
