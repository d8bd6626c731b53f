//! `mv-core` — foundational types for the mobility validation workspace.
//!
//! This crate is a dependency of every other `mv-*` crate.  It intentionally
//! has no `mv-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`ids`]    | `UserId`, `RegionId`, `ZoneId`                             |
//! | [`geo`]    | `GeoPoint`, haversine distance, bearing, destination point |
//! | [`visit`]  | `Observation`, `Visit`, `VisitKind`, `Label`               |
//! | [`rng`]    | `UserRng` (per-user), `SimRng` (global)                    |
//! | [`error`]  | `MvError`, `MvResult`                                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod visit;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{MvError, MvResult};
pub use geo::GeoPoint;
pub use ids::{RegionId, UserId, ZoneId};
pub use rng::{SimRng, UserRng};
pub use visit::{Label, Observation, Visit, VisitKind};
