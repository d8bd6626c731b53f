//! `mv-odm` — origin-destination matrices and the gravity model.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`odm`]     | `Odm` (dense, row-major), reindexing, distance cut         |
//! | [`builder`] | `OdmBuilder` (visits → zones → gaps → ODM)                 |
//! | [`gravity`] | `GravityModel` (seed + `gravitate`), `ipf`                 |
//! | [`error`]   | `OdmError`, `OdmResult<T>`                                 |
//!
//! Every ODM this crate returns sums to 1.  A matrix without mass is an
//! error, never a matrix of NaNs.

pub mod builder;
pub mod error;
pub mod gravity;
pub mod odm;

#[cfg(test)]
mod tests;

pub use builder::{AlignmentReport, OdmBuilder, ZonedVisit};
pub use error::{OdmError, OdmResult};
pub use gravity::{ipf, GravityModel, IpfOutcome, MARGIN_FLOOR};
pub use odm::Odm;
