//! `mv-model` — user histories and the preferential-return mobility model.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`history`] | `UserHistory`, `Population`, `PopulationFilter`, `RegionSummary` |
//! | [`region`]  | `RegionSampling` strategies and the fitted `RegionSampler`      |
//! | [`jump`]    | `JumpSampling` strategies and the fitted `JumpSampler`          |
//! | [`daily`]   | `DailyTrips` distributions and `DailyTripSampler`               |
//! | [`config`]  | `ModelConfig`, `ModelConfigBuilder`, `Exploration`              |
//! | [`model`]   | `PreferentialReturn`, `Step`                                    |
//! | [`error`]   | `ModelError`, `ModelResult<T>`                                  |
//!
//! # Fitting
//!
//! Strategy enums are plain configuration and serialise to the run-parameter
//! record.  Calling `fit` on one user's history produces a sampler owned by
//! that user's [`PreferentialReturn`]; nothing fitted is shared between
//! users, so per-user simulations can run on any thread.

pub mod config;
pub mod daily;
pub mod error;
pub mod history;
pub mod jump;
pub mod model;
pub mod region;


pub use config::{Exploration, ModelConfig, ModelConfigBuilder};
pub use daily::{DailyTripSampler, DailyTrips};
pub use error::{ModelError, ModelResult};
pub use history::{Population, PopulationFilter, RegionSummary, UserHistory};
pub use jump::{Jump, JumpSampler, JumpSampling};
pub use model::{PreferentialReturn, Step};
pub use region::{RegionSampler, RegionSampling, PROBABILITY_FLOOR};
