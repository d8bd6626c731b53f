//! `mv-sim` — per-user trajectory sampling for a whole population.
//!
//! # Sampling loop
//!
//! ```text
//! for user in population (ascending UserId):
//!   ① Fit     — PreferentialReturn::fit on the user's own history.
//!   ② Home    — first home-labelled observation.
//!   ③ Days    — for day in 0..n_days:
//!                 emit (day, 0) at home
//!                 draw n trips; for timeslot 1..=n: prev = model.next(prev)
//! ```
//!
//! Users never share model or RNG state, which makes the loop embarrassingly
//! parallel.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                            |
//! |------------|---------------------------------------------------|
//! | `parallel` | Simulates users on Rayon's thread pool.           |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mv_model::{ModelConfigBuilder, Population};
//! use mv_sim::{NoopObserver, SamplerBuilder};
//!
//! let model = ModelConfigBuilder::new().p(0.6).gamma(0.21).build()?;
//! let sampler = SamplerBuilder::new(model).n_days(140).seed(42).build()?;
//! let summary = sampler.run(&population, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod sampler;

#[cfg(test)]
mod tests;

pub use builder::SamplerBuilder;
pub use config::SamplerConfig;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SampleObserver};
pub use sampler::{SampleSummary, Sampler};
