//! yield_response — yield-response modeling and fertilizer-rate optimization.
//!
//! Purpose
//! -------
//! Serve as the crate root for a pure-Rust numerical library that fits
//! nonlinear yield-vs-nutrient-rate response curves, derives economic
//! thresholds and prediction bands from them, estimates pairwise nutrient
//! interactions, and searches for fertilizer application strategies that
//! satisfy a yield goal under budget and rate-cap constraints.
//!
//! Key behaviors
//! -------------
//! - Re-export the core modules (`response`, `interaction`, `economics`,
//!   `optimization`, `analysis`, `config`) as the public crate surface.
//! - Keep all heavy numerical work inside the inner modules; this file is
//!   module wiring only.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every public entry point is a pure function of caller-supplied inputs:
//!   no I/O, no caches, no shared mutable state. Concurrent calls from
//!   multiple threads require no synchronization.
//! - All rates and yields are finite, non-negative `f64` values in the
//!   caller's units; modules validate at their boundaries and return
//!   structured errors rather than panicking.
//! - Stochastic search methods are deterministic for a fixed seed supplied
//!   through [`optimization::goal::OptimizerOptions`].
//!
//! Downstream usage
//! ----------------
//! - Service layers call [`analysis::analyze`] for the full per-request
//!   response report and [`optimization::goal::optimize`] for fertilizer
//!   strategy search; both are synchronous, CPU-bound calls that callers
//!   on async runtimes should move onto a blocking worker pool.
//! - Individual components (`response::fitter`, `economics`, …) are public
//!   for callers that need only one stage of the pipeline.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and
//!   by the end-to-end pipeline test in `tests/`.

pub mod analysis;
pub mod config;
pub mod economics;
pub mod interaction;
pub mod optimization;
pub mod response;
pub mod utils;

pub use analysis::{AnalysisOptions, EconomicParams, YieldResponseAnalysis, analyze};
pub use response::core::curve::{ModelKind, ResponseCurve};
pub use response::core::data::{Nutrient, NutrientObservation};
