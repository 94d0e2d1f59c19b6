//! Command-line front-end for the goalcast projection engine
//!
//! Loads a household plan file into in-memory stores, runs projections and
//! what-if scenarios through [`goalcast_core::ProjectionService`], and renders
//! the result as JSON or a text table.

pub mod logging;
pub mod plan;
pub mod report;

pub use logging::init_logging;
pub use plan::{PlanError, PlanFile, UserPlan, Workspace};
pub use report::{OutputFormat, render_assumptions, render_response};
