//! Core logic - framework-agnostic simulation and history operations.
//!
//! Nothing in here knows about HTTP; the api layer calls into these modules.

/// Energy categories and the shape of a run's results
pub mod energy;
/// Simulator executable discovery
pub mod executable;
/// Persisting and listing simulation runs
pub mod history;
/// Synthesized results used as a fallback
pub mod mock;
/// Inspection of simulator output files
pub mod output;
/// The simulation runner
pub mod simulation;
