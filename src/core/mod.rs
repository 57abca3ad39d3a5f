//! Core calculator logic and its supporting abstractions

pub mod analytics;
pub mod config;
pub mod dates;
pub mod input;
pub mod kv;
pub mod log;
pub mod money;
pub mod persistence;

// Re-export main types for cleaner imports
pub use analytics::{CalculatorOutput, GainFigures, Signal, compute};
pub use input::{CalculatorInput, FlowTiming, FormFields};
pub use kv::KeyValueCollection;
pub use persistence::{LoadOutcome, PersistenceAdapter, SavedRecord};
