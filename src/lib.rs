//! Realty Projection - pro-forma engine for leveraged real-estate investments
//!
//! This library provides:
//! - Mortgage amortization with optional prepayments
//! - Annual income statements, balance sheets and cash-flow statements
//! - Disposal at the end of the holding period with capital gain and recapture taxes
//! - IRRs, total returns and per-year investment ratios
//! - Batch scenario runs over key/value assumption files

pub mod amortization;
pub mod assumptions;
pub mod error;
pub mod projection;
pub mod rounding;
pub mod scenario;

// Re-export commonly used types
pub use amortization::{amortize, AmortizationSchedule, LoanTerms, Prepayment};
pub use assumptions::{AssetClass, ProjectionAssumptions};
pub use error::{ProjectionError, Result};
pub use projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};
pub use scenario::{NamedScenario, ScenarioRunner};
