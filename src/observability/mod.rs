//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (stage, address, tx_hash, ...)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr)
//! ```
//!
//! Operator-facing lines (deployed address, cooldown notice, explorer link)
//! are written to stdout by the deploy driver, not through tracing.

pub mod logging;
