//! Output of simulation results
//!
//! - **Table**: plain-text rendering of the approximation table
//! - **Export**: CSV files for external analysis
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs       ← This file
//! ├── table.rs     ← Text rendering
//! └── export/      ← Data export
//!     ├── mod.rs
//!     └── csv.rs
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ode_rs::output::export::export_result_csv;
//!
//! println!("{}", result.table("Approximations"));
//! export_result_csv(&result, "run.csv", None)?;
//! ```

pub mod export;
mod table;

pub use export::{export_result_csv, CsvConfig, CsvError, CsvExporter, CsvMetadata, Exporter};
pub use table::{format_general, MatrixTable, DEFAULT_PRECISION};
