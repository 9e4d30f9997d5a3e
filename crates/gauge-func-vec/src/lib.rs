//! Gauge Func Vec
//!
//! A Prometheus collector that publishes many gauges under one metric family,
//! each label combination backed by its own read function.
//!
//! ## Features
//!
//! - **Dynamic labels**: label combinations are registered at runtime, one
//!   function per combination, against a fixed set of declared label names
//! - **Lazy values**: functions are called when the registry is gathered,
//!   never cached
//! - **Validation**: wrong label counts, missing labels, constant label
//!   overrides and duplicate combinations are rejected with structured errors
//! - **Export**: text exposition helper and an optional axum `/metrics` route
//!   (`http` feature)
//!
//! ```no_run
//! use gauge_func_vec::GaugeFuncVec;
//! use prometheus::{Opts, Registry};
//! use std::collections::HashMap;
//!
//! let vec = GaugeFuncVec::new(
//!     Opts::new("connections", "Number of connections per database connection")
//!         .namespace("database"),
//!     &["connection_id"],
//! )?;
//! vec.must_register(&HashMap::from([("connection_id", "master")]), || 42.0);
//!
//! let registry = Registry::new();
//! registry.register(Box::new(vec.clone()))?;
//! print!("{}", gauge_func_vec::export_metrics(&registry)?);
//! # Ok::<(), gauge_func_vec::Error>(())
//! ```

pub mod error;
pub mod exporter;
pub mod gauge_func;
pub mod labels;
pub mod telemetry;
pub mod vec;

pub use error::{Error, RegisterError, Result};
pub use exporter::export_metrics;
pub use gauge_func::{GaugeFunc, ValueFn};
pub use telemetry::{init_tracing, TracingConfig};
pub use vec::GaugeFuncVec;

#[cfg(feature = "http")]
pub use exporter::http::{metrics_handler, metrics_router, MetricsState};
