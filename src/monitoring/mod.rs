//! Observability: request telemetry exported as Prometheus text.

pub mod telemetry;

pub use telemetry::Telemetry;
