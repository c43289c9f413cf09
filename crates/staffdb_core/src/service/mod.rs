//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep CLI layers decoupled from storage details.

pub mod employee_service;
pub mod error;
pub mod hierarchy_service;

use error::ServiceResult;
use log::{info, warn};
use std::time::Instant;

/// Emits one metadata-only outcome line for a service operation.
pub(crate) fn log_outcome<T>(event: &str, started_at: Instant, result: &ServiceResult<T>) {
    match result {
        Ok(_) => info!(
            "event={} module=service status=ok duration_ms={}",
            event,
            started_at.elapsed().as_millis()
        ),
        Err(err) => warn!(
            "event={} module=service status=error duration_ms={} error_code={}",
            event,
            started_at.elapsed().as_millis(),
            err.code()
        ),
    }
}
