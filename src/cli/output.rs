//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ExtractError;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ExtractError) -> String {
    format!("error: {}", e)
}
