//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// System prompt sent with every plan request
pub const SYSTEM: &str = include_str!("../../prompts/system.pmt");

/// Brief template, rendered with the user's brief
pub const BRIEF: &str = include_str!("../../prompts/brief.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "system" => Some(SYSTEM),
        "brief" => Some(BRIEF),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
