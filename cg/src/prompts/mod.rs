//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files for plan generation.
//!
//! Template loading chain:
//! 1. `.campaigngen/prompts/{name}.pmt` (user override)
//! 2. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution.

pub mod embedded;
mod loader;

pub use loader::{BriefContext, PromptLoader};
