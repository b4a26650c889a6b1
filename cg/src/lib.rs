//! CampaignGen - campaign brief to campaign plan document
//!
//! Sends a free-form marketing brief to an LLM with a fixed planning prompt
//! and lays the reply out as a document through [`plandoc`].

pub mod cli;
pub mod config;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod server;

pub use config::Config;
pub use planner::{Planner, PlannerError};
