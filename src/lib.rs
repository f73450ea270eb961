//! TicketPilot: support ticket tracking with LLM-assisted triage.

pub mod api;
pub mod classify;
pub mod cli;
pub mod llm;
pub mod tickets;
