//! AdmissAI - client for the college admissions assistant backend.
//!
//! The client keeps two pieces of local state:
//! - a chat session (history, selected program, compression savings)
//! - per-program checklist completion, persisted under the data directory
//!
//! Everything else (programs, chat replies, checklists, compression) is
//! fetched from the backend over HTTP.

pub mod api;
pub mod chat;
pub mod checklist;
pub mod cli;
pub mod config;
pub mod models;
pub mod notify;
