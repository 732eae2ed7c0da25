//! Churn risk scoring, outreach routing, and messaging guardrails for telecom
//! retention teams.

pub mod action_log;
pub mod config;
pub mod error;
pub mod guardrails;
pub mod insights;
pub mod scoring;
pub mod signals;
pub mod telemetry;
pub mod tickets;
