//! Audit Quest - AI Audit Game Backend
//!
//! This crate implements the conversational audit game played at trade
//! show kiosks: a phase-driven session, an LLM conversation engine with
//! ordered provider fallback, and structured report synthesis.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
