//! Grow Coach - Turn-based GROW-model coaching session orchestrator.
//!
//! This crate drives a structured coaching conversation through the GROW
//! framework (Goal, Reality, Options, Will), pairing a multi-provider
//! inference gateway with a fully offline heuristic dialogue engine.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
