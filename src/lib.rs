//! Career Signals Console Library
//!
//! Backend for a browser console that fills structured forms, submits them
//! as JSON to the career-signals API and reports the normalized outcome.
//!
//! # Modules
//!
//! - `api`: API-layer namespace.
//! - `core`: Domain-layer namespace.
//! - `integrations`: Upstream service integrations.
//! - `app`: Router and middleware assembly.
//! - `config`: Configuration management.
//! - `dispatcher`: Live/stub request dispatch and cURL preview.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Forms, settings and request results.
//! - `payload`: Field validation, payload shaping and credential placement.
//! - `session`: Per-form submission state machines.

pub mod api;
pub mod core;
pub mod integrations;

pub mod app;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod payload;
pub mod session;
