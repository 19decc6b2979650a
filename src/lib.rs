//! Dishai Service - HTTP relay between the dish-picker web client and an
//! OpenAI-compatible chat completion API. Keeps the API credential
//! server-side and serves the static frontend alongside.

pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod startup;
