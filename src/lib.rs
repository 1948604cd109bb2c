//! Backend for AI-DOCTOR - multi-model advice for a medical image
//!
//! Forwards an uploaded image and question to two vision models, asks a text
//! model to reduce their answers to medicine names and home remedies, and
//! adds pharmacy search links for each medicine.

pub mod ai;
pub mod app;
pub mod error;
pub mod links;
pub mod models;
pub mod prompts;
pub mod recommend;
pub mod server;

pub use error::{Error, Result};
