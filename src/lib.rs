//! Client for an assistive object-detection server: polls the server's
//! objects endpoint, renders the current detections as a list, and announces
//! each one through the platform speech engine.

pub mod client;
pub mod config;
pub mod history;
pub mod objects;
pub mod render;
pub mod service;
pub mod speech;
