//! Identity module — signup & signin
//!
//! Contains the `AuthService` which orchestrates user registration and
//! password authentication.

pub mod service;

pub use service::AuthService;
