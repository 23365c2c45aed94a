//! Core types, collaborator traits and the admission protocol for Seatbook.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends and transports depend on it; it depends on nothing
//! proprietary.

pub mod admission;
pub mod attendee;
pub mod error;
pub mod event;
pub mod memory;
pub mod notification;
pub mod service;
pub mod store;

pub use error::{AdmissionError, Error, Result};
pub use service::{AdmissionService, ServiceConfig};
