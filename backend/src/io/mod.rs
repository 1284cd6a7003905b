//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services. Translates
//! requests into domain commands and domain results into the DTOs of the
//! `shared` crate.

pub mod rest;
