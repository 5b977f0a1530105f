//! Route/station locator server.
//!
//! Translates between map coordinates and linear references
//! ("route SR-15, station 120+50") using an external route lookup
//! service, and tracks which station feature should be highlighted.

pub mod cache;
pub mod config;
pub mod domain;
pub mod highlight;
pub mod lrs;
pub mod orchestrator;
pub mod projection;
pub mod web;
