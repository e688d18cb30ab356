//! Core types and trait definitions for the EnergyFlow dashboard service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

#![allow(async_fn_in_trait)]

pub mod activity;
pub mod aggregate;
pub mod branch;
pub mod daily;
pub mod entity;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod notification;
pub mod report;
pub mod seed;
pub mod store;
pub mod tenant;
pub mod user;
pub mod validate;

pub use error::{Error, Result};
