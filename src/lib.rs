//! Group Roster Library
//!
//! This library provides functionality to connect to a messaging platform
//! gateway, resolve a group reference, enumerate the group's members, and
//! export the collected roster to a spreadsheet workbook. It is a
//! single-pass connect, resolve, enumerate, transform, and persist pipeline.

pub mod collect;
pub mod config;
pub mod export;
pub mod logging;
pub mod run;
pub mod source;
