//! Per-component plan builders.
//!
//! Each module maps a package-manager branch to the concrete package names,
//! setup steps and units for one piece of software. Branches with no
//! distribution package return [`ComponentPlan::unsupported`](crate::plan::ComponentPlan::unsupported).

pub mod admin;
pub mod console;
pub mod database;
pub mod editor;
pub mod forge;
