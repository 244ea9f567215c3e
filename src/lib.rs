//! Jframe - A local-first tool for authoring and sharing "jotts"
//!
//! A jott is a small structured card document (a JSON object) with a title,
//! lifecycle state (draft/published), visibility, and view counter. Creation
//! is metered by a monthly per-user quota that deletion does not refund.

pub mod cli;
pub mod domain;
pub mod service;
pub mod storage;

pub use domain::{Jott, JottId, JottPatch, Publication, UserId, Visibility};
pub use service::{CoreError, JottService, ViewAccounting};
