//! # Lifecycle Service
//!
//! The orchestrating core of JFrame: the rules governing creation,
//! validation, ownership, publish-state transitions, deletion, and usage
//! accounting for a user's jotts.
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`JottService`] | Create, update, delete, get, list — the only mutation path |
//! | [`ViewAccounting`] | Atomic view counting on public reads |
//! | [`DocumentStore`] / [`ProfileStore`] / [`QuotaLedger`] | Collaborator seams |
//!
//! ## Error policy
//!
//! Every operation returns a typed [`CoreError`]; validation and ownership
//! failures are detected before any persistence side effect, and a failed
//! operation never compromises the stores for other callers.

mod error;
mod lifecycle;
mod stores;
mod views;

pub use error::CoreError;
pub use lifecycle::JottService;
pub use stores::{DocumentStore, ProfileStore, QuotaLedger, Reservation, StoreError};
pub use views::ViewAccounting;
