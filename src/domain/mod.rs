//! Domain models for JFrame
//!
//! Contains the core business types without any I/O concerns.

mod content;
mod id;
mod jott;
mod quota;

pub use content::{CardContent, ContentError};
pub use id::{IdError, JottId, UserId};
pub use jott::{Jott, JottPatch, Publication, Visibility};
pub use quota::{MonthKey, Profile, QuotaUsage, Tier, DEFAULT_MONTHLY_LIMIT};
