//! Pure calendar and entitlement logic for the time-tracking backend.
//!
//! Everything in this crate is deterministic and side-effect-free: no
//! database access, no clock reads, no async. The `db` crate loads rows
//! and decodes them into these types; the `service` crate orchestrates.

pub mod balance;
pub mod error;
pub mod holidays;
pub mod recurrence;
pub mod types;
pub mod working_days;
