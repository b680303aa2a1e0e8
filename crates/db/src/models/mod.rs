//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts, with `validator` derives
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod conflict_warning;
pub mod exemption;
pub mod recurring_off_day;
pub mod time_off;
pub mod user;
pub mod vacation_balance;
pub mod work_entry;
pub mod working_hours;
