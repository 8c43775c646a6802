//! Duplicate suppression and same-day cooldown for attendance check-ins.

pub mod admission;
pub mod cooldown;
pub mod duplicate;
pub mod error;
pub mod locks;
pub mod time;

#[cfg(test)]
pub(crate) mod testing;

pub use admission::AdmissionController;
pub use cooldown::{CooldownPolicy, CooldownSettings};
