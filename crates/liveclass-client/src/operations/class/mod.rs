//! Operations on classes.

pub mod schools;
