//! Operations run against the liveclass graph.

pub mod class;
