//! Background services
//!
//! Request workers run on plain threads and report back to the sync UI
//! loop over a channel. Nothing in here touches the panels directly.

pub mod bridge;
pub mod parser;
