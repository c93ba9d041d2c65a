//! # Ports Layer
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving port (`DataStore`, consumed by the record directory)
//! - `outbound.rs` - Driven port (`AppendLog`, the physical byte log)

pub mod inbound;
pub mod outbound;
