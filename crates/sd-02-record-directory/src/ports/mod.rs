//! # Ports Layer
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving port (`ServiceDirectoryApi`, called by RPC handlers)
//! - `outbound.rs` - Driven port (`DataStore`, the shared record log)

pub mod inbound;
pub mod outbound;
