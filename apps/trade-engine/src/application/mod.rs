//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for storage and market data
//! - **Use Cases**: Recomputation of one or all trades
//! - **DTOs**: Data transfer objects for reports

pub mod dto;
pub mod ports;
pub mod use_cases;

pub use dto::*;
pub use ports::*;
pub use use_cases::*;
