//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! Everything here is synchronous and deterministic. This layer defines:
//!
//! - **Aggregates**: Consistency boundaries with invariants
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Services**: Stateless business logic
//!
//! # Bounded Contexts
//!
//! - [`ledger`]: Contracts, statements, and replay into virtual legs
//! - [`risk`]: Worst-case settlement risk of a combo
//! - [`strategy`]: Strategy classification and refinement
//! - [`trade`]: Trade aggregate and recomputation

pub mod ledger;
pub mod risk;
pub mod shared;
pub mod strategy;
pub mod trade;
