//! Data Transfer Objects (DTOs)
//!
//! DTOs are used for use case outputs and the binary's JSON report.

mod trade_dto;

pub use trade_dto::{RecomputeFailureDto, RecomputeReport, TradeSummaryDto, VirtualPositionDto};
