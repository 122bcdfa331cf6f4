//! The query composition engine.
//!
//! Request parameters are turned into a store-agnostic predicate tree
//! ([`filter`]), a resolved ordering ([`sort`]) and page bounds
//! ([`pagination`]); [`plan`] merges them into a single [`plan::QueryPlan`]
//! that drives both the paged data fetch and the distinct count. Everything
//! here is pure; the only I/O happens when a plan is executed against a
//! connection.

pub mod filter;
pub mod pagination;
pub mod plan;
pub mod sort;
