//! Core endpoint operations: one pure async function per HTTP endpoint,
//! taking validated parameters and an explicit connection handle. The HTTP
//! layer in [`crate::routes`] only extracts, delegates and wraps.

pub mod departments;
pub mod employees;
