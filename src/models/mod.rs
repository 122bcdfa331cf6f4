//! Schema model for the employees dataset.
//!
//! Six entities: `employees`, `departments`, the two interval-carrying link
//! tables (`dept_emp`, `dept_manager`), `titles` and `salaries`. Relations
//! mirror the store's foreign keys; referential integrity is enforced by the
//! store, not re-derived here.

pub mod department;
pub mod dept_emp;
pub mod dept_manager;
pub mod employee;
pub mod salary;
pub mod title;
