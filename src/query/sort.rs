//! Sort resolver: maps a requested sort field to an ordering target, which
//! may live on a joined entity. Unknown fields are rejected outright rather
//! than silently falling back to a default column.

use crate::errors::ApiError;
use crate::models::employee;
use sea_orm::Order;

/// Where the resolved ordering applies.
#[derive(Debug, Clone, Copy)]
pub enum SortTarget {
    /// A direct employee column.
    Employee(employee::Column),
    /// Ordering over the joined salary entity, aggregated per employee.
    Salary,
    /// Ordering over the department entity reached through `dept_emp`.
    DeptName,
}

// Manual impl: the generated `employee::Column` has no `PartialEq` derive, and
// adding one would clash with `ColumnTrait::eq` in filter expressions. Both
// enums are fieldless apart from the `Column` payload, so discriminant
// comparison is exact equality.
impl PartialEq for SortTarget {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Employee(a), Self::Employee(b)) => {
                std::mem::discriminant(a) == std::mem::discriminant(b)
            }
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Eq for SortTarget {}

#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub target: SortTarget,
    pub direction: Order,
}

impl SortSpec {
    /// Resolve `sortField`/`sortBy`. An absent or blank field means "no
    /// explicit order" (the plan still appends a stable tie-break).
    /// Direction defaults to ascending when only the field is given.
    pub fn resolve(field: Option<&str>, direction: Option<&str>) -> Result<Option<Self>, ApiError> {
        let Some(field) = field.map(str::trim).filter(|f| !f.is_empty()) else {
            return Ok(None);
        };

        let target = match field {
            "emp_no" => SortTarget::Employee(employee::Column::EmpNo),
            "first_name" => SortTarget::Employee(employee::Column::FirstName),
            "last_name" => SortTarget::Employee(employee::Column::LastName),
            "birth_date" => SortTarget::Employee(employee::Column::BirthDate),
            "salary" => SortTarget::Salary,
            "dept_name" => SortTarget::DeptName,
            other => {
                return Err(ApiError::validation(format!(
                    "unknown sort field '{other}'"
                )));
            }
        };

        let direction = match direction.map(str::trim) {
            None | Some("") => Order::Asc,
            Some(d) if d.eq_ignore_ascii_case("asc") => Order::Asc,
            Some(d) if d.eq_ignore_ascii_case("desc") => Order::Desc,
            Some(other) => {
                return Err(ApiError::validation(format!(
                    "'sortBy' must be ASC or DESC, got '{other}'"
                )));
            }
        };

        Ok(Some(Self { target, direction }))
    }
}
