//! Filter builder: optional request parameters become a store-agnostic
//! predicate tree, grouped by the entity scope each predicate applies to.
//!
//! The tree is compiled to Sea-ORM expressions by a single translator in
//! [`super::plan`], which keeps this module free of SQL and unit-testable
//! without a connection.

/// Column (or computed value) a predicate refers to. Each field belongs to
/// exactly one entity in the join graph; the translator resolves the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    /// Whole years between `birth_date` and the current date, evaluated by
    /// the store at query time.
    Age,
    Salary,
    DeptName,
    DeptNo,
    ManagerFromDate,
}

/// A literal compared against a [`Field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Str(String),
    Int(i64),
    Date(chrono::NaiveDate),
}

/// Store-agnostic predicate tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring match.
    Contains { field: Field, value: String },
    Equals { field: Field, value: Operand },
    /// Inclusive range; a missing bound degrades to `>=` or `<=`.
    Range {
        field: Field,
        min: Option<i64>,
        max: Option<i64>,
    },
    In { field: Field, values: Vec<String> },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

/// Scope the employee-list filters by the entity they restrict. Employee
/// predicates land in the top-level WHERE; salary and department predicates
/// are applied inside their respective joins so that a restriction on a
/// one-to-many join decides which employees survive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub employee: Vec<Predicate>,
    pub salary: Vec<Predicate>,
    pub department: Vec<Predicate>,
}

impl EmployeeFilter {
    /// Build the scoped filter set from validated query parameters. Absent
    /// parameters contribute nothing; the open-world default is "match all".
    #[must_use]
    pub fn build(
        search_value: Option<&str>,
        salary_range: Option<(i64, i64)>,
        age_min: Option<i64>,
        age_max: Option<i64>,
        departments: &[String],
    ) -> Self {
        let mut filter = Self::default();

        if let Some(needle) = search_value.map(str::trim).filter(|s| !s.is_empty()) {
            filter.employee.push(Predicate::Or(vec![
                Predicate::Contains {
                    field: Field::FirstName,
                    value: needle.to_string(),
                },
                Predicate::Contains {
                    field: Field::LastName,
                    value: needle.to_string(),
                },
            ]));
        }

        if age_min.is_some() || age_max.is_some() {
            filter.employee.push(Predicate::Range {
                field: Field::Age,
                min: age_min,
                max: age_max,
            });
        }

        // Salary filtering requires both bounds; a single bound is inert.
        if let Some((start, end)) = salary_range {
            filter.salary.push(Predicate::Range {
                field: Field::Salary,
                min: Some(start),
                max: Some(end),
            });
        }

        if !departments.is_empty() {
            filter.department.push(Predicate::In {
                field: Field::DeptName,
                values: departments.to_vec(),
            });
        }

        filter
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.employee.is_empty() && self.salary.is_empty() && self.department.is_empty()
    }
}

/// Split a comma-separated department list into trimmed, non-empty names.
#[must_use]
pub fn split_departments(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
            .collect()
    })
    .unwrap_or_default()
}
