//! Department operations, including the two-phase "current manager per
//! department" read.

use crate::errors::ApiError;
use crate::models::{department, dept_manager, employee};
use crate::query::filter::{Field, Operand, Predicate};
use crate::query::plan::compile;
use crate::views::{DepartmentNameView, ManagerView};
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};

#[derive(Debug, FromQueryResult)]
struct ManagerRow {
    dept_no: String,
    dept_name: String,
    first_name: String,
    last_name: String,
    from_date: NaiveDate,
    to_date: NaiveDate,
}

impl From<ManagerRow> for ManagerView {
    fn from(row: ManagerRow) -> Self {
        Self {
            dept_no: row.dept_no,
            dept_name: row.dept_name,
            first_name: row.first_name,
            last_name: row.last_name,
            from_date: row.from_date,
            to_date: row.to_date,
        }
    }
}

/// Manager rows joined with employee and department names.
fn manager_select() -> Select<dept_manager::Entity> {
    dept_manager::Entity::find()
        .select_only()
        .column(dept_manager::Column::DeptNo)
        .column(dept_manager::Column::FromDate)
        .column(dept_manager::Column::ToDate)
        .column_as(department::Column::DeptName, "dept_name")
        .column_as(employee::Column::FirstName, "first_name")
        .column_as(employee::Column::LastName, "last_name")
        .join(JoinType::InnerJoin, dept_manager::Relation::Employee.def())
        .join(JoinType::InnerJoin, dept_manager::Relation::Department.def())
}

/// `GET /department`: each department's current manager.
///
/// Two explicit round trips: (1) aggregate the maximum `from_date` per
/// department, (2) re-fetch the full rows matching those `(dept_no,
/// from_date)` pairs. "Row with the max value per group" cannot be selected
/// alongside the other columns in a single simple aggregate, so the pair-wise
/// refetch is the design, not an optimization miss.
pub async fn current_managers(db: &DatabaseConnection) -> Result<Vec<ManagerView>, ApiError> {
    let latest: Vec<(String, NaiveDate)> = dept_manager::Entity::find()
        .select_only()
        .column(dept_manager::Column::DeptNo)
        .column_as(dept_manager::Column::FromDate.max(), "from_date")
        .group_by(dept_manager::Column::DeptNo)
        .into_tuple()
        .all(db)
        .await?;

    if latest.is_empty() {
        return Ok(Vec::new());
    }

    let pairs = Predicate::Or(
        latest
            .into_iter()
            .map(|(dept_no, from_date)| {
                Predicate::And(vec![
                    Predicate::Equals {
                        field: Field::DeptNo,
                        value: Operand::Str(dept_no),
                    },
                    Predicate::Equals {
                        field: Field::ManagerFromDate,
                        value: Operand::Date(from_date),
                    },
                ])
            })
            .collect(),
    );

    let rows = manager_select()
        .filter(compile(&pairs, db.get_database_backend()))
        .order_by_asc(dept_manager::Column::DeptNo)
        .into_model::<ManagerRow>()
        .all(db)
        .await?;

    Ok(rows.into_iter().map(ManagerView::from).collect())
}

/// `GET /department/{dept}`: every manager interval for one department,
/// ascending by `from_date`. Unknown departments yield an empty list.
pub async fn managers_for(
    dept_no: &str,
    db: &DatabaseConnection,
) -> Result<Vec<ManagerView>, ApiError> {
    let rows = manager_select()
        .filter(dept_manager::Column::DeptNo.eq(dept_no))
        .order_by_asc(dept_manager::Column::FromDate)
        .into_model::<ManagerRow>()
        .all(db)
        .await?;

    Ok(rows.into_iter().map(ManagerView::from).collect())
}

/// `GET /get-departments`: department names.
pub async fn names(db: &DatabaseConnection) -> Result<Vec<DepartmentNameView>, ApiError> {
    let rows = department::Entity::find()
        .order_by_asc(department::Column::DeptNo)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|dept| DepartmentNameView {
            dept_name: dept.dept_name,
        })
        .collect())
}
