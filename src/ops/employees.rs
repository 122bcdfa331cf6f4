//! Employee listing, querying and per-employee history operations, plus the
//! result assembler that nests titles, salaries and the current department
//! under each employee.

use crate::errors::ApiError;
use crate::models::{department, dept_emp, employee, salary, title};
use crate::params::EmployeeQuery;
use crate::query::filter::EmployeeFilter;
use crate::query::pagination::{DEFAULT_PAGE_SIZE, PageParams};
use crate::query::plan::QueryPlan;
use crate::views::{EmployeeQueryResponse, EmployeeView, SalaryView, TitleView};
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use std::collections::HashMap;

/// `GET /employees`: the unfiltered paged list.
pub async fn list(
    page: PageParams,
    db: &DatabaseConnection,
) -> Result<Vec<EmployeeView>, ApiError> {
    let plan = QueryPlan::build(&EmployeeFilter::default(), None, db.get_database_backend());
    let rows = plan.fetch_page(page, db).await?;
    Ok(assemble(rows, false, db).await?)
}

/// `GET /employees/query`: filtered, sorted, paged list plus the distinct
/// total. Both executions run off the same plan instance.
pub async fn query(
    params: &EmployeeQuery,
    db: &DatabaseConnection,
) -> Result<EmployeeQueryResponse, ApiError> {
    let filter = EmployeeFilter::build(
        params.search_value.as_deref(),
        params.salary_range,
        params.age_min,
        params.age_max,
        &params.departments,
    );
    let plan = QueryPlan::build(&filter, params.sort.as_ref(), db.get_database_backend());

    let rows = plan.fetch_page(params.page, db).await?;
    let total_count = plan.count(db).await?;
    let data = assemble(rows, true, db).await?;

    Ok(EmployeeQueryResponse { data, total_count })
}

/// `GET /count-employees`: page count of the full dataset at the default
/// page size.
pub async fn page_count(db: &DatabaseConnection) -> Result<u64, ApiError> {
    use sea_orm::PaginatorTrait;

    let total = employee::Entity::find().count(db).await?;
    Ok(total.div_ceil(DEFAULT_PAGE_SIZE))
}

/// `GET /employees/employee/info/{emp_no}`: the scalar employee record.
/// Unknown keys yield an empty list, not an error.
pub async fn info(emp_no: i32, db: &DatabaseConnection) -> Result<Vec<employee::Model>, ApiError> {
    Ok(employee::Entity::find()
        .filter(employee::Column::EmpNo.eq(emp_no))
        .all(db)
        .await?)
}

/// `GET /employees/employee/salary/{emp_no}`: salary history, ascending by
/// `from_date`.
pub async fn salary_history(
    emp_no: i32,
    db: &DatabaseConnection,
) -> Result<Vec<SalaryView>, ApiError> {
    let rows = salary::Entity::find()
        .filter(salary::Column::EmpNo.eq(emp_no))
        .order_by_asc(salary::Column::FromDate)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| SalaryView {
            salary: row.salary,
            from_date: row.from_date,
            to_date: row.to_date,
        })
        .collect())
}

/// `GET /employees/employee/titles/{emp_no}`: title history, ascending by
/// `from_date`.
pub async fn title_history(
    emp_no: i32,
    db: &DatabaseConnection,
) -> Result<Vec<TitleView>, ApiError> {
    let rows = title::Entity::find()
        .filter(title::Column::EmpNo.eq(emp_no))
        .order_by_asc(title::Column::FromDate)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(title_view).collect())
}

fn title_view(row: title::Model) -> TitleView {
    TitleView {
        title: row.title,
        from_date: row.from_date,
        to_date: row.to_date,
    }
}

/// Result assembler: batch-load the related rows for one page of employees
/// and nest them. Titles come latest-first, salaries highest-first; the
/// current department is the link with the maximum `from_date`.
async fn assemble(
    rows: Vec<employee::Model>,
    include_birth_date: bool,
    db: &DatabaseConnection,
) -> Result<Vec<EmployeeView>, DbErr> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = rows.iter().map(|row| row.emp_no).collect();

    let mut titles_by: HashMap<i32, Vec<TitleView>> = HashMap::new();
    for row in title::Entity::find()
        .filter(title::Column::EmpNo.is_in(ids.clone()))
        .order_by_desc(title::Column::FromDate)
        .all(db)
        .await?
    {
        titles_by
            .entry(row.emp_no)
            .or_default()
            .push(title_view(row));
    }

    let mut salaries_by: HashMap<i32, Vec<SalaryView>> = HashMap::new();
    for row in salary::Entity::find()
        .filter(salary::Column::EmpNo.is_in(ids.clone()))
        .order_by_desc(salary::Column::Salary)
        .all(db)
        .await?
    {
        salaries_by.entry(row.emp_no).or_default().push(SalaryView {
            salary: row.salary,
            from_date: row.from_date,
            to_date: row.to_date,
        });
    }

    let mut current_dept: HashMap<i32, (NaiveDate, String)> = HashMap::new();
    for (link, dept) in dept_emp::Entity::find()
        .find_also_related(department::Entity)
        .filter(dept_emp::Column::EmpNo.is_in(ids))
        .all(db)
        .await?
    {
        let Some(dept) = dept else { continue };
        match current_dept.get(&link.emp_no) {
            Some((held, _)) if *held >= link.from_date => {}
            _ => {
                current_dept.insert(link.emp_no, (link.from_date, dept.dept_name));
            }
        }
    }

    Ok(rows
        .into_iter()
        .map(|row| EmployeeView {
            emp_no: row.emp_no,
            first_name: row.first_name,
            last_name: row.last_name,
            birth_date: include_birth_date.then_some(row.birth_date),
            titles: titles_by.remove(&row.emp_no).unwrap_or_default(),
            salaries: salaries_by.remove(&row.emp_no).unwrap_or_default(),
            department: current_dept.remove(&row.emp_no).map(|(_, name)| name),
        })
        .collect())
}
