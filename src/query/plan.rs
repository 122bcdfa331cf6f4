//! Join planner and predicate translator.
//!
//! A [`QueryPlan`] is built once per request from the scoped filter set and
//! the resolved sort, then consumed by both executions: the paged employee
//! fetch and the distinct count. Deriving both from the same plan instance is
//! what keeps `totalCount` consistent with the pages the data query can
//! actually produce.

use crate::models::{department, dept_emp, employee, salary};
use crate::query::filter::{EmployeeFilter, Field, Operand, Predicate};
use crate::query::pagination::PageParams;
use crate::query::sort::{SortSpec, SortTarget};
use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    Condition, DatabaseConnection, DbBackend, DbErr, EntityTrait, JoinType, Order, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};

/// One request's worth of join and filter decisions, shared verbatim between
/// the data query and the count query.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    /// Top-level WHERE over employee-scoped predicates.
    employee_cond: Condition,
    /// Extra ON restriction for the salary join; its presence makes the join
    /// inner, so employees without a matching salary row drop out.
    salary_on: Option<SimpleExpr>,
    /// Extra ON restriction for the department join, same mechanics.
    department_on: Option<SimpleExpr>,
    /// Resolved ordering, always terminated by the `emp_no` tie-break.
    order: Vec<(SimpleExpr, Order)>,
}

impl QueryPlan {
    /// Merge filter scopes and sort requirements into one plan. The salary
    /// and department joins are always part of the plan (both queries carry
    /// them); predicates only change their join type and ON clause.
    #[must_use]
    pub fn build(filter: &EmployeeFilter, sort: Option<&SortSpec>, backend: DbBackend) -> Self {
        let mut employee_cond = Condition::all();
        for predicate in &filter.employee {
            employee_cond = employee_cond.add(compile(predicate, backend));
        }

        let salary_on = conjoin(&filter.salary, backend);
        let department_on = conjoin(&filter.department, backend);

        let mut order = Vec::new();
        if let Some(spec) = sort {
            let expr = match spec.target {
                SortTarget::Employee(column) => Expr::col((employee::Entity, column)).into(),
                // Joined targets are aggregated per employee: the data query
                // groups by emp_no, so the ordering key must collapse the
                // one-to-many rows to a single value.
                SortTarget::Salary => Expr::col((salary::Entity, salary::Column::Salary)).max(),
                SortTarget::DeptName => {
                    Expr::col((department::Entity, department::Column::DeptName)).max()
                }
            };
            order.push((expr, spec.direction.clone()));
        }
        // Stable tie-break so page boundaries cannot shuffle between
        // identical requests.
        order.push((
            Expr::col((employee::Entity, employee::Column::EmpNo)).into(),
            Order::Asc,
        ));

        Self {
            employee_cond,
            salary_on,
            department_on,
            order,
        }
    }

    /// Base selection: employees with the plan's joins and WHERE applied.
    /// Both the paged query and the count query start from here.
    fn select(&self) -> Select<employee::Entity> {
        let mut query = employee::Entity::find();

        let salary_rel = employee::Relation::Salaries.def();
        query = match &self.salary_on {
            Some(restriction) => {
                let on = restriction.clone();
                query.join(
                    JoinType::InnerJoin,
                    salary_rel.on_condition(move |_left, _right| Condition::all().add(on.clone())),
                )
            }
            None => query.join(JoinType::LeftJoin, salary_rel),
        };

        let link_join = if self.department_on.is_some() {
            JoinType::InnerJoin
        } else {
            JoinType::LeftJoin
        };
        query = query.join(link_join, employee::Relation::DeptEmp.def());
        let dept_rel = dept_emp::Relation::Department.def();
        query = match &self.department_on {
            Some(restriction) => {
                let on = restriction.clone();
                query.join(
                    JoinType::InnerJoin,
                    dept_rel.on_condition(move |_left, _right| Condition::all().add(on.clone())),
                )
            }
            None => query.join(JoinType::LeftJoin, dept_rel),
        };

        query.filter(self.employee_cond.clone())
    }

    /// The paged data query: one row per employee (grouped on the key),
    /// ordered by the resolved sort plus tie-break, with offset/limit.
    #[must_use]
    pub fn paged_query(&self, page: PageParams) -> Select<employee::Entity> {
        let mut query = self.select().group_by(employee::Column::EmpNo);
        for (expr, direction) in &self.order {
            query = query.order_by(expr.clone(), direction.clone());
        }
        query.offset(page.offset()).limit(page.limit)
    }

    /// The count query: distinct employees surviving the same joins and
    /// filters. Distinct is load-bearing; one-to-many joins multiply rows.
    #[must_use]
    pub fn count_query(&self) -> Select<employee::Entity> {
        self.select().select_only().expr_as(
            Expr::col((employee::Entity, employee::Column::EmpNo)).count_distinct(),
            "total",
        )
    }

    pub async fn fetch_page(
        &self,
        page: PageParams,
        db: &DatabaseConnection,
    ) -> Result<Vec<employee::Model>, DbErr> {
        self.paged_query(page).all(db).await
    }

    pub async fn count(&self, db: &DatabaseConnection) -> Result<u64, DbErr> {
        let total: Option<i64> = self.count_query().into_tuple().one(db).await?;
        Ok(total.unwrap_or(0).max(0).unsigned_abs())
    }
}

/// AND together a scope's predicates, or `None` when the scope is
/// unrestricted.
fn conjoin(predicates: &[Predicate], backend: DbBackend) -> Option<SimpleExpr> {
    if predicates.is_empty() {
        return None;
    }
    Some(compile(&Predicate::And(predicates.to_vec()), backend))
}

/// The single translator from the store-agnostic predicate tree to Sea-ORM
/// expressions. Everything backend-specific funnels through here.
pub(crate) fn compile(predicate: &Predicate, backend: DbBackend) -> SimpleExpr {
    match predicate {
        Predicate::Contains { field, value } => {
            let pattern = format!("%{}%", escape_like(value).to_uppercase());
            Func::upper(field_expr(*field, backend))
                .like(LikeExpr::new(pattern).escape('\\'))
        }
        Predicate::Equals { field, value } => field_expr(*field, backend).eq(value.to_expr()),
        Predicate::Range { field, min, max } => {
            let target = field_expr(*field, backend);
            match (min, max) {
                (Some(lo), Some(hi)) => target.between(Expr::val(*lo), Expr::val(*hi)),
                (Some(lo), None) => target.gte(Expr::val(*lo)),
                (None, Some(hi)) => target.lte(Expr::val(*hi)),
                // The builder never emits an unbounded range; match-all keeps
                // the translator total.
                (None, None) => Expr::val(true).into(),
            }
        }
        Predicate::In { field, values } => {
            field_expr(*field, backend).is_in(values.iter().map(|v| Expr::val(v.clone())))
        }
        Predicate::And(branches) => branches
            .iter()
            .map(|p| compile(p, backend))
            .reduce(|acc, expr| acc.and(expr))
            .unwrap_or_else(|| Expr::val(true).into()),
        Predicate::Or(branches) => branches
            .iter()
            .map(|p| compile(p, backend))
            .reduce(|acc, expr| acc.or(expr))
            .unwrap_or_else(|| Expr::val(false).into()),
    }
}

fn field_expr(field: Field, backend: DbBackend) -> SimpleExpr {
    use crate::models::dept_manager;

    match field {
        Field::FirstName => Expr::col((employee::Entity, employee::Column::FirstName)).into(),
        Field::LastName => Expr::col((employee::Entity, employee::Column::LastName)).into(),
        Field::Age => age_expr(backend),
        Field::Salary => Expr::col((salary::Entity, salary::Column::Salary)).into(),
        Field::DeptName => Expr::col((department::Entity, department::Column::DeptName)).into(),
        Field::DeptNo => Expr::col((dept_manager::Entity, dept_manager::Column::DeptNo)).into(),
        Field::ManagerFromDate => {
            Expr::col((dept_manager::Entity, dept_manager::Column::FromDate)).into()
        }
    }
}

/// Age in whole years between `birth_date` and today, computed by the store.
/// Each backend gets its native date arithmetic.
fn age_expr(backend: DbBackend) -> SimpleExpr {
    let sql = match backend {
        DbBackend::MySql => "TIMESTAMPDIFF(YEAR, `employees`.`birth_date`, CURDATE())",
        DbBackend::Postgres => {
            "CAST(EXTRACT(YEAR FROM AGE(CURRENT_DATE, \"employees\".\"birth_date\")) AS integer)"
        }
        // Year difference, minus one if the birthday has not yet passed.
        DbBackend::Sqlite => {
            "(CAST(strftime('%Y', 'now') AS INTEGER) - CAST(strftime('%Y', \"employees\".\"birth_date\") AS INTEGER) - (strftime('%m-%d', 'now') < strftime('%m-%d', \"employees\".\"birth_date\")))"
        }
    };
    SimpleExpr::Custom(sql.to_owned())
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl Operand {
    fn to_expr(&self) -> Expr {
        match self {
            Self::Str(s) => Expr::val(s.clone()),
            Self::Int(i) => Expr::val(*i),
            Self::Date(d) => Expr::val(*d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::filter::split_departments;
    use sea_orm::QueryTrait;

    fn sql(query: &Select<employee::Entity>) -> String {
        query.build(DbBackend::Sqlite).to_string()
    }

    fn plan_for(filter: &EmployeeFilter, sort: Option<&SortSpec>) -> QueryPlan {
        QueryPlan::build(filter, sort, DbBackend::Sqlite)
    }

    #[test]
    fn unfiltered_plan_uses_left_joins() {
        let plan = plan_for(&EmployeeFilter::default(), None);
        let sql = sql(&plan.paged_query(PageParams::default()));
        assert!(sql.contains("LEFT JOIN \"salaries\""), "{sql}");
        assert!(sql.contains("LEFT JOIN \"dept_emp\""), "{sql}");
        assert!(sql.contains("LEFT JOIN \"departments\""), "{sql}");
        assert!(!sql.contains("INNER JOIN"), "{sql}");
    }

    #[test]
    fn salary_filter_restricts_inside_the_join() {
        let filter = EmployeeFilter::build(None, Some((40_000, 80_000)), None, None, &[]);
        let plan = plan_for(&filter, None);
        let sql = sql(&plan.paged_query(PageParams::default()));
        assert!(sql.contains("INNER JOIN \"salaries\""), "{sql}");
        assert!(sql.contains("BETWEEN 40000 AND 80000"), "{sql}");
    }

    #[test]
    fn department_filter_restricts_the_department_join() {
        let departments = split_departments(Some("Sales,Marketing"));
        let filter = EmployeeFilter::build(None, None, None, None, &departments);
        let plan = plan_for(&filter, None);
        let sql = sql(&plan.paged_query(PageParams::default()));
        assert!(sql.contains("INNER JOIN \"departments\""), "{sql}");
        assert!(sql.contains("IN ('Sales', 'Marketing')"), "{sql}");
    }

    #[test]
    fn data_and_count_queries_share_the_plan() {
        let filter = EmployeeFilter::build(Some("Sm"), Some((40_000, 80_000)), None, None, &[]);
        let plan = plan_for(&filter, None);
        let data_sql = sql(&plan.paged_query(PageParams::default()));
        let count_sql = sql(&plan.count_query());

        // Same joins, same WHERE; only projection/grouping/paging differ.
        for fragment in ["INNER JOIN \"salaries\"", "LIKE '%SM%'"] {
            assert!(data_sql.contains(fragment), "{data_sql}");
            assert!(count_sql.contains(fragment), "{count_sql}");
        }
        assert!(count_sql.contains("COUNT(DISTINCT"), "{count_sql}");
        assert!(!count_sql.contains("LIMIT"), "{count_sql}");
    }

    #[test]
    fn paged_query_applies_offset_limit_and_tiebreak() {
        let plan = plan_for(&EmployeeFilter::default(), None);
        let page = PageParams { page: 3, limit: 25 };
        let sql = sql(&plan.paged_query(page));
        assert!(sql.contains("LIMIT 25"), "{sql}");
        assert!(sql.contains("OFFSET 50"), "{sql}");
        assert!(sql.contains("ORDER BY \"employees\".\"emp_no\" ASC"), "{sql}");
        assert!(sql.contains("GROUP BY \"employees\".\"emp_no\""), "{sql}");
    }

    #[test]
    fn joined_sort_aggregates_per_employee() {
        let sort = SortSpec::resolve(Some("salary"), Some("DESC"))
            .unwrap()
            .unwrap();
        let plan = plan_for(&EmployeeFilter::default(), Some(&sort));
        let sql = sql(&plan.paged_query(PageParams::default()));
        assert!(sql.contains("MAX(\"salaries\".\"salary\") DESC"), "{sql}");
        // Tie-break still follows the primary sort key.
        assert!(
            sql.contains("MAX(\"salaries\".\"salary\") DESC, \"employees\".\"emp_no\" ASC"),
            "{sql}"
        );
    }

    #[test]
    fn age_bounds_compile_to_store_side_date_arithmetic() {
        let filter = EmployeeFilter::build(None, None, Some(30), None, &[]);
        let plan = plan_for(&filter, None);
        let sql = sql(&plan.paged_query(PageParams::default()));
        assert!(sql.contains("strftime"), "{sql}");
        assert!(sql.contains(">= 30"), "{sql}");
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_done"), "100\\%\\_done");
    }

    #[test]
    fn or_of_pairs_compiles_for_manager_lookup() {
        let pair = |dept: &str, date: chrono::NaiveDate| {
            Predicate::And(vec![
                Predicate::Equals {
                    field: Field::DeptNo,
                    value: Operand::Str(dept.to_string()),
                },
                Predicate::Equals {
                    field: Field::ManagerFromDate,
                    value: Operand::Date(date),
                },
            ])
        };
        let date = chrono::NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        let tree = Predicate::Or(vec![pair("d001", date), pair("d002", date)]);
        let expr = compile(&tree, DbBackend::Sqlite);
        let rendered = format!("{expr:?}");
        assert!(rendered.contains("d001"));
        assert!(rendered.contains("d002"));
    }
}
