//! Shared test harness: an in-memory SQLite store seeded with a small,
//! hand-checkable personnel fixture.
//!
//! Birth dates are computed relative to today so age assertions stay stable:
//! an employee seeded at "36" had their 36th birthday about six months ago.

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chrono::{Months, NaiveDate, Utc};
use personnel_api::models::{department, dept_emp, dept_manager, employee, salary, title};
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema,
};
use serde_json::Value;
use tower::ServiceExt;

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    db.execute(backend.build(&schema.create_table_from_entity(employee::Entity)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(department::Entity)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(dept_emp::Entity)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(dept_manager::Entity)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(title::Entity)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(salary::Entity)))
        .await
        .unwrap();

    db
}

/// Seeded application router. Five employees across three departments:
///
/// | emp_no | name              | age | departments        | salaries       |
/// |--------|-------------------|-----|--------------------|----------------|
/// | 1001   | Georgi Smith      | 36  | d003 old, d001 now | 50000, 60000   |
/// | 1002   | Bezalel Smoth     | 41  | d002               | 75000          |
/// | 1003   | Parto Jones       | 25  | d003               | 40000          |
/// | 1004   | Chirstian Koblick | 51  | d001               | 90000          |
/// | 1005   | Kyoichi Maliniak  | 31  | d002               | 55000          |
pub async fn seeded_app() -> Router {
    let db = setup_db().await;
    seed(&db).await;
    personnel_api::router(db)
}

pub fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

const OPEN_END: (i32, u32, u32) = (9999, 1, 1);

fn open_end() -> NaiveDate {
    d(OPEN_END.0, OPEN_END.1, OPEN_END.2)
}

/// A birth date making the employee exactly `years` old today, with the
/// birthday roughly six months behind us.
fn born_years_ago(years: u32) -> NaiveDate {
    Utc::now().date_naive() - Months::new(years * 12 + 6)
}

async fn seed(db: &DatabaseConnection) {
    let dept = |no: &str, name: &str| department::ActiveModel {
        dept_no: Set(no.to_string()),
        dept_name: Set(name.to_string()),
    };
    department::Entity::insert_many(vec![
        dept("d001", "Sales"),
        dept("d002", "Marketing"),
        dept("d003", "Development"),
    ])
    .exec(db)
    .await
    .unwrap();

    let emp = |emp_no: i32, first: &str, last: &str, age: u32| employee::ActiveModel {
        emp_no: Set(emp_no),
        first_name: Set(first.to_string()),
        last_name: Set(last.to_string()),
        birth_date: Set(born_years_ago(age)),
    };
    employee::Entity::insert_many(vec![
        emp(1001, "Georgi", "Smith", 36),
        emp(1002, "Bezalel", "Smoth", 41),
        emp(1003, "Parto", "Jones", 25),
        emp(1004, "Chirstian", "Koblick", 51),
        emp(1005, "Kyoichi", "Maliniak", 31),
    ])
    .exec(db)
    .await
    .unwrap();

    let link = |emp_no: i32, dept_no: &str, from: NaiveDate, to: NaiveDate| dept_emp::ActiveModel {
        emp_no: Set(emp_no),
        dept_no: Set(dept_no.to_string()),
        from_date: Set(from),
        to_date: Set(to),
    };
    dept_emp::Entity::insert_many(vec![
        link(1001, "d003", d(2015, 6, 1), d(2018, 2, 1)),
        link(1001, "d001", d(2018, 2, 1), open_end()),
        link(1002, "d002", d(2010, 3, 1), open_end()),
        link(1003, "d003", d(2012, 9, 1), open_end()),
        link(1004, "d001", d(2000, 1, 1), open_end()),
        link(1005, "d002", d(2014, 5, 1), open_end()),
    ])
    .exec(db)
    .await
    .unwrap();

    let mgr =
        |emp_no: i32, dept_no: &str, from: NaiveDate, to: NaiveDate| dept_manager::ActiveModel {
            emp_no: Set(emp_no),
            dept_no: Set(dept_no.to_string()),
            from_date: Set(from),
            to_date: Set(to),
        };
    dept_manager::Entity::insert_many(vec![
        mgr(1004, "d001", d(2000, 1, 1), d(2018, 2, 1)),
        mgr(1001, "d001", d(2018, 2, 1), open_end()),
        mgr(1002, "d002", d(2010, 3, 1), open_end()),
        mgr(1003, "d003", d(2012, 9, 1), open_end()),
    ])
    .exec(db)
    .await
    .unwrap();

    let job = |emp_no: i32, name: &str, from: NaiveDate, to: Option<NaiveDate>| {
        title::ActiveModel {
            emp_no: Set(emp_no),
            title: Set(name.to_string()),
            from_date: Set(from),
            to_date: Set(to),
        }
    };
    title::Entity::insert_many(vec![
        job(1001, "Engineer", d(2015, 6, 1), Some(d(2018, 6, 1))),
        job(1001, "Senior Engineer", d(2018, 6, 1), None),
        job(1002, "Manager", d(2010, 3, 1), None),
        job(1003, "Engineer", d(2012, 9, 1), None),
        job(1004, "Senior Staff", d(2000, 1, 1), None),
        job(1005, "Staff", d(2014, 5, 1), None),
    ])
    .exec(db)
    .await
    .unwrap();

    let pay = |emp_no: i32, amount: i32, from: NaiveDate, to: NaiveDate| salary::ActiveModel {
        emp_no: Set(emp_no),
        salary: Set(amount),
        from_date: Set(from),
        to_date: Set(to),
    };
    salary::Entity::insert_many(vec![
        pay(1001, 50_000, d(2015, 6, 1), d(2018, 6, 1)),
        pay(1001, 60_000, d(2018, 6, 1), open_end()),
        pay(1002, 75_000, d(2010, 3, 1), open_end()),
        pay(1003, 40_000, d(2012, 9, 1), open_end()),
        pay(1004, 90_000, d(2000, 1, 1), open_end()),
        pay(1005, 55_000, d(2014, 5, 1), open_end()),
    ])
    .exec(db)
    .await
    .unwrap();
}

/// One-shot GET returning the status and parsed JSON body.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
