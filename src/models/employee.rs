use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub emp_no: i32,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dept_emp::Entity")]
    DeptEmp,
    #[sea_orm(has_many = "super::dept_manager::Entity")]
    DeptManager,
    #[sea_orm(has_many = "super::title::Entity")]
    Titles,
    #[sea_orm(has_many = "super::salary::Entity")]
    Salaries,
}

impl Related<super::dept_emp::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeptEmp.def()
    }
}

impl Related<super::dept_manager::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeptManager.def()
    }
}

impl Related<super::title::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Titles.def()
    }
}

impl Related<super::salary::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Salaries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
