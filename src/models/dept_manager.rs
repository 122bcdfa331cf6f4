use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

/// Managerial assignment of an employee to a department. Same shape as
/// `dept_emp`; the maximum `from_date` per department marks the current
/// manager.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dept_manager")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub emp_no: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub dept_no: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmpNo",
        to = "super::employee::Column::EmpNo"
    )]
    Employee,
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DeptNo",
        to = "super::department::Column::DeptNo"
    )]
    Department,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
