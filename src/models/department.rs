use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub dept_no: String,
    pub dept_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dept_emp::Entity")]
    DeptEmp,
    #[sea_orm(has_many = "super::dept_manager::Entity")]
    DeptManager,
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

impl ActiveModelBehavior for ActiveModel {}
