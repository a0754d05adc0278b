use super::{is_unique_violation, search_term};
use crate::entities::{
    prelude::{Programs, Students},
    programs, students,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;

/// Values for a student keyed by `student_id`. Everything except the key is
/// applied only on creation.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub student_id: String,
    pub lastname: String,
    pub firstname: String,
    pub middlename: Option<String>,
    pub program_id: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub search: Option<String>,
    pub program_id: Option<i32>,
}

#[async_trait::async_trait]
pub trait StudentRepository: Send + Sync {
    async fn count(&self) -> Result<u64, DbErr>;

    async fn all_ids(&self) -> Result<Vec<i32>, DbErr>;

    async fn find_by_id(&self, id: i32) -> Result<Option<students::Model>, DbErr>;

    async fn find_by_student_id(&self, student_id: &str)
        -> Result<Option<students::Model>, DbErr>;

    /// Returns the student holding `params.student_id`, inserting it when
    /// absent. A concurrent insert of the same id resolves to the row that
    /// won, with the flag set to `false`.
    async fn get_or_create(&self, params: NewStudent) -> Result<(students::Model, bool), DbErr>;

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbErr>;

    /// Students with their program, ordered by last name then first name.
    async fn list(
        &self,
        query: &StudentListQuery,
    ) -> Result<Vec<(students::Model, Option<programs::Model>)>, DbErr>;
}

pub struct StudentRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl StudentRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl StudentRepository for StudentRepositoryImpl {
    async fn count(&self) -> Result<u64, DbErr> {
        Students::find().count(self.db.as_ref()).await
    }

    async fn all_ids(&self) -> Result<Vec<i32>, DbErr> {
        Students::find()
            .select_only()
            .column(students::Column::Id)
            .order_by_asc(students::Column::Id)
            .into_tuple::<i32>()
            .all(self.db.as_ref())
            .await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<students::Model>, DbErr> {
        Students::find_by_id(id).one(self.db.as_ref()).await
    }

    async fn find_by_student_id(
        &self,
        student_id: &str,
    ) -> Result<Option<students::Model>, DbErr> {
        Students::find()
            .filter(students::Column::StudentId.eq(student_id))
            .one(self.db.as_ref())
            .await
    }

    async fn get_or_create(&self, params: NewStudent) -> Result<(students::Model, bool), DbErr> {
        if let Some(existing) = self.find_by_student_id(&params.student_id).await? {
            return Ok((existing, false));
        }

        let NewStudent {
            student_id,
            lastname,
            firstname,
            middlename,
            program_id,
        } = params;

        let active = students::ActiveModel {
            student_id: Set(student_id.clone()),
            lastname: Set(lastname),
            firstname: Set(firstname),
            middlename: Set(middlename),
            program_id: Set(program_id),
            ..Default::default()
        };

        match active.insert(self.db.as_ref()).await {
            Ok(created) => Ok((created, true)),
            Err(err) if is_unique_violation(&err) => {
                match self.find_by_student_id(&student_id).await? {
                    Some(existing) => Ok((existing, false)),
                    None => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbErr> {
        let res = Students::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(res.rows_affected > 0)
    }

    async fn list(
        &self,
        query: &StudentListQuery,
    ) -> Result<Vec<(students::Model, Option<programs::Model>)>, DbErr> {
        let mut select = Students::find().find_also_related(Programs);

        if let Some(term) = search_term(query.search.as_deref()) {
            select = select.filter(
                Condition::any()
                    .add(students::Column::StudentId.contains(term))
                    .add(students::Column::Lastname.contains(term))
                    .add(students::Column::Firstname.contains(term)),
            );
        }

        if let Some(program_id) = query.program_id {
            select = select.filter(students::Column::ProgramId.eq(program_id));
        }

        select
            .order_by_asc(students::Column::Lastname)
            .order_by_asc(students::Column::Firstname)
            .all(self.db.as_ref())
            .await
    }
}
