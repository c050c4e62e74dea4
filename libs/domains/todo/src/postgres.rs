use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use crate::{
    entity,
    error::{TaskError, TaskResult},
    models::{NewTask, Task},
    repository::TaskRepository,
};

#[derive(Clone)]
pub struct PgTaskRepository {
    db: DatabaseConnection,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, input: NewTask) -> TaskResult<Task> {
        let active_model: entity::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(task_id = model.id, "Created task");
        Ok(model.into())
    }

    async fn update(&self, task: Task) -> TaskResult<Task> {
        let changes = entity::ActiveModel {
            title: Set(task.title),
            description: Set(task.description),
            completed: Set(task.completed),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let result = entity::Entity::update_many()
            .set(changes)
            .filter(entity::Column::Id.eq(task.id))
            .filter(entity::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(TaskError::NotFound(task.id));
        }

        tracing::info!(task_id = task.id, "Updated task");
        self.find_by_id(task.id).await
    }

    async fn find_all(&self) -> TaskResult<Vec<Task>> {
        let models = entity::Entity::find()
            .filter(entity::Column::DeletedAt.is_null())
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i64) -> TaskResult<Task> {
        entity::Entity::find_by_id(id)
            .filter(entity::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .map(Into::into)
            .ok_or(TaskError::NotFound(id))
    }
}
