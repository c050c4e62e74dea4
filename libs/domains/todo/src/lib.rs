//! Todo Domain
//!
//! ```text
//! ┌─────────────┐
//! │ TaskService │  ← validation, complete = find + flip + update
//! └──────┬──────┘
//!        │
//! ┌──────▼─────────┐
//! │ TaskRepository │  ← trait; PgTaskRepository over SeaORM
//! └──────┬─────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Task, NewTask, entity
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_todo::{NewTask, PgTaskRepository, TaskService};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//! let service = TaskService::new(PgTaskRepository::new(db));
//! let task = service.add_task(NewTask::new("Buy milk", "")).await?;
//! service.complete_task(task.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{TaskError, TaskResult};
pub use models::{NewTask, Task};
pub use postgres::PgTaskRepository;
pub use repository::TaskRepository;
pub use service::TaskService;
