//! Post entity for SeaORM. Comments are embedded as a JSONB document.

use sea_orm::entity::prelude::*;
use sea_orm::{FromJsonQueryResult, Set};
use serde::{Deserialize, Serialize};

use quill_core::domain::{Comment, ReadTime};

/// The embedded comment collection, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StoredComments(pub Vec<Comment>);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category: String,
    pub title: String,
    pub cover: Option<String>,
    pub read_time_value: i32,
    pub read_time_unit: String,
    /// Author email.
    pub author: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub comments: StoredComments,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for quill_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            category: model.category,
            title: model.title,
            cover: model.cover,
            read_time: ReadTime {
                value: u32::try_from(model.read_time_value).unwrap_or(1),
                unit: model.read_time_unit,
            },
            author: model.author,
            content: model.content,
            comments: model.comments.0,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<quill_core::domain::Post> for ActiveModel {
    fn from(post: quill_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            category: Set(post.category),
            title: Set(post.title),
            cover: Set(post.cover),
            read_time_value: Set(i32::try_from(post.read_time.value).unwrap_or(i32::MAX)),
            read_time_unit: Set(post.read_time.unit),
            author: Set(post.author),
            content: Set(post.content),
            comments: Set(StoredComments(post.comments)),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
