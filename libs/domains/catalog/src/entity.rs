//! Sea-ORM entities for the catalog tables.

pub mod subject {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::{NotSet, Set};
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "subjects")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        #[sea_orm(column_type = "Text", nullable)]
        pub description: Option<String>,
        pub is_active: bool,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Subject {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
                description: model.description,
                is_active: model.is_active,
                created_at: model.created_at.into(),
            }
        }
    }

    pub fn insert_model(subject: &crate::models::Subject) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            name: Set(subject.name.clone()),
            description: Set(subject.description.clone()),
            is_active: Set(subject.is_active),
            created_at: Set(subject.created_at.into()),
        }
    }

    pub fn update_model(subject: &crate::models::Subject) -> ActiveModel {
        ActiveModel {
            id: Set(subject.id),
            name: Set(subject.name.clone()),
            description: Set(subject.description.clone()),
            is_active: Set(subject.is_active),
            created_at: Set(subject.created_at.into()),
        }
    }
}

pub mod enrollment {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::{NotSet, Set};
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "user_enrollments")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub user_id: i32,
        pub subject_id: i32,
        pub is_active: bool,
        pub enrolled_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Enrollment {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                user_id: model.user_id,
                subject_id: model.subject_id,
                is_active: model.is_active,
                enrolled_at: model.enrolled_at.into(),
            }
        }
    }

    pub fn insert_model(enrollment: &crate::models::Enrollment) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            user_id: Set(enrollment.user_id),
            subject_id: Set(enrollment.subject_id),
            is_active: Set(enrollment.is_active),
            enrolled_at: Set(enrollment.enrolled_at.into()),
        }
    }
}

pub mod content {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::{NotSet, Set};
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "subject_contents")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub subject_id: i32,
        pub title: String,
        #[sea_orm(column_type = "Text")]
        pub body: String,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::SubjectContent {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                subject_id: model.subject_id,
                title: model.title,
                body: model.body,
                created_at: model.created_at.into(),
            }
        }
    }

    pub fn insert_model(content: &crate::models::SubjectContent) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            subject_id: Set(content.subject_id),
            title: Set(content.title.clone()),
            body: Set(content.body.clone()),
            created_at: Set(content.created_at.into()),
        }
    }
}

pub mod lesson {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::{NotSet, Set};
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "lessons")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub content_id: i32,
        pub title: String,
        #[sea_orm(column_type = "Text")]
        pub body: String,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Lesson {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                content_id: model.content_id,
                title: model.title,
                body: model.body,
                created_at: model.created_at.into(),
            }
        }
    }

    pub fn insert_model(lesson: &crate::models::Lesson) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            content_id: Set(lesson.content_id),
            title: Set(lesson.title.clone()),
            body: Set(lesson.body.clone()),
            created_at: Set(lesson.created_at.into()),
        }
    }
}
