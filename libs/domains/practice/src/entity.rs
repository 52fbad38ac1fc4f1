//! Sea-ORM entities for the practice tables.

pub mod session {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::{NotSet, Set};
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "practice_sessions")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub user_id: i32,
        pub subject_id: i32,
        #[sea_orm(column_type = "Double")]
        pub score: f64,
        pub total_questions: i32,
        pub correct_answers: i32,
        pub time_taken: i32,
        pub completed_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::PracticeSession {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                user_id: model.user_id,
                subject_id: model.subject_id,
                score: model.score,
                total_questions: model.total_questions,
                correct_answers: model.correct_answers,
                time_taken: model.time_taken,
                completed_at: model.completed_at.into(),
            }
        }
    }

    pub fn insert_model(session: &crate::models::PracticeSession) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            user_id: Set(session.user_id),
            subject_id: Set(session.subject_id),
            score: Set(session.score),
            total_questions: Set(session.total_questions),
            correct_answers: Set(session.correct_answers),
            time_taken: Set(session.time_taken),
            completed_at: Set(session.completed_at.into()),
        }
    }

    pub fn update_model(session: &crate::models::PracticeSession) -> ActiveModel {
        ActiveModel {
            id: Set(session.id),
            user_id: Set(session.user_id),
            subject_id: Set(session.subject_id),
            score: Set(session.score),
            total_questions: Set(session.total_questions),
            correct_answers: Set(session.correct_answers),
            time_taken: Set(session.time_taken),
            completed_at: Set(session.completed_at.into()),
        }
    }
}

pub mod attempt {
    use domain_questions::AnswerOption;
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::{NotSet, Set};
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "question_attempts")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub user_id: i32,
        pub question_id: i32,
        pub session_id: i32,
        pub selected_answer: AnswerOption,
        pub is_correct: bool,
        pub time_taken: i32,
        pub attempted_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::QuestionAttempt {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                user_id: model.user_id,
                question_id: model.question_id,
                session_id: model.session_id,
                selected_answer: model.selected_answer,
                is_correct: model.is_correct,
                time_taken: model.time_taken,
                attempted_at: model.attempted_at.into(),
            }
        }
    }

    pub fn insert_model(attempt: &crate::models::QuestionAttempt) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            user_id: Set(attempt.user_id),
            question_id: Set(attempt.question_id),
            session_id: Set(attempt.session_id),
            selected_answer: Set(attempt.selected_answer),
            is_correct: Set(attempt.is_correct),
            time_taken: Set(attempt.time_taken),
            attempted_at: Set(attempt.attempted_at.into()),
        }
    }
}
