use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::models::{AnswerOption, Difficulty};

/// Sea-ORM entity for the questions table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub subject_id: i32,
    #[sea_orm(column_type = "Text")]
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: AnswerOption,
    #[sea_orm(column_type = "Text", nullable)]
    pub explanation: Option<String>,
    pub difficulty_level: Difficulty,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Question {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            subject_id: model.subject_id,
            question_text: model.question_text,
            option_a: model.option_a,
            option_b: model.option_b,
            option_c: model.option_c,
            option_d: model.option_d,
            correct_answer: model.correct_answer,
            explanation: model.explanation,
            difficulty_level: model.difficulty_level,
            is_active: model.is_active,
            created_at: model.created_at.into(),
        }
    }
}

pub fn insert_model(question: &crate::models::Question) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        subject_id: Set(question.subject_id),
        question_text: Set(question.question_text.clone()),
        option_a: Set(question.option_a.clone()),
        option_b: Set(question.option_b.clone()),
        option_c: Set(question.option_c.clone()),
        option_d: Set(question.option_d.clone()),
        correct_answer: Set(question.correct_answer),
        explanation: Set(question.explanation.clone()),
        difficulty_level: Set(question.difficulty_level),
        is_active: Set(question.is_active),
        created_at: Set(question.created_at.into()),
    }
}

pub fn update_model(question: &crate::models::Question) -> ActiveModel {
    ActiveModel {
        id: Set(question.id),
        subject_id: Set(question.subject_id),
        question_text: Set(question.question_text.clone()),
        option_a: Set(question.option_a.clone()),
        option_b: Set(question.option_b.clone()),
        option_c: Set(question.option_c.clone()),
        option_d: Set(question.option_d.clone()),
        correct_answer: Set(question.correct_answer),
        explanation: Set(question.explanation.clone()),
        difficulty_level: Set(question.difficulty_level),
        is_active: Set(question.is_active),
        created_at: Set(question.created_at.into()),
    }
}
