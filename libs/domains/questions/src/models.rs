use chrono::{DateTime, Utc};
use sea_orm::{sea_query::StringLen, DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

/// Question difficulty tiers
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    #[sea_orm(string_value = "easy")]
    Easy,
    #[default]
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "hard")]
    Hard,
}

/// The four option labels a multiple-choice answer can point at
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")]
pub enum AnswerOption {
    #[sea_orm(string_value = "A")]
    A,
    #[sea_orm(string_value = "B")]
    B,
    #[sea_orm(string_value = "C")]
    C,
    #[sea_orm(string_value = "D")]
    D,
}

/// Question entity - matches the questions table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i32,
    pub subject_id: i32,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: AnswerOption,
    pub explanation: Option<String>,
    pub difficulty_level: Difficulty,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn from_create(input: CreateQuestion) -> Self {
        Self {
            id: 0,
            subject_id: input.subject_id,
            question_text: input.question_text,
            option_a: input.option_a,
            option_b: input.option_b,
            option_c: input.option_c,
            option_d: input.option_d,
            correct_answer: input.correct_answer,
            explanation: input.explanation,
            difficulty_level: input.difficulty_level,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn apply_update(&mut self, update: UpdateQuestion) {
        if let Some(question_text) = update.question_text {
            self.question_text = question_text;
        }
        if let Some(option_a) = update.option_a {
            self.option_a = option_a;
        }
        if let Some(option_b) = update.option_b {
            self.option_b = option_b;
        }
        if let Some(option_c) = update.option_c {
            self.option_c = option_c;
        }
        if let Some(option_d) = update.option_d {
            self.option_d = option_d;
        }
        if let Some(correct_answer) = update.correct_answer {
            self.correct_answer = correct_answer;
        }
        if let Some(explanation) = update.explanation {
            self.explanation = Some(explanation);
        }
        if let Some(difficulty_level) = update.difficulty_level {
            self.difficulty_level = difficulty_level;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
    }
}

/// Question DTO for learners: the correct answer is withheld
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub id: i32,
    pub subject_id: i32,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub explanation: Option<String>,
    pub difficulty_level: Difficulty,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            subject_id: question.subject_id,
            question_text: question.question_text,
            option_a: question.option_a,
            option_b: question.option_b,
            option_c: question.option_c,
            option_d: question.option_d,
            explanation: question.explanation,
            difficulty_level: question.difficulty_level,
            is_active: question.is_active,
            created_at: question.created_at,
        }
    }
}

/// Question DTO for the admin console, correct answer included
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionWithAnswer {
    pub id: i32,
    pub subject_id: i32,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: AnswerOption,
    pub explanation: Option<String>,
    pub difficulty_level: Difficulty,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Question> for QuestionWithAnswer {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            subject_id: question.subject_id,
            question_text: question.question_text,
            option_a: question.option_a,
            option_b: question.option_b,
            option_c: question.option_c,
            option_d: question.option_d,
            correct_answer: question.correct_answer,
            explanation: question.explanation,
            difficulty_level: question.difficulty_level,
            is_active: question.is_active,
            created_at: question.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestion {
    pub subject_id: i32,
    #[validate(length(min = 1))]
    pub question_text: String,
    #[validate(length(min = 1))]
    pub option_a: String,
    #[validate(length(min = 1))]
    pub option_b: String,
    #[validate(length(min = 1))]
    pub option_c: String,
    #[validate(length(min = 1))]
    pub option_d: String,
    pub correct_answer: AnswerOption,
    pub explanation: Option<String>,
    #[serde(default)]
    pub difficulty_level: Difficulty,
}

/// Allow-listed mutable fields for question updates. Edits never touch
/// historical attempts: correctness was frozen when each attempt was made.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateQuestion {
    #[validate(length(min = 1))]
    pub question_text: Option<String>,
    #[validate(length(min = 1))]
    pub option_a: Option<String>,
    #[validate(length(min = 1))]
    pub option_b: Option<String>,
    #[validate(length(min = 1))]
    pub option_c: Option<String>,
    #[validate(length(min = 1))]
    pub option_d: Option<String>,
    pub correct_answer: Option<AnswerOption>,
    pub explanation: Option<String>,
    pub difficulty_level: Option<Difficulty>,
    pub is_active: Option<bool>,
}

/// Query filters for listing questions
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionFilter {
    pub subject_id: Option<i32>,
    pub difficulty_level: Option<Difficulty>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for QuestionFilter {
    fn default() -> Self {
        Self {
            subject_id: None,
            difficulty_level: None,
            is_active: None,
            skip: 0,
            limit: default_limit(),
        }
    }
}

fn default_limit() -> u64 {
    100
}

/// One failed row in a bulk import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkImportFailure {
    /// Zero-based position in the submitted batch
    pub index: usize,
    pub error: String,
}

/// Outcome of a bulk import: valid rows are committed, failures are
/// reported per item. This is deliberately not all-or-nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkImportReport {
    pub imported: usize,
    pub failed: usize,
    pub failures: Vec<BulkImportFailure>,
}
