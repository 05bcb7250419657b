// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::pagination::{PageMeta, QuestionSort};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionListParams {
    pub sort_by: Option<QuestionSort>,
    pub page_size: Option<i64>,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRow {
    pub question_id: i32,
    pub question_text: String,
    pub question_date: DateTime<Utc>,
    pub upvotes: i32,
    pub downvotes: i32,
    pub user_name: String,
}

#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRow {
    pub answer_id: i32,
    pub answer_text: String,
    pub answer_date: DateTime<Utc>,
    pub is_best_answer: bool,
    pub is_verified_purchase: bool,
    pub upvotes: i32,
    pub downvotes: i32,
    pub user_name: String,
}

/// A question with its answers, best answer first.
#[derive(Debug, Serialize)]
pub struct Question {
    #[serde(flatten)]
    pub question: QuestionRow,
    pub answers: Vec<AnswerRow>,
}

#[derive(Debug, Serialize)]
pub struct PagedQuestions {
    pub questions: Vec<Question>,
    pub pagination: PageMeta,
}
