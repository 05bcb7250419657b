// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Cursor-paged product questions with their answers.

use crate::models::pagination::QuestionSort;
use crate::models::question::{AnswerRow, Question, QuestionRow};
use crate::query::{
    apply_cursor, fetch_page, CursorValue, OrderSpec, Page, PageQuery, Predicate, QueryError,
    QueryExecutor, SortDir, SqlValue,
};
use crate::services::db_error;
use sqlx::PgPool;

const QUESTION_PROJECTION: &str = "q.question_id AS question_id, \
     q.question_text AS question_text, q.question_date AS question_date, \
     q.upvotes AS upvotes, q.downvotes AS downvotes, u.name AS user_name";

const QUESTION_FROM: &str = "questions q INNER JOIN \"user\" u ON q.user_id = u.id";

fn question_order(sort: QuestionSort) -> OrderSpec {
    let expr = match sort {
        QuestionSort::Votes => "q.upvotes",
        QuestionSort::Recent => "q.question_date",
    };
    OrderSpec {
        expr,
        dir: SortDir::Desc,
        aggregate: false,
        tiebreak: "q.question_id",
    }
}

fn question_cursor_value(sort: QuestionSort, row: &QuestionRow) -> CursorValue {
    match sort {
        QuestionSort::Votes => CursorValue::Int(i64::from(row.upvotes)),
        QuestionSort::Recent => CursorValue::Timestamp(row.question_date.timestamp_micros()),
    }
}

pub async fn question_page<E>(
    executor: &E,
    product_id: i64,
    sort: QuestionSort,
    page_size: i64,
    cursor: Option<&str>,
) -> Result<Page<QuestionRow>, QueryError>
where
    E: QueryExecutor<QuestionRow> + ?Sized,
{
    let mut query = PageQuery {
        projection: QUESTION_PROJECTION,
        from: QUESTION_FROM.to_string(),
        filters: vec![Predicate::Eq {
            column: "q.product_id",
            value: SqlValue::Int(product_id),
        }],
        having: Vec::new(),
        group_by: None,
        order: question_order(sort),
        bound: None,
        limit: page_size,
    };
    apply_cursor(&mut query, cursor, sort.tag())?;
    fetch_page(executor, query, sort.tag(), |row| {
        (i64::from(row.question_id), question_cursor_value(sort, row))
    })
    .await
}

/// Attach answers to emitted questions, best answer first, then by upvotes.
pub async fn attach_answers(
    pool: &PgPool,
    rows: Vec<QuestionRow>,
) -> Result<Vec<Question>, QueryError> {
    let mut questions = Vec::with_capacity(rows.len());
    for question in rows {
        let answers: Vec<AnswerRow> = sqlx::query_as(
            "SELECT a.answer_id AS answer_id, a.answer_text AS answer_text, \
                    a.answer_date AS answer_date, a.is_best_answer AS is_best_answer, \
                    a.is_verified_purchase AS is_verified_purchase, a.upvotes AS upvotes, \
                    a.downvotes AS downvotes, u.name AS user_name \
             FROM answers a INNER JOIN \"user\" u ON a.user_id = u.id \
             WHERE a.question_id = $1 \
             ORDER BY a.is_best_answer DESC, a.upvotes DESC",
        )
        .bind(question.question_id)
        .fetch_all(pool)
        .await
        .map_err(db_error)?;
        questions.push(Question { question, answers });
    }
    Ok(questions)
}
