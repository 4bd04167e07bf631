use rand::seq::SliceRandom;
use rand::thread_rng;
use std::sync::Arc;
use thiserror::Error;

use crate::{Database, DatabaseError, NewQuestion, QuestionData};

/// Serves random question samples from the quiz bank
pub struct Quizzes<Db> {
    db: Arc<Db>,
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("invalid question: {0}")]
    InvalidQuestion(&'static str),
    /// No questions are tagged with the requested subject
    #[error("no questions found for subject {0}")]
    UnknownSubject(String),
    #[error(transparent)]
    Db(#[from] DatabaseError),
}

impl<Db> Quizzes<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self { db: db.clone() }
    }

    /// Returns a uniform sample of at most `count` questions for a subject,
    /// without replacement. The order varies between calls.
    pub async fn sample(&self, subject: &str, count: usize) -> Result<Vec<QuestionData>, QuizError> {
        let subject = subject.to_lowercase();
        let questions = self.db.questions_by_subject(&subject).await?;

        if questions.is_empty() {
            return Err(QuizError::UnknownSubject(subject));
        }

        let sampled = questions
            .choose_multiple(&mut thread_rng(), count)
            .cloned()
            .collect();

        Ok(sampled)
    }

    /// Adds a question to the bank. The subject is lower-cased at write time
    /// to keep lookups consistent.
    pub async fn add_question(&self, new_question: NewQuestion) -> Result<QuestionData, QuizError> {
        if new_question.options.is_empty() {
            return Err(QuizError::InvalidQuestion("options must not be empty"));
        }

        let option_count = new_question.options.len() as i64;
        if new_question.correct_answer < 0 || new_question.correct_answer >= option_count {
            return Err(QuizError::InvalidQuestion(
                "correct answer index is out of bounds",
            ));
        }

        let question = self
            .db
            .create_question(NewQuestion {
                subject: new_question.subject.to_lowercase(),
                ..new_question
            })
            .await?;

        Ok(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SqliteDatabase;
    use std::collections::HashSet;

    async fn quizzes() -> Quizzes<SqliteDatabase> {
        let db = Arc::new(
            SqliteDatabase::connect("sqlite::memory:")
                .await
                .expect("in-memory database connects"),
        );

        Quizzes::new(&db)
    }

    fn question(subject: &str, text: &str) -> NewQuestion {
        NewQuestion {
            subject: subject.to_string(),
            question: text.to_string(),
            options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            correct_answer: 0,
        }
    }

    #[tokio::test]
    async fn sample_returns_distinct_questions() {
        let quizzes = quizzes().await;

        for i in 0..20 {
            quizzes
                .add_question(question("java", &format!("Question {i}")))
                .await
                .unwrap();
        }

        let sampled = quizzes.sample("java", 15).await.unwrap();

        assert_eq!(sampled.len(), 15);
        assert!(sampled.iter().all(|q| q.subject == "java"));

        let ids: HashSet<_> = sampled.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), 15);
    }

    #[tokio::test]
    async fn sample_is_capped_by_the_bank_size() {
        let quizzes = quizzes().await;

        quizzes.add_question(question("java", "Only one")).await.unwrap();

        let sampled = quizzes.sample("java", 15).await.unwrap();
        assert_eq!(sampled.len(), 1);
    }

    #[tokio::test]
    async fn unknown_subject_errors() {
        let quizzes = quizzes().await;

        let result = quizzes.sample("rust", 15).await;

        assert!(matches!(result, Err(QuizError::UnknownSubject(s)) if s == "rust"));
    }

    #[tokio::test]
    async fn subjects_are_lower_cased_on_both_paths() {
        let quizzes = quizzes().await;

        quizzes.add_question(question("Java", "Cased")).await.unwrap();

        let sampled = quizzes.sample("JAVA", 15).await.unwrap();
        assert_eq!(sampled.len(), 1);
        assert_eq!(sampled[0].subject, "java");
    }

    #[tokio::test]
    async fn questions_without_options_are_rejected() {
        let quizzes = quizzes().await;

        let result = quizzes
            .add_question(NewQuestion {
                subject: "java".to_string(),
                question: "Empty".to_string(),
                options: vec![],
                correct_answer: 0,
            })
            .await;

        assert!(matches!(result, Err(QuizError::InvalidQuestion(_))));
    }

    #[tokio::test]
    async fn out_of_bounds_answers_are_rejected() {
        let quizzes = quizzes().await;

        let result = quizzes
            .add_question(NewQuestion {
                correct_answer: 3,
                ..question("java", "Out of bounds")
            })
            .await;

        assert!(matches!(result, Err(QuizError::InvalidQuestion(_))));
    }
}
