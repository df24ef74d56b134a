//! Quiz and flashcard types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

impl Question {
    /// Whether the question can be answered: two or more options and a
    /// correct index that points at one of them.
    pub fn is_answerable(&self) -> bool {
        self.options.len() >= 2 && self.correct_answer_index < self.options.len()
    }
}

/// A question as the model returns it. The answer index is signed so that
/// a negative index fails validation instead of the whole quiz.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDraft {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer_index: i64,
}

impl QuestionDraft {
    /// The draft as a question, if its index is non-negative.
    pub fn into_question(self) -> Option<Question> {
        let correct_answer_index = usize::try_from(self.correct_answer_index).ok()?;
        Some(Question {
            id: 0,
            question: self.question,
            options: self.options,
            correct_answer_index,
        })
    }
}

/// Validate drafts one by one, then sanitize the survivors.
pub fn questions_from_drafts(drafts: Vec<QuestionDraft>) -> Vec<Question> {
    sanitize_questions(
        drafts
            .into_iter()
            .filter_map(QuestionDraft::into_question)
            .collect(),
    )
}

/// Drop unanswerable questions and renumber the rest from 1.
pub fn sanitize_questions(questions: Vec<Question>) -> Vec<Question> {
    questions
        .into_iter()
        .filter(Question::is_answerable)
        .enumerate()
        .map(|(i, mut q)| {
            q.id = i as u32 + 1;
            q
        })
        .collect()
}

/// A generated quiz. Every generation appends a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub document_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<Question>,
}

/// A term/definition pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub term: String,
    pub definition: String,
}

/// A generated flashcard deck. Every generation appends a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashcardDeck {
    pub id: i64,
    pub document_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub cards: Vec<Flashcard>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u32, options: usize, correct: usize) -> Question {
        Question {
            id,
            question: format!("Q{}", id),
            options: (0..options).map(|i| format!("option {}", i)).collect(),
            correct_answer_index: correct,
        }
    }

    #[test]
    fn test_sanitize_drops_out_of_range_and_renumbers() {
        let questions = vec![
            question(3, 4, 0),
            question(9, 4, 4),
            question(10, 1, 0),
            question(2, 4, 3),
        ];

        let kept = sanitize_questions(questions);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].id, 1);
        assert_eq!(kept[1].id, 2);
        assert_eq!(kept[1].correct_answer_index, 3);
        assert!(kept
            .iter()
            .all(|q| q.correct_answer_index < q.options.len()));
    }

    #[test]
    fn test_question_wire_shape() {
        let json = r#"{"id": 1, "question": "2+2?", "options": ["1","2","3","4"], "correct_answer_index": 3}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert!(q.is_answerable());
        assert_eq!(q.options[q.correct_answer_index], "4");
    }

    #[test]
    fn test_drafts_with_bad_indexes_are_dropped() {
        let drafts: Vec<QuestionDraft> = serde_json::from_str(
            r#"[
                {"question": "a?", "options": ["x", "y"], "correct_answer_index": -1},
                {"question": "b?", "correct_answer_index": 0},
                {"question": "c?", "options": ["x", "y", "z"], "correct_answer_index": 2}
            ]"#,
        )
        .unwrap();

        let kept = questions_from_drafts(drafts);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 1);
        assert_eq!(kept[0].question, "c?");
    }
}
