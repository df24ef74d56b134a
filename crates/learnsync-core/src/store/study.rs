//! Append-only quiz and flashcard history.

use chrono::Utc;
use rusqlite::{params, Row};

use super::{parse_json, parse_timestamp, SqliteStore};
use crate::error::LearnSyncResult;
use crate::types::{Flashcard, FlashcardDeck, Question, Quiz};

fn row_to_quiz(row: &Row<'_>) -> rusqlite::Result<Quiz> {
    let questions: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    Ok(Quiz {
        id: row.get(0)?,
        document_id: row.get(1)?,
        title: row.get(2)?,
        questions: parse_json(3, &questions)?,
        created_at: parse_timestamp(4, &created_at)?,
    })
}

fn row_to_deck(row: &Row<'_>) -> rusqlite::Result<FlashcardDeck> {
    let cards: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    Ok(FlashcardDeck {
        id: row.get(0)?,
        document_id: row.get(1)?,
        title: row.get(2)?,
        cards: parse_json(3, &cards)?,
        created_at: parse_timestamp(4, &created_at)?,
    })
}

impl SqliteStore {
    /// Append a quiz for a document.
    pub fn insert_quiz(
        &self,
        document_id: i64,
        title: &str,
        questions: &[Question],
    ) -> LearnSyncResult<Quiz> {
        let conn = self.conn()?;
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO quizzes (document_id, title, questions, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                document_id,
                title,
                serde_json::to_string(questions)?,
                created_at.to_rfc3339()
            ],
        )?;

        Ok(Quiz {
            id: conn.last_insert_rowid(),
            document_id,
            title: title.to_string(),
            created_at,
            questions: questions.to_vec(),
        })
    }

    /// Quizzes generated for a document, newest first.
    pub fn list_quizzes(&self, document_id: i64) -> LearnSyncResult<Vec<Quiz>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, document_id, title, questions, created_at
             FROM quizzes WHERE document_id = ?1 ORDER BY id DESC",
        )?;
        let quizzes = stmt
            .query_map(params![document_id], row_to_quiz)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(quizzes)
    }

    /// Append a flashcard deck for a document.
    pub fn insert_flashcard_deck(
        &self,
        document_id: i64,
        title: &str,
        cards: &[Flashcard],
    ) -> LearnSyncResult<FlashcardDeck> {
        let conn = self.conn()?;
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO flashcard_decks (document_id, title, cards, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                document_id,
                title,
                serde_json::to_string(cards)?,
                created_at.to_rfc3339()
            ],
        )?;

        Ok(FlashcardDeck {
            id: conn.last_insert_rowid(),
            document_id,
            title: title.to_string(),
            created_at,
            cards: cards.to_vec(),
        })
    }

    /// Flashcard decks generated for a document, newest first.
    pub fn list_flashcard_decks(&self, document_id: i64) -> LearnSyncResult<Vec<FlashcardDeck>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, document_id, title, cards, created_at
             FROM flashcard_decks WHERE document_id = ?1 ORDER BY id DESC",
        )?;
        let decks = stmt
            .query_map(params![document_id], row_to_deck)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(decks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Language, MediaKind, NewDocument, NewUser};

    fn setup() -> (SqliteStore, i64) {
        let store = SqliteStore::in_memory().unwrap();
        let owner = store
            .create_user(&NewUser {
                email: "s@example.com".to_string(),
                full_name: "S".to_string(),
                password_hash: "h".to_string(),
                preferred_language: Language::En,
            })
            .unwrap()
            .id;
        let doc = store
            .insert_document(&NewDocument {
                filename: "a.pdf".to_string(),
                stored_name: "x_a.pdf".to_string(),
                file_path: "/tmp/x_a.pdf".to_string(),
                media_kind: MediaKind::Pdf,
                extracted_text: Some("text".to_string()),
                language: Language::En,
                owner_id: owner,
                course_id: None,
            })
            .unwrap();
        (store, doc.id)
    }

    #[test]
    fn test_quiz_history_is_append_only() {
        let (store, doc_id) = setup();
        let q = Question {
            id: 1,
            question: "?".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer_index: 2,
        };

        let first = store.insert_quiz(doc_id, "Quiz for a.pdf", &[q.clone()]).unwrap();
        let second = store.insert_quiz(doc_id, "Quiz for a.pdf", &[]).unwrap();

        let history = store.list_quizzes(doc_id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);
        assert_eq!(history[1].questions, vec![q]);
    }

    #[test]
    fn test_flashcard_history() {
        let (store, doc_id) = setup();
        let cards = vec![Flashcard {
            term: "Mitosis".to_string(),
            definition: "Cell division".to_string(),
        }];

        store
            .insert_flashcard_deck(doc_id, "Flashcards for a.pdf", &cards)
            .unwrap();

        let decks = store.list_flashcard_decks(doc_id).unwrap();
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].cards, cards);
        assert!(store.list_flashcard_decks(doc_id + 1).unwrap().is_empty());
    }
}
