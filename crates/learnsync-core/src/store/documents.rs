//! Document rows.

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_json, parse_text, parse_timestamp, SqliteStore};
use crate::error::{LearnSyncError, LearnSyncResult};
use crate::types::{Document, KeyConcept, NewDocument, Page};

const DOCUMENT_COLUMNS: &str = "id, filename, stored_name, file_path, upload_date, media_type, \
     extracted_text, language, summary, key_concepts, owner_id, course_id";

fn row_to_document(row: &Row<'_>) -> rusqlite::Result<Document> {
    let upload_date: String = row.get(4)?;
    let media_type: String = row.get(5)?;
    let language: String = row.get(7)?;
    let key_concepts: Option<String> = row.get(9)?;

    Ok(Document {
        id: row.get(0)?,
        filename: row.get(1)?,
        stored_name: row.get(2)?,
        file_path: row.get(3)?,
        upload_date: parse_timestamp(4, &upload_date)?,
        media_kind: parse_text(5, &media_type)?,
        extracted_text: row.get(6)?,
        language: parse_text(7, &language)?,
        summary: row.get(8)?,
        key_concepts: key_concepts
            .map(|raw| parse_json::<Vec<KeyConcept>>(9, &raw))
            .transpose()?,
        owner_id: row.get(10)?,
        course_id: row.get(11)?,
    })
}

impl SqliteStore {
    /// Insert a fully populated document in one statement.
    pub fn insert_document(&self, doc: &NewDocument) -> LearnSyncResult<Document> {
        let conn = self.conn()?;
        let upload_date = Utc::now();
        let media_type: &'static str = doc.media_kind.into();
        let language: &'static str = doc.language.into();

        conn.execute(
            "INSERT INTO documents
             (filename, stored_name, file_path, upload_date, media_type, extracted_text, language, owner_id, course_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                doc.filename,
                doc.stored_name,
                doc.file_path,
                upload_date.to_rfc3339(),
                media_type,
                doc.extracted_text,
                language,
                doc.owner_id,
                doc.course_id
            ],
        )?;

        Ok(Document {
            id: conn.last_insert_rowid(),
            filename: doc.filename.clone(),
            stored_name: doc.stored_name.clone(),
            file_path: doc.file_path.clone(),
            upload_date,
            media_kind: doc.media_kind,
            extracted_text: doc.extracted_text.clone(),
            language: doc.language,
            summary: None,
            key_concepts: None,
            owner_id: doc.owner_id,
            course_id: doc.course_id,
        })
    }

    /// Get a document if it exists and belongs to `owner_id`.
    pub fn get_document(&self, id: i64, owner_id: i64) -> LearnSyncResult<Option<Document>> {
        let conn = self.conn()?;
        let doc = conn
            .query_row(
                &format!(
                    "SELECT {} FROM documents WHERE id = ?1 AND owner_id = ?2",
                    DOCUMENT_COLUMNS
                ),
                params![id, owner_id],
                row_to_document,
            )
            .optional()?;
        Ok(doc)
    }

    /// List a user's documents in upload order.
    pub fn list_documents(&self, owner_id: i64, page: Page) -> LearnSyncResult<Vec<Document>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM documents WHERE owner_id = ?1 ORDER BY id LIMIT ?2 OFFSET ?3",
            DOCUMENT_COLUMNS
        ))?;
        let docs = stmt
            .query_map(params![owner_id, page.limit, page.skip], row_to_document)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(docs)
    }

    /// List the documents filed under a course.
    pub fn list_course_documents(
        &self,
        course_id: i64,
        owner_id: i64,
    ) -> LearnSyncResult<Vec<Document>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM documents WHERE course_id = ?1 AND owner_id = ?2 ORDER BY id",
            DOCUMENT_COLUMNS
        ))?;
        let docs = stmt
            .query_map(params![course_id, owner_id], row_to_document)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(docs)
    }

    /// Overwrite a document's summary and key concepts.
    pub fn set_analysis(
        &self,
        id: i64,
        summary: &str,
        key_concepts: &[KeyConcept],
    ) -> LearnSyncResult<()> {
        let conn = self.conn()?;
        let concepts_json = serde_json::to_string(key_concepts)?;

        let changed = conn.execute(
            "UPDATE documents SET summary = ?1, key_concepts = ?2 WHERE id = ?3",
            params![summary, concepts_json, id],
        )?;
        if changed == 0 {
            return Err(LearnSyncError::document_not_found());
        }
        Ok(())
    }
}
