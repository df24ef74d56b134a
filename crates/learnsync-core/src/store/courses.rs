//! Course rows.

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_timestamp, SqliteStore};
use crate::error::LearnSyncResult;
use crate::types::Course;

fn row_to_course(row: &Row<'_>) -> rusqlite::Result<Course> {
    let created_at: String = row.get(2)?;
    Ok(Course {
        id: row.get(0)?,
        title: row.get(1)?,
        created_at: parse_timestamp(2, &created_at)?,
        owner_id: row.get(3)?,
    })
}

impl SqliteStore {
    /// Create a course owned by `owner_id`.
    pub fn create_course(&self, owner_id: i64, title: &str) -> LearnSyncResult<Course> {
        let conn = self.conn()?;
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO courses (title, created_at, owner_id) VALUES (?1, ?2, ?3)",
            params![title, created_at.to_rfc3339(), owner_id],
        )?;

        Ok(Course {
            id: conn.last_insert_rowid(),
            title: title.to_string(),
            created_at,
            owner_id,
        })
    }

    /// List the courses owned by a user, oldest first.
    pub fn list_courses(&self, owner_id: i64) -> LearnSyncResult<Vec<Course>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, created_at, owner_id FROM courses WHERE owner_id = ?1 ORDER BY id",
        )?;
        let courses = stmt
            .query_map(params![owner_id], row_to_course)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(courses)
    }

    /// Get a course if it exists and belongs to `owner_id`.
    pub fn get_course(&self, id: i64, owner_id: i64) -> LearnSyncResult<Option<Course>> {
        let conn = self.conn()?;
        let course = conn
            .query_row(
                "SELECT id, title, created_at, owner_id FROM courses WHERE id = ?1 AND owner_id = ?2",
                params![id, owner_id],
                row_to_course,
            )
            .optional()?;
        Ok(course)
    }
}
