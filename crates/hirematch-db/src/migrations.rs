use rusqlite::Connection;
use tracing::info;

use crate::error::{DbError, Result};

const MIGRATIONS: &[(u32, &str)] = &[(1, V1_INITIAL)];

const V1_INITIAL: &str = "
    CREATE TABLE users (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        email           TEXT NOT NULL UNIQUE,
        password        TEXT NOT NULL,
        full_name       TEXT NOT NULL,
        role            TEXT NOT NULL CHECK (role IN ('employer', 'jobseeker')),
        company_name    TEXT,
        designation     TEXT,
        created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        updated_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );

    CREATE TABLE cvs (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id         INTEGER NOT NULL UNIQUE REFERENCES users(id),
        unique_id       TEXT NOT NULL UNIQUE,
        education       TEXT,
        experience      TEXT,
        skills          TEXT,
        created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        updated_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );

    CREATE TABLE jobs (
        id                  INTEGER PRIMARY KEY AUTOINCREMENT,
        employer_id         INTEGER NOT NULL REFERENCES users(id),
        title               TEXT NOT NULL,
        responsibilities    TEXT,
        requirements        TEXT,
        salary              TEXT,
        location            TEXT,
        job_type            TEXT,
        created_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        updated_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );

    CREATE INDEX idx_jobs_employer ON jobs(employer_id);

    CREATE TABLE cv_swipes (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        employer_id     INTEGER NOT NULL REFERENCES users(id),
        cv_id           INTEGER NOT NULL REFERENCES cvs(id),
        direction       TEXT NOT NULL CHECK (direction IN ('left', 'right')),
        created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        UNIQUE(employer_id, cv_id)
    );

    CREATE TABLE applications (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        job_id          INTEGER NOT NULL REFERENCES jobs(id),
        jobseeker_id    INTEGER NOT NULL REFERENCES users(id),
        status          TEXT NOT NULL DEFAULT 'pending'
                            CHECK (status IN ('pending', 'accepted', 'rejected')),
        created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        updated_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        UNIQUE(job_id, jobseeker_id)
    );

    CREATE INDEX idx_applications_jobseeker ON applications(jobseeker_id);

    CREATE TABLE conversations (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        employer_id     INTEGER NOT NULL REFERENCES users(id),
        jobseeker_id    INTEGER NOT NULL REFERENCES users(id),
        created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        UNIQUE(employer_id, jobseeker_id)
    );

    CREATE INDEX idx_conversations_jobseeker ON conversations(jobseeker_id);

    CREATE TABLE messages (
        id                  INTEGER PRIMARY KEY AUTOINCREMENT,
        conversation_id     INTEGER NOT NULL REFERENCES conversations(id),
        sender_id           INTEGER NOT NULL REFERENCES users(id),
        receiver_id         INTEGER NOT NULL REFERENCES users(id),
        body                TEXT NOT NULL,
        is_read             INTEGER NOT NULL DEFAULT 0,
        created_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );

    CREATE INDEX idx_messages_conversation ON messages(conversation_id, created_at);
    CREATE INDEX idx_messages_unread ON messages(receiver_id, is_read);
";

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let current: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    for &(version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        info!("Running migration v{}", version);
        conn.execute_batch(sql).map_err(|e| DbError::Migration {
            version,
            reason: e.to_string(),
        })?;
        conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rerun_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, MIGRATIONS.len() as i64);
    }
}
