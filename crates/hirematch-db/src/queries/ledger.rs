use hirematch_types::api::{CandidateConversation, EmployerConversation};
use rusqlite::{OptionalExtension, params};

use crate::Database;
use crate::error::Result;
use crate::models::{ConversationRow, MessageRow, time_col};

impl Database {
    // -- Conversations --

    /// Looks up a conversation only if `user_id` is one of its two participants.
    pub fn get_conversation_for(&self, conversation_id: i64, user_id: i64) -> Result<Option<ConversationRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, employer_id, jobseeker_id, created_at FROM conversations
                     WHERE id = ?1 AND (employer_id = ?2 OR jobseeker_id = ?2)",
                    [conversation_id, user_id],
                    |row| {
                        Ok(ConversationRow {
                            id: row.get(0)?,
                            employer_id: row.get(1)?,
                            jobseeker_id: row.get(2)?,
                            created_at: time_col(row, 3)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn count_conversations_between(&self, employer_id: i64, jobseeker_id: i64) -> Result<i64> {
        self.with_conn(|conn| {
            let n = conn.query_row(
                "SELECT COUNT(*) FROM conversations WHERE employer_id = ?1 AND jobseeker_id = ?2",
                [employer_id, jobseeker_id],
                |row| row.get(0),
            )?;
            Ok(n)
        })
    }

    /// The employer's conversations, newest first, keyed by the candidate's CV
    /// `unique_id`. The candidate's user row is never read.
    pub fn list_conversations_for_employer(&self, employer_id: i64) -> Result<Vec<CandidateConversation>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.created_at, cv.unique_id
                 FROM conversations c
                 LEFT JOIN cvs cv ON cv.user_id = c.jobseeker_id
                 WHERE c.employer_id = ?1
                 ORDER BY c.created_at DESC, c.id DESC",
            )?;

            let rows = stmt
                .query_map([employer_id], |row| {
                    Ok(CandidateConversation {
                        id: row.get(0)?,
                        created_at: time_col(row, 1)?,
                        unique_id: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// The jobseeker's conversations, newest first, with the employer's profile.
    pub fn list_conversations_for_jobseeker(&self, jobseeker_id: i64) -> Result<Vec<EmployerConversation>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.created_at, u.full_name, u.email, u.company_name, u.designation
                 FROM conversations c
                 JOIN users u ON u.id = c.employer_id
                 WHERE c.jobseeker_id = ?1
                 ORDER BY c.created_at DESC, c.id DESC",
            )?;

            let rows = stmt
                .query_map([jobseeker_id], |row| {
                    Ok(EmployerConversation {
                        id: row.get(0)?,
                        created_at: time_col(row, 1)?,
                        full_name: row.get(2)?,
                        email: row.get(3)?,
                        company_name: row.get(4)?,
                        designation: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Messages --

    pub fn insert_message(
        &self,
        conversation_id: i64,
        sender_id: i64,
        receiver_id: i64,
        body: &str,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (conversation_id, sender_id, receiver_id, body)
                 VALUES (?1, ?2, ?3, ?4)",
                params![conversation_id, sender_id, receiver_id, body],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Full history of a conversation, oldest first.
    pub fn list_messages(&self, conversation_id: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, conversation_id, sender_id, receiver_id, body, is_read, created_at
                 FROM messages
                 WHERE conversation_id = ?1
                 ORDER BY created_at ASC, id ASC",
            )?;

            let rows = stmt
                .query_map([conversation_id], |row| {
                    Ok(MessageRow {
                        id: row.get(0)?,
                        conversation_id: row.get(1)?,
                        sender_id: row.get(2)?,
                        receiver_id: row.get(3)?,
                        body: row.get(4)?,
                        is_read: row.get(5)?,
                        created_at: time_col(row, 6)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Flags every unread message addressed to `receiver_id` in the conversation.
    /// Returns how many rows flipped.
    pub fn mark_conversation_read(&self, conversation_id: i64, receiver_id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE messages SET is_read = 1
                 WHERE conversation_id = ?1 AND receiver_id = ?2 AND is_read = 0",
                [conversation_id, receiver_id],
            )?;
            Ok(changed)
        })
    }

    /// Unread messages addressed to the user across all conversations.
    pub fn unread_count(&self, receiver_id: i64) -> Result<i64> {
        self.with_conn(|conn| {
            let n = conn.query_row(
                "SELECT COUNT(*) FROM messages WHERE receiver_id = ?1 AND is_read = 0",
                [receiver_id],
                |row| row.get(0),
            )?;
            Ok(n)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{db, user};
    use hirematch_types::Role;
    use hirematch_types::api::CvFields;

    #[test]
    fn membership_lookup_refuses_outsiders() {
        let db = db();
        let employer = user(&db, "e@x.io", Role::Employer);
        let seeker = user(&db, "s@x.io", Role::Jobseeker);
        let outsider = user(&db, "o@x.io", Role::Employer);
        let (conv, _) = db.open_conversation(employer, seeker).unwrap();

        assert!(db.get_conversation_for(conv, employer).unwrap().is_some());
        assert!(db.get_conversation_for(conv, seeker).unwrap().is_some());
        assert!(db.get_conversation_for(conv, outsider).unwrap().is_none());
        assert!(db.get_conversation_for(conv + 1, employer).unwrap().is_none());
    }

    #[test]
    fn history_is_scoped_to_conversation_id() {
        let db = db();
        let employer = user(&db, "e@x.io", Role::Employer);
        let s1 = user(&db, "s1@x.io", Role::Jobseeker);
        let s2 = user(&db, "s2@x.io", Role::Jobseeker);
        let (c1, _) = db.open_conversation(employer, s1).unwrap();
        let (c2, _) = db.open_conversation(employer, s2).unwrap();

        db.insert_message(c1, employer, s1, "hello one").unwrap();
        db.insert_message(c2, employer, s2, "hello two").unwrap();
        db.insert_message(c1, s1, employer, "hi back").unwrap();

        let history: Vec<String> = db
            .list_messages(c1)
            .unwrap()
            .into_iter()
            .map(|m| m.body)
            .collect();
        assert_eq!(history, vec!["hello one", "hi back"]);
    }

    #[test]
    fn mark_read_only_touches_the_receivers_messages() {
        let db = db();
        let employer = user(&db, "e@x.io", Role::Employer);
        let seeker = user(&db, "s@x.io", Role::Jobseeker);
        let (conv, _) = db.open_conversation(employer, seeker).unwrap();

        db.insert_message(conv, employer, seeker, "a").unwrap();
        db.insert_message(conv, employer, seeker, "b").unwrap();
        db.insert_message(conv, seeker, employer, "c").unwrap();

        assert_eq!(db.unread_count(seeker).unwrap(), 2);
        assert_eq!(db.mark_conversation_read(conv, seeker).unwrap(), 2);
        assert_eq!(db.mark_conversation_read(conv, seeker).unwrap(), 0);
        assert_eq!(db.unread_count(seeker).unwrap(), 0);
        assert_eq!(db.unread_count(employer).unwrap(), 1);
    }

    #[test]
    fn employer_listing_shows_unique_id_only() {
        let db = db();
        let employer = user(&db, "e@x.io", Role::Employer);
        let seeker = user(&db, "s@x.io", Role::Jobseeker);
        db.create_cv(seeker, "anon-42", &CvFields::default()).unwrap();
        db.open_conversation(employer, seeker).unwrap();

        let listed = db.list_conversations_for_employer(employer).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].unique_id.as_deref(), Some("anon-42"));

        let other_side = db.list_conversations_for_jobseeker(seeker).unwrap();
        assert_eq!(other_side[0].email, "e@x.io");
    }
}
