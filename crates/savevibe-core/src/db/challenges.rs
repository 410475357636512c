//! Challenge and badge operations

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{validate_amount, Badge, BadgeKind, Challenge, ChallengeStatus, NewChallenge};
use crate::store::ChallengeStore;

const CHALLENGE_COLUMNS: &str =
    "id, user_id, title, target_amount, saved_amount, status, created_at, completed_at";

impl Database {
    fn row_to_challenge(row: &rusqlite::Row) -> rusqlite::Result<Challenge> {
        let status_str: String = row.get(5)?;
        let created_at_str: String = row.get(6)?;
        let completed_at_str: Option<String> = row.get(7)?;
        Ok(Challenge {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            target_amount: row.get(3)?,
            saved_amount: row.get(4)?,
            status: status_str.parse().unwrap_or(ChallengeStatus::Active),
            created_at: parse_datetime(&created_at_str),
            completed_at: completed_at_str.map(|s| parse_datetime(&s)),
        })
    }

    fn fetch_challenge(conn: &rusqlite::Connection, id: i64) -> Result<Option<Challenge>> {
        let challenge = conn
            .query_row(
                &format!("SELECT {} FROM challenges WHERE id = ?", CHALLENGE_COLUMNS),
                params![id],
                Self::row_to_challenge,
            )
            .optional()?;
        Ok(challenge)
    }
}

impl ChallengeStore for Database {
    fn create_challenge(&self, user_id: i64, challenge: &NewChallenge) -> Result<Challenge> {
        challenge.validate()?;
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO challenges (user_id, title, target_amount, status) VALUES (?, ?, ?, ?)",
            params![
                user_id,
                challenge.title.trim(),
                challenge.target_amount,
                ChallengeStatus::Active.as_str(),
            ],
        )?;
        let id = conn.last_insert_rowid();

        Self::fetch_challenge(&conn, id)?
            .ok_or_else(|| Error::Storage(format!("challenge {} vanished after insert", id)))
    }

    fn get_challenge(&self, id: i64) -> Result<Option<Challenge>> {
        let conn = self.conn()?;
        Self::fetch_challenge(&conn, id)
    }

    fn list_challenges(&self, user_id: i64) -> Result<Vec<Challenge>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM challenges WHERE user_id = ? ORDER BY id",
            CHALLENGE_COLUMNS
        ))?;

        let challenges = stmt
            .query_map(params![user_id], Self::row_to_challenge)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(challenges)
    }

    fn add_to_challenge(&self, id: i64, amount: f64) -> Result<Challenge> {
        validate_amount("amount", amount)?;
        let conn = self.conn()?;

        // SET expressions see the pre-update row, so the increment, the status
        // flip and the active check all happen in one statement
        let updated = conn
            .query_row(
                &format!(
                    r#"
                    UPDATE challenges
                    SET saved_amount = saved_amount + ?1,
                        status = CASE WHEN saved_amount + ?1 >= target_amount THEN ?2 ELSE status END,
                        completed_at = CASE WHEN saved_amount + ?1 >= target_amount THEN ?3 ELSE completed_at END
                    WHERE id = ?4 AND status = ?5
                    RETURNING {}
                    "#,
                    CHALLENGE_COLUMNS
                ),
                params![
                    amount,
                    ChallengeStatus::Completed.as_str(),
                    format_datetime(&Utc::now()),
                    id,
                    ChallengeStatus::Active.as_str(),
                ],
                Self::row_to_challenge,
            )
            .optional()?;

        match updated {
            Some(challenge) => Ok(challenge),
            None => match Self::fetch_challenge(&conn, id)? {
                Some(_) => Err(Error::InvalidData(format!(
                    "challenge {} is already completed",
                    id
                ))),
                None => Err(Error::NotFound(format!("challenge {}", id))),
            },
        }
    }

    fn award_badge(&self, user_id: i64, kind: BadgeKind) -> Result<bool> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO badges (user_id, badge) VALUES (?, ?)",
            params![user_id, kind.as_str()],
        )?;
        Ok(inserted > 0)
    }

    fn list_badges(&self, user_id: i64) -> Result<Vec<Badge>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT badge, unlocked_at FROM badges WHERE user_id = ? ORDER BY id")?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                let badge: String = row.get(0)?;
                let unlocked_at: String = row.get(1)?;
                Ok((badge, unlocked_at))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // Rows naming a badge this build does not know are skipped
        Ok(rows
            .into_iter()
            .filter_map(|(badge, unlocked_at)| {
                badge.parse::<BadgeKind>().ok().map(|kind| Badge {
                    user_id,
                    kind,
                    unlocked_at: parse_datetime(&unlocked_at),
                })
            })
            .collect())
    }
}
