/// Community bulletin board storage.
///
/// Residents post aid requests ("req") and offers ("offer") during flood
/// events; each row is immutable once inserted. The insert assigns a
/// BIGSERIAL id and an epoch-millisecond timestamp, and listings return
/// the most recent items first.

use chrono::Utc;
use postgres::Client;
use serde::Deserialize;

use crate::model::BulletinItem;

// ---------------------------------------------------------------------------
// Item kinds
// ---------------------------------------------------------------------------

/// The two accepted bulletin item kinds.
///
/// The kind is determined by the route the item was posted to; any kind
/// supplied in the request body is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Request,
    Offer,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Request => "req",
            ItemKind::Offer => "offer",
        }
    }
}

// ---------------------------------------------------------------------------
// Incoming payload
// ---------------------------------------------------------------------------

/// Body of a POST /board/request or POST /board/offer.
///
/// Unknown fields (including a client-supplied "type") are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct BulletinDraft {
    pub name: String,
    pub contact: String,
    pub location: String,
    #[serde(default)]
    pub details: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors arising from bulletin board operations.
#[derive(Debug)]
pub enum BoardError {
    /// Bad or missing input in the submitted item.
    InvalidItem(String),
    /// Database query failed.
    Db(String),
}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardError::InvalidItem(msg) => write!(f, "Invalid bulletin item: {}", msg),
            BoardError::Db(msg) => write!(f, "Board database error: {}", msg),
        }
    }
}

impl std::error::Error for BoardError {}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validates a draft before it touches the database.
///
/// name, contact, and location must be non-empty after trimming; details
/// may be empty but is capped at `max_details_len` characters.
pub fn validate_draft(draft: &BulletinDraft, max_details_len: usize) -> Result<(), BoardError> {
    if draft.name.trim().is_empty() {
        return Err(BoardError::InvalidItem("name must not be empty".to_string()));
    }
    if draft.contact.trim().is_empty() {
        return Err(BoardError::InvalidItem("contact must not be empty".to_string()));
    }
    if draft.location.trim().is_empty() {
        return Err(BoardError::InvalidItem("location must not be empty".to_string()));
    }
    if draft.details.chars().count() > max_details_len {
        return Err(BoardError::InvalidItem(format!(
            "details must be at most {} characters",
            max_details_len
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Storage operations
// ---------------------------------------------------------------------------

/// Insert a validated draft as a new bulletin item.
///
/// The timestamp is set to the current epoch milliseconds at insert and the
/// id comes back from the BIGSERIAL column, so each insert is atomic and
/// needs no cross-row coordination.
pub fn insert_item(
    client: &mut Client,
    kind: ItemKind,
    draft: &BulletinDraft,
    max_details_len: usize,
) -> Result<BulletinItem, BoardError> {
    validate_draft(draft, max_details_len)?;

    let ts = Utc::now().timestamp_millis();

    let row = client
        .query_one(
            "INSERT INTO board.items (type, name, contact, location, details, ts)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
            &[
                &kind.as_str(),
                &draft.name,
                &draft.contact,
                &draft.location,
                &draft.details,
                &ts,
            ],
        )
        .map_err(|e| BoardError::Db(e.to_string()))?;

    let id: i64 = row.get(0);

    Ok(BulletinItem {
        id,
        kind: kind.as_str().to_string(),
        name: draft.name.clone(),
        contact: draft.contact.clone(),
        location: draft.location.clone(),
        details: draft.details.clone(),
        ts,
    })
}

/// List bulletin items, most recent first.
///
/// Ordered by ts descending with id as a tie-breaker so items posted in
/// the same millisecond still list newest-first.
pub fn list_items(client: &mut Client, limit: i64) -> Result<Vec<BulletinItem>, BoardError> {
    let rows = client
        .query(
            "SELECT id, type, name, contact, location, COALESCE(details, ''), ts
             FROM board.items
             ORDER BY ts DESC, id DESC
             LIMIT $1",
            &[&limit],
        )
        .map_err(|e| BoardError::Db(e.to_string()))?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        items.push(BulletinItem {
            id: row.get(0),
            kind: row.get(1),
            name: row.get(2),
            contact: row.get(3),
            location: row.get(4),
            details: row.get(5),
            ts: row.get(6),
        });
    }

    Ok(items)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
