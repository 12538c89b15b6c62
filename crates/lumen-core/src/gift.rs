//! Gift payloads: consumable orb transfers between users.
//!
//! A gift is written once into the recipient's remote namespace and consumed
//! (read-then-delete) on their next fetch. The payload carries an explicit
//! schema version tag; anything with an unknown tag is treated as absent
//! rather than trusted.

use serde::{Deserialize, Serialize};

use crate::orb::Orb;

/// Current gift wire schema version.
pub const GIFT_SCHEMA_VERSION: u32 = 1;

/// A consumable orb transfer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftPayload {
    /// Wire schema version tag
    pub v: u32,
    /// Timestamp the gift was created (ISO 8601 format)
    pub created_at: String,
    /// Raw recipient identifier
    pub to: String,
    /// Raw sender identifier
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_display_name: Option<String>,
    /// Short message attached by the sender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blessing: Option<String>,
    /// Snapshot of the orb at send time
    pub orb: Orb,
}

impl GiftPayload {
    /// Builds a current-version gift for the given orb snapshot.
    pub fn new(
        created_at: impl Into<String>,
        to: impl Into<String>,
        from: impl Into<String>,
        from_display_name: Option<String>,
        blessing: Option<String>,
        orb: Orb,
    ) -> Self {
        Self {
            v: GIFT_SCHEMA_VERSION,
            created_at: created_at.into(),
            to: to.into(),
            from: from.into(),
            from_display_name,
            blessing,
            orb,
        }
    }

    /// Decodes a gift from a raw stored value, failing closed.
    ///
    /// Returns `None` for undecodable values and for version tags this build
    /// does not understand; callers skip such records.
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        let gift: GiftPayload = serde_json::from_value(value).ok()?;
        if gift.v != GIFT_SCHEMA_VERSION {
            return None;
        }
        Some(gift)
    }

    /// Converts the gift into an archivable orb for the recipient's history,
    /// tagged with the sender's display name and blessing.
    pub fn into_received_orb(self) -> Orb {
        let sender = self.from_display_name.unwrap_or(self.from);
        Orb {
            sender: Some(sender),
            message: self.blessing,
            ..self.orb
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_gift() -> GiftPayload {
        GiftPayload::new(
            "2026-04-01T12:00:00Z",
            "0xRECIPIENT",
            "0xSENDER",
            Some("Ana".to_string()),
            Some("for your garden".to_string()),
            Orb::new("2026-03-01T00:00:00Z"),
        )
    }

    #[test]
    fn test_round_trips_current_version() {
        let gift = sample_gift();
        let value = serde_json::to_value(&gift).unwrap();

        // Wire keys are camelCase
        assert!(value.get("createdAt").is_some());
        assert!(value.get("fromDisplayName").is_some());
        assert_eq!(value["v"], serde_json::json!(1));

        let decoded = GiftPayload::from_value(value).unwrap();
        assert_eq!(decoded, gift);
    }

    #[test]
    fn test_unknown_version_fails_closed() {
        let mut value = serde_json::to_value(sample_gift()).unwrap();
        value["v"] = serde_json::json!(2);
        assert!(GiftPayload::from_value(value).is_none());
    }

    #[test]
    fn test_garbage_fails_closed() {
        assert!(GiftPayload::from_value(serde_json::json!({"hello": "world"})).is_none());
        assert!(GiftPayload::from_value(serde_json::json!(null)).is_none());
    }

    #[test]
    fn test_received_orb_prefers_display_name() {
        let orb = sample_gift().into_received_orb();
        assert_eq!(orb.sender.as_deref(), Some("Ana"));
        assert_eq!(orb.message.as_deref(), Some("for your garden"));

        let mut gift = sample_gift();
        gift.from_display_name = None;
        let orb = gift.into_received_orb();
        assert_eq!(orb.sender.as_deref(), Some("0xSENDER"));
    }
}
