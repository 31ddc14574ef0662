use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const NAME_MAX_CHARS: usize = 200;
pub const DEPARTMENT_MAX_CHARS: usize = 100;

/// Store-assigned identifier. The reference store hands out integers, others use strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComplaintId(pub String);

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComplaintId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for ComplaintId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ComplaintId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        let id = match RawId::deserialize(deserializer)? {
            RawId::Text(text) => text,
            RawId::Unsigned(number) => number.to_string(),
            RawId::Signed(number) => number.to_string(),
        };

        if id.trim().is_empty() {
            return Err(serde::de::Error::custom("complaint id must not be blank"));
        }
        Ok(Self(id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintCategory {
    Technical,
    Mess,
    Maintenance,
    Other,
}

impl ComplaintCategory {
    pub const fn ordered() -> [Self; 4] {
        [Self::Technical, Self::Mess, Self::Maintenance, Self::Other]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Technical => "Technical",
            Self::Mess => "Mess",
            Self::Maintenance => "Maintenance",
            Self::Other => "Other",
        }
    }

    /// Wire token as exchanged with the store.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Technical => "TECHNICAL",
            Self::Mess => "MESS",
            Self::Maintenance => "MAINTENANCE",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for ComplaintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ComplaintCategory {
    type Err = UnknownToken;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|category| category.token() == value)
            .ok_or_else(|| UnknownToken {
                kind: "category",
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    New,
    InProgress,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    pub const fn ordered() -> [Self; 4] {
        [Self::New, Self::InProgress, Self::Resolved, Self::Closed]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }

    pub const fn token(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }

    /// Counted as "active" on dashboards.
    pub const fn is_active(self) -> bool {
        match self {
            Self::New | Self::InProgress => true,
            Self::Resolved | Self::Closed => false,
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ComplaintStatus {
    type Err = UnknownToken;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|status| status.token() == value)
            .ok_or_else(|| UnknownToken {
                kind: "status",
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} token '{value}'")]
pub struct UnknownToken {
    pub kind: &'static str,
    pub value: String,
}

/// A complaint as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ComplaintRecord")]
pub struct Complaint {
    pub id: ComplaintId,
    pub name: String,
    pub department: String,
    pub category: ComplaintCategory,
    pub description: String,
    pub status: ComplaintStatus,
    pub resolution_notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_reference: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: NaiveDateTime,
}

/// Lenient wire shape accepted from store services.
#[derive(Deserialize)]
struct ComplaintRecord {
    #[serde(alias = "complaint_id")]
    id: ComplaintId,
    name: String,
    department: String,
    category: ComplaintCategory,
    description: String,
    status: ComplaintStatus,
    #[serde(default)]
    resolution_notes: Option<String>,
    #[serde(default, alias = "photo_path")]
    photo_reference: Option<String>,
    #[serde(with = "timestamp")]
    created_at: NaiveDateTime,
    #[serde(default, with = "timestamp::option")]
    updated_at: Option<NaiveDateTime>,
}

impl From<ComplaintRecord> for Complaint {
    fn from(record: ComplaintRecord) -> Self {
        let updated_at = record
            .updated_at
            .map_or(record.created_at, |updated| updated.max(record.created_at));

        Self {
            id: record.id,
            name: record.name,
            department: record.department,
            category: record.category,
            description: record.description,
            status: record.status,
            resolution_notes: record.resolution_notes.unwrap_or_default(),
            photo_reference: record.photo_reference.filter(|path| !path.trim().is_empty()),
            created_at: record.created_at,
            updated_at,
        }
    }
}

/// Submitter input for a new complaint, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintDraft {
    pub name: String,
    pub department: String,
    pub category: ComplaintCategory,
    pub description: String,
    #[serde(default, alias = "photo_path", skip_serializing_if = "Option::is_none")]
    pub photo_reference: Option<String>,
}

impl ComplaintDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::MissingName);
        }
        let name_chars = self.name.chars().count();
        if name_chars > NAME_MAX_CHARS {
            return Err(DraftError::NameTooLong { chars: name_chars });
        }
        if self.department.trim().is_empty() {
            return Err(DraftError::MissingDepartment);
        }
        let department_chars = self.department.chars().count();
        if department_chars > DEPARTMENT_MAX_CHARS {
            return Err(DraftError::DepartmentTooLong {
                chars: department_chars,
            });
        }
        if self.description.trim().is_empty() {
            return Err(DraftError::MissingDescription);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("name is required")]
    MissingName,
    #[error("name is limited to {max} characters, got {chars}", max = NAME_MAX_CHARS)]
    NameTooLong { chars: usize },
    #[error("department is required")]
    MissingDepartment,
    #[error("department is limited to {max} characters, got {chars}", max = DEPARTMENT_MAX_CHARS)]
    DepartmentTooLong { chars: usize },
    #[error("description is required")]
    MissingDescription,
}

/// Naive local date-times on the wire.
///
/// Values carrying an offset are converted to the local zone so weekday
/// bucketing sees the same calendar day a local reader would.
pub mod timestamp {
    use chrono::{DateTime, Local, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn parse(raw: &str) -> Result<NaiveDateTime, String> {
        let raw = raw.trim();
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(parsed);
        }
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
            return Ok(parsed);
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|parsed| parsed.with_timezone(&Local).naive_local())
            .map_err(|err| format!("failed to parse '{raw}' as a timestamp ({err})"))
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            let raw = Option::<String>::deserialize(deserializer)?;
            raw.map(|value| super::parse(&value).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn draft() -> ComplaintDraft {
        ComplaintDraft {
            name: "Asha Verma".to_string(),
            department: "Computer Science".to_string(),
            category: ComplaintCategory::Mess,
            description: "Dinner was served cold three days in a row.".to_string(),
            photo_reference: None,
        }
    }

    #[test]
    fn decodes_reference_store_payload() {
        let payload = json!({
            "complaint_id": 42,
            "name": "Asha Verma",
            "department": "Computer Science",
            "category": "MAINTENANCE",
            "description": "Leaking tap in block C",
            "status": "IN_PROGRESS",
            "photo_path": "uploads/42.jpg",
            "resolution_notes": null,
            "created_at": "2025-03-02T09:15:30.123456",
            "updated_at": "2025-03-03T10:00:00"
        });

        let complaint: Complaint = serde_json::from_value(payload).expect("decodes");
        assert_eq!(complaint.id, ComplaintId("42".to_string()));
        assert_eq!(complaint.category, ComplaintCategory::Maintenance);
        assert_eq!(complaint.status, ComplaintStatus::InProgress);
        assert_eq!(complaint.photo_reference.as_deref(), Some("uploads/42.jpg"));
        assert!(complaint.resolution_notes.is_empty());
        assert_eq!(
            complaint.created_at.date(),
            NaiveDate::from_ymd_opt(2025, 3, 2).expect("valid date")
        );
    }

    #[test]
    fn missing_or_earlier_updated_at_is_clamped_to_created_at() {
        let missing = json!({
            "id": "c-1",
            "name": "Ravi",
            "department": "Physics",
            "category": "OTHER",
            "description": "Noise after hours",
            "status": "NEW",
            "created_at": "2025-03-02T09:15:30"
        });
        let complaint: Complaint = serde_json::from_value(missing).expect("decodes");
        assert_eq!(complaint.updated_at, complaint.created_at);

        let earlier = json!({
            "id": "c-2",
            "name": "Ravi",
            "department": "Physics",
            "category": "OTHER",
            "description": "Noise after hours",
            "status": "NEW",
            "created_at": "2025-03-02T09:15:30",
            "updated_at": "2025-03-01T09:15:30"
        });
        let complaint: Complaint = serde_json::from_value(earlier).expect("decodes");
        assert_eq!(complaint.updated_at, complaint.created_at);
    }

    #[test]
    fn offset_timestamps_are_read_in_local_time() {
        let raw = "2025-03-02T23:30:00+00:00";
        let expected = chrono::DateTime::parse_from_rfc3339(raw)
            .expect("valid rfc3339")
            .with_timezone(&chrono::Local)
            .naive_local();

        assert_eq!(timestamp::parse(raw), Ok(expected));

        let payload = json!({
            "id": "c-3",
            "name": "Meera",
            "department": "Civil",
            "category": "TECHNICAL",
            "description": "Projector flickers",
            "status": "NEW",
            "created_at": raw,
            "updated_at": "2025-03-03T08:00:00Z"
        });
        let complaint: Complaint = serde_json::from_value(payload).expect("decodes");
        assert_eq!(complaint.created_at, expected);
        assert!(complaint.updated_at >= complaint.created_at);
    }

    #[test]
    fn garbage_timestamps_fail_the_record() {
        assert!(timestamp::parse("yesterday evening").is_err());

        let payload = json!({
            "id": "c-4",
            "name": "Meera",
            "department": "Civil",
            "category": "TECHNICAL",
            "description": "Projector flickers",
            "status": "NEW",
            "created_at": "yesterday evening"
        });
        assert!(serde_json::from_value::<Complaint>(payload).is_err());
    }

    #[test]
    fn tokens_are_case_sensitive() {
        assert_eq!("MESS".parse::<ComplaintCategory>(), Ok(ComplaintCategory::Mess));
        assert!("mess".parse::<ComplaintCategory>().is_err());
        assert_eq!(
            "IN_PROGRESS".parse::<ComplaintStatus>(),
            Ok(ComplaintStatus::InProgress)
        );
        assert!("In Progress".parse::<ComplaintStatus>().is_err());
        assert!(serde_json::from_value::<ComplaintStatus>(json!("resolved")).is_err());
    }

    #[test]
    fn serializes_with_wire_tokens() {
        let complaint = Complaint {
            id: ComplaintId("7".to_string()),
            name: "Asha".to_string(),
            department: "CS".to_string(),
            category: ComplaintCategory::Technical,
            description: "Projector broken".to_string(),
            status: ComplaintStatus::New,
            resolution_notes: String::new(),
            photo_reference: None,
            created_at: NaiveDate::from_ymd_opt(2025, 3, 2)
                .and_then(|date| date.and_hms_opt(8, 0, 0))
                .expect("valid timestamp"),
            updated_at: NaiveDate::from_ymd_opt(2025, 3, 2)
                .and_then(|date| date.and_hms_opt(8, 0, 0))
                .expect("valid timestamp"),
        };

        let value = serde_json::to_value(&complaint).expect("serializes");
        assert_eq!(value["id"], "7");
        assert_eq!(value["category"], "TECHNICAL");
        assert_eq!(value["status"], "NEW");
        assert_eq!(value["created_at"], "2025-03-02T08:00:00");
        assert!(value.get("photo_reference").is_none());
    }

    #[test]
    fn draft_validation_enforces_bounds() {
        assert_eq!(draft().validate(), Ok(()));

        let mut blank_name = draft();
        blank_name.name = "   ".to_string();
        assert_eq!(blank_name.validate(), Err(DraftError::MissingName));

        let mut long_name = draft();
        long_name.name = "n".repeat(NAME_MAX_CHARS + 1);
        assert_eq!(
            long_name.validate(),
            Err(DraftError::NameTooLong {
                chars: NAME_MAX_CHARS + 1
            })
        );

        let mut exact_department = draft();
        exact_department.department = "d".repeat(DEPARTMENT_MAX_CHARS);
        assert_eq!(exact_department.validate(), Ok(()));

        let mut long_department = draft();
        long_department.department = "d".repeat(DEPARTMENT_MAX_CHARS + 1);
        assert!(matches!(
            long_department.validate(),
            Err(DraftError::DepartmentTooLong { .. })
        ));

        let mut no_description = draft();
        no_description.description.clear();
        assert_eq!(no_description.validate(), Err(DraftError::MissingDescription));
    }
}
