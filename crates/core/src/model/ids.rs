use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a registered user, as assigned by the record store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying i64 value
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Identifier of a question in the bank.
///
/// The bank stores these as strings, but historical records sometimes carry
/// them as JSON numbers; deserialization accepts both and normalizes to the
/// string form so lookups compare by value.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QuestionId(String);

impl QuestionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Num(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Ok(QuestionId(s)),
            Raw::Num(n) => Ok(QuestionId(n.to_string())),
        }
    }
}

/// Identifier of one answer option within a question.
///
/// Option ids are numeric in the bank, but the store's exam details carry
/// them as strings; deserialization accepts both representations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AnswerId(i64);

impl AnswerId {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying i64 value
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for AnswerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(AnswerId(n)),
            Raw::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(AnswerId)
                .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(&s), &"a numeric answer id")),
        }
    }
}

/// Identifier of an exam paper (the numbered trial a user picked).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExamId(i64);

impl ExamId {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying i64 value
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Store-assigned identifier of a persisted record (progress or exam).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(i64);

impl RecordId {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying i64 value
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Debug for AnswerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnswerId({})", self.0)
    }
}

impl fmt::Debug for ExamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExamId({})", self.0)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for AnswerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ExamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for UserId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(UserId::new).map_err(|_| ParseIdError {
            kind: "UserId".to_string(),
        })
    }
}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(QuestionId::new(s))
    }
}

impl FromStr for AnswerId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(AnswerId::new)
            .map_err(|_| ParseIdError {
                kind: "AnswerId".to_string(),
            })
    }
}

impl FromStr for ExamId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(ExamId::new).map_err(|_| ParseIdError {
            kind: "ExamId".to_string(),
        })
    }
}

impl FromStr for RecordId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(RecordId::new)
            .map_err(|_| ParseIdError {
                kind: "RecordId".to_string(),
            })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_display() {
        let id = UserId::new(42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_user_id_from_str() {
        let id: UserId = "123".parse().unwrap();
        assert_eq!(id, UserId::new(123));
    }

    #[test]
    fn test_user_id_from_str_invalid() {
        let result = "not-a-number".parse::<UserId>();
        assert!(result.is_err());
    }

    #[test]
    fn test_question_id_display() {
        let id = QuestionId::new("q-17");
        assert_eq!(id.to_string(), "q-17");
    }

    #[test]
    fn test_answer_id_from_number_json() {
        let id: AnswerId = serde_json::from_str("3").unwrap();
        assert_eq!(id, AnswerId::new(3));
    }

    #[test]
    fn test_answer_id_from_string_json() {
        let id: AnswerId = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(id, AnswerId::new(3));
    }

    #[test]
    fn test_answer_id_rejects_non_numeric_string() {
        let result = serde_json::from_str::<AnswerId>("\"abc\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_answer_id_serializes_as_number() {
        let json = serde_json::to_string(&AnswerId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_question_id_from_number_json() {
        let id: QuestionId = serde_json::from_str("12").unwrap();
        assert_eq!(id, QuestionId::new("12"));
    }

    #[test]
    fn test_question_id_from_string_json() {
        let id: QuestionId = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(id, QuestionId::new("12"));
    }

    #[test]
    fn test_question_id_serializes_as_string() {
        let json = serde_json::to_string(&QuestionId::new("12")).unwrap();
        assert_eq!(json, "\"12\"");
    }

    #[test]
    fn test_id_roundtrip() {
        let original = RecordId::new(42);
        let serialized = original.to_string();
        let deserialized: RecordId = serialized.parse().unwrap();
        assert_eq!(original, deserialized);
    }
}
