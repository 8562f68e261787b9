use serde::{Deserialize, Serialize};

use crate::errors::{Result, ServiceError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

/// Free-form player name; the only rule is that it is non-empty.
impl Username {
    pub fn new(username: impl Into<String>) -> Result<Self> {
        let username = username.into();
        if username.is_empty() {
            return Err(ServiceError::InvalidInput(
                "username must not be empty".to_string(),
            ));
        }
        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game mode identifier such as `10sec`.
///
/// The set of modes is open: any validated string names a leaderboard, the
/// known modes only decide what the landing page renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mode(String);

impl Mode {
    pub fn new(mode: impl Into<String>) -> Result<Self> {
        let mode = mode.into();
        if mode.is_empty() {
            return Err(ServiceError::InvalidInput("mode must not be empty".to_string()));
        }
        Ok(Self(mode))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Heading used on the landing page, e.g. `10SEC`.
    pub fn label(&self) -> String {
        self.0.to_uppercase()
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of a leaderboard, stored as `{"username": .., "score": ..}`.
///
/// New submissions are non-negative, but boards written by earlier versions
/// of the game may hold negative scores, so stored rows decode as `i64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub username: String,
    pub score: i64,
}

impl ScoreEntry {
    pub fn new(username: Username, score: i64) -> Self {
        Self {
            username: username.into_inner(),
            score,
        }
    }
}

/// Body of `POST /api/scores`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreSubmission {
    pub username: String,
    pub score: i64,
    pub mode: String,
}

impl ScoreSubmission {
    pub fn validate(self) -> Result<(Mode, ScoreEntry)> {
        let mode = Mode::new(self.mode)?;
        let username = Username::new(self.username)?;

        if self.score < 0 {
            return Err(ServiceError::InvalidInput(format!(
                "score must be non-negative, got {}",
                self.score
            )));
        }

        Ok((mode, ScoreEntry::new(username, self.score)))
    }
}

/// Post-increment value of the visit counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VisitCount(pub u64);

impl VisitCount {
    pub const MIN_WIDTH: usize = 7;

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Digits of the padded rendering, most significant first.
    pub fn digits(&self) -> Vec<char> {
        self.to_string().chars().collect()
    }
}

impl std::fmt::Display for VisitCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0width$}", self.0, width = Self::MIN_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_count_padding() {
        assert_eq!(VisitCount(42).to_string(), "0000042");
        assert_eq!(VisitCount(0).to_string(), "0000000");
        assert_eq!(VisitCount(9_999_999).to_string(), "9999999");
        assert_eq!(VisitCount(12_345_678).to_string(), "12345678");
    }

    #[test]
    fn test_visit_count_digits() {
        let digits = VisitCount(305).digits();
        assert_eq!(digits, vec!['0', '0', '0', '0', '3', '0', '5']);
    }

    #[test]
    fn test_username_validation() {
        assert!(Username::new("neo").is_ok());
        assert!(Username::new("two words").is_ok());
        assert!(Username::new("   ").is_ok());
        assert!(Username::new("x".repeat(500)).is_ok());
        assert!(matches!(Username::new(""), Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn test_mode_validation() {
        assert!(Mode::new("10sec").is_ok());
        assert!(Mode::new("brand-new-mode").is_ok());
        assert!(Mode::new("m".repeat(500)).is_ok());
        assert!(Mode::new("10\nsec").is_ok());
        assert!(matches!(Mode::new(""), Err(ServiceError::InvalidInput(_))));
        assert_eq!(Mode::new("30sec").unwrap().label(), "30SEC");
    }

    #[test]
    fn test_submission_rejects_negative_score() {
        let submission = ScoreSubmission {
            username: "trinity".to_string(),
            score: -1,
            mode: "10sec".to_string(),
        };
        assert!(matches!(submission.validate(), Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn test_submission_accepts_zero_score() {
        let submission = ScoreSubmission {
            username: "trinity".to_string(),
            score: 0,
            mode: "10sec".to_string(),
        };
        let (mode, entry) = submission.validate().unwrap();
        assert_eq!(mode.as_str(), "10sec");
        assert_eq!(entry, ScoreEntry { username: "trinity".to_string(), score: 0 });
    }

    #[test]
    fn test_stored_negative_score_decodes() {
        let decoded: Vec<ScoreEntry> =
            serde_json::from_str(r#"[{"username": "a", "score": -3}]"#).unwrap();
        assert_eq!(decoded, vec![ScoreEntry { username: "a".to_string(), score: -3 }]);
    }

    #[test]
    fn test_score_entry_wire_format() {
        let entries = vec![
            ScoreEntry { username: "a".to_string(), score: 10 },
            ScoreEntry { username: "b".to_string(), score: 7 },
        ];
        let encoded = serde_json::to_string(&entries).unwrap();
        assert_eq!(
            encoded,
            r#"[{"username":"a","score":10},{"username":"b","score":7}]"#
        );

        // Values written with Python-style spacing still decode.
        let decoded: Vec<ScoreEntry> =
            serde_json::from_str(r#"[{"username": "a", "score": 10}, {"username": "b", "score": 7}]"#)
                .unwrap();
        assert_eq!(decoded, entries);
    }
}
