use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Literal stored in the `score` field for participants who did not sit the assessment.
pub const ABSENT_LABEL: &str = "غائب";

/// Final assessment score of an enrollment.
///
/// Serialized as a plain integer (`0..=100`) or as the [`ABSENT_LABEL`] string,
/// matching the shape of the documents in the `students` collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Score {
    Points(u8),
    Absent,
}

impl Score {
    pub fn is_absent(&self) -> bool {
        matches!(self, Score::Absent)
    }

    pub fn points(&self) -> Option<u8> {
        match self {
            Score::Points(p) => Some(*p),
            Score::Absent => None,
        }
    }

    /// Parses a raw value coming from a form, a CSV cell or a database column.
    /// Returns `None` when the value is neither the absent sentinel nor a score in range.
    pub fn parse(raw: &str) -> Option<Score> {
        let raw = raw.trim();
        if raw == ABSENT_LABEL || raw.eq_ignore_ascii_case("absent") {
            return Some(Score::Absent);
        }
        let value: f64 = raw.parse().ok()?;
        Score::from_number(value)
    }

    pub fn from_number(value: f64) -> Option<Score> {
        if value.is_finite() && (0.0..=100.0).contains(&value) {
            Some(Score::Points(value.round() as u8))
        } else {
            None
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Score::Points(p) => serializer.serialize_u8(*p),
            Score::Absent => serializer.serialize_str(ABSENT_LABEL),
        }
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawScore {
            Number(f64),
            Text(String),
        }

        let parsed = match RawScore::deserialize(deserializer)? {
            RawScore::Number(n) => Score::from_number(n),
            RawScore::Text(s) => Score::parse(&s),
        };
        parsed.ok_or_else(|| de::Error::custom("score must be 0..=100 or the absent label"))
    }
}

/// One enrollment of a participant in a service.
///
/// `id` is the store-assigned identity. Two records of the same person (same
/// `name` and `mobile_number`, different `service`) are distinct entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
    pub id: String,
    pub code: String,
    pub name: String,
    pub mobile_number: String,
    pub service: String,
    pub score: Score,
    pub attendance: u8,
}

/// Any value that can be stored in the `mobileNumber` field before normalization.
pub trait MobileInput {
    fn to_mobile_text(&self) -> String;
}

impl MobileInput for str {
    fn to_mobile_text(&self) -> String {
        self.to_string()
    }
}

impl MobileInput for String {
    fn to_mobile_text(&self) -> String {
        self.clone()
    }
}

impl MobileInput for u64 {
    // Zero carries no number at all.
    fn to_mobile_text(&self) -> String {
        if *self == 0 {
            String::new()
        } else {
            self.to_string()
        }
    }
}

impl MobileInput for i64 {
    fn to_mobile_text(&self) -> String {
        if *self == 0 {
            String::new()
        } else {
            self.to_string()
        }
    }
}

/// Trims the value and strips a single leading `'0'`.
///
/// Applying it twice to a number with one leading zero is a no-op; a second
/// zero is only removed by a second call, same as the stored documents.
pub fn normalize_mobile<T: MobileInput + ?Sized>(raw: &T) -> String {
    let text = raw.to_mobile_text();
    let trimmed = text.trim();
    trimmed.strip_prefix('0').unwrap_or(trimmed).to_string()
}

/// Colour band of a score, as shown next to the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreBand {
    Excellent,
    VeryGood,
    Good,
    Weak,
    Absent,
}

impl From<Score> for ScoreBand {
    fn from(score: Score) -> Self {
        match score {
            Score::Absent => ScoreBand::Absent,
            Score::Points(p) if p >= 90 => ScoreBand::Excellent,
            Score::Points(p) if p >= 80 => ScoreBand::VeryGood,
            Score::Points(p) if p >= 70 => ScoreBand::Good,
            Score::Points(_) => ScoreBand::Weak,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttendanceBand {
    Regular,
    Frequent,
    Occasional,
    Rare,
}

impl AttendanceBand {
    pub fn of(attendance: u8) -> Self {
        match attendance {
            90.. => AttendanceBand::Regular,
            75..=89 => AttendanceBand::Frequent,
            50..=74 => AttendanceBand::Occasional,
            _ => AttendanceBand::Rare,
        }
    }
}

/// Headline of a resolved result set, taken from its first record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    pub person_name: String,
    pub score: Score,
    pub score_band: ScoreBand,
    pub attendance: u8,
    pub attendance_band: AttendanceBand,
    pub services: Vec<String>,
    /// Offered only to participants who never attended.
    pub personal_message_available: bool,
}

impl ResultSummary {
    pub fn from_records(records: &[EnrollmentRecord]) -> Option<Self> {
        let first = records.first()?;
        Some(ResultSummary {
            person_name: first.name.clone(),
            score: first.score,
            score_band: first.score.into(),
            attendance: first.attendance,
            attendance_band: AttendanceBand::of(first.attendance),
            services: records.iter().map(|r| r.service.clone()).collect(),
            personal_message_available: first.attendance == 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, service: &str, score: Score, attendance: u8) -> EnrollmentRecord {
        EnrollmentRecord {
            id: id.to_string(),
            code: format!("C-{id}"),
            name: "مينا جرجس".to_string(),
            mobile_number: "1012345678".to_string(),
            service: service.to_string(),
            score,
            attendance,
        }
    }

    #[test]
    fn strips_single_leading_zero() {
        assert_eq!(normalize_mobile("01012345678"), "1012345678");
        let once = normalize_mobile("01012345678");
        assert_eq!(normalize_mobile(&once), once);
        assert_eq!(normalize_mobile("  0555 "), "555");
    }

    #[test]
    fn empty_and_zero_normalize_to_empty() {
        assert_eq!(normalize_mobile(""), "");
        assert_eq!(normalize_mobile(&0u64), "");
        assert_eq!(normalize_mobile(&0i64), "");
        assert_eq!(normalize_mobile(&1012345678u64), "1012345678");
    }

    #[test]
    fn score_serializes_absent_as_label() {
        let json = serde_json::to_string(&Score::Absent).unwrap();
        assert_eq!(json, format!("\"{ABSENT_LABEL}\""));
        assert_eq!(serde_json::to_string(&Score::Points(87)).unwrap(), "87");
    }

    #[test]
    fn score_accepts_label_english_sentinel_and_numbers() {
        let absent: Score = serde_json::from_str(&format!("\"{ABSENT_LABEL}\"")).unwrap();
        assert_eq!(absent, Score::Absent);
        let absent: Score = serde_json::from_str("\"Absent\"").unwrap();
        assert_eq!(absent, Score::Absent);
        let points: Score = serde_json::from_str("92").unwrap();
        assert_eq!(points, Score::Points(92));
        assert!(serde_json::from_str::<Score>("101").is_err());
        assert!(serde_json::from_str::<Score>("\"excellent\"").is_err());
    }

    #[test]
    fn record_uses_camel_case_fields() {
        let r = record("a", "Choir", Score::Points(70), 80);
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["mobileNumber"], "1012345678");
        assert_eq!(value["score"], 70);
    }

    #[test]
    fn summary_follows_first_record() {
        let records = vec![
            record("a", "Choir", Score::Absent, 0),
            record("b", "Ushers", Score::Points(95), 100),
        ];
        let summary = ResultSummary::from_records(&records).unwrap();
        assert_eq!(summary.score_band, ScoreBand::Absent);
        assert_eq!(summary.attendance_band, AttendanceBand::Rare);
        assert!(summary.personal_message_available);
        assert_eq!(summary.services, vec!["Choir", "Ushers"]);
        assert!(ResultSummary::from_records(&[]).is_none());
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(ScoreBand::from(Score::Points(90)), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from(Score::Points(89)), ScoreBand::VeryGood);
        assert_eq!(ScoreBand::from(Score::Points(70)), ScoreBand::Good);
        assert_eq!(ScoreBand::from(Score::Points(69)), ScoreBand::Weak);
        assert_eq!(AttendanceBand::of(75), AttendanceBand::Frequent);
        assert_eq!(AttendanceBand::of(50), AttendanceBand::Occasional);
        assert_eq!(AttendanceBand::of(49), AttendanceBand::Rare);
    }
}
