use crate::model::style::ResolvedStyle;
use serde::{Deserialize, Serialize};

/// Fill-in-the-blank wording of the certificate.
///
/// Edited through the settings endpoint; the composer reads the latest stored
/// value on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateTexts {
    pub main_title: String,
    pub sub_title: String,
    pub intro_line: String,
    /// Text before the service name.
    pub body_line1: String,
    /// Text before the course name.
    pub body_line2: String,
    /// Course name.
    pub body_line3: String,
    /// Text after the course name, before the grade.
    pub body_line4: String,
    pub patronage_title: String,
    /// Patron name and details, one line per `\n`.
    pub patron_name: String,
    pub responsible_priest_title: String,
}

impl Default for CertificateTexts {
    fn default() -> Self {
        Self {
            main_title: "شهادة تقدير".to_string(),
            sub_title: "الأمانة العامة لكنيسة القديس بولس بالعبور  إجتماع الخدام العام".to_string(),
            intro_line: "بكل الحب والتقدير تتشرف الأمانة العامة للخدمة بمنح هذه الشهادة الي"
                .to_string(),
            body_line1: "الخادم في".to_string(),
            body_line2: "وذلك لاجتيازه بنجاح".to_string(),
            body_line3: "كورس مجتمع يسوع".to_string(),
            body_line4: "لخدام وخادمات الكنيسة، بتقدير عام".to_string(),
            patronage_title: "تحت رعاية".to_string(),
            patron_name: "القمص روفائيل الأنبا بيشوي\nالنائب البابوي لمدينة العبور".to_string(),
            responsible_priest_title: "الأب الكاهن المسئول".to_string(),
        }
    }
}

/// A certificate with every blank filled in and every style choice resolved.
///
/// Contains no timestamps or generated ids: the same inputs always produce the
/// same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateView {
    pub main_title: String,
    pub sub_title: String,
    pub intro_line: String,
    pub participant_name: String,
    pub service: String,
    pub service_line: String,
    pub achievement_line: String,
    pub course_name: String,
    pub grade_line: String,
    pub grade_label: String,
    /// Numeric score on the 100 scale, e.g. `"87 / 100"`.
    pub score_display: String,
    pub patronage_title: String,
    pub patron_lines: Vec<String>,
    pub responsible_priest_title: String,
    pub style: ResolvedStyle,
}
