//! Certificate composition: one record, the current texts and a style
//! selection in, a fully resolved `CertificateView` out.

use crate::error::ServiceError;
use common::model::certificate::{CertificateTexts, CertificateView};
use common::model::record::{EnrollmentRecord, Score, ScoreBand};
use common::model::style::{ResolvedStyle, StyleSelection};

/// Grade wording for a numeric score, on the same bands as the result summary.
pub fn grade_label(points: u8) -> &'static str {
    match ScoreBand::from(Score::Points(points)) {
        ScoreBand::Excellent => "امتياز",
        ScoreBand::VeryGood => "جيد جداً",
        ScoreBand::Good => "جيد",
        ScoreBand::Weak | ScoreBand::Absent => "مقبول",
    }
}

pub fn resolve_style(style: &StyleSelection) -> ResolvedStyle {
    let palette = style.color_scheme.palette();
    ResolvedStyle {
        font_stack: style.font_family.stack().to_string(),
        text_color: style.font_color.resolve(&palette),
        palette,
        layout: style.design.layout(),
    }
}

/// Pure: no clock, no randomness, no I/O.
pub fn compose(
    record: &EnrollmentRecord,
    texts: &CertificateTexts,
    style: &StyleSelection,
) -> Result<CertificateView, ServiceError> {
    let points = match record.score {
        Score::Points(p) => p,
        Score::Absent => return Err(ServiceError::AbsentRecord(record.id.clone())),
    };
    let grade = grade_label(points);

    Ok(CertificateView {
        main_title: texts.main_title.clone(),
        sub_title: texts.sub_title.clone(),
        intro_line: texts.intro_line.clone(),
        participant_name: record.name.trim().to_string(),
        service: record.service.clone(),
        service_line: format!("{} {}", texts.body_line1, record.service),
        achievement_line: texts.body_line2.clone(),
        course_name: texts.body_line3.clone(),
        grade_line: format!("{} {}", texts.body_line4, grade),
        grade_label: grade.to_string(),
        score_display: format!("{} / 100", points),
        patronage_title: texts.patronage_title.clone(),
        patron_lines: texts
            .patron_name
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect(),
        responsible_priest_title: texts.responsible_priest_title.clone(),
        style: resolve_style(style),
    })
}

/// MD5 of the canonical JSON form, used as the response `ETag`.
pub fn fingerprint(view: &CertificateView) -> String {
    let bytes = serde_json::to_vec(view).unwrap_or_default();
    format!("{:x}", md5::compute(bytes))
}
