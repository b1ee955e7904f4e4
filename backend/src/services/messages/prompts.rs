//! Prompt wording for each message kind.

use common::model::message::MessageKind;
use common::model::record::EnrollmentRecord;

/// Appended by the service to every personal message.
pub const SIGNATURE: &str = "راعي الامانة العامة / أبونا يوسيف سيدهم";

const COURSE_NAME: &str = "مجتمع يسوع";

/// Token before the first space of the full name.
pub fn first_name(full_name: &str) -> &str {
    let name = full_name.trim();
    name.split(' ').next().unwrap_or(name)
}

/// Score of the first record that has one.
pub fn first_scored(records: &[EnrollmentRecord]) -> Option<u8> {
    records.iter().find_map(|r| r.score.points())
}

pub fn encouragement(name: &str, score: Option<u8>) -> String {
    let mut prompt = format!(
        "اكتب رسالة تشجيعية وملهمة قصيرة (سطرين أو ثلاثة) ذات طابع مسيحي لـ \"{}\" الذي أكمل كورس \"{}\".",
        name, COURSE_NAME
    );
    if let Some(points) = score {
        prompt.push_str(&format!(" وكانت إحدى درجاته {} من 100.", points));
    }
    prompt
}

pub fn spiritual_advice(name: &str) -> String {
    format!(
        "اكتب نصيحة روحية قصيرة (من 3 إلى 5 أسطر) للخادم الروحي \"{}\"، مستوحاة من تعاليم وكتابات قداسة البابا شنودة الثالث عن الخدمة والخدام.",
        name
    )
}

pub fn personal(full_name: &str) -> String {
    let first = first_name(full_name);
    [
        format!("اكتب رسالة شخصية ذات طابع مسيحي روحي إلى {}.", full_name),
        format!("يجب أن تبدأ الرسالة بمخاطبة {} مباشرة.", full_name),
        format!("يجب أن تذكر اسمه الأول، \"{}\"، مرتين بالضبط في متن الرسالة.", first),
        "الرسالة يجب أن تحثه بلطف ومحبة على أهمية الحضور والمشاركة في اجتماعات الكورس القادمة، وتؤكد على أن وجوده ومشاركته يضيفان قيمة كبيرة للمجموعة وأن الجميع يفتقده.".to_string(),
        "الرسالة يجب ألا تزيد عن 12 سطراً.".to_string(),
        "مهم جداً: لا تقم بإضافة أي خاتمة أو توقيع في نهاية الرسالة، فقط محتوى الرسالة نفسها.".to_string(),
    ]
    .join("\n")
}

/// Prompt for `kind` about the first record of the set.
pub fn build(kind: MessageKind, records: &[EnrollmentRecord]) -> Option<String> {
    let subject = records.first()?;
    let name = subject.name.trim();
    Some(match kind {
        MessageKind::Encouragement => encouragement(name, first_scored(records)),
        MessageKind::SpiritualAdvice => spiritual_advice(name),
        MessageKind::Personal => personal(name),
    })
}

/// Final text shown for a provider reply.
pub fn finish(kind: MessageKind, reply: &str) -> String {
    let body = reply.trim();
    match kind {
        MessageKind::Personal => format!("{}\n\n{}", body, SIGNATURE),
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::record::Score;

    fn record(name: &str, score: Score) -> EnrollmentRecord {
        EnrollmentRecord {
            id: "d".to_string(),
            code: "A1".to_string(),
            name: name.to_string(),
            mobile_number: "555".to_string(),
            service: "Choir".to_string(),
            score,
            attendance: 0,
        }
    }

    #[test]
    fn first_name_is_token_before_first_space() {
        assert_eq!(first_name("جورج مجدي فهيم"), "جورج");
        assert_eq!(first_name("  Mina  "), "Mina");
        assert_eq!(first_name(""), "");
    }

    #[test]
    fn encouragement_uses_first_non_absent_score() {
        let records = vec![
            record("جورج مجدي", Score::Absent),
            record("جورج مجدي", Score::Points(77)),
            record("جورج مجدي", Score::Points(99)),
        ];
        let prompt = build(MessageKind::Encouragement, &records).unwrap();
        assert!(prompt.contains("جورج مجدي"));
        assert!(prompt.contains("77 من 100"));
        assert!(!prompt.contains("99"));

        let absent_only = vec![record("جورج مجدي", Score::Absent)];
        let prompt = build(MessageKind::Encouragement, &absent_only).unwrap();
        assert!(!prompt.contains("من 100"));
    }

    #[test]
    fn personal_prompt_names_first_name_and_forbids_signature() {
        let prompt = build(MessageKind::Personal, &[record("جورج مجدي", Score::Absent)]).unwrap();
        assert!(prompt.contains("\"جورج\""));
        assert!(prompt.contains("12"));
        assert!(prompt.contains("توقيع"));
    }

    #[test]
    fn signature_is_appended_only_to_personal() {
        let personal = finish(MessageKind::Personal, "  نص الرسالة \n");
        assert_eq!(personal, format!("نص الرسالة\n\n{}", SIGNATURE));
        let advice = finish(MessageKind::SpiritualAdvice, "نصيحة\n");
        assert_eq!(advice, "نصيحة");
    }

    #[test]
    fn empty_set_has_no_subject() {
        assert!(build(MessageKind::SpiritualAdvice, &[]).is_none());
    }
}
