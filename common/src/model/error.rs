use serde::{Deserialize, Serialize};

/// Shown for every generation or provider-configuration failure.
///
/// The same text covers both causes so that nothing about the provider setup
/// reaches the participant.
pub const ADVISORY_MESSAGE: &str =
    "عفواً، خدمة الرسائل الذكية غير متاحة حالياً بسبب مشكلة في الإعدادات. يرجى التواصل مع مسؤول الخدمة.";

/// User-facing error categories. Raw collaborator errors never cross the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Store,
    Config,
    Generation,
    AbsentRecord,
    ExportUnavailable,
    ExportFailed,
    ExportInProgress,
    SessionNotFound,
}

impl ErrorKind {
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "يرجى إدخال الكود أو رقم الموبايل",
            ErrorKind::NotFound => {
                "لم يتم العثور على نتائج. يرجى التأكد من الكود أو رقم الموبايل."
            }
            ErrorKind::Store => "حدث خطأ أثناء البحث. يرجى المحاولة مرة أخرى.",
            ErrorKind::Config | ErrorKind::Generation => ADVISORY_MESSAGE,
            ErrorKind::AbsentRecord => "لا يمكن إصدار شهادة لحالة الغياب.",
            ErrorKind::ExportUnavailable => "لا يمكن تحميل الشهادة الآن، يرجى المحاولة مرة أخرى.",
            ErrorKind::ExportFailed => "حدث خطأ أثناء إنشاء ملف الشهادة.",
            ErrorKind::ExportInProgress => "جاري التحميل...",
            ErrorKind::SessionNotFound => "انتهت الجلسة. يرجى البحث مرة أخرى.",
        }
    }

    /// Config errors need an operator; everything else may be retried.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ErrorKind::Config)
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<ErrorKind> for ErrorBody {
    fn from(kind: ErrorKind) -> Self {
        ErrorBody {
            kind,
            message: kind.user_message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_and_generation_are_indistinguishable_to_users() {
        assert_eq!(
            ErrorKind::Config.user_message(),
            ErrorKind::Generation.user_message()
        );
        assert_eq!(ErrorKind::Generation.user_message(), ADVISORY_MESSAGE);
        assert!(!ErrorKind::Config.is_recoverable());
        assert!(ErrorKind::Generation.is_recoverable());
    }
}
