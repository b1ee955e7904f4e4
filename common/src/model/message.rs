use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three generated-message flows that share one display slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    Encouragement,
    SpiritualAdvice,
    Personal,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Encouragement => "encouragement",
            MessageKind::SpiritualAdvice => "spiritual-advice",
            MessageKind::Personal => "personal",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "encouragement" => Ok(MessageKind::Encouragement),
            "spiritual-advice" => Ok(MessageKind::SpiritualAdvice),
            "personal" => Ok(MessageKind::Personal),
            other => Err(format!("unknown message kind: {other}")),
        }
    }
}

/// State of the single message display slot.
///
/// At most one kind owns the slot, so at most one kind can have text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum MessageSlot {
    #[default]
    Idle,
    Generating {
        kind: MessageKind,
    },
    Ready {
        kind: MessageKind,
        text: String,
    },
    Failed {
        kind: MessageKind,
        message: String,
    },
}

impl MessageSlot {
    pub fn kind(&self) -> Option<MessageKind> {
        match self {
            MessageSlot::Idle => None,
            MessageSlot::Generating { kind }
            | MessageSlot::Ready { kind, .. }
            | MessageSlot::Failed { kind, .. } => Some(*kind),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, MessageSlot::Generating { .. })
    }

    /// Text displayed for `kind`; empty unless `kind` owns a ready slot.
    pub fn text_for(&self, kind: MessageKind) -> &str {
        match self {
            MessageSlot::Ready { kind: k, text } if *k == kind => text,
            _ => "",
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            MessageSlot::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_path_segment() {
        for kind in [
            MessageKind::Encouragement,
            MessageKind::SpiritualAdvice,
            MessageKind::Personal,
        ] {
            assert_eq!(kind.as_str().parse::<MessageKind>(), Ok(kind));
        }
        assert!("sermon".parse::<MessageKind>().is_err());
    }

    #[test]
    fn slot_serializes_with_state_tag() {
        let slot = MessageSlot::Ready {
            kind: MessageKind::Personal,
            text: "سلام".to_string(),
        };
        let value = serde_json::to_value(&slot).unwrap();
        assert_eq!(value["state"], "ready");
        assert_eq!(value["kind"], "personal");
        assert_eq!(slot.text_for(MessageKind::Personal), "سلام");
        assert_eq!(slot.text_for(MessageKind::Encouragement), "");
    }
}
