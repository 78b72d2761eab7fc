use serde::Serialize;

/// Why a public submission was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpamReason {
    Honeypot,
    RateLimit,
    ContentTooShort,
    ContentTooLong,
    ForbiddenWord,
    TooManyLinks,
}

/// Outcome of a spam check. A rejection is a normal result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpamCheck {
    pub pass: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SpamReason>,
}

impl SpamCheck {
    pub fn passed() -> Self {
        Self {
            pass: true,
            reason: None,
        }
    }

    pub fn rejected(reason: SpamReason) -> Self {
        Self {
            pass: false,
            reason: Some(reason),
        }
    }
}
