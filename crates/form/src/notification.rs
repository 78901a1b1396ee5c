use serde::Serialize;

/// Outcome message raised by the form for the notification surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub success: bool,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
