//! The closed message vocabulary spoken on the helper socket.
//!
//! These strings, together with the socket path convention in
//! [`socket`](crate::socket), are the public contract shared with the
//! consumer daemon and with any tool that injects the same messages.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// A message understood by the helper daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    /// Workspace contents may have changed (app launched or terminated).
    WorkspaceChanged,
    /// The system woke from sleep.
    SystemWake,
    /// The keyboard input source changed.
    InputSourceChanged,
    /// The display configuration changed.
    DisplayConfigurationChanged,
    /// The power source changed.
    PowerSourceChanged,
}

impl Message {
    /// Every message in the vocabulary.
    pub const ALL: [Message; 5] = [
        Message::WorkspaceChanged,
        Message::SystemWake,
        Message::InputSourceChanged,
        Message::DisplayConfigurationChanged,
        Message::PowerSourceChanged,
    ];

    /// The wire text, without the trailing newline.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Message::WorkspaceChanged => "on-workspace-changed",
            Message::SystemWake => "on-system-wake",
            Message::InputSourceChanged => "on-input-source-changed",
            Message::DisplayConfigurationChanged => "on-display-configuration-changed",
            Message::PowerSourceChanged => "on-power-source-changed",
        }
    }

    /// The framed line as written to the socket.
    pub fn to_line(&self) -> String {
        let text = self.as_str();
        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        line.push('\n');
        line
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Message {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Message::ALL
            .into_iter()
            .find(|message| message.as_str() == s)
            .ok_or_else(|| Error::UnknownMessage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_text() {
        assert_eq!(Message::WorkspaceChanged.as_str(), "on-workspace-changed");
        assert_eq!(Message::SystemWake.as_str(), "on-system-wake");
        assert_eq!(
            Message::InputSourceChanged.as_str(),
            "on-input-source-changed"
        );
        assert_eq!(
            Message::DisplayConfigurationChanged.as_str(),
            "on-display-configuration-changed"
        );
        assert_eq!(
            Message::PowerSourceChanged.as_str(),
            "on-power-source-changed"
        );
    }

    #[test]
    fn test_text_never_contains_newline() {
        for message in Message::ALL {
            assert!(!message.as_str().contains('\n'));
        }
    }

    #[test]
    fn test_line_has_single_trailing_newline() {
        assert_eq!(Message::SystemWake.to_line(), "on-system-wake\n");
        assert_eq!(Message::WorkspaceChanged.to_string(), "on-workspace-changed");
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(
            "on-power-source-changed".parse::<Message>().unwrap(),
            Message::PowerSourceChanged
        );
        assert!("On-System-Wake".parse::<Message>().is_err());
        assert!("on-system-wake\n".parse::<Message>().is_err());
        assert!(matches!(
            "on-volume-changed".parse::<Message>(),
            Err(Error::UnknownMessage(text)) if text == "on-volume-changed"
        ));
    }
}
