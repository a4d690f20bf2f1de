//! Slash command payload parsing

use thiserror::Error;

/// The form fields Slack posts for a slash command
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlashCommand {
    pub command: String,
    pub text: String,
    pub response_url: Option<String>,
    pub user_id: String,
    pub user_name: String,
    pub channel_id: String,
    pub team_id: String,
    pub trigger_id: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("unsupported slash command: {0}")]
    UnsupportedCommand(String),
}

impl SlashCommand {
    /// Decode an `application/x-www-form-urlencoded` body
    pub fn from_form(body: &[u8]) -> Result<Self, CommandParseError> {
        let mut command = SlashCommand::default();
        let mut saw_command = false;

        for (key, value) in url::form_urlencoded::parse(body) {
            let value = value.into_owned();
            match key.as_ref() {
                "command" => {
                    saw_command = true;
                    command.command = value;
                }
                "text" => command.text = value,
                "response_url" if !value.trim().is_empty() => {
                    command.response_url = Some(value)
                }
                "user_id" => command.user_id = value,
                "user_name" => command.user_name = value,
                "channel_id" => command.channel_id = value,
                "team_id" => command.team_id = value,
                "trigger_id" => command.trigger_id = value,
                _ => {}
            }
        }

        if !saw_command || command.command.trim().is_empty() {
            return Err(CommandParseError::MissingField("command"));
        }

        Ok(command)
    }

    /// Reject commands other than `expected`; `None` accepts any
    pub fn ensure_command(&self, expected: Option<&str>) -> Result<(), CommandParseError> {
        match expected {
            Some(expected) if self.command != expected => {
                Err(CommandParseError::UnsupportedCommand(self.command.clone()))
            }
            _ => Ok(()),
        }
    }
}
