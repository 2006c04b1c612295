use crate::constants::{
    CMD_DISABLE_ENGINEERING, CMD_ENABLE_CONFIG, CMD_ENABLE_ENGINEERING, CMD_END_CONFIG,
    CMD_READ_CONFIG, DEFAULT_ACCEPTED, ENABLE_CONFIG_ACCEPTED, ENABLE_CONFIG_VALUE,
};
use crate::error::Error;

/// Configuration state of the radar as tracked by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// Normal operation, the radar streams basic reports.
    #[default]
    Idle,
    /// Configuration mode, the radar accepts configuration commands.
    Configuring,
    /// Configuration mode with engineering reports enabled.
    Engineering,
}

/// A configuration command that may move the session to another mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    EnterConfig,
    ExitConfig,
    EnableEngineering,
    DisableEngineering,
    ReadConfig,
    /// Any other vendor command, issued while in configuration mode.
    Command(u16),
}

impl Transition {
    pub fn command_word(self) -> u16 {
        match self {
            Transition::EnterConfig => CMD_ENABLE_CONFIG,
            Transition::ExitConfig => CMD_END_CONFIG,
            Transition::EnableEngineering => CMD_ENABLE_ENGINEERING,
            Transition::DisableEngineering => CMD_DISABLE_ENGINEERING,
            Transition::ReadConfig => CMD_READ_CONFIG,
            Transition::Command(word) => word,
        }
    }

    pub fn value(self) -> &'static [u8] {
        match self {
            Transition::EnterConfig => &ENABLE_CONFIG_VALUE,
            _ => &[],
        }
    }

    /// Status codes that count as success, `None` when the reply status is
    /// not checked.
    pub fn accepted_codes(self) -> Option<&'static [u16]> {
        match self {
            Transition::EnterConfig => Some(&ENABLE_CONFIG_ACCEPTED),
            Transition::ReadConfig => None,
            _ => Some(&DEFAULT_ACCEPTED),
        }
    }

    /// Mode reached when the command succeeds from `from`, or
    /// `Error::InvalidStateTransition` if it may not be issued from there.
    pub fn target(self, from: SessionMode) -> Result<SessionMode, Error> {
        use SessionMode::*;

        match (self, from) {
            (Transition::EnterConfig, Idle) => Ok(Configuring),
            (Transition::ExitConfig, Configuring | Engineering) => Ok(Idle),
            (Transition::EnableEngineering, Configuring) => Ok(Engineering),
            (Transition::DisableEngineering, Engineering) => Ok(Configuring),
            (Transition::ReadConfig, Configuring) => Ok(Configuring),
            (Transition::Command(word), Configuring | Engineering) if !is_session_word(word) => {
                Ok(from)
            }
            _ => Err(Error::InvalidStateTransition {
                from,
                transition: self,
            }),
        }
    }
}

// Words that change the tracked mode must go through their own transition.
fn is_session_word(word: u16) -> bool {
    matches!(
        word,
        CMD_ENABLE_CONFIG
            | CMD_END_CONFIG
            | CMD_ENABLE_ENGINEERING
            | CMD_DISABLE_ENGINEERING
            | CMD_READ_CONFIG
    )
}
