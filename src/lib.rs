#![cfg_attr(not(test), no_std)]

use core::ops::Range;

use embedded_io_async::{Error as _, ErrorKind, Read, Write};
use log::debug;

mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod config;
pub use config::*;

mod frame;
pub use frame::{extract_frame, FrameKind};

mod report;
pub use report::{parse_report, sign_magnitude, TargetReport, TargetState};

mod command;
pub use command::{
    ack_word, decode_status, expected_ack, status_code, CommandFrame, FailureReason,
    ResponseStatus,
};

mod session;
pub use session::{SessionMode, Transition};

/// Represents an LD2410 FMCW radar connected over UART.
///
/// The driver owns the serial interface, so at most one command exchange or
/// report read is in flight at any time. It also tracks whether the radar is
/// in configuration or engineering mode and refuses commands that are not
/// valid in the current mode without touching the port.
///
/// # Type Parameters
///
/// * `Serial`: The type of the serial interface used to communicate with the radar.
///   It must implement `embedded_io_async::Read` and `embedded_io_async::Write`.
///   Reads are expected to time out with `ErrorKind::TimedOut`; a read returning
///   zero bytes means the connection is closed.
pub struct Ld2410<Serial> {
    serial: Serial,
    config: Config,
    mode: SessionMode,
    buf: [u8; BUFFER_LEN],
}

impl<S> Ld2410<S> {
    /// Creates a new `Ld2410` radar instance in `SessionMode::Idle`.
    ///
    /// # Arguments
    ///
    /// * `serial`: The serial interface for communication with the radar.
    /// * `config`: Read limits for the driver.
    pub fn new(serial: S, config: Config) -> Self {
        Self {
            serial,
            config,
            mode: SessionMode::Idle,
            buf: [0u8; BUFFER_LEN],
        }
    }

    /// Current configuration session mode.
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Releases the underlying serial interface. Session state is dropped.
    pub fn release(self) -> S {
        self.serial
    }
}

impl<S> Ld2410<S>
where
    S: Read + Write,
{
    /// Reads target reports until one decodes.
    ///
    /// Corrupt, truncated or engineering-mode frames are logged and skipped.
    /// Only transport failures, connection loss and timeouts are returned.
    pub async fn read_report(&mut self) -> Result<TargetReport, Error> {
        loop {
            if let Some(report) = self.try_read_report().await? {
                return Ok(report);
            }
        }
    }

    /// Reads up to the next report tail and decodes it.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(TargetReport))` if a basic report frame was read.
    /// * `Ok(None)` if the bytes read did not form a valid report frame.
    /// * `Err(Error)` for timeouts and serial failures.
    pub async fn try_read_report(&mut self) -> Result<Option<TargetReport>, Error> {
        let len = match self.read_frame(FrameKind::Report).await {
            Ok(len) => len,
            Err(Error::CorruptFrame) => return Ok(None),
            Err(e) => return Err(e),
        };

        match parse_report(&self.buf[..len]) {
            Ok(report) => {
                debug!("Decoded report: {:?}", report);
                Ok(Some(report))
            }
            Err(e) => {
                log::warn!(
                    "Skipping report frame ({:?}). Buffer: {:02X?}",
                    e,
                    &self.buf[..len]
                );
                Ok(None)
            }
        }
    }

    /// Puts the radar in configuration mode.
    ///
    /// Valid from `SessionMode::Idle` only.
    pub async fn enter_config_mode(&mut self) -> Result<(), Error> {
        self.transition(Transition::EnterConfig).await.map(|_| ())
    }

    /// Ends configuration mode, returning the radar to normal reporting.
    ///
    /// Valid from `SessionMode::Configuring` and `SessionMode::Engineering`.
    pub async fn exit_config_mode(&mut self) -> Result<(), Error> {
        self.transition(Transition::ExitConfig).await.map(|_| ())
    }

    /// Enables engineering mode. Valid from `SessionMode::Configuring`.
    pub async fn enable_engineering_mode(&mut self) -> Result<(), Error> {
        self.transition(Transition::EnableEngineering)
            .await
            .map(|_| ())
    }

    /// Disables engineering mode. Valid from `SessionMode::Engineering`.
    pub async fn disable_engineering_mode(&mut self) -> Result<(), Error> {
        self.transition(Transition::DisableEngineering)
            .await
            .map(|_| ())
    }

    /// Reads the current configuration parameters.
    ///
    /// The reply is returned as received, starting at the command header.
    /// Its status is not checked. Valid from `SessionMode::Configuring`.
    pub async fn read_config(&mut self) -> Result<&[u8], Error> {
        let range = self.transition(Transition::ReadConfig).await?;
        Ok(&self.buf[range])
    }

    /// Sends any other vendor command while in configuration mode and returns
    /// the raw reply. The reply status must be `0`.
    ///
    /// Commands that change the session mode are rejected; use the dedicated
    /// methods for those.
    pub async fn command(&mut self, command_word: u16, value: &[u8]) -> Result<&[u8], Error> {
        let transition = Transition::Command(command_word);
        self.check_transition(transition)?;
        let range = self.exchange_checked(transition, value).await?;
        Ok(&self.buf[range])
    }

    // Runs a session transition: validates it against the current mode, performs
    // the exchange, checks the reply status and only then updates the mode.
    async fn transition(&mut self, transition: Transition) -> Result<Range<usize>, Error> {
        let to = self.check_transition(transition)?;
        let range = self.exchange_checked(transition, transition.value()).await?;

        debug!("{:?}: {:?} -> {:?}", transition, self.mode, to);
        self.mode = to;
        Ok(range)
    }

    fn check_transition(&self, transition: Transition) -> Result<SessionMode, Error> {
        transition.target(self.mode).map_err(|e| {
            log::error!("Rejected {:?} while {:?}", transition, self.mode);
            e
        })
    }

    // Exchanges the command of `transition` and checks the reply status. A read
    // that timed out counts as a failed status.
    async fn exchange_checked(
        &mut self,
        transition: Transition,
        value: &[u8],
    ) -> Result<Range<usize>, Error> {
        let (range, status) = match self.exchange(transition.command_word(), value).await {
            Ok(range) => {
                let status = match transition.accepted_codes() {
                    Some(accepted) => decode_status(&self.buf[range.clone()], accepted),
                    None => ResponseStatus::Success,
                };
                (range, status)
            }
            Err(Error::Timeout) => (0..0, ResponseStatus::Failure(FailureReason::Timeout)),
            Err(e) => return Err(e),
        };

        let result: Result<(), Error> = status.into();
        result.map_err(|e| {
            log::error!(
                "{:?} failed ({:?}), reply: {:02X?}",
                transition,
                e,
                &self.buf[range.clone()]
            );
            e
        })?;
        Ok(range)
    }

    // Sends a command frame and waits for the reply. Returns the range of the
    // reply in the internal buffer, starting at the command header.
    async fn exchange(&mut self, command_word: u16, value: &[u8]) -> Result<Range<usize>, Error> {
        let command = CommandFrame::new(command_word, value);
        let len = command.encode(&mut self.buf)?;
        self.write(len).await?;

        let len = self.read_frame(FrameKind::Command).await.map_err(|e| {
            log::error!("No reply to command {:#06X}: {:?}", command_word, e);
            e
        })?;
        let Some(start) = frame::find(&self.buf[..len], &COMMAND_HEADER) else {
            log::error!(
                "Reply to command {:#06X} has no header: {:02X?}",
                command_word,
                &self.buf[..len]
            );
            return Err(Error::CorruptFrame);
        };
        let response = &self.buf[start..len];
        debug!("Reply: {:02X?}", response);

        match ack_word(response) {
            Some(ack) if ack != expected_ack(command_word) => {
                log::warn!(
                    "Reply carries command word {:#06X}, expected {:#06X}",
                    ack,
                    expected_ack(command_word)
                );
            }
            _ => {}
        }

        Ok(start..len)
    }

    // Writes the first `len` bytes of the internal buffer to the serial port.
    async fn write(&mut self, len: usize) -> Result<(), Error> {
        debug!("Executing command: {:02X?}", &self.buf[..len]);
        self.serial
            .flush()
            .await
            .map_err(|e| self.transport_error(e.kind(), Error::WriteFailure))?;
        self.serial
            .write_all(&self.buf[..len])
            .await
            .map_err(|e| self.transport_error(e.kind(), Error::WriteFailure))?;
        self.serial
            .flush()
            .await
            .map_err(|e| self.transport_error(e.kind(), Error::WriteFailure))?; // Ensure data is sent
        Ok(())
    }

    // Reads byte by byte into the internal buffer until it ends with the tail of
    // `kind`, so nothing past the tail is consumed. Complete frames of the other
    // kind, header included, are dropped along the way. Returns the number of bytes buffered.
    async fn read_frame(&mut self, kind: FrameKind) -> Result<usize, Error> {
        let (_, tail) = kind.delimiters();
        let other = match kind {
            FrameKind::Report => FrameKind::Command,
            FrameKind::Command => FrameKind::Report,
        };
        let (other_header, other_tail) = other.delimiters();
        let limit = self.config.max_frame_len.clamp(REPORT_FRAME_LEN, BUFFER_LEN);
        let max_timeouts = self.config.max_timeouts.max(1);

        let mut len = 0;
        let mut timeouts = 0u8;
        loop {
            if len >= limit {
                log::warn!(
                    "No {:?} tail within {} bytes, dropping: {:02X?}",
                    kind,
                    limit,
                    &self.buf[..len]
                );
                return Err(Error::CorruptFrame);
            }

            match self.serial.read(&mut self.buf[len..len + 1]).await {
                Ok(0) => {
                    log::error!("Serial connection closed");
                    return Err(self.transport_error(ErrorKind::NotConnected, Error::ReadFailure));
                }
                Ok(n) => {
                    len += n;
                    if self.buf[..len].ends_with(tail) {
                        return Ok(len);
                    }
                    if self.buf[..len].ends_with(other_tail)
                        && extract_frame(&self.buf[..len], other_header, other_tail).is_some()
                    {
                        debug!("Dropping {:?} frame: {:02X?}", other, &self.buf[..len]);
                        len = 0;
                    }
                }
                Err(e) if e.kind() == ErrorKind::TimedOut => {
                    timeouts += 1;
                    if timeouts >= max_timeouts {
                        debug!("Timed out waiting for {:?} tail after {} bytes", kind, len);
                        return Err(Error::Timeout);
                    }
                }
                Err(e) => {
                    debug!("Serial read error: {:?}", e);
                    return Err(self.transport_error(e.kind(), Error::ReadFailure));
                }
            }
        }
    }

    // Maps a transport error kind to a driver error. A closed connection ends
    // the configuration session.
    fn transport_error(&mut self, kind: ErrorKind, fallback: Error) -> Error {
        match kind {
            ErrorKind::NotConnected
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe => {
                self.mode = SessionMode::Idle;
                Error::Disconnected
            }
            ErrorKind::TimedOut => Error::Timeout,
            _ => fallback,
        }
    }
}
