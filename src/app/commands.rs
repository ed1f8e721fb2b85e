//! Inbound commands to the application service.
//!
//! One JSON object per line, dispatched on its `"cmd"` field:
//!
//! ```text
//! {"cmd":"set_alert","alert":3}                 {"cmd":"set_alert","alert":4,"exit":1}
//! {"cmd":"set_exit","zone":-1}                  {"cmd":"set_zone","zone":2,"r":255,"g":0,"b":0}
//! {"cmd":"gsm_call","number":"+15551234567"}    {"cmd":"gsm_hangup"}
//! {"cmd":"gsm_sms","number":"+15551234567","message":"Evacuate now"}
//! {"cmd":"ping"}
//! ```
//!
//! [`parse`] turns a raw line into a validated [`Command`] or the
//! [`CommandError`] to report. Nothing here touches state.

use std::borrow::Cow;

use heapless::String;
use serde::Deserialize;
use serde_json::Number;

use crate::drivers::led_strip::Rgb;
use crate::state::{ActiveZone, AlertLevel};

/// Longest accepted dial string, including a leading `+`.
pub const MAX_NUMBER_LEN: usize = 20;
/// One single-part GSM 7-bit text message.
pub const MAX_SMS_LEN: usize = 160;

pub type PhoneNumber = String<MAX_NUMBER_LEN>;
pub type SmsText = String<MAX_SMS_LEN>;

/// A validated command, ready to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Change the alert level, optionally moving the exit in the same write.
    SetAlert {
        level: AlertLevel,
        exit: Option<ActiveZone>,
    },
    /// Move the evacuation exit marker.
    SetExit(ActiveZone),
    /// One-shot paint of a single zone.
    SetZone { zone: u8, colour: Rgb },
    GsmCall(PhoneNumber),
    GsmSms {
        number: PhoneNumber,
        message: SmsText,
    },
    /// End an in-progress call before the ring timeout.
    GsmHangup,
    Ping,
}

/// Why a line was rejected. Each maps to an outbound error event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Not a JSON object, or a field had the wrong type.
    Malformed,
    /// `"cmd"` names nothing we know.
    Unknown,
    /// A required field (or `"cmd"` itself) is absent.
    MissingField(&'static str),
    /// A numeric field is outside its valid range.
    OutOfRange(&'static str),
    /// A text field failed validation.
    InvalidText(&'static str),
}

impl CommandError {
    /// Wire `message` for the error event.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Malformed => "json_parse_failed",
            Self::Unknown => "unknown_command",
            Self::MissingField(_) => "missing_field",
            Self::OutOfRange(_) => "out_of_range",
            Self::InvalidText(_) => "invalid_value",
        }
    }

    /// Offending field, if any.
    pub const fn field(self) -> Option<&'static str> {
        match self {
            Self::Malformed | Self::Unknown => None,
            Self::MissingField(f) | Self::OutOfRange(f) | Self::InvalidText(f) => Some(f),
        }
    }

    pub const fn is_out_of_range(self) -> bool {
        matches!(self, Self::OutOfRange(_))
    }
}

/// Loosely-typed view of one inbound line. Validation happens in [`parse`].
#[derive(Debug, Deserialize)]
struct RawCommand<'a> {
    #[serde(borrow)]
    cmd: Option<Cow<'a, str>>,
    alert: Option<Number>,
    exit: Option<Number>,
    zone: Option<Number>,
    r: Option<Number>,
    g: Option<Number>,
    b: Option<Number>,
    #[serde(borrow)]
    number: Option<Cow<'a, str>>,
    #[serde(borrow)]
    message: Option<Cow<'a, str>>,
}

/// Parse and validate one line against a table of `zone_count` zones.
pub fn parse(line: &[u8], zone_count: usize) -> Result<Command, CommandError> {
    let raw: RawCommand<'_> = serde_json::from_slice(line).map_err(|_| CommandError::Malformed)?;
    let cmd = raw.cmd.as_deref().ok_or(CommandError::MissingField("cmd"))?;

    match cmd {
        "set_alert" => {
            let code = integer(raw.alert, "alert")?.ok_or(CommandError::MissingField("alert"))?;
            let level = AlertLevel::from_code(code).ok_or(CommandError::OutOfRange("alert"))?;
            let exit = integer(raw.exit, "exit")?
                .map(|z| active_zone(z, zone_count, "exit"))
                .transpose()?;
            Ok(Command::SetAlert { level, exit })
        }
        "set_exit" => {
            let z = integer(raw.zone, "zone")?.ok_or(CommandError::MissingField("zone"))?;
            Ok(Command::SetExit(active_zone(z, zone_count, "zone")?))
        }
        "set_zone" => {
            let z = integer(raw.zone, "zone")?.ok_or(CommandError::MissingField("zone"))?;
            let zone = zone_index(z, zone_count, "zone")?;
            let colour = (
                channel(integer(raw.r, "r")?, "r")?,
                channel(integer(raw.g, "g")?, "g")?,
                channel(integer(raw.b, "b")?, "b")?,
            );
            Ok(Command::SetZone { zone, colour })
        }
        "gsm_call" => {
            let number = raw.number.ok_or(CommandError::MissingField("number"))?;
            Ok(Command::GsmCall(phone_number(&number)?))
        }
        "gsm_sms" => {
            let number = raw.number.ok_or(CommandError::MissingField("number"))?;
            let message = raw.message.ok_or(CommandError::MissingField("message"))?;
            Ok(Command::GsmSms {
                number: phone_number(&number)?,
                message: sms_text(&message)?,
            })
        }
        "gsm_hangup" => Ok(Command::GsmHangup),
        "ping" => Ok(Command::Ping),
        _ => Err(CommandError::Unknown),
    }
}

/// Whole-number value of a numeric field; `3.0` reads as `3`. A fractional
/// value is out of range.
fn integer(n: Option<Number>, field: &'static str) -> Result<Option<i64>, CommandError> {
    n.map(|n| {
        n.as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or(CommandError::OutOfRange(field))
    })
    .transpose()
}

fn zone_index(z: i64, zone_count: usize, field: &'static str) -> Result<u8, CommandError> {
    match usize::try_from(z) {
        Ok(i) if i < zone_count && i <= usize::from(u8::MAX) => Ok(i as u8),
        _ => Err(CommandError::OutOfRange(field)),
    }
}

/// `-1` selects every zone; anything else must index the table.
fn active_zone(z: i64, zone_count: usize, field: &'static str) -> Result<ActiveZone, CommandError> {
    if z == -1 {
        Ok(ActiveZone::All)
    } else {
        zone_index(z, zone_count, field).map(ActiveZone::Zone)
    }
}

/// Colour components default to 0 when omitted.
fn channel(v: Option<i64>, field: &'static str) -> Result<u8, CommandError> {
    u8::try_from(v.unwrap_or(0)).map_err(|_| CommandError::OutOfRange(field))
}

/// Spaces and dashes are dropped; what remains is an optional leading `+`
/// then ASCII digits, 1–20 characters in total.
fn phone_number(s: &str) -> Result<PhoneNumber, CommandError> {
    let invalid = CommandError::InvalidText("number");
    let mut number = PhoneNumber::new();
    for c in s.chars().filter(|c| !matches!(c, ' ' | '-')) {
        if !(c.is_ascii_digit() || (c == '+' && number.is_empty())) {
            return Err(invalid);
        }
        number.push(c).map_err(|()| invalid)?;
    }
    if number.trim_start_matches('+').is_empty() {
        return Err(invalid);
    }
    Ok(number)
}

/// Printable ASCII only, 1–160 characters; line breaks become spaces.
/// Other control bytes (Ctrl-Z, ESC) would end or abort the modem's text
/// prompt early.
fn sms_text(s: &str) -> Result<SmsText, CommandError> {
    let invalid = CommandError::InvalidText("message");
    let mut text = SmsText::new();
    for c in s.chars() {
        let c = if matches!(c, '\r' | '\n') { ' ' } else { c };
        if !(' '..='~').contains(&c) {
            return Err(invalid);
        }
        text.push(c).map_err(|()| invalid)?;
    }
    if text.is_empty() {
        return Err(invalid);
    }
    Ok(text)
}
