//! Tokenizing of single DRC trace lines.
//!
//! A trace line is `timestamp action key>value ...`, whitespace-delimited.
//! The `src`/`dst` values pack an address and port separated by `/`; every
//! other key maps to one typed attribute. The recognized key set is closed;
//! anything else is a hard error.

use crate::parser::timestamp::parse_timestamp;
use crate::utils::error::ParseError;

/// Action keyword of a trace line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    On,
    Off,
    Listen,
    Send,
    Recv,
    /// Any action the engine does not score (e.g. RERR)
    Other(String),
}

impl Action {
    fn from_token(token: &str) -> Action {
        match token {
            "ON" => Action::On,
            "OFF" => Action::Off,
            "LISTEN" => Action::Listen,
            "SEND" => Action::Send,
            "RECV" => Action::Recv,
            other => Action::Other(other.to_string()),
        }
    }
}

/// One decoded trace line.
///
/// Attributes are present-or-absent; which ones an action requires is
/// enforced when the event is scored, not here.
#[derive(Debug, Clone)]
pub struct TrafficEvent {
    /// Action keyword (ON/OFF/LISTEN/SEND/RECV...)
    pub action: Action,
    /// Timestamp of the event, epoch seconds
    pub time: f64,
    /// Sent timestamp, epoch seconds
    pub sent: Option<f64>,
    /// Proto field (UDP/TCP)
    pub proto: Option<String>,
    /// Port field
    pub port: Option<u32>,
    /// Flow field
    pub flow: Option<u32>,
    /// Sequence field
    pub seq: Option<u32>,
    /// Fragment field
    pub frag: Option<u32>,
    /// TOS field
    pub tos: Option<u32>,
    /// Destination address field
    pub dst_addr: Option<String>,
    /// Destination port field
    pub dst_port: Option<u32>,
    /// Source address field
    pub src_addr: Option<String>,
    /// Source port field
    pub src_port: Option<u32>,
    /// Message size field
    pub size: Option<u32>,
    /// GPS data field
    pub gps: Option<String>,
    /// Type field (used by RERR)
    pub kind: Option<String>,
}

impl TrafficEvent {
    fn new(action: Action, time: f64) -> Self {
        Self {
            action,
            time,
            sent: None,
            proto: None,
            port: None,
            flow: None,
            seq: None,
            frag: None,
            tos: None,
            dst_addr: None,
            dst_port: None,
            src_addr: None,
            src_port: None,
            size: None,
            gps: None,
            kind: None,
        }
    }

    /// Decode one `key>value` token into the matching typed attribute
    fn set_field(&mut self, key: &str, value: &str) -> Result<(), ParseError> {
        match key {
            "dst" => {
                let (addr, port) = parse_addr_port(value)?;
                self.dst_addr = Some(addr);
                self.dst_port = Some(port);
            }
            "src" => {
                let (addr, port) = parse_addr_port(value)?;
                self.src_addr = Some(addr);
                self.src_port = Some(port);
            }
            "srcPort" => self.src_port = Some(parse_uint(key, value)?),
            "sent" => self.sent = Some(parse_timestamp(value)?),
            "proto" => self.proto = Some(value.to_string()),
            "port" => self.port = Some(parse_uint(key, value)?),
            "flow" => self.flow = Some(parse_uint(key, value)?),
            "seq" => self.seq = Some(parse_uint(key, value)?),
            "frag" => self.frag = Some(parse_uint(key, value)?),
            "TOS" => self.tos = Some(parse_uint(key, value)?),
            "size" => self.size = Some(parse_uint(key, value)?),
            "gps" => self.gps = Some(value.to_string()),
            "type" => self.kind = Some(value.to_string()),
            _ => {
                return Err(ParseError::UnknownField {
                    key: key.to_string(),
                    value: value.to_string(),
                })
            }
        }
        Ok(())
    }
}

/// Tokenize one raw trace line.
///
/// Returns `Ok(None)` when the line has no timestamp token at all; the
/// reader treats that as the normal end of input.
///
/// # Errors
/// * `ParseError::MalformedTimestamp` - unparseable timestamp or `sent` value
/// * `ParseError::MissingAction` - timestamp present but nothing after it
/// * `ParseError::MalformedAddress` - bad `src`/`dst` address/port pair
/// * `ParseError::UnknownField` - key outside the recognized set
pub fn tokenize_line(line: &str) -> Result<Option<TrafficEvent>, ParseError> {
    let mut tokens = line.split_whitespace();

    let Some(timestamp) = tokens.next() else {
        return Ok(None);
    };
    let time = parse_timestamp(timestamp)?;

    let action = tokens.next().ok_or(ParseError::MissingAction)?;
    let mut event = TrafficEvent::new(Action::from_token(action), time);

    for token in tokens {
        // Tokens without a key and value (no ">" or nothing around it)
        // are passed over, matching the generator's own quirks
        match token.split_once('>') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => {
                event.set_field(key, value)?;
            }
            _ => {}
        }
    }

    Ok(Some(event))
}

fn parse_uint(key: &str, value: &str) -> Result<u32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidFieldValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Split an `address/port` value
fn parse_addr_port(value: &str) -> Result<(String, u32), ParseError> {
    let malformed = || ParseError::MalformedAddress(value.to_string());

    let (addr, port) = value.split_once('/').ok_or_else(malformed)?;
    if addr.is_empty() {
        return Err(malformed());
    }
    let port = port.parse().map_err(|_| malformed())?;

    Ok((addr.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_on_line() {
        let event = tokenize_line("2019-07-15_12:00:00.000 ON flow>5 srcPort>100 dst>10.0.0.1/200")
            .unwrap()
            .unwrap();

        assert_eq!(event.action, Action::On);
        assert_eq!(event.time, 1563192000.0);
        assert_eq!(event.flow, Some(5));
        assert_eq!(event.src_port, Some(100));
        assert_eq!(event.dst_addr.as_deref(), Some("10.0.0.1"));
        assert_eq!(event.dst_port, Some(200));
    }

    #[test]
    fn test_tokenize_send_line() {
        let line = "2019-07-15_12:00:00.100 SEND flow>5 proto>UDP seq>1 frag>0 TOS>0 \
                    srcPort>100 dst>10.0.0.1/200 size>64";
        let event = tokenize_line(line).unwrap().unwrap();

        assert_eq!(event.action, Action::Send);
        assert_eq!(event.proto.as_deref(), Some("UDP"));
        assert_eq!(event.seq, Some(1));
        assert_eq!(event.frag, Some(0));
        assert_eq!(event.tos, Some(0));
        assert_eq!(event.size, Some(64));
    }

    #[test]
    fn test_tokenize_recv_line_decodes_sent_timestamp() {
        let line = "2019-07-15_12:00:00.300 RECV flow>5 proto>UDP seq>1 frag>0 TOS>0 \
                    src>10.0.0.2/100 dst>10.0.0.1/200 sent>2019-07-15_12:00:00.100 size>64";
        let event = tokenize_line(line).unwrap().unwrap();

        assert_eq!(event.action, Action::Recv);
        assert_eq!(event.sent, Some(1563192000.1));
        assert_eq!(event.src_addr.as_deref(), Some("10.0.0.2"));
        assert_eq!(event.src_port, Some(100));
    }

    #[test]
    fn test_tokenize_unscored_action_keeps_fields() {
        let event = tokenize_line("2019-07-15_12:00:00.000 RERR type>routeFailure")
            .unwrap()
            .unwrap();

        assert_eq!(event.action, Action::Other("RERR".to_string()));
        assert_eq!(event.kind.as_deref(), Some("routeFailure"));
    }

    #[test]
    fn test_tokenize_blank_line_is_end_of_input() {
        assert!(tokenize_line("").unwrap().is_none());
        assert!(tokenize_line("   \n").unwrap().is_none());
    }

    #[test]
    fn test_tokenize_missing_action() {
        let result = tokenize_line("2019-07-15_12:00:00.000");
        assert!(matches!(result, Err(ParseError::MissingAction)));
    }

    #[test]
    fn test_tokenize_unknown_field() {
        let result = tokenize_line("2019-07-15_12:00:00.000 SEND bogus>1");
        assert!(matches!(result, Err(ParseError::UnknownField { .. })));
    }

    #[test]
    fn test_tokenize_malformed_address() {
        let result = tokenize_line("2019-07-15_12:00:00.000 ON flow>5 dst>10.0.0.1");
        assert!(matches!(result, Err(ParseError::MalformedAddress(_))));

        let result = tokenize_line("2019-07-15_12:00:00.000 ON flow>5 dst>10.0.0.1/abc");
        assert!(matches!(result, Err(ParseError::MalformedAddress(_))));
    }

    #[test]
    fn test_tokenize_bad_numeric_value() {
        let result = tokenize_line("2019-07-15_12:00:00.000 SEND flow>x");
        assert!(matches!(result, Err(ParseError::InvalidFieldValue { .. })));
    }

    #[test]
    fn test_tokenize_malformed_line_timestamp() {
        let result = tokenize_line("garbage SEND flow>5");
        assert!(matches!(result, Err(ParseError::MalformedTimestamp(_))));
    }
}
