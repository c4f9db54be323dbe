//! Gmail payload walking and RFC 2822 message building.

use base64::{
    alphabet,
    engine::general_purpose::{STANDARD as BASE64, URL_SAFE},
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use serde::Deserialize;

/// Gmail encodes body data as URL-safe base64, usually without padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Body lines of an encoded reply are wrapped at this width.
const BASE64_LINE_WIDTH: usize = 76;

/// One node of a Gmail `format=full` payload tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub body: Option<PartBody>,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartBody {
    #[serde(default)]
    pub data: Option<String>,
}

impl MessagePart {
    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    fn is_plain_text(&self) -> bool {
        self.mime_type.eq_ignore_ascii_case("text/plain")
    }

    fn decoded_body(&self) -> String {
        self.body
            .as_ref()
            .and_then(|b| b.data.as_deref())
            .map(decode_body_data)
            .unwrap_or_default()
    }
}

/// Decode URL-safe base64 body data; undecodable input yields an empty string.
pub fn decode_body_data(data: &str) -> String {
    match URL_SAFE_LENIENT.decode(data.trim()) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::debug!("Undecodable body data: {}", e);
            String::new()
        }
    }
}

/// First plain-text body of a payload tree.
///
/// A `text/plain` root is returned as is. Otherwise direct children are
/// checked for a non-blank `text/plain` part before descending, in order,
/// into children that carry parts of their own.
pub fn extract_body_text(payload: &MessagePart) -> String {
    if payload.is_plain_text() {
        return payload.decoded_body();
    }
    first_plain_text(&payload.parts).unwrap_or_default()
}

fn first_plain_text(parts: &[MessagePart]) -> Option<String> {
    for part in parts.iter().filter(|p| p.is_plain_text()) {
        let text = part.decoded_body();
        if !text.trim().is_empty() {
            return Some(text);
        }
    }

    parts
        .iter()
        .filter(|p| !p.parts.is_empty())
        .find_map(|p| first_plain_text(&p.parts))
}

/// Split a `From`-style header into display name and address.
///
/// `"Ada Lovelace" <ada@example.com>` gives `("Ada Lovelace", "ada@example.com")`,
/// a bare address gives an empty name.
pub fn parse_address(raw: &str) -> (String, String) {
    let raw = raw.trim();
    if let (Some(open), Some(close)) = (raw.rfind('<'), raw.rfind('>')) {
        if open < close {
            let name = raw[..open].trim().trim_matches('"').trim().to_string();
            let address = raw[open + 1..close].trim().to_string();
            return (name, address);
        }
    }
    if raw.contains('@') && !raw.contains(char::is_whitespace) {
        return (String::new(), raw.to_string());
    }
    (String::new(), String::new())
}

/// Encode a header value per RFC 2047 when it is not plain ASCII.
pub fn encode_header_value(value: &str) -> String {
    if value.is_ascii() {
        return value.to_string();
    }
    format!("=?utf-8?b?{}?=", BASE64.encode(value.as_bytes()))
}

/// Reply fields rendered into a raw message.
#[derive(Debug, Clone, Copy)]
pub struct ReplyMessage<'a> {
    pub recipient: &'a str,
    pub subject: &'a str,
    pub in_reply_to: &'a str,
    pub body: &'a str,
}

impl ReplyMessage<'_> {
    /// RFC 2822 text of the reply with a base64 UTF-8 body.
    pub fn to_rfc2822(&self) -> String {
        let encoded = BASE64.encode(self.body.as_bytes());
        let body_lines: Vec<&str> = encoded
            .as_bytes()
            .chunks(BASE64_LINE_WIDTH)
            .filter_map(|chunk| std::str::from_utf8(chunk).ok())
            .collect();

        let headers = [
            "Content-Type: text/plain; charset=\"utf-8\"".to_string(),
            "MIME-Version: 1.0".to_string(),
            "Content-Transfer-Encoding: base64".to_string(),
            format!("To: {}", self.recipient),
            format!("Subject: {}", encode_header_value(self.subject)),
            format!("In-Reply-To: {}", self.in_reply_to),
            format!("References: {}", self.in_reply_to),
        ];

        format!("{}\r\n\r\n{}\r\n", headers.join("\r\n"), body_lines.join("\r\n"))
    }

    /// URL-safe base64 of the message, as the drafts API expects in `raw`.
    pub fn to_raw(&self) -> String {
        URL_SAFE.encode(self.to_rfc2822().as_bytes())
    }
}
