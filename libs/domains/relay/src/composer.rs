//! Turns an [`OutboundMessage`] into the bytes sent after DATA.

use chrono::{DateTime, FixedOffset, Local};

use crate::models::OutboundMessage;

/// RFC 1123 with a numeric zone, e.g. `Mon, 02 Jan 2006 15:04:05 -0700`.
pub const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Sender actually used for a message.
pub fn effective_from<'a>(message: &'a OutboundMessage, default_from: &'a str) -> &'a str {
    if message.from.is_empty() {
        default_from
    } else {
        &message.from
    }
}

/// Compose the message dated with the local clock.
pub fn compose(message: &OutboundMessage, default_from: &str) -> String {
    compose_at(message, default_from, Local::now().fixed_offset())
}

/// Compose the message with an explicit `Date`.
///
/// Headers are written in the order From, To, Subject, Date, Content-Type,
/// followed by one blank line and the body verbatim. No dot-stuffing or line
/// folding happens here, and header values must not contain CR or LF.
pub fn compose_at(
    message: &OutboundMessage,
    default_from: &str,
    now: DateTime<FixedOffset>,
) -> String {
    let content_type = if message.is_html {
        "text/html; charset=UTF-8"
    } else {
        "text/plain; charset=UTF-8"
    };

    let headers = [
        ("From", effective_from(message, default_from).to_string()),
        ("To", message.to.clone()),
        ("Subject", message.subject.clone()),
        ("Date", now.format(DATE_FORMAT).to_string()),
        ("Content-Type", content_type.to_string()),
    ];

    let mut out = String::with_capacity(message.body.len() + 256);
    for (name, value) in &headers {
        // Request validation keeps line breaks out of header values
        debug_assert!(
            !value.contains(['\r', '\n']),
            "{name} header value spans lines"
        );
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push_str("\r\n");
    }
    out.push_str("\r\n");
    out.push_str(&message.body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2006, 1, 2, 15, 4, 5)
            .unwrap()
    }

    fn message() -> OutboundMessage {
        OutboundMessage {
            from: "sender@example.com".into(),
            to: "recipient@example.com".into(),
            subject: "Test Subject".into(),
            body: "This is a test email".into(),
            is_html: false,
        }
    }

    #[test]
    fn test_compose_exact_output() {
        let out = compose_at(&message(), "default@example.com", fixed_now());
        assert_eq!(
            out,
            "From: sender@example.com\r\n\
             To: recipient@example.com\r\n\
             Subject: Test Subject\r\n\
             Date: Mon, 02 Jan 2006 15:04:05 -0700\r\n\
             Content-Type: text/plain; charset=UTF-8\r\n\
             \r\n\
             This is a test email"
        );
    }

    #[test]
    fn test_compose_uses_default_from_when_empty() {
        let msg = OutboundMessage {
            from: String::new(),
            ..message()
        };
        let out = compose_at(&msg, "default@example.com", fixed_now());
        assert!(out.starts_with("From: default@example.com\r\n"));
    }

    #[test]
    fn test_compose_html_content_type() {
        let msg = OutboundMessage {
            body: "<h1>This is a test email</h1>".into(),
            is_html: true,
            ..message()
        };
        let out = compose_at(&msg, "default@example.com", fixed_now());
        assert!(out.contains("Content-Type: text/html; charset=UTF-8\r\n"));
        assert!(out.ends_with("\r\n\r\n<h1>This is a test email</h1>"));
    }

    #[test]
    fn test_compose_single_separator_and_header_order() {
        // The body itself has no blank line, so exactly one separator must appear.
        let msg = OutboundMessage {
            body: "line one\r\nline two\r\n.\r\n".into(),
            ..message()
        };
        let out = compose(&msg, "default@example.com");

        assert_eq!(out.matches("\r\n\r\n").count(), 1);
        let (head, body) = out.split_once("\r\n\r\n").unwrap();
        assert_eq!(body, msg.body);

        let names: Vec<&str> = head
            .split("\r\n")
            .map(|line| line.split_once(": ").unwrap().0)
            .collect();
        assert_eq!(names, ["From", "To", "Subject", "Date", "Content-Type"]);
    }

    #[test]
    fn test_effective_from() {
        let mut msg = message();
        assert_eq!(effective_from(&msg, "d@x.test"), "sender@example.com");
        msg.from.clear();
        assert_eq!(effective_from(&msg, "d@x.test"), "d@x.test");
    }
}
