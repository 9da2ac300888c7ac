//! Alert Composer
//!
//! Turns a `DetectionEvent` into an `AlertPayload`: subject line, HTML body
//! and plain-text body. Pure transform, output depends only on the event and
//! the composer settings.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use super::types::{AlertPayload, DetectionEvent, InvalidEventError};
use crate::constants::APP_NAME;
use crate::logic::threat::{classify, SeverityTier};

const IMMEDIATE_ACTION: &str = "HIGH THREAT - IMMEDIATE ACTION REQUIRED";

const RECOMMENDED_ACTIONS: [&str; 4] = [
    "Review the live feed immediately",
    "Verify the threat with security personnel",
    "Follow your organization's security protocols",
    "Contact law enforcement if necessary",
];

const AUTOMATED_NOTICE: &str = "This is an automated alert. Do not reply to this email.";

/// Composes alert payloads
#[derive(Debug, Clone)]
pub struct AlertComposer {
    /// Offset the recipient reads timestamps in
    offset: FixedOffset,
    /// Host or site name shown in the footer
    origin: Option<String>,
}

impl Default for AlertComposer {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
            origin: None,
        }
    }
}

impl AlertComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render timestamps at `minutes` east of UTC. Out-of-range values keep UTC.
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        match minutes.checked_mul(60).and_then(FixedOffset::east_opt) {
            Some(offset) => self.offset = offset,
            None => log::warn!("Ignoring invalid UTC offset: {} minutes", minutes),
        }
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Compose the alert for one event
    pub fn compose(&self, event: &DetectionEvent) -> Result<AlertPayload, InvalidEventError> {
        let confidence = event.validate()?;
        let severity = classify(confidence);
        let facts = Facts {
            object_class: event.object_class.trim(),
            percent: confidence_percent(confidence),
            location: &event.location,
            timestamp: self.format_timestamp(&event.timestamp),
            severity,
        };

        Ok(AlertPayload {
            subject: format!(
                "{}THREAT ALERT: {} Detected ({}% confidence)",
                severity.subject_marker(),
                facts.object_class,
                facts.percent
            ),
            html_body: self.render_html(&facts),
            text_body: self.render_text(&facts),
            severity,
            object_class: facts.object_class.to_string(),
            confidence_percent: facts.percent.clone(),
            location: event.location.clone(),
            timestamp: event.timestamp,
        })
    }

    /// `01/31/2024, 18:05:09 UTC+05:30`
    pub fn format_timestamp(&self, timestamp: &DateTime<Utc>) -> String {
        format!(
            "{} {}",
            timestamp.with_timezone(&self.offset).format("%m/%d/%Y, %H:%M:%S"),
            offset_label(&self.offset)
        )
    }

    fn render_html(&self, facts: &Facts) -> String {
        let object_class = escape_html(facts.object_class);
        let location = escape_html(facts.location);
        let alert_box_style = match facts.severity {
            SeverityTier::High => "background:#f8d7da;border-left:4px solid #dc3545;",
            _ => "background:#fff3cd;border-left:4px solid #ffc107;",
        };

        let mut html = String::with_capacity(4096);
        html.push_str("<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n");
        html.push_str("<body style=\"font-family:Arial,sans-serif;line-height:1.6;color:#333;max-width:600px;margin:0 auto;padding:20px;\">\n");

        html.push_str("<div style=\"background:#4b3f8f;color:#fff;padding:30px;border-radius:10px 10px 0 0;text-align:center;\">\n");
        html.push_str("<div style=\"font-size:48px;\">🚨</div>\n");
        html.push_str("<h1 style=\"margin:0;font-size:24px;\">WEAPON DETECTION ALERT</h1>\n");
        html.push_str(&format!(
            "<p style=\"margin:5px 0 0 0;\">{} severity detection</p>\n",
            facts.severity.label()
        ));
        html.push_str("</div>\n");

        html.push_str("<div style=\"background:#f9f9f9;padding:30px;border:1px solid #ddd;border-top:none;\">\n");
        html.push_str(&format!(
            "<div style=\"{}padding:15px;margin:20px 0;border-radius:4px;\">\n",
            alert_box_style
        ));
        html.push_str("<h2 style=\"margin-top:0;color:#721c24;\">⚠️ Threat Detected</h2>\n");
        html.push_str("<p style=\"margin:0;\">A potential weapon has been detected by the AI surveillance system.</p>\n");
        html.push_str("</div>\n");

        html.push_str("<h3>Detection Details:</h3>\n");
        html.push_str(&detail_row("Detected Object", &format!("<strong>{}</strong>", object_class)));
        html.push_str(&detail_row("Confidence Level", &format!("<strong>{}%</strong>", facts.percent)));
        html.push_str(&format!(
            "<div style=\"width:100%;height:30px;background:#e0e0e0;border-radius:15px;overflow:hidden;margin:10px 0;\">\
             <div style=\"width:{pct}%;height:100%;background:#ee5a6f;color:#fff;font-weight:bold;text-align:center;\">{pct}%</div></div>\n",
            pct = facts.percent
        ));
        html.push_str(&detail_row("Location", &location));
        html.push_str(&detail_row("Timestamp", &facts.timestamp));
        html.push_str(&detail_row(
            "Threat Level",
            &format!(
                "<strong style=\"color:{};\">{}</strong>",
                facts.severity.color(),
                facts.severity.label()
            ),
        ));

        if facts.severity.requires_immediate_action() {
            html.push_str(&format!(
                "<div style=\"background:#dc3545;color:#fff;padding:15px;border-radius:5px;text-align:center;font-weight:bold;margin:20px 0;\">⚠️ {}</div>\n",
                IMMEDIATE_ACTION
            ));
        }

        html.push_str("<p style=\"margin-top:20px;color:#666;font-size:14px;\"><strong>Recommended Actions:</strong><br>\n");
        for (i, action) in RECOMMENDED_ACTIONS.iter().enumerate() {
            html.push_str(&format!("{}. {}<br>\n", i + 1, action));
        }
        html.push_str("</p>\n</div>\n");

        html.push_str("<div style=\"background:#333;color:#fff;padding:20px;text-align:center;border-radius:0 0 10px 10px;font-size:12px;\">\n");
        html.push_str(&format!("<p style=\"margin:0;\">{}</p>\n", APP_NAME));
        if let Some(ref origin) = self.origin {
            html.push_str(&format!("<p style=\"margin:5px 0 0 0;\">Sent from {}</p>\n", escape_html(origin)));
        }
        html.push_str(&format!("<p style=\"margin:5px 0 0 0;\">{}</p>\n", AUTOMATED_NOTICE));
        html.push_str("</div>\n</body>\n</html>\n");
        html
    }

    fn render_text(&self, facts: &Facts) -> String {
        let mut text = String::with_capacity(1024);
        text.push_str("WEAPON DETECTION ALERT\n\n");
        text.push_str("A potential weapon has been detected by the AI surveillance system.\n\n");
        text.push_str("Detection Details:\n");
        text.push_str(&format!("- Detected Object: {}\n", facts.object_class));
        text.push_str(&format!("- Confidence Level: {}%\n", facts.percent));
        text.push_str(&format!("- Location: {}\n", facts.location));
        text.push_str(&format!("- Timestamp: {}\n", facts.timestamp));
        text.push_str(&format!("- Threat Level: {}\n", facts.severity.label()));

        if facts.severity.requires_immediate_action() {
            text.push_str(&format!("\n{}\n", IMMEDIATE_ACTION));
        }

        text.push_str("\nRecommended Actions:\n");
        for (i, action) in RECOMMENDED_ACTIONS.iter().enumerate() {
            text.push_str(&format!("{}. {}\n", i + 1, action));
        }

        text.push_str("\n---\n");
        text.push_str(APP_NAME);
        text.push('\n');
        if let Some(ref origin) = self.origin {
            text.push_str(&format!("Sent from {}\n", origin));
        }
        text.push_str(AUTOMATED_NOTICE);
        text.push('\n');
        text
    }
}

/// Compose with default settings (UTC, no origin)
pub fn compose(event: &DetectionEvent) -> Result<AlertPayload, InvalidEventError> {
    AlertComposer::default().compose(event)
}

/// Confidence as a percentage with two decimals: `0.95` -> `"95.00"`
pub fn confidence_percent(confidence: f64) -> String {
    format!("{:.2}", confidence * 100.0)
}

struct Facts<'a> {
    object_class: &'a str,
    percent: String,
    location: &'a str,
    timestamp: String,
    severity: SeverityTier,
}

fn detail_row(label: &str, value: &str) -> String {
    format!(
        "<div style=\"padding:10px 0;border-bottom:1px solid #eee;\">\
         <span style=\"font-weight:bold;color:#666;\">{}:</span> <span>{}</span></div>\n",
        label, value
    )
}

fn offset_label(offset: &FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    if seconds == 0 {
        return "UTC".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    format!("UTC{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn gun_event(confidence: f64) -> DetectionEvent {
        DetectionEvent::new("Gun", confidence, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_high_subject_and_directive() {
        let payload = compose(&gun_event(0.95)).unwrap();
        assert_eq!(payload.severity, SeverityTier::High);
        assert_eq!(payload.subject, "🚨 THREAT ALERT: Gun Detected (95.00% confidence)");
        assert!(payload.html_body.contains(IMMEDIATE_ACTION));
        assert!(payload.text_body.contains(IMMEDIATE_ACTION));
    }

    #[test]
    fn test_medium_has_no_marker_or_directive() {
        let payload = compose(&gun_event(0.65)).unwrap();
        assert_eq!(payload.severity, SeverityTier::Medium);
        assert_eq!(payload.subject, "THREAT ALERT: Gun Detected (65.00% confidence)");
        assert!(!payload.html_body.contains(IMMEDIATE_ACTION));
        assert!(!payload.text_body.contains(IMMEDIATE_ACTION));
    }

    #[test]
    fn test_both_bodies_carry_the_same_facts() {
        let payload = compose(&gun_event(0.612345).at_location("Gate-3")).unwrap();
        for body in [&payload.html_body, &payload.text_body] {
            assert!(body.contains("Gun"));
            assert!(body.contains("61.23%"));
            assert!(body.contains("Gate-3"));
            assert!(body.contains("01/01/2024, 00:00:00 UTC"));
            assert!(body.contains("MEDIUM"));
        }
    }

    #[test]
    fn test_plain_text_golden() {
        let payload = compose(&gun_event(0.95)).unwrap();
        let expected = "WEAPON DETECTION ALERT\n\n\
A potential weapon has been detected by the AI surveillance system.\n\n\
Detection Details:\n\
- Detected Object: Gun\n\
- Confidence Level: 95.00%\n\
- Location: CCTV-1\n\
- Timestamp: 01/01/2024, 00:00:00 UTC\n\
- Threat Level: HIGH\n\n\
HIGH THREAT - IMMEDIATE ACTION REQUIRED\n\n\
Recommended Actions:\n\
1. Review the live feed immediately\n\
2. Verify the threat with security personnel\n\
3. Follow your organization's security protocols\n\
4. Contact law enforcement if necessary\n\n\
---\n\
AI-Based Weapon Detection System\n\
This is an automated alert. Do not reply to this email.\n";
        assert_eq!(payload.text_body, expected);
    }

    #[test]
    fn test_deterministic() {
        let composer = AlertComposer::new().with_origin("nvr-01");
        let event = gun_event(0.83);
        assert_eq!(composer.compose(&event).unwrap(), composer.compose(&event).unwrap());
    }

    #[test]
    fn test_rejects_empty_class() {
        let mut event = gun_event(0.9);
        event.object_class = String::new();
        assert_eq!(compose(&event).unwrap_err(), InvalidEventError::MissingClass);
    }

    #[test]
    fn test_rejects_missing_confidence() {
        let mut event = gun_event(0.9);
        event.confidence = None;
        assert_eq!(compose(&event).unwrap_err(), InvalidEventError::MissingConfidence);
    }

    #[test]
    fn test_timestamp_in_recipient_offset() {
        let composer = AlertComposer::new().with_utc_offset_minutes(330);
        let ts = Utc.with_ymd_and_hms(2024, 1, 31, 12, 35, 9).unwrap();
        assert_eq!(composer.format_timestamp(&ts), "01/31/2024, 18:05:09 UTC+05:30");

        let composer = AlertComposer::new().with_utc_offset_minutes(-300);
        assert_eq!(composer.format_timestamp(&ts), "01/31/2024, 07:35:09 UTC-05:00");
    }

    #[test]
    fn test_html_escapes_untrusted_fields() {
        let event = gun_event(0.9).at_location("<script>alert(1)</script>");
        let payload = compose(&event).unwrap();
        assert!(!payload.html_body.contains("<script>"));
        assert!(payload.html_body.contains("&lt;script&gt;"));
        // Plain text keeps the raw value
        assert!(payload.text_body.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn test_origin_in_footer() {
        let payload = AlertComposer::new()
            .with_origin("nvr-01")
            .compose(&gun_event(0.5))
            .unwrap();
        assert!(payload.text_body.contains("Sent from nvr-01"));
        assert!(payload.html_body.contains("Sent from nvr-01"));
    }
}
