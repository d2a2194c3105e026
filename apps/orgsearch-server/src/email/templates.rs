//! Email templates for access codes.

use std::time::Duration;

/// Rendered email content.
pub struct EmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl EmailContent {
    /// Sent after signup to confirm ownership of the address.
    pub fn signup(first_name: &str, code: &str, ttl: Duration) -> Self {
        let lifetime = describe_lifetime(ttl);
        Self {
            subject: "Verify your Organization Search account".to_string(),
            text: format!(
                r#"Hello {first_name},

Thank you for signing up for Organization Search.

Your verification code is: {code}

This code will expire in {lifetime}.

If you didn't sign up, please ignore this email."#
            ),
            html: html_layout(
                &format!("Hello {},", escape_html(first_name)),
                "Thank you for signing up for Organization Search. Your verification code is:",
                code,
                &lifetime,
                "If you didn't sign up, please ignore this email.",
            ),
        }
    }

    /// Sent when an existing user asks for a login code.
    pub fn login(first_name: &str, code: &str, ttl: Duration) -> Self {
        let lifetime = describe_lifetime(ttl);
        Self {
            subject: "Your Organization Search login code".to_string(),
            text: format!(
                r#"Hello {first_name},

Your login code is: {code}

This code will expire in {lifetime}.

If you didn't request this code, please ignore this email."#
            ),
            html: html_layout(
                &format!("Hello {},", escape_html(first_name)),
                "Your login code is:",
                code,
                &lifetime,
                "If you didn't request this code, please ignore this email.",
            ),
        }
    }
}

/// "1 hour", "15 minutes", "90 seconds".
fn describe_lifetime(ttl: Duration) -> String {
    let secs = ttl.as_secs();
    let (n, unit) = if secs >= 3600 && secs % 3600 == 0 {
        (secs / 3600, "hour")
    } else if secs >= 60 && secs % 60 == 0 {
        (secs / 60, "minute")
    } else {
        (secs, "second")
    };
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn html_layout(greeting: &str, lead: &str, code: &str, lifetime: &str, footer: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 0; background: #f5f5f5; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 40px 20px; }}
        .card {{ background: white; border-radius: 8px; padding: 40px; }}
        .code {{ font-size: 32px; font-weight: bold; letter-spacing: 6px; color: #1d4ed8; text-align: center; padding: 20px; background: #eff6ff; border-radius: 8px; margin: 24px 0; font-family: monospace; }}
        .expires {{ color: #666; font-size: 14px; text-align: center; }}
        .footer {{ margin-top: 32px; padding-top: 20px; border-top: 1px solid #eee; color: #888; font-size: 12px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="card">
            <p>{greeting}</p>
            <p>{lead}</p>
            <div class="code">{code}</div>
            <p class="expires">This code will expire in {lifetime}.</p>
            <div class="footer">
                <p>{footer}</p>
            </div>
        </div>
    </div>
</body>
</html>"#
    )
}
