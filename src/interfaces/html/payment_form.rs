use crate::domain::fields::FieldMap;
use html_escape::encode_double_quoted_attribute;
use std::fmt::Write;

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Processing Payment - PayFast</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            display: flex;
            justify-content: center;
            align-items: center;
            min-height: 100vh;
            background: #f4f5f7;
        }
        .container {
            text-align: center;
            padding: 40px;
            background: white;
            border-radius: 16px;
            box-shadow: 0 20px 60px rgba(0, 0, 0, 0.15);
            max-width: 400px;
            width: 90%;
        }
        h2 { color: #333; margin-bottom: 20px; font-size: 24px; }
        .spinner {
            border: 4px solid #f3f3f3;
            border-top: 4px solid #667eea;
            border-radius: 50%;
            width: 50px;
            height: 50px;
            animation: spin 1s linear infinite;
            margin: 30px auto;
        }
        @keyframes spin {
            0% { transform: rotate(0deg); }
            100% { transform: rotate(360deg); }
        }
        p { color: #666; font-size: 14px; line-height: 1.6; }
        .hint { margin-top: 10px; font-size: 12px; color: #999; }
    </style>
</head>
<body>
    <div class="container">
        <h2>Redirecting to PayFast</h2>
        <div class="spinner"></div>
        <p>Please wait while we securely redirect you to the payment page.</p>
        <p class="hint">Do not refresh this page.</p>
"#;

const TAIL: &str = r#"        </form>
        <script>
            document.getElementById('payfast_form').submit();
        </script>
    </div>
</body>
</html>
"#;

/// Renders an HTML page that posts `fields` to `action_url` as soon as it
/// loads. Every field becomes one hidden input.
pub fn render_payment_form(action_url: &str, fields: &FieldMap) -> String {
    let mut html = String::with_capacity(HEAD.len() + TAIL.len() + fields.len() * 80);
    html.push_str(HEAD);
    let _ = writeln!(
        html,
        r#"        <form id="payfast_form" action="{}" method="POST">"#,
        encode_double_quoted_attribute(action_url)
    );
    for (name, value) in fields {
        let _ = writeln!(
            html,
            r#"            <input type="hidden" name="{}" value="{}">"#,
            encode_double_quoted_attribute(name),
            encode_double_quoted_attribute(&value.to_string())
        );
    }
    html.push_str(TAIL);
    html
}
