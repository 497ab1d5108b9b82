//! Builds the two messages sent for every contact submission.
//!
//! Plain-text bodies and subjects carry the submitted values as-is. HTML
//! bodies escape them, so a submission cannot inject markup into the
//! operator's inbox.

use crate::contact::ContactRequest;

use super::types::EmailMessage;

/// Compose the operator notification followed by the submitter acknowledgment.
pub fn compose_messages(request: &ContactRequest, operator: &str, sender: &str) -> [EmailMessage; 2] {
    [
        admin_notification(request, operator, sender),
        sender_acknowledgment(request, sender),
    ]
}

/// Notification delivered to the operator address.
pub fn admin_notification(request: &ContactRequest, operator: &str, sender: &str) -> EmailMessage {
    let ContactRequest { name, email, message } = request;

    EmailMessage {
        to: operator.to_string(),
        from: sender.to_string(),
        subject: format!("Novo contato: {name} <{email}>"),
        text: format!("Nova mensagem de {name} <{email}>:\n\n{message}"),
        html: format!(
            "<p><strong>Nova mensagem de {} &lt;{}&gt;:</strong></p><pre>{}</pre>",
            escape_html(name),
            escape_html(email),
            escape_html(message),
        ),
    }
}

/// Acknowledgment delivered back to the submitter.
pub fn sender_acknowledgment(request: &ContactRequest, sender: &str) -> EmailMessage {
    let ContactRequest { name, email, message } = request;

    EmailMessage {
        to: email.clone(),
        from: sender.to_string(),
        subject: format!("Recebemos sua mensagem — Obrigado, {name}"),
        text: format!(
            "Olá {name},\n\nRecebemos sua mensagem e vamos responder em breve.\n\nResumo:\n{message}"
        ),
        html: format!(
            "<p>Olá {},</p><p>Recebemos sua mensagem e vamos responder em breve.</p><h4>Sua mensagem</h4><pre>{}</pre>",
            escape_html(name),
            escape_html(message),
        ),
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
