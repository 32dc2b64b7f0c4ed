//! HEAD and BODY commands

/// Build HEAD command (article number or message-id)
pub fn head(id: &str) -> String {
    format!("HEAD {}\r\n", id)
}

/// Build BODY command (article number or message-id)
pub fn body(id: &str) -> String {
    format!("BODY {}\r\n", id)
}

/// Wrap a bare message-id in angle brackets if it is not already
pub fn bracket_message_id(id: &str) -> String {
    let id = id.trim();
    if id.starts_with('<') && id.ends_with('>') {
        id.to_string()
    } else {
        format!("<{}>", id)
    }
}
