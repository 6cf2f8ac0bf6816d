use ammonia;

/// Clean user-supplied rich text using the ammonia library.
///
/// Whitelist-based sanitization: safe tags (<b>, <p>, ...) are preserved,
/// dangerous tags (<script>, <iframe>) and attributes (onclick) are stripped.
/// Applied to mission descriptions, cover letters, bios and review comments
/// before they are stored, as a fail-safe against stored XSS.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
