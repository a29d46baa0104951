//! Rendering of the generated commands.

/// One command per paragraph, each followed by a blank line.
#[must_use]
pub fn render_text(commands: &[String]) -> String {
    commands.iter().map(|c| format!("{c}\n\n")).collect()
}

/// The commands as a pretty-printed JSON array of strings.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(commands: &[String]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(commands).map(|mut json| {
        json.push('\n');
        json
    })
}
