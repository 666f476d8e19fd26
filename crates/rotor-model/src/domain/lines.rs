/// Split uploaded text into a list of entries.
///
/// One entry per line; surrounding whitespace is trimmed and blank lines are dropped.
/// Handles `\n` and `\r\n` endings.
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
