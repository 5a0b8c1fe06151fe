//! Message template helpers.
//!
//! Templates carry `%name%` placeholders. Colour codes (`&c`, `&f`, ...) are left
//! untouched; translating them is the host's job.

/// Placeholder for the acting player's name in broadcast templates.
pub const PLAYER_PLACEHOLDER: &str = "%player%";

/// Placeholder for remaining cooldown seconds.
pub const TIME_PLACEHOLDER: &str = "%time%";

/// Replace every `(placeholder, value)` pair in `template`.
///
/// # Examples
/// ```
/// use respawn_types::formatting::fill_placeholders;
/// assert_eq!(fill_placeholders("%a% and %b%", &[("%a%", "x"), ("%b%", "y")]), "x and y");
/// assert_eq!(fill_placeholders("no vars", &[("%a%", "x")]), "no vars");
/// ```
pub fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |acc, (key, value)| acc.replace(key, value))
}

/// Render a broadcast template for `player`.
///
/// # Examples
/// ```
/// use respawn_types::formatting::broadcast_line;
/// assert_eq!(broadcast_line("&e%player% left", "Steve"), "&eSteve left");
/// ```
pub fn broadcast_line(template: &str, player: &str) -> String {
    fill_placeholders(template, &[(PLAYER_PLACEHOLDER, player)])
}

/// Render the on-cooldown notice.
///
/// # Examples
/// ```
/// use respawn_types::formatting::cooldown_notice;
/// assert_eq!(cooldown_notice("wait %time%s", 20), "wait 20s");
/// ```
pub fn cooldown_notice(template: &str, remaining_secs: u64) -> String {
    fill_placeholders(template, &[(TIME_PLACEHOLDER, &remaining_secs.to_string())])
}

/// Render the location disclosure line for block coordinates.
///
/// # Examples
/// ```
/// use respawn_types::formatting::coords_line;
/// assert_eq!(coords_line(10, 64, -3), "&fYou suicided at: &cX: 10 Y: 64 Z: -3");
/// ```
pub fn coords_line(x: i64, y: i64, z: i64) -> String {
    format!("&fYou suicided at: &cX: {} Y: {} Z: {}", x, y, z)
}

/// Strip `&x` colour codes, for plain-text sinks such as log files.
///
/// # Examples
/// ```
/// use respawn_types::formatting::strip_color_codes;
/// assert_eq!(strip_color_codes("&cRed &lbold&r done"), "Red bold done");
/// assert_eq!(strip_color_codes("R&D"), "R&D");
/// ```
pub fn strip_color_codes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '&' {
            if let Some(&next) = chars.peek() {
                if matches!(next, '0'..='9' | 'a'..='f' | 'k'..='o' | 'r') {
                    chars.next();
                    continue;
                }
            }
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_placeholder_replaced_everywhere() {
        assert_eq!(broadcast_line("%player%! %player%!", "Alex"), "Alex! Alex!");
    }

    #[test]
    fn test_cooldown_notice_without_placeholder() {
        assert_eq!(cooldown_notice("slow down", 5), "slow down");
    }

    #[test]
    fn test_strip_color_codes_trailing_ampersand() {
        assert_eq!(strip_color_codes("done&"), "done&");
    }
}
