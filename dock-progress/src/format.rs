//! Compact badge labels.

/// Render a count in at most four characters: `999`, `2k`, `-1k`, `9k+`.
pub fn kilo_short_string(n: i64) -> String {
    let sign = if n < 0 { "-" } else { "" };
    match n.unsigned_abs() {
        0..=999 => n.to_string(),
        magnitude @ 1000..=9999 => format!("{sign}{}k", magnitude / 1000),
        _ => format!("{sign}9k+"),
    }
}

/// Font size for a badge label of the given length. Zero means "don't draw".
pub fn scaled_font_size(text: &str) -> f32 {
    match text.chars().count() {
        1 => 30.0,
        2 => 23.0,
        3 => 19.0,
        4 => 15.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_kilo_short(s: &str) -> bool {
        let body = s.strip_prefix('-').unwrap_or(s);
        let digits = body.trim_end_matches("k+").trim_end_matches('k');
        !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
    }

    #[test]
    fn literal_cases() {
        assert_eq!(kilo_short_string(999), "999");
        assert_eq!(kilo_short_string(1000), "1k");
        assert_eq!(kilo_short_string(1100), "1k");
        assert_eq!(kilo_short_string(2500), "2k");
        assert_eq!(kilo_short_string(10000), "9k+");
        assert_eq!(kilo_short_string(-1500), "-1k");
        assert_eq!(kilo_short_string(0), "0");
        assert_eq!(kilo_short_string(i64::MIN), "-9k+");
    }

    #[test]
    fn output_is_short_and_well_formed() {
        let samples = (-20_000..=20_000)
            .step_by(7)
            .chain([i64::MAX, i64::MIN, -999, -1000, 9999, -9999, 10_000]);
        for n in samples {
            let s = kilo_short_string(n);
            assert!(s.chars().count() <= 4, "{n} -> {s}");
            assert!(is_kilo_short(&s), "{n} -> {s}");
        }
    }

    #[test]
    fn font_size_by_length() {
        assert_eq!(scaled_font_size("1"), 30.0);
        assert_eq!(scaled_font_size("12"), 23.0);
        assert_eq!(scaled_font_size("123"), 19.0);
        assert_eq!(scaled_font_size("1234"), 15.0);
        assert_eq!(scaled_font_size("12345"), 0.0);
        assert_eq!(scaled_font_size(""), 0.0);
    }
}
