/// Display colour (hex RGB, no '#') for a constructor, keyed by the API's
/// constructor id. The timing API does not expose branding, so the current
/// grid's colours live here. Unknown constructors get a neutral grey.
pub fn team_color(constructor_id: &str) -> &'static str {
    match constructor_id {
        "red_bull" => "3671C6",
        "ferrari" => "E8002D",
        "mercedes" => "27F4D2",
        "mclaren" => "FF8000",
        "aston_martin" => "229971",
        "alpine" => "0093CC",
        "williams" => "64C4FF",
        "rb" => "6692FF",
        "sauber" => "52E252",
        "haas" => "B6BABD",
        // 2026 arrivals; ids provisional until their first results land
        "audi" => "00E701",
        "cadillac" => "002F6C",
        _ => "CCCCCC",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_constructors_have_colors() {
        assert_eq!(team_color("sauber"), "52E252");
        assert_eq!(team_color("red_bull"), "3671C6");
    }

    #[test]
    fn test_unknown_constructor_falls_back_to_grey() {
        assert_eq!(team_color("lotus"), "CCCCCC");
        assert_eq!(team_color(""), "CCCCCC");
    }
}
