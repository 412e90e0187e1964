use crate::{
    abbreviate, translate, PARAMETER_NAME_TRANSLATIONS, PARAMETER_VALUE_TRANSLATIONS,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static EQ_PARAMETER_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"EQ (\S+) (\S+)").expect("invalid EQ parameter name regex"));

/// Removes every character that is not ASCII because devices can't display them.
pub fn strip_non_ascii(input: &str) -> String {
    input.chars().filter(char::is_ascii).collect()
}

/// Turns host EQ parameter names like "EQ 2 Freq" into "Freq2".
pub fn format_parameter_name(input: &str) -> Cow<str> {
    match EQ_PARAMETER_NAME_REGEX.captures(input) {
        None => Cow::Borrowed(input),
        Some(captures) => Cow::Owned(format!("{}{}", &captures[2], &captures[1])),
    }
}

/// Pre-abbreviates frequency and gain values that have too much precision to be readable within
/// `width` characters.
pub fn format_parameter_value(input: &str, width: usize) -> Cow<str> {
    if input.chars().count() < width {
        return Cow::Borrowed(input);
    }
    if input.contains("Hz") {
        let Some(number) = leading_number(input, "Hz") else {
            return Cow::Borrowed(input);
        };
        if number > 10000.0 {
            let tenths_of_khz = round_half_up(number / 100.0);
            return Cow::Owned(format!(
                "{}k{}Hz",
                tenths_of_khz / 10,
                tenths_of_khz % 10
            ));
        }
        if number > 100.0 {
            return Cow::Owned(format!("{}Hz", round_half_up(number)));
        }
    } else if let Some(number) = leading_number(input, "dB") {
        if number.abs() > 10.0 {
            return Cow::Owned(format!("{}dB", round_half_up(number)));
        }
    }
    Cow::Borrowed(input)
}

/// Left-pads `input` so that it appears centered on a `width`-character display.
///
/// Leading spaces are not considered part of the text, which makes centering an already centered
/// string a no-op.
pub fn center(input: &str, width: usize) -> Cow<str> {
    if input.chars().count() >= width {
        return Cow::Borrowed(input);
    }
    let text = input.trim_start_matches(' ');
    let padding = (width - text.chars().count()) / 2;
    if text.len() + padding == input.len() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(format!("{}{}", " ".repeat(padding), text))
}

/// Returns the number in front of the given unit if `input` contains the unit at all.
fn leading_number(input: &str, unit: &str) -> Option<f64> {
    let (number, _) = input.split_once(unit)?;
    let number: f64 = number.trim().parse().ok()?;
    if number.is_finite() {
        Some(number)
    } else {
        None
    }
}

fn round_half_up(number: f64) -> i64 {
    (number + 0.5).floor() as i64
}

/// Formats host texts for one channel cell of a scribble strip display with a fixed width.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ChannelTextFormatter {
    width: usize,
}

impl ChannelTextFormatter {
    pub const fn new(width: usize) -> Self {
        Self { width }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub fn parameter_name(&self, name: &str) -> String {
        let name = translate(name, &PARAMETER_NAME_TRANSLATIONS);
        let name = format_parameter_name(name);
        self.finish(&name)
    }

    pub fn parameter_value(&self, value: &str) -> String {
        let value = translate(value, &PARAMETER_VALUE_TRANSLATIONS);
        let value = format_parameter_value(value, self.width);
        self.finish(&value)
    }

    /// Channel names are shown as they come, just made fit.
    pub fn channel_name(&self, name: &str) -> String {
        self.finish(name)
    }

    /// Overrides are chosen by us, so they are not translated or reformatted either.
    pub fn parameter_name_override(&self, name: &str) -> String {
        self.finish(name)
    }

    fn finish(&self, text: &str) -> String {
        let text = strip_non_ascii(text);
        let text = abbreviate(&text, self.width);
        center(&text, self.width).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_non_ascii() {
        assert_eq!(strip_non_ascii("Nível"), "Nvel");
        assert_eq!(strip_non_ascii("左右パン"), "");
        assert_eq!(strip_non_ascii("Plain"), "Plain");
    }

    #[test]
    fn eq_parameter_names() {
        assert_eq!(format_parameter_name("EQ 1 Freq"), "Freq1");
        assert_eq!(format_parameter_name("EQ 4 Gain"), "Gain4");
        assert_eq!(format_parameter_name("EQ 2 Q"), "Q2");
        assert_eq!(format_parameter_name("EQ"), "EQ");
        assert_eq!(format_parameter_name("Volume"), "Volume");
    }

    #[test]
    fn hertz_values() {
        assert_eq!(format_parameter_value("12345.6Hz", 6), "12k3Hz");
        assert_eq!(format_parameter_value("12750 Hz", 6), "12k8Hz");
        assert_eq!(format_parameter_value("19960Hz", 6), "20k0Hz");
        assert_eq!(format_parameter_value("1234.5Hz", 6), "1235Hz");
        assert_eq!(format_parameter_value("100.00Hz", 6), "100.00Hz");
        // Short enough already
        assert_eq!(format_parameter_value("440Hz", 6), "440Hz");
    }

    #[test]
    fn decibel_values() {
        assert_eq!(format_parameter_value("-12.34dB", 6), "-12dB");
        assert_eq!(format_parameter_value("-12.5 dB", 6), "-12dB");
        assert_eq!(format_parameter_value("10.50dB", 6), "11dB");
        assert_eq!(format_parameter_value("-10.00dB", 6), "-10.00dB");
        assert_eq!(format_parameter_value("-inf dB", 6), "-inf dB");
        assert_eq!(format_parameter_value("+3.0dB", 6), "+3.0dB");
    }

    #[test]
    fn other_values_unchanged() {
        assert_eq!(format_parameter_value("Unassigned", 6), "Unassigned");
        assert_eq!(format_parameter_value("HzHzHz", 6), "HzHzHz");
    }

    #[test]
    fn centering() {
        assert_eq!(center("Pan", 6), " Pan");
        assert_eq!(center("Pan", 7), "  Pan");
        assert_eq!(center("", 7), "   ");
        assert_eq!(center("Volume", 6), "Volume");
        assert_eq!(center("Longer text", 6), "Longer text");
    }

    #[test]
    fn centering_is_idempotent() {
        for input in ["", "a", "ab", "Pan", "  Pan", "abcde", "abcdef", "abcdefgh"] {
            for width in [6, 7] {
                let once = center(input, width).into_owned();
                assert_eq!(center(&once, width), once, "input {input:?}, width {width}");
            }
        }
    }

    #[test]
    fn parameter_name_pipeline() {
        // Given
        let formatter = ChannelTextFormatter::new(6);
        // When
        // Then
        assert_eq!(formatter.parameter_name("Pan Left-Right"), " Pan");
        assert_eq!(formatter.parameter_name("EQ 1 Freq"), "Freq1");
        assert_eq!(formatter.parameter_name("Frequency"), "Frqncy");
        assert_eq!(formatter.parameter_name("Монитор"), "Monitr");
    }

    #[test]
    fn parameter_value_pipeline() {
        // Given
        let formatter = ChannelTextFormatter::new(7);
        // When
        // Then
        assert_eq!(formatter.parameter_value("オン"), "  On");
        assert_eq!(formatter.parameter_value("15000.0Hz"), "15k0Hz");
        assert_eq!(formatter.parameter_value("-23.7 dB"), " -24dB");
    }

    #[test]
    fn channel_name_pipeline() {
        // Given
        let formatter = ChannelTextFormatter::new(6);
        // When
        // Then
        // No translation for channel names
        assert_eq!(formatter.channel_name("Left-Right"), "LftRgh");
        assert_eq!(formatter.channel_name("Kick"), " Kick");
        assert_eq!(formatter.channel_name("Bäss"), " Bss");
    }
}
