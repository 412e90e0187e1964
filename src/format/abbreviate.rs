/// Shortens `input` to at most `width` characters while keeping it recognizable.
///
/// Strings shorter than `width` are returned unchanged. Otherwise characters are dropped from the
/// end towards the start, stopping as soon as the string fits, in this order:
///
/// 1. lowercase vowels which don't start a word
/// 2. word separators (whitespace, underscores and hyphens between letters)
/// 3. lowercase consonants which don't start a word
///
/// If that's still not enough, the result is truncated. Digits, signs, decimal points and word
/// initials survive as long as possible.
pub fn abbreviate(input: &str, width: usize) -> String {
    let mut chars: Vec<char> = input.chars().collect();
    if chars.len() < width {
        return input.to_string();
    }
    remove_from_end(&mut chars, width, |chars, i| {
        is_lowercase_vowel(chars[i]) && !starts_word(chars, i)
    });
    remove_from_end(&mut chars, width, is_separator);
    remove_from_end(&mut chars, width, |chars, i| {
        chars[i].is_ascii_lowercase() && !starts_word(chars, i)
    });
    chars.truncate(width);
    chars.into_iter().collect()
}

fn remove_from_end(
    chars: &mut Vec<char>,
    width: usize,
    is_removable: impl Fn(&[char], usize) -> bool,
) {
    let mut i = chars.len();
    while i > 0 && chars.len() > width {
        i -= 1;
        if is_removable(chars, i) {
            chars.remove(i);
        }
    }
}

fn is_lowercase_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn is_separator(chars: &[char], i: usize) -> bool {
    match chars[i] {
        c if c.is_whitespace() || c == '_' => true,
        '-' => {
            i > 0
                && chars[i - 1].is_alphabetic()
                && chars.get(i + 1).map_or(false, |c| c.is_alphabetic())
        }
        _ => false,
    }
}

/// A letter starts a word if it's the first letter after a non-letter or an uppercase letter
/// following a lowercase one.
fn starts_word(chars: &[char], i: usize) -> bool {
    let c = chars[i];
    if i == 0 {
        return true;
    }
    let previous = chars[i - 1];
    !previous.is_alphabetic() || (c.is_uppercase() && previous.is_lowercase())
}
