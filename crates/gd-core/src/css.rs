//! Parsers for the resolved CSS values stored in layout documents.
//!
//! Browsers report computed colors as `rgb(r, g, b)` (or `rgba(...)`) and
//! computed weights as numeric strings; hand-written documents tend to use
//! `#hex` and keywords. Both are accepted. Built on `winnow` 0.7.

use crate::model::{Color, FontWeight};
use winnow::ascii::{space0, space1};
use winnow::combinator::{alt, opt};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

/// Parse a color: `#RGB`, `#RRGGBB`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
/// Alpha is accepted and discarded.
pub fn parse_color(text: &str) -> Result<Color, String> {
    let mut rest = text.trim();
    let color = alt((parse_hex_color, parse_rgb_function))
        .parse_next(&mut rest)
        .map_err(|e| format!("invalid color {text:?}: {e}"))?;
    if !rest.is_empty() {
        return Err(format!("invalid color {text:?}: unexpected {rest:?}"));
    }
    Ok(color)
}

/// Parse a font weight: a number, or `normal` / `bold` / `lighter` / `bolder`.
/// Relative keywords resolve against `normal`.
pub fn parse_font_weight(text: &str) -> Result<FontWeight, String> {
    let trimmed = text.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "normal" => return Ok(FontWeight::NORMAL),
        "bold" | "bolder" => return Ok(FontWeight::BOLD),
        "lighter" => return Ok(FontWeight::new(100)),
        _ => {}
    }
    let mut rest = trimmed;
    let value = parse_number
        .parse_next(&mut rest)
        .map_err(|e| format!("invalid font weight {text:?}: {e}"))?;
    if !rest.is_empty() || !value.is_finite() {
        return Err(format!("invalid font weight {text:?}"));
    }
    Ok(FontWeight::new(value.round().clamp(1.0, 1000.0) as u16))
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

fn parse_hex_color(input: &mut &str) -> ModalResult<Color> {
    let _ = hash(input)?;
    let digits = hex_digits(input)?;
    Color::from_hex(digits).ok_or_else(backtrack)
}

fn hash(input: &mut &str) -> ModalResult<char> {
    '#'.parse_next(input)
}

fn hex_digits<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1..=6, |c: char| c.is_ascii_hexdigit()).parse_next(input)
}

fn parse_rgb_function(input: &mut &str) -> ModalResult<Color> {
    let _ = rgb_keyword(input)?;
    open_paren(input)?;
    let r = parse_channel(input)?;
    separator(input)?;
    let g = parse_channel(input)?;
    separator(input)?;
    let b = parse_channel(input)?;
    let _ = alpha_suffix(input)?;
    close_paren(input)?;
    Ok(Color::rgb(r, g, b))
}

fn rgb_keyword<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    alt(("rgba", "rgb")).parse_next(input)
}

fn open_paren(input: &mut &str) -> ModalResult<()> {
    (space0, '(', space0).void().parse_next(input)
}

fn close_paren(input: &mut &str) -> ModalResult<()> {
    (space0, ')').void().parse_next(input)
}

/// Channels are separated by commas (legacy syntax) or whitespace.
fn separator(input: &mut &str) -> ModalResult<()> {
    alt(((space0, ',', space0).void(), space1.void())).parse_next(input)
}

/// `, a` or ` / a` after the blue channel.
fn alpha_suffix(input: &mut &str) -> ModalResult<Option<f32>> {
    opt(alpha_value).parse_next(input)
}

fn alpha_value(input: &mut &str) -> ModalResult<f32> {
    alpha_separator(input)?;
    let value = parse_number(input)?;
    let _ = percent(input)?;
    Ok(value)
}

fn alpha_separator(input: &mut &str) -> ModalResult<()> {
    alt(((space0, '/', space0).void(), separator)).parse_next(input)
}

fn percent(input: &mut &str) -> ModalResult<Option<char>> {
    opt('%').parse_next(input)
}

fn parse_channel(input: &mut &str) -> ModalResult<u8> {
    let value = parse_number(input)?;
    Ok(value.round().clamp(0.0, 255.0) as u8)
}

fn number_token<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_digit() || matches!(c, '.' | '-' | '+')).parse_next(input)
}

fn parse_number(input: &mut &str) -> ModalResult<f32> {
    let token = number_token(input)?;
    token.parse::<f32>().map_err(|_| backtrack())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computed_rgb() {
        assert_eq!(parse_color("rgb(255, 0, 12)"), Ok(Color::rgb(255, 0, 12)));
        assert_eq!(parse_color("  rgb(1,2,3) "), Ok(Color::rgb(1, 2, 3)));
    }

    #[test]
    fn rgba_drops_alpha() {
        assert_eq!(parse_color("rgba(10, 20, 30, 0.5)"), Ok(Color::rgb(10, 20, 30)));
        assert_eq!(parse_color("rgb(10 20 30 / 50%)"), Ok(Color::rgb(10, 20, 30)));
    }

    #[test]
    fn hex_forms() {
        assert_eq!(parse_color("#ff0000"), Ok(Color::rgb(255, 0, 0)));
        assert_eq!(parse_color("#0F0"), Ok(Color::rgb(0, 255, 0)));
    }

    #[test]
    fn channels_are_clamped() {
        assert_eq!(parse_color("rgb(300, -4, 12.6)"), Ok(Color::rgb(255, 0, 13)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_color("blue-ish").is_err());
        assert!(parse_color("rgb(1, 2)").is_err());
        assert!(parse_color("#12").is_err());
        assert!(parse_color("#1234").is_err());
        assert!(parse_color("rgb(1, 2, 3) trailing").is_err());
    }

    #[test]
    fn font_weights() {
        assert_eq!(parse_font_weight("400"), Ok(FontWeight::NORMAL));
        assert_eq!(parse_font_weight("bold"), Ok(FontWeight::BOLD));
        assert_eq!(parse_font_weight(" Normal "), Ok(FontWeight::NORMAL));
        assert_eq!(parse_font_weight("650.4").map(FontWeight::value), Ok(650));
        assert!(parse_font_weight("heavy").is_err());
        assert!(parse_font_weight("700px").is_err());
    }
}
