//! Numeric extraction from catalog specification text.
//!
//! Catalog fields are free text ("32g", "2750KV", "4S1P", "5x4.3x3"). Every helper here
//! degrades to a fallback or `None` instead of failing, so a badly scraped field costs
//! accuracy but never an estimate.

use crate::constants::{INCH_TO_MM, LB_TO_G, OZ_TO_G};

/// Nominal LiPo cell voltage used to turn a pack voltage ("14.8V") into a cell count
const LIPO_NOMINAL_CELL_V: f64 = 3.7;

/// A decimal number found in a text field and the byte range it occupied.
#[derive(Debug, Clone, Copy, PartialEq)]
struct NumberToken {
    value: f64,
    start: usize,
    end: usize,
}

/// Scan every unsigned decimal number in `text`, in order.
///
/// A leading `-` is never read as a sign: "20-30A" yields 20 and 30.
fn scan_numbers(text: &str) -> Vec<NumberToken> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let starts_number = bytes[i].is_ascii_digit()
            || (bytes[i] == b'.' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit());
        if !starts_number {
            i += 1;
            continue;
        }

        let start = i;
        let mut seen_dot = false;
        while i < bytes.len() {
            match bytes[i] {
                b'0'..=b'9' => i += 1,
                b'.' if !seen_dot && i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit() => {
                    seen_dot = true;
                    i += 1;
                }
                _ => break,
            }
        }

        // Digit runs too long for an f64 parse to infinity; treat them as noise
        if let Some(value) = text[start..i].parse::<f64>().ok().filter(|v| v.is_finite()) {
            tokens.push(NumberToken { value, start, end: i });
        }
    }

    tokens
}

/// Lowercased unit word directly following a number, skipping spaces.
fn unit_after(text: &str, token: &NumberToken) -> String {
    text[token.end..]
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic() || *c == '"')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// First decimal number in `text`, if any.
pub fn first_number(text: &str) -> Option<f64> {
    scan_numbers(text).first().map(|t| t.value)
}

/// First decimal number in an optional field, or `fallback`.
///
/// This is the uniform extraction point: absent field, empty text and text without
/// digits all produce the fallback.
pub fn parse_number(text: Option<&str>, fallback: f64) -> f64 {
    text.and_then(first_number).unwrap_or(fallback)
}

/// Mass in grams. Understands `g` (default), `kg`, `oz` and `lb`.
pub fn parse_mass_g(text: Option<&str>) -> Option<f64> {
    let text = text?;
    let tokens = scan_numbers(text);
    let token = tokens.first()?;
    let unit = unit_after(text, token);

    let grams = if unit.starts_with("kg") {
        token.value * 1000.0
    } else if unit.starts_with("oz") {
        token.value * OZ_TO_G
    } else if unit.starts_with("lb") {
        token.value * LB_TO_G
    } else {
        token.value
    };
    Some(grams)
}

/// Battery capacity in mAh. Understands `mAh` (default) and `Ah`.
pub fn parse_capacity_mah(text: Option<&str>) -> Option<f64> {
    let text = text?;
    let tokens = scan_numbers(text);
    let token = tokens.first()?;
    let unit = unit_after(text, token);

    if unit.starts_with("ah") {
        Some(token.value * 1000.0)
    } else {
        Some(token.value)
    }
}

/// Length in millimeters. Understands `mm` (default), `cm`, `m` and inches.
pub fn parse_length_mm(text: Option<&str>) -> Option<f64> {
    let text = text?;
    let tokens = scan_numbers(text);
    let token = tokens.first()?;
    let unit = unit_after(text, token);

    let mm = if unit.starts_with("mm") {
        token.value
    } else if unit.starts_with("cm") {
        token.value * 10.0
    } else if unit.starts_with("in") || unit.starts_with('"') {
        token.value * INCH_TO_MM
    } else if unit == "m" {
        token.value * 1000.0
    } else {
        token.value
    };
    Some(mm)
}

/// Series cell count: the number before `S` ("4S", "6S1P"), else a pack voltage divided
/// by the nominal cell voltage, else a bare small integer.
pub fn parse_series_cells(text: Option<&str>) -> Option<u32> {
    let text = text?;
    let tokens = scan_numbers(text);

    let followed_by = |token: &NumberToken, marker: char| {
        text[token.end..]
            .chars()
            .next()
            .map(|c| c.eq_ignore_ascii_case(&marker))
            .unwrap_or(false)
    };

    if let Some(token) = tokens.iter().find(|t| followed_by(*t, 'S')) {
        return Some(token.value.round() as u32).filter(|n| *n > 0);
    }

    if let Some(token) = tokens.iter().find(|t| unit_after(text, *t).starts_with('v')) {
        let cells = (token.value / LIPO_NOMINAL_CELL_V).round();
        return Some(cells as u32).filter(|n| *n > 0);
    }

    tokens
        .first()
        .filter(|t| t.value >= 1.0 && t.value <= 14.0 && t.value.fract() == 0.0)
        .map(|t| t.value as u32)
}

/// Series cell count with a fallback.
pub fn parse_cell_count(text: Option<&str>, fallback: u32) -> u32 {
    parse_series_cells(text).unwrap_or(fallback)
}

/// Parallel string count: the number before `P` ("4S2P"), default 1.
pub fn parse_parallel_count(text: Option<&str>) -> u32 {
    let Some(text) = text else {
        return 1;
    };
    scan_numbers(text)
        .iter()
        .find(|t| {
            text[t.end..]
                .chars()
                .next()
                .map(|c| c.eq_ignore_ascii_case(&'P'))
                .unwrap_or(false)
        })
        .map(|t| t.value.round() as u32)
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

/// Motor stator dimensions in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatorDimensions {
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Stator size code: "2207" (22 mm wide, 7 mm tall), "2806.5", "22x07", "1404".
pub fn parse_stator(text: Option<&str>) -> Option<StatorDimensions> {
    let text = text?;
    let tokens = scan_numbers(text);
    let first = tokens.first()?;

    // Separated form "22x07" / "22 x 7"
    if let Some(second) = tokens.get(1) {
        let between = &text[first.end..second.start];
        if between.trim().eq_ignore_ascii_case("x") {
            return Some(StatorDimensions {
                width_mm: first.value,
                height_mm: second.value,
            });
        }
    }

    // Compact form: the first number with at least four integer digits
    let (integer, fraction) = tokens.iter().find_map(|t| {
        let raw = &text[t.start..t.end];
        let (integer, fraction) = match raw.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (raw, None),
        };
        (integer.len() >= 4).then_some((integer, fraction))
    })?;

    let width_mm = integer[..2].parse::<f64>().ok()?;
    let height_text = match fraction {
        Some(f) => format!("{}.{}", &integer[2..], f),
        None => integer[2..].to_string(),
    };
    let height_mm = height_text.parse::<f64>().ok()?;

    Some(StatorDimensions { width_mm, height_mm })
}

/// Propeller geometry as read from a size field. Any part may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PropGeometry {
    pub diameter_in: Option<f64>,
    pub pitch_in: Option<f64>,
    pub blades: Option<f64>,
}

/// Propeller geometry: "5x4.3x3", "5 inch", "127mm", or a compact code ("5143", "51433").
///
/// In the separated form the numbers directly either side of each `x` are used, so
/// product names like "Ethix S4 5x4.3x3" read as 5 x 4.3 x 3.
pub fn parse_prop_geometry(text: Option<&str>) -> PropGeometry {
    let Some(text) = text else {
        return PropGeometry::default();
    };
    let tokens = scan_numbers(text);

    let separated = |a: &NumberToken, b: &NumberToken| matches!(text[a.end..b.start].trim(), "x" | "X" | "*");
    let to_inches = |token: &NumberToken| {
        if unit_after(text, token).starts_with("mm") {
            token.value / INCH_TO_MM
        } else {
            token.value
        }
    };

    if let Some((diameter, pitch, blades)) = tokens.windows(2).enumerate().find_map(|(i, pair)| {
        separated(&pair[0], &pair[1]).then(|| {
            let blades = tokens.get(i + 2).filter(|b| separated(&pair[1], *b));
            (&pair[0], &pair[1], blades)
        })
    }) {
        return PropGeometry {
            diameter_in: Some(to_inches(diameter)),
            pitch_in: Some(pitch.value),
            blades: blades.map(|b| b.value),
        };
    }

    if let Some(compact) = compact_prop_code(text) {
        return compact;
    }

    tokens
        .first()
        .map(|token| PropGeometry {
            diameter_in: Some(to_inches(token)),
            ..PropGeometry::default()
        })
        .unwrap_or_default()
}

/// Manufacturer shorthand: "5143" is 5.1 x 4.3, a fifth digit is the blade count.
fn compact_prop_code(text: &str) -> Option<PropGeometry> {
    let tokens = scan_numbers(text);
    let token = tokens.first()?;
    let raw = &text[token.start..token.end];
    if raw.contains('.') || !(raw.len() == 4 || raw.len() == 5) || !unit_after(text, token).is_empty() {
        return None;
    }

    let digit = |i: usize| raw[i..i + 1].parse::<f64>().ok();
    let diameter = digit(0)? + digit(1)? / 10.0;
    let pitch = digit(2)? + digit(3)? / 10.0;
    let blades = if raw.len() == 5 { digit(4) } else { None };

    Some(PropGeometry {
        diameter_in: Some(diameter),
        pitch_in: Some(pitch),
        blades,
    })
}
