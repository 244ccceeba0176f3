//! CSS color parsing
//!
//! Bodies keep their color as an opaque string; the renderer needs RGBA.
//! Understands `#rgb`, `#rrggbb`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.

/// Parse a CSS color into straight sRGB components in `0.0..=1.0`
pub fn parse_css_color(value: &str) -> Option<[f32; 4]> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = value.to_ascii_lowercase();
    let (args, has_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
        (rest.strip_suffix(')')?, true)
    } else if let Some(rest) = lower.strip_prefix("rgb(") {
        (rest.strip_suffix(')')?, false)
    } else {
        return None;
    };

    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if has_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }

    let channel = |s: &str| -> Option<f32> {
        let v: f32 = s.parse().ok()?;
        Some((v / 255.0).clamp(0.0, 1.0))
    };
    let alpha = if has_alpha {
        parts[3].parse::<f32>().ok()?.clamp(0.0, 1.0)
    } else {
        1.0
    };

    Some([channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, alpha])
}

fn parse_hex(hex: &str) -> Option<[f32; 4]> {
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

    let (r, g, b) = match hex.len() {
        3 => (digit(0)? * 17, digit(1)? * 17, digit(2)? * 17),
        6 => (pair(0)?, pair(2)?, pair(4)?),
        _ => return None,
    };
    Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
}

/// Convert straight sRGB to linear for an sRGB render target
#[inline]
pub fn srgb_to_linear(color: [f32; 4]) -> [f32; 4] {
    let convert = |c: f32| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [convert(color[0]), convert(color[1]), convert(color[2]), color[3]]
}
