pub(crate) mod browser;

use crate::models::NOTE_COLORS;

pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// Local date as `YYYY-MM-DD`, used in backup file names.
pub(crate) fn today_local() -> String {
    // Use system local timezone (browser runtime).
    let d = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02}",
        d.get_full_year(),
        d.get_month() + 1,
        d.get_date()
    )
}

pub(crate) fn now_iso() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}

pub(crate) fn local_hour() -> u32 {
    js_sys::Date::new_0().get_hours()
}

/// `DD/MM/YYYY` for a millisecond timestamp.
pub(crate) fn format_date(ms: i64) -> String {
    let d = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(ms as f64));
    format!(
        "{:02}/{:02}/{:04}",
        d.get_date(),
        d.get_month() + 1,
        d.get_full_year()
    )
}

/// Uniform value in `[0, 1)`. Falls back to 0 if no entropy is available.
pub(crate) fn random_unit() -> f64 {
    let mut buf = [0u8; 4];
    if getrandom::getrandom(&mut buf).is_err() {
        return 0.0;
    }
    f64::from(u32::from_le_bytes(buf)) / (f64::from(u32::MAX) + 1.0)
}

pub(crate) fn random_palette_color() -> &'static str {
    let index = (random_unit() * NOTE_COLORS.len() as f64) as usize;
    NOTE_COLORS[index.min(NOTE_COLORS.len() - 1)]
}

/// `#rrggbb` (or `rrggbb`) to an `r, g, b` triple.
pub(crate) fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#ff8000"), Some((255, 128, 0)));
        assert_eq!(hex_to_rgb("1E3A5F"), Some((30, 58, 95)));
        assert_eq!(hex_to_rgb("#fff"), None);
        assert_eq!(hex_to_rgb("#gg0000"), None);
    }

    #[test]
    fn test_random_unit_range() {
        for _ in 0..32 {
            let v = random_unit();
            assert!((0.0..1.0).contains(&v));
        }
        assert!(NOTE_COLORS.contains(&random_palette_color()));
    }
}
