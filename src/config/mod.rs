//! Runtime configuration. Built-in defaults, overridable per deployment
//! through `window.ENV` (e.g. `window.ENV = { TOAST_MS: 8000 }`).

use wasm_bindgen::JsValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Delay before a save envelope applies its mutation.
    pub save_delay_ms: u32,
    /// Delay after the mutation before the loading flag clears.
    pub loading_clear_ms: u32,
    pub toast_ms: u32,
    pub quote_min_ms: u32,
    pub quote_max_ms: u32,
    pub draft_debounce_ms: u32,
    pub trash_retention_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            save_delay_ms: 20,
            loading_clear_ms: 300,
            toast_ms: 5000,
            quote_min_ms: 180_000,
            quote_max_ms: 420_000,
            draft_debounce_ms: 3000,
            trash_retention_days: 7,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        let Some(env) = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object())
        else {
            return config;
        };
        let env: JsValue = env.into();

        let read = |key: &str| -> Option<u32> {
            let value = js_sys::Reflect::get(&env, &key.into()).ok()?;
            value
                .as_f64()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v as u32)
                .or_else(|| value.as_string()?.trim().parse().ok())
        };

        let overrides: [(&str, &mut u32); 6] = [
            ("SAVE_DELAY_MS", &mut config.save_delay_ms),
            ("LOADING_CLEAR_MS", &mut config.loading_clear_ms),
            ("TOAST_MS", &mut config.toast_ms),
            ("QUOTE_MIN_MS", &mut config.quote_min_ms),
            ("QUOTE_MAX_MS", &mut config.quote_max_ms),
            ("DRAFT_DEBOUNCE_MS", &mut config.draft_debounce_ms),
        ];
        for (key, slot) in overrides {
            if let Some(v) = read(key) {
                *slot = v;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = AppConfig::default();
        assert_eq!(c.save_delay_ms, 20);
        assert_eq!(c.loading_clear_ms, 300);
        assert_eq!(c.toast_ms, 5000);
        assert!(c.quote_min_ms < c.quote_max_ms);
        assert_eq!(c.trash_retention_days, 7);
    }
}
