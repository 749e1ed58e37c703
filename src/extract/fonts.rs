//! Substitution of web font families into the closed document font set.
//!
//! Resolution is total and deterministic: every input string maps to exactly
//! one [`DocumentFont`], unknown families fall back to the default, and the
//! same input always yields the same output.

use indexmap::IndexMap;

use crate::models::font::DocumentFont;

/// Maps observed `font-family` values onto the document font set. The
/// built-in table covers the families the rendering templates actually use;
/// callers can layer their own overrides on top.
#[derive(Debug, Clone, Default)]
pub struct FontResolver {
    /// Caller-supplied substitutions, keyed by normalized family name.
    /// Checked before the built-in table.
    overrides: IndexMap<String, DocumentFont>,
}

impl FontResolver {
    pub fn new() -> Self {
        FontResolver::default()
    }

    /// Registers a substitution for one family name. Later registrations for
    /// the same family replace earlier ones.
    pub fn with_override(mut self, family: &str, font: DocumentFont) -> Self {
        self.overrides.insert(normalize_family(family), font);
        self
    }

    /// Resolves a CSS `font-family` list to a document font. Only the first
    /// family in the list is considered; the document set itself provides
    /// the fallback chain.
    pub fn resolve(&self, font_family: &str) -> DocumentFont {
        let first = font_family.split(',').next().unwrap_or("");
        let key = normalize_family(first);
        if key.is_empty() {
            return DocumentFont::default();
        }
        if let Some(font) = self.overrides.get(&key) {
            return *font;
        }
        builtin(&key).unwrap_or_default()
    }
}

/// Lowercases and strips quotes and surrounding whitespace so `"Proxima
/// Nova"`, `proxima nova` and ` Proxima Nova ` all hit the same table entry.
fn normalize_family(family: &str) -> String {
    family
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_ascii_lowercase()
}

fn builtin(key: &str) -> Option<DocumentFont> {
    let font = match key {
        "arial" | "helvetica" | "helvetica neue" | "liberation sans" => DocumentFont::Arial,
        "calibri" | "proxima nova" | "roboto" | "inter" | "open sans" | "lato" | "montserrat"
        | "source sans pro" | "nunito" | "poppins" | "system-ui" | "-apple-system" => {
            DocumentFont::Calibri
        }
        "times" | "times new roman" | "liberation serif" => DocumentFont::TimesNewRoman,
        "georgia" | "merriweather" | "playfair display" | "lora" => DocumentFont::Georgia,
        "verdana" | "tahoma" => DocumentFont::Verdana,
        "courier" | "courier new" | "consolas" | "menlo" | "monaco" | "roboto mono"
        | "source code pro" | "fira code" | "jetbrains mono" => DocumentFont::CourierNew,
        "segoe ui" => DocumentFont::SegoeUi,
        // CSS generic families.
        "serif" => DocumentFont::TimesNewRoman,
        "sans-serif" => DocumentFont::Arial,
        "monospace" => DocumentFont::CourierNew,
        _ => return None,
    };
    Some(font)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_families_map_into_the_closed_set() {
        let resolver = FontResolver::new();
        assert_eq!(resolver.resolve("Arial"), DocumentFont::Arial);
        assert_eq!(resolver.resolve("Roboto"), DocumentFont::Calibri);
        assert_eq!(resolver.resolve("\"Proxima Nova\""), DocumentFont::Calibri);
        assert_eq!(resolver.resolve("Georgia, serif"), DocumentFont::Georgia);
        assert_eq!(resolver.resolve("monospace"), DocumentFont::CourierNew);
    }

    #[test]
    fn only_the_first_family_in_the_list_counts() {
        let resolver = FontResolver::new();
        assert_eq!(
            resolver.resolve("'Helvetica Neue', Georgia, serif"),
            DocumentFont::Arial
        );
    }

    #[test]
    fn unknown_and_empty_families_fall_back_to_the_default() {
        let resolver = FontResolver::new();
        assert_eq!(resolver.resolve("Wingdings 3000"), DocumentFont::Calibri);
        assert_eq!(resolver.resolve(""), DocumentFont::Calibri);
        assert_eq!(resolver.resolve("   "), DocumentFont::Calibri);
    }

    #[test]
    fn resolution_is_deterministic() {
        let resolver = FontResolver::new();
        for family in ["Inter, sans-serif", "totally-unknown", "COURIER NEW"] {
            assert_eq!(resolver.resolve(family), resolver.resolve(family));
        }
    }

    #[test]
    fn overrides_beat_the_builtin_table() {
        let resolver = FontResolver::new().with_override("Roboto", DocumentFont::Verdana);
        assert_eq!(resolver.resolve("Roboto, sans-serif"), DocumentFont::Verdana);
        assert_eq!(resolver.resolve("Open Sans"), DocumentFont::Calibri);
    }
}
