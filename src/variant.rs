//! Presets for the three application variants.

use crate::currency::Currency;
use crate::encoder::EncodingStrategy;
use crate::vocabulary::Vocabulary;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

/// Which flavor of the form to serve.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Six exterior coverings, rupee display, dark three-column form.
    #[default]
    Classic,
    /// Eleven exterior coverings, rupee display, two-column form.
    Extended,
    /// Fifteen exterior coverings, dollar display, single-column form.
    OneHot,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Classic => "classic",
            Self::Extended => "extended",
            Self::OneHot => "one-hot",
        };
        f.write_str(label)
    }
}

/// Colors applied to the rendered pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Page background.
    pub background: &'static str,
    /// Form panel background.
    pub surface: &'static str,
    /// Body text.
    pub text: &'static str,
    /// Secondary text.
    pub muted: &'static str,
    /// Buttons and highlights.
    pub accent: &'static str,
    /// Result banner background.
    pub result: &'static str,
}

/// Everything that differs between variants.
#[derive(Clone, Debug)]
pub struct VariantProfile {
    /// Which preset this is.
    pub variant: Variant,
    /// Category lists for selects and one-hot columns.
    pub vocabulary: Vocabulary,
    /// Price display style.
    pub currency: Currency,
    /// Encoding the variant's bundled model is expected to use.
    pub expected_encoding: EncodingStrategy,
    /// Number of form columns.
    pub form_columns: usize,
    /// Page colors.
    pub palette: Palette,
}

impl VariantProfile {
    /// Builds the preset for `variant`.
    pub fn new(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self {
                variant,
                vocabulary: Vocabulary::with_exterior_count(6),
                currency: Currency::Rupee,
                expected_encoding: EncodingStrategy::Ordinal,
                form_columns: 3,
                palette: Palette {
                    background: "#111827",
                    surface: "#1F2937",
                    text: "#FFFFFF",
                    muted: "#9CA3AF",
                    accent: "#4F46E5",
                    result: "#153E75",
                },
            },
            Variant::Extended => Self {
                variant,
                vocabulary: Vocabulary::with_exterior_count(11),
                currency: Currency::Rupee,
                expected_encoding: EncodingStrategy::Ordinal,
                form_columns: 2,
                palette: Palette {
                    background: "#0F172A",
                    surface: "#1E293B",
                    text: "#F1F5F9",
                    muted: "#94A3B8",
                    accent: "#0D9488",
                    result: "#134E4A",
                },
            },
            Variant::OneHot => Self {
                variant,
                vocabulary: Vocabulary::with_exterior_count(15),
                currency: Currency::Dollar,
                expected_encoding: EncodingStrategy::OneHot,
                form_columns: 1,
                palette: Palette {
                    background: "#F8FAFC",
                    surface: "#FFFFFF",
                    text: "#0F172A",
                    muted: "#475569",
                    accent: "#2563EB",
                    result: "#DBEAFE",
                },
            },
        }
    }
}

impl Default for VariantProfile {
    fn default() -> Self {
        Self::new(Variant::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::CategoricalField;

    #[test]
    fn presets_differ_in_exterior_cardinality() {
        let counts: Vec<usize> = [Variant::Classic, Variant::Extended, Variant::OneHot]
            .into_iter()
            .map(|variant| {
                VariantProfile::new(variant)
                    .vocabulary
                    .categories(CategoricalField::ExteriorMaterial)
                    .len()
            })
            .collect();
        assert_eq!(counts, vec![6, 11, 15]);
    }

    #[test]
    fn one_hot_preset_uses_dollars() {
        let profile = VariantProfile::new(Variant::OneHot);
        assert_eq!(profile.currency, Currency::Dollar);
        assert_eq!(profile.expected_encoding, EncodingStrategy::OneHot);
        assert_eq!(Variant::OneHot.to_string(), "one-hot");
    }
}
