//! Turns raw form fields into a [`PropertyRecord`].
//!
//! Every field is optional on the wire. Missing, unparseable or non-finite numbers fall
//! back to the field default, and parsed numbers are clamped into the control's bounds.

use crate::record::PropertyRecord;
use serde::Deserialize;

/// Urlencoded body posted by the prediction form.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct FormSubmission {
    /// Building class code.
    pub subclass_code: Option<String>,
    /// Zoning classification.
    pub zoning: Option<String>,
    /// Lot area in square feet.
    pub lot_area: Option<String>,
    /// Lot configuration.
    pub lot_config: Option<String>,
    /// Dwelling type.
    pub building_type: Option<String>,
    /// Overall condition.
    pub overall_condition: Option<String>,
    /// Construction year.
    pub year_built: Option<String>,
    /// Remodel year.
    pub year_remodeled: Option<String>,
    /// Exterior covering.
    pub exterior_material: Option<String>,
    /// Type 2 finished basement area.
    pub basement_finished_area_2: Option<String>,
    /// Total basement area.
    pub total_basement_area: Option<String>,
}

impl FormSubmission {
    /// Builds the record the submitted controls describe.
    pub fn into_record(self) -> PropertyRecord {
        let defaults = PropertyRecord::default();
        PropertyRecord {
            subclass_code: integer_or(self.subclass_code, defaults.subclass_code),
            zoning: category_or(self.zoning, defaults.zoning),
            lot_area: real_or(self.lot_area, defaults.lot_area),
            lot_config: category_or(self.lot_config, defaults.lot_config),
            building_type: category_or(self.building_type, defaults.building_type),
            overall_condition: integer_or(self.overall_condition, defaults.overall_condition),
            year_built: integer_or(self.year_built, defaults.year_built),
            year_remodeled: integer_or(self.year_remodeled, defaults.year_remodeled),
            exterior_material: category_or(self.exterior_material, defaults.exterior_material),
            basement_finished_area_2: real_or(
                self.basement_finished_area_2,
                defaults.basement_finished_area_2,
            ),
            total_basement_area: real_or(self.total_basement_area, defaults.total_basement_area),
        }
        .clamped()
    }
}

fn parse_number(raw: Option<String>) -> Option<f64> {
    raw.as_deref()
        .map(str::trim)
        .and_then(|text| text.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

fn integer_or(raw: Option<String>, fallback: i64) -> i64 {
    parse_number(raw).map_or(fallback, |value| value.round() as i64)
}

fn real_or(raw: Option<String>, fallback: f64) -> f64 {
    parse_number(raw).unwrap_or(fallback)
}

fn category_or(raw: Option<String>, fallback: String) -> String {
    raw.filter(|value| !value.trim().is_empty())
        .unwrap_or(fallback)
}
