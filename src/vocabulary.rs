//! Ordered category lists shared by the form widgets and the one-hot encoder.

use crate::record::PropertyRecord;
use serde::Deserialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Zoning classifications offered by every variant.
pub const ZONING: &[&str] = &["RL", "RM", "FV", "RH", "C (all)"];
/// Lot configurations offered by every variant.
pub const LOT_CONFIGS: &[&str] = &["Inside", "FR2", "Corner", "CulDSac", "FR3"];
/// Dwelling types offered by every variant.
pub const BUILDING_TYPES: &[&str] = &["1Fam", "2fmCon", "Duplex", "TwnhsE", "Twnhs"];
/// Full exterior covering list; smaller variants take a prefix.
pub const EXTERIOR_MATERIALS: &[&str] = &[
    "VinylSd", "MetalSd", "Wd Sdng", "HdBoard", "BrkFace", "WdShing", "CemntBd", "Plywood",
    "AsbShng", "Stucco", "BrkComm", "AsphShn", "Stone", "ImStucc", "CBlock",
];

/// Categorical inputs of a [`PropertyRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    /// `MSZoning`.
    Zoning,
    /// `LotConfig`.
    LotConfig,
    /// `BldgType`.
    BuildingType,
    /// `Exterior1st`.
    ExteriorMaterial,
}

impl CategoricalField {
    /// Every categorical field, in record order.
    pub const ALL: [Self; 4] = [
        Self::Zoning,
        Self::LotConfig,
        Self::BuildingType,
        Self::ExteriorMaterial,
    ];

    /// Column name used by the training schema.
    pub fn column(self) -> &'static str {
        match self {
            Self::Zoning => "MSZoning",
            Self::LotConfig => "LotConfig",
            Self::BuildingType => "BldgType",
            Self::ExteriorMaterial => "Exterior1st",
        }
    }

    /// Looks a field up by its schema column name.
    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.column() == column)
    }

    /// The field's current value in `record`.
    pub fn value_of(self, record: &PropertyRecord) -> &str {
        match self {
            Self::Zoning => &record.zoning,
            Self::LotConfig => &record.lot_config,
            Self::BuildingType => &record.building_type,
            Self::ExteriorMaterial => &record.exterior_material,
        }
    }
}

/// Field-keyed ordered category lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
    zoning: Vec<String>,
    lot_config: Vec<String>,
    building_type: Vec<String>,
    exterior_material: Vec<String>,
}

impl Vocabulary {
    /// Standard lists with the first `exterior_count` exterior coverings.
    pub fn with_exterior_count(exterior_count: usize) -> Self {
        let count = exterior_count.clamp(1, EXTERIOR_MATERIALS.len());
        Self {
            zoning: owned(ZONING),
            lot_config: owned(LOT_CONFIGS),
            building_type: owned(BUILDING_TYPES),
            exterior_material: owned(&EXTERIOR_MATERIALS[..count]),
        }
    }

    /// Ordered categories for `field`.
    pub fn categories(&self, field: CategoricalField) -> &[String] {
        match field {
            CategoricalField::Zoning => &self.zoning,
            CategoricalField::LotConfig => &self.lot_config,
            CategoricalField::BuildingType => &self.building_type,
            CategoricalField::ExteriorMaterial => &self.exterior_material,
        }
    }

    /// Position of `value` in the field's list.
    pub fn position(&self, field: CategoricalField, value: &str) -> Option<usize> {
        self.categories(field).iter().position(|entry| entry == value)
    }

    /// Replaces the lists named in `overrides`, keeping the rest.
    pub fn apply(&mut self, overrides: VocabularyOverride) -> Result<(), VocabularyError> {
        let replacements = [
            (CategoricalField::Zoning, overrides.zoning),
            (CategoricalField::LotConfig, overrides.lot_config),
            (CategoricalField::BuildingType, overrides.building_type),
            (CategoricalField::ExteriorMaterial, overrides.exterior_material),
        ];
        for (field, replacement) in replacements {
            if let Some(list) = replacement {
                validate_list(field, &list)?;
                *self.slot_mut(field) = list;
            }
        }
        Ok(())
    }

    /// Reads a JSON override file and applies it.
    pub fn apply_file(&mut self, path: &Path) -> Result<(), VocabularyError> {
        let raw = std::fs::read_to_string(path).map_err(VocabularyError::Io)?;
        let overrides: VocabularyOverride =
            serde_json::from_str(&raw).map_err(VocabularyError::Parse)?;
        self.apply(overrides)
    }

    fn slot_mut(&mut self, field: CategoricalField) -> &mut Vec<String> {
        match field {
            CategoricalField::Zoning => &mut self.zoning,
            CategoricalField::LotConfig => &mut self.lot_config,
            CategoricalField::BuildingType => &mut self.building_type,
            CategoricalField::ExteriorMaterial => &mut self.exterior_material,
        }
    }
}

/// Partial vocabulary read from a JSON file keyed by schema column name.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VocabularyOverride {
    /// Replacement zoning list.
    #[serde(rename = "MSZoning", default)]
    pub zoning: Option<Vec<String>>,
    /// Replacement lot configuration list.
    #[serde(rename = "LotConfig", default)]
    pub lot_config: Option<Vec<String>>,
    /// Replacement dwelling type list.
    #[serde(rename = "BldgType", default)]
    pub building_type: Option<Vec<String>>,
    /// Replacement exterior covering list.
    #[serde(rename = "Exterior1st", default)]
    pub exterior_material: Option<Vec<String>>,
}

/// Errors raised while loading vocabulary overrides.
#[derive(Debug)]
pub enum VocabularyError {
    /// The override file could not be read.
    Io(std::io::Error),
    /// The override file is not a valid override document.
    Parse(serde_json::Error),
    /// A replacement list has no entries.
    Empty(&'static str),
    /// A replacement list repeats a category.
    Duplicate {
        /// Column whose list is invalid.
        column: &'static str,
        /// Repeated category.
        value: String,
    },
}

impl fmt::Display for VocabularyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read vocabulary file: {err}"),
            Self::Parse(err) => write!(f, "invalid vocabulary file: {err}"),
            Self::Empty(column) => write!(f, "vocabulary for {column} is empty"),
            Self::Duplicate { column, value } => {
                write!(f, "vocabulary for {column} lists '{value}' more than once")
            }
        }
    }
}

impl Error for VocabularyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Empty(_) | Self::Duplicate { .. } => None,
        }
    }
}

fn validate_list(field: CategoricalField, list: &[String]) -> Result<(), VocabularyError> {
    if list.is_empty() {
        return Err(VocabularyError::Empty(field.column()));
    }
    let mut seen = HashSet::new();
    for value in list {
        if !seen.insert(value.as_str()) {
            return Err(VocabularyError::Duplicate {
                column: field.column(),
                value: value.clone(),
            });
        }
    }
    Ok(())
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn exterior_lists_are_prefixes() {
        let small = Vocabulary::with_exterior_count(6);
        let large = Vocabulary::with_exterior_count(15);
        let small_list = small.categories(CategoricalField::ExteriorMaterial);
        assert_eq!(small_list.len(), 6);
        assert_eq!(
            small_list,
            &large.categories(CategoricalField::ExteriorMaterial)[..6]
        );
        assert_eq!(small.position(CategoricalField::ExteriorMaterial, "Wd Sdng"), Some(2));
        assert_eq!(small.position(CategoricalField::ExteriorMaterial, "Stone"), None);
    }

    #[test]
    fn override_replaces_named_lists_only() {
        let mut vocabulary = Vocabulary::with_exterior_count(6);
        let overrides: VocabularyOverride =
            serde_json::from_str(r#"{ "MSZoning": ["RL", "RM"] }"#).expect("parse override");
        vocabulary.apply(overrides).expect("apply override");

        assert_eq!(vocabulary.categories(CategoricalField::Zoning), &["RL", "RM"]);
        assert_eq!(vocabulary.categories(CategoricalField::LotConfig).len(), 5);
    }

    #[test]
    fn override_rejects_duplicates_and_unknown_keys() {
        let mut vocabulary = Vocabulary::with_exterior_count(6);
        let overrides: VocabularyOverride =
            serde_json::from_str(r#"{ "BldgType": ["1Fam", "1Fam"] }"#).expect("parse override");
        match vocabulary.apply(overrides) {
            Err(VocabularyError::Duplicate { column, value }) => {
                assert_eq!(column, "BldgType");
                assert_eq!(value, "1Fam");
            }
            other => panic!("expected duplicate error, got {other:?}"),
        }

        let unknown = serde_json::from_str::<VocabularyOverride>(r#"{ "Street": ["Pave"] }"#);
        assert!(unknown.is_err());
    }

    #[test]
    fn fields_round_trip_through_column_names() {
        for field in CategoricalField::ALL {
            assert_eq!(CategoricalField::from_column(field.column()), Some(field));
        }
        assert_eq!(CategoricalField::from_column("LotArea"), None);
    }
}
