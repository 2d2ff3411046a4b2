//! Converts a [`PropertyRecord`] into the column layout a model artifact was fit on.
//!
//! Two strategies exist and the active artifact picks one:
//!
//! * [`EncodingStrategy::Ordinal`] label-encodes every categorical column by fitting a
//!   fresh [`LabelEncoder`] on the single-row batch being scored. A one-element fit has
//!   exactly one class, so every category encodes to `0` whatever its value. Serving
//!   reproduces this as-is; whether the bundled models were trained on those constant
//!   codes is an open question for the owners of the training pipeline.
//! * [`EncodingStrategy::OneHot`] expands each categorical column into one indicator
//!   column per vocabulary entry. Values outside the vocabulary produce an all-zero group.

use crate::record::PropertyRecord;
use crate::vocabulary::{CategoricalField, Vocabulary};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt;

/// Feature encoding scheme declared by a model artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingStrategy {
    /// Per-request label encoding of categorical columns.
    Ordinal,
    /// Fixed-vocabulary indicator expansion of categorical columns.
    OneHot,
}

impl fmt::Display for EncodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordinal => f.write_str("ordinal"),
            Self::OneHot => f.write_str("one_hot"),
        }
    }
}

/// How column selection treats model columns the encoder did not produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingColumns {
    /// Fail the prediction.
    #[default]
    Reject,
    /// Fill the column with `0`.
    Zero,
}

/// One encoded cell, keeping integral inputs integral.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FeatureValue {
    /// Whole-number input or ordinal code.
    Integer(i64),
    /// Real-valued input or one-hot indicator.
    Real(f64),
}

impl FeatureValue {
    /// Widens the value for estimator arithmetic.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(value) => value as f64,
            Self::Real(value) => value,
        }
    }
}

/// Named, ordered columns produced for one record.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedFeatureVector {
    columns: Vec<(String, FeatureValue)>,
}

impl EncodedFeatureVector {
    /// Columns in emission order.
    pub fn columns(&self) -> &[(String, FeatureValue)] {
        &self.columns
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no columns were produced.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Looks a column up by name.
    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| *value)
    }

    /// Projects the vector onto `features`, in that order.
    pub fn select(
        &self,
        features: &[String],
        policy: MissingColumns,
    ) -> Result<Vec<FeatureValue>, EncodeError> {
        features
            .iter()
            .map(|name| match (self.get(name), policy) {
                (Some(value), _) => Ok(value),
                (None, MissingColumns::Zero) => Ok(FeatureValue::Integer(0)),
                (None, MissingColumns::Reject) => Err(EncodeError::MissingColumn(name.clone())),
            })
            .collect()
    }
}

/// Errors raised while shaping encoded features for a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The model expects a column the encoder does not produce.
    MissingColumn(String),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn(name) => write!(f, "model expects unknown column '{name}'"),
        }
    }
}

impl Error for EncodeError {}

/// Maps category strings to their rank among the classes seen during fitting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learns the sorted set of distinct values.
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let classes: BTreeSet<&str> = values.into_iter().collect();
        Self {
            classes: classes.into_iter().map(str::to_string).collect(),
        }
    }

    /// Fits on `values` and encodes them in one pass.
    pub fn fit_transform(values: &[&str]) -> Vec<i64> {
        let encoder = Self::fit(values.iter().copied());
        values
            .iter()
            .filter_map(|value| encoder.transform(value))
            .collect()
    }

    /// Learned classes in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Code for `value`, `None` when it was not seen during fitting.
    pub fn transform(&self, value: &str) -> Option<i64> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .ok()
            .map(|idx| idx as i64)
    }
}

/// Column name of the indicator for `category` of `field`.
pub fn one_hot_column(field: CategoricalField, category: &str) -> String {
    format!("{}_{}", field.column(), category)
}

/// Encodes `record` with `strategy`.
pub fn encode(
    record: &PropertyRecord,
    strategy: EncodingStrategy,
    vocabulary: &Vocabulary,
) -> EncodedFeatureVector {
    let mut columns = Vec::new();
    for slot in layout(record) {
        match slot {
            Slot::Numeric(name, value) => columns.push((name.to_string(), value)),
            Slot::Categorical(field, value) => match strategy {
                EncodingStrategy::Ordinal => {
                    let batch = [value];
                    let code = LabelEncoder::fit_transform(&batch)
                        .first()
                        .copied()
                        .unwrap_or(0);
                    columns.push((field.column().to_string(), FeatureValue::Integer(code)));
                }
                EncodingStrategy::OneHot => {
                    for category in vocabulary.categories(field) {
                        let hit = if category == value { 1.0 } else { 0.0 };
                        columns.push((one_hot_column(field, category), FeatureValue::Real(hit)));
                    }
                }
            },
        }
    }
    let encoded = EncodedFeatureVector { columns };
    crate::debug_log!("encoded {strategy} row: {:?}", encoded.columns());
    encoded
}

/// Every column name `strategy` can emit under `vocabulary`.
pub fn producible_columns(strategy: EncodingStrategy, vocabulary: &Vocabulary) -> Vec<String> {
    encode(&PropertyRecord::default(), strategy, vocabulary)
        .columns
        .into_iter()
        .map(|(name, _)| name)
        .collect()
}

enum Slot<'a> {
    Numeric(&'static str, FeatureValue),
    Categorical(CategoricalField, &'a str),
}

fn layout(record: &PropertyRecord) -> [Slot<'_>; 11] {
    use FeatureValue::{Integer, Real};
    [
        Slot::Numeric("MSSubClass", Integer(record.subclass_code)),
        Slot::Categorical(CategoricalField::Zoning, &record.zoning),
        Slot::Numeric("LotArea", Real(record.lot_area)),
        Slot::Categorical(CategoricalField::LotConfig, &record.lot_config),
        Slot::Categorical(CategoricalField::BuildingType, &record.building_type),
        Slot::Numeric("OverallCond", Integer(record.overall_condition)),
        Slot::Numeric("YearBuilt", Integer(record.year_built)),
        Slot::Numeric("YearRemodAdd", Integer(record.year_remodeled)),
        Slot::Categorical(CategoricalField::ExteriorMaterial, &record.exterior_material),
        Slot::Numeric("BsmtFinSF2", Real(record.basement_finished_area_2)),
        Slot::Numeric("TotalBsmtSF", Real(record.total_basement_area)),
    ]
}
