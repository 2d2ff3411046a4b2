//! The transient property record produced by one form submission.

/// Inclusive numeric range enforced by an input control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Smallest accepted value.
    pub min: f64,
    /// Largest accepted value, `None` when the control is open-ended.
    pub max: Option<f64>,
}

impl Bounds {
    const fn closed(min: f64, max: f64) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    const fn at_least(min: f64) -> Self {
        Self { min, max: None }
    }

    /// Clamps `value` into the range.
    pub fn clamp(&self, value: f64) -> f64 {
        let lower = value.max(self.min);
        match self.max {
            Some(max) => lower.min(max),
            None => lower,
        }
    }

    /// Clamps an integral value into the range.
    pub fn clamp_int(&self, value: i64) -> i64 {
        self.clamp(value as f64) as i64
    }

    /// Whether `value` lies inside the range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

/// Building class code bounds.
pub const SUBCLASS_BOUNDS: Bounds = Bounds::closed(20.0, 190.0);
/// Lot area bounds in square feet.
pub const LOT_AREA_BOUNDS: Bounds = Bounds::at_least(1000.0);
/// Overall condition slider bounds.
pub const CONDITION_BOUNDS: Bounds = Bounds::closed(1.0, 10.0);
/// Construction and remodel year bounds.
pub const YEAR_BOUNDS: Bounds = Bounds::closed(1800.0, 2025.0);
/// Basement area bounds in square feet.
pub const AREA_BOUNDS: Bounds = Bounds::at_least(0.0);

/// Attributes of one property, held only for the duration of a submission.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyRecord {
    /// Building class code (20-190).
    pub subclass_code: i64,
    /// Zoning classification.
    pub zoning: String,
    /// Lot size in square feet.
    pub lot_area: f64,
    /// Lot configuration.
    pub lot_config: String,
    /// Dwelling type.
    pub building_type: String,
    /// Overall condition rating (1-10).
    pub overall_condition: i64,
    /// Original construction year.
    pub year_built: i64,
    /// Remodel year.
    pub year_remodeled: i64,
    /// Primary exterior covering.
    pub exterior_material: String,
    /// Type 2 finished basement area in square feet.
    pub basement_finished_area_2: f64,
    /// Total basement area in square feet.
    pub total_basement_area: f64,
}

impl PropertyRecord {
    /// Returns a copy with every numeric field clamped into its input bounds.
    pub fn clamped(mut self) -> Self {
        self.subclass_code = SUBCLASS_BOUNDS.clamp_int(self.subclass_code);
        self.lot_area = LOT_AREA_BOUNDS.clamp(self.lot_area);
        self.overall_condition = CONDITION_BOUNDS.clamp_int(self.overall_condition);
        self.year_built = YEAR_BOUNDS.clamp_int(self.year_built);
        self.year_remodeled = YEAR_BOUNDS.clamp_int(self.year_remodeled);
        self.basement_finished_area_2 = AREA_BOUNDS.clamp(self.basement_finished_area_2);
        self.total_basement_area = AREA_BOUNDS.clamp(self.total_basement_area);
        self
    }
}

impl Default for PropertyRecord {
    fn default() -> Self {
        Self {
            subclass_code: 60,
            zoning: "RL".to_string(),
            lot_area: 8000.0,
            lot_config: "Inside".to_string(),
            building_type: "1Fam".to_string(),
            overall_condition: 5,
            year_built: 2000,
            year_remodeled: 2000,
            exterior_material: "VinylSd".to_string(),
            basement_finished_area_2: 0.0,
            total_basement_area: 800.0,
        }
    }
}
