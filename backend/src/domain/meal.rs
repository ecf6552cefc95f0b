//! Meal catalogue types and the macro-tolerance arithmetic.
//!
//! The acceptance-window and match-score maths live here so the Diesel
//! adapter and the in-memory fake share a single definition of "within
//! tolerance".

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// A vendor-owned meal as stored in the catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct Meal {
    /// Primary identifier.
    pub id: Uuid,
    /// Owning vendor reference.
    pub vendor_id: Uuid,
    /// Display name.
    pub name: String,
    /// Menu description.
    pub description: String,
    /// Protein grams.
    pub protein: f64,
    /// Carbohydrate grams.
    pub carbs: f64,
    /// Fat grams.
    pub fats: f64,
    /// Energy in kilocalories.
    pub calories: f64,
    /// Price in the vendor's currency unit.
    pub price: f64,
    /// Cuisine label (e.g. "South Indian").
    pub cuisine_type: String,
    /// Preparation time in minutes.
    pub preparation_time: i32,
    /// Whether the meal can currently be ordered.
    pub is_available: bool,
    /// Catalogue insertion timestamp.
    pub created_at: DateTime<Utc>,
}

impl Meal {
    /// The meal's macro triple.
    pub fn macros(&self) -> MacroSplit {
        MacroSplit {
            protein: self.protein,
            carbs: self.carbs,
            fats: self.fats,
        }
    }
}

/// Vendor fields joined onto meal listings.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorSummary {
    /// Vendor display name.
    pub name: String,
    /// Vendor street address.
    pub address: String,
}

/// A meal together with its vendor's name and address.
#[derive(Debug, Clone, PartialEq)]
pub struct MealWithVendor {
    /// The meal record.
    pub meal: Meal,
    /// Joined vendor summary.
    pub vendor: VendorSummary,
}

/// A protein/carbs/fats triple in grams.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroSplit {
    /// Protein grams.
    pub protein: f64,
    /// Carbohydrate grams.
    pub carbs: f64,
    /// Fat grams.
    pub fats: f64,
}

/// Validation errors for macro search inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacroValidationError {
    /// A target axis was zero, negative, NaN, or infinite. Zero targets are
    /// rejected outright rather than producing NaN deviations.
    #[error("target macros must be positive finite numbers")]
    NonPositiveTarget,
    /// Tolerance was negative, NaN, or infinite.
    #[error("tolerance must be a non-negative finite percentage")]
    InvalidTolerance,
}

/// Validated search targets; every axis is positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroTargets(MacroSplit);

impl MacroTargets {
    /// Validate raw targets.
    pub fn try_new(protein: f64, carbs: f64, fats: f64) -> Result<Self, MacroValidationError> {
        for axis in [protein, carbs, fats] {
            if !axis.is_finite() || axis <= 0.0 {
                return Err(MacroValidationError::NonPositiveTarget);
            }
        }
        Ok(Self(MacroSplit {
            protein,
            carbs,
            fats,
        }))
    }

    /// The validated triple.
    pub fn split(&self) -> MacroSplit {
        self.0
    }

    /// Inclusive per-axis acceptance windows for the given tolerance.
    pub fn windows(&self, tolerance: TolerancePercent) -> MacroWindows {
        let fraction = tolerance.as_fraction();
        MacroWindows {
            protein: MacroWindow::around(self.0.protein, fraction),
            carbs: MacroWindow::around(self.0.carbs, fraction),
            fats: MacroWindow::around(self.0.fats, fraction),
        }
    }

    /// Match score for a candidate triple.
    ///
    /// Averages the per-axis relative deviations and maps the result onto an
    /// integer percentage: `round((1 - avg) * 100)`. A meal exactly on
    /// target scores 100. The value is deliberately unclamped; candidates
    /// are filtered through [`MacroWindows::contains`] before scoring.
    pub fn match_score(&self, actual: MacroSplit) -> i32 {
        let target = self.0;
        let deviation = ((actual.protein - target.protein).abs() / target.protein
            + (actual.carbs - target.carbs).abs() / target.carbs
            + (actual.fats - target.fats).abs() / target.fats)
            / 3.0;
        ((1.0 - deviation) * 100.0).round() as i32
    }
}

/// Tolerance band as a percentage, e.g. `10.0` for ±10%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TolerancePercent(f64);

impl TolerancePercent {
    /// Default tolerance applied when a search omits the parameter.
    pub const DEFAULT: Self = Self(10.0);

    /// Validate a raw tolerance percentage.
    pub fn try_new(value: f64) -> Result<Self, MacroValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(MacroValidationError::InvalidTolerance);
        }
        Ok(Self(value))
    }

    /// The percentage value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// The percentage expressed as a fraction of 1.
    fn as_fraction(&self) -> f64 {
        self.0 / 100.0
    }
}

impl Default for TolerancePercent {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Inclusive acceptance window on one macro axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroWindow {
    /// Lower inclusive bound.
    pub min: f64,
    /// Upper inclusive bound.
    pub max: f64,
}

impl MacroWindow {
    fn around(target: f64, fraction: f64) -> Self {
        Self {
            min: target * (1.0 - fraction),
            max: target * (1.0 + fraction),
        }
    }

    /// Inclusive containment check.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Acceptance windows for all three macro axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroWindows {
    /// Protein window.
    pub protein: MacroWindow,
    /// Carbohydrate window.
    pub carbs: MacroWindow,
    /// Fat window.
    pub fats: MacroWindow,
}

impl MacroWindows {
    /// True when every axis of `split` falls inside its window.
    pub fn contains(&self, split: MacroSplit) -> bool {
        self.protein.contains(split.protein)
            && self.carbs.contains(split.carbs)
            && self.fats.contains(split.fats)
    }
}
