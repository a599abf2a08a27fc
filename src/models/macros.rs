//! Shared macro value bundles
//!
//! `Macros` carries computed amounts (per-100g densities, per-entry results,
//! day totals); `MacroTargets` carries a user's goal values.

use serde::{Deserialize, Serialize};

/// The four tracked macros: kilocalories, protein, carbs and fat.
///
/// Protein, carbs and fat are grams. The same bundle is used for a food's
/// per-100g density and for computed absolute amounts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Macros {
    pub kcal: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Macros {
    /// Create a new Macros with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale all four values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            kcal: self.kcal * multiplier,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fat: self.fat * multiplier,
        }
    }

    /// Add another Macros to this one
    pub fn add(&self, other: &Macros) -> Self {
        Self {
            kcal: self.kcal + other.kcal,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }

    /// Round every field to one decimal place.
    ///
    /// Applied exactly once, at the day-total boundary; intermediate sums
    /// stay at full precision.
    pub fn rounded(&self) -> Self {
        Self {
            kcal: round1(self.kcal),
            protein: round1(self.protein),
            carbs: round1(self.carbs),
            fat: round1(self.fat),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl std::ops::Add for Macros {
    type Output = Macros;

    fn add(self, other: Macros) -> Macros {
        Macros::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for Macros {
    type Output = Macros;

    fn mul(self, multiplier: f64) -> Macros {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Macros::zero(), |acc, m| acc + m)
    }
}

/// A user's target values for the four macros.
///
/// Lives in two places: mutably on the user profile, and as the write-once
/// snapshot baked into each log entry at creation time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacroTargets {
    pub kcal: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Default for MacroTargets {
    /// Stock targets for a freshly created user
    fn default() -> Self {
        Self {
            kcal: 2000.0,
            protein: 150.0,
            carbs: 200.0,
            fat: 60.0,
        }
    }
}
