//! Recipe shapes passed through the generation pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Meal type tag attached to a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Breakfast
    Breakfast,
    /// Lunch
    Lunch,
    /// Dinner
    Dinner,
    /// Snack
    Snack,
    /// Dessert
    Dessert,
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Dessert => "dessert",
        };
        f.write_str(label)
    }
}

/// Diet type tag attached to a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietType {
    /// No meat or fish
    Vegetarian,
    /// No animal products
    Vegan,
    /// No gluten
    GlutenFree,
    /// Low carbohydrate
    Keto,
    /// High protein
    HighProtein,
    /// Low calorie
    LowCalorie,
}

impl fmt::Display for DietType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DietType::Vegetarian => "vegetarian",
            DietType::Vegan => "vegan",
            DietType::GlutenFree => "gluten-free",
            DietType::Keto => "keto",
            DietType::HighProtein => "high-protein",
            DietType::LowCalorie => "low-calorie",
        };
        f.write_str(label)
    }
}

/// A recipe whose every field was checked; the only shape allowed into storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedRecipe {
    /// Recipe title, never empty
    pub title: String,
    /// Short description
    pub description: String,
    /// Ingredient lines in order
    pub ingredients: Vec<String>,
    /// Preparation steps in order
    pub steps: Vec<String>,
    /// Energy in kcal
    pub kcal: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Protein in grams
    pub protein: f64,
    /// Fat in grams
    pub fat: f64,
    /// Short phrase used to look up a photo
    #[serde(rename = "imageSearch")]
    pub image_search: String,
}

impl ValidatedRecipe {
    /// Checks the invariants serde can't express.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
            && [self.kcal, self.carbs, self.protein, self.fat]
                .iter()
                .all(|value| value.is_finite() && *value >= 0.0)
    }

    /// Attaches a resolved image URL.
    pub fn finalize(self, image_url: impl Into<String>) -> FinalRecipe {
        FinalRecipe {
            recipe: self,
            image_url: image_url.into(),
        }
    }
}

/// A validated recipe with its image resolved, ready to be signed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalRecipe {
    /// The recipe fields
    #[serde(flatten)]
    pub recipe: ValidatedRecipe,
    /// Resolved photo URL
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// A finalized recipe paired with its fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedRecipe {
    /// The signed content
    #[serde(flatten)]
    pub recipe: FinalRecipe,
    /// Hex HMAC of the content
    pub signature: String,
}

/// Result envelope of parsing one model response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParsedRecipes {
    /// At least one element passed validation
    Ok {
        /// Surviving recipes in response order
        data: Vec<ValidatedRecipe>,
    },
    /// The model refused to build recipes from the ingredients
    AiError {
        /// Reason supplied by the model
        message: String,
    },
    /// Nothing usable could be read from the response
    InvalidFormat {
        /// The offending text, for logs only
        raw: String,
    },
}
