//! The fixed registry of the 27 Rakuten product categories.
//!
//! The table is validated once, on first access, and never mutated afterwards.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use lazy_static::lazy_static;
use serde::Serialize;

use crate::classifier::ClassifierError;

/// Number of categories the classifier predicts over.
pub const NUM_CATEGORIES: usize = 27;

/// A registered category code. Values only come out of a [`CategoryRegistry`],
/// so holding one means the code resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CategoryCode(u16);

impl CategoryCode {
    pub fn value(self) -> u16 {
        self.0
    }

    /// Returns the registry entry for this code
    pub fn info(self) -> Result<&'static CategoryInfo, ClassifierError> {
        get_category_info(self.0)
    }
}

impl TryFrom<u16> for CategoryCode {
    type Error = ClassifierError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        get_category_info(code).map(|info| info.code)
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Display information for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub code: CategoryCode,
    pub short_name: String,
    pub full_name: String,
    pub glyph: String,
}

/// (code, short name, full name, glyph), ascending by code.
const CATEGORY_TABLE: [(u16, &str, &str, &str); NUM_CATEGORIES] = [
    (10, "Livres occasion", "Livres d'occasion", "📚"),
    (40, "Jeux vidéo", "Jeux vidéo, CD et équipements", "🎮"),
    (50, "Accessoires gaming", "Accessoires de jeux vidéo", "🕹️"),
    (60, "Consoles", "Consoles de jeux", "🎮"),
    (1140, "Figurines", "Figurines et objets pop culture", "🦸"),
    (1160, "Cartes", "Cartes à collectionner", "🃏"),
    (1180, "Jeux de rôle", "Figurines, jeux de rôle et wargames", "🐉"),
    (1280, "Jouets", "Jouets pour enfants", "🧸"),
    (1281, "Jeux de société", "Jeux de société et jeux de cartes", "🎲"),
    (1300, "Modélisme", "Modèles réduits et drones", "🚁"),
    (1301, "Vêtements bébé", "Vêtements bébé et jeux de bar", "🧦"),
    (1302, "Jeux d'extérieur", "Jeux et jouets d'extérieur", "🪁"),
    (1320, "Puériculture", "Puériculture et équipement bébé", "🍼"),
    (1560, "Mobilier", "Mobilier et décoration d'intérieur", "🛋️"),
    (1920, "Linge de maison", "Linge de maison et literie", "🛏️"),
    (1940, "Épicerie", "Alimentation et épicerie", "🍫"),
    (2060, "Décoration", "Décoration et luminaires", "🖼️"),
    (2220, "Animalerie", "Accessoires pour animaux", "🐾"),
    (2280, "Magazines", "Journaux et magazines", "📰"),
    (2403, "Livres anciens", "Livres, BD et revues de collection", "📖"),
    (2462, "Jeux occasion", "Jeux vidéo et consoles d'occasion", "💿"),
    (2522, "Papeterie", "Fournitures de bureau et papeterie", "✏️"),
    (2582, "Jardin", "Mobilier et outillage de jardin", "🌳"),
    (2583, "Piscine", "Piscines et accessoires", "🏊"),
    (2585, "Bricolage", "Outillage et bricolage", "🔧"),
    (2705, "Livres neufs", "Livres neufs", "📘"),
    (2905, "Jeux PC", "Jeux vidéo PC en téléchargement", "💻"),
];

lazy_static! {
    static ref REGISTRY: CategoryRegistry = CategoryRegistry::from_entries(&CATEGORY_TABLE)
        .expect("built-in category table must be well-formed");
}

/// An immutable, ordered mapping from category code to [`CategoryInfo`].
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    entries: Vec<CategoryInfo>,
}

impl CategoryRegistry {
    /// Builds a registry from raw rows, rejecting anything that is not exactly
    /// 27 unique, named categories.
    pub fn from_entries(rows: &[(u16, &str, &str, &str)]) -> Result<Self, ClassifierError> {
        if rows.len() != NUM_CATEGORIES {
            return Err(ClassifierError::ConfigError(format!(
                "Category table must have {} entries, found {}",
                NUM_CATEGORIES,
                rows.len()
            )));
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(rows.len());
        for &(code, short_name, full_name, glyph) in rows {
            if !seen.insert(code) {
                return Err(ClassifierError::ConfigError(format!("Duplicate category code {}", code)));
            }
            if short_name.trim().is_empty() || full_name.trim().is_empty() {
                return Err(ClassifierError::ConfigError(format!("Category {} has an empty name", code)));
            }
            if glyph.is_empty() {
                return Err(ClassifierError::ConfigError(format!("Category {} has no glyph", code)));
            }
            entries.push(CategoryInfo {
                code: CategoryCode(code),
                short_name: short_name.to_string(),
                full_name: full_name.to_string(),
                glyph: glyph.to_string(),
            });
        }
        entries.sort_by_key(|info| info.code);

        Ok(Self { entries })
    }

    pub fn get(&self, code: u16) -> Result<&CategoryInfo, ClassifierError> {
        self.entries
            .binary_search_by_key(&code, |info| info.code.0)
            .map(|idx| &self.entries[idx])
            .map_err(|_| ClassifierError::UnknownCategory(code))
    }

    /// Category at `index` in ascending code order
    pub fn at(&self, index: usize) -> Option<&CategoryInfo> {
        self.entries.get(index)
    }

    pub fn codes(&self) -> impl Iterator<Item = CategoryCode> + '_ {
        self.entries.iter().map(|info| info.code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryInfo> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The process-wide registry built from the Rakuten category table
pub fn registry() -> &'static CategoryRegistry {
    &REGISTRY
}

/// Validates the built-in table without panicking, then builds the shared registry.
pub fn check_builtin_table() -> Result<usize, ClassifierError> {
    CategoryRegistry::from_entries(&CATEGORY_TABLE)?;
    Ok(registry().len())
}

/// Looks up a category by its raw code.
///
/// # Errors
/// `UnknownCategory` when `code` is not one of the 27 registered codes.
pub fn get_category_info(code: u16) -> Result<&'static CategoryInfo, ClassifierError> {
    registry().get(code)
}

/// All categories in ascending code order
pub fn get_all_categories() -> BTreeMap<CategoryCode, &'static CategoryInfo> {
    registry().iter().map(|info| (info.code, info)).collect()
}
