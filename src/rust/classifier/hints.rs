//! Keyword hints that nudge mock predictions toward a plausible category.
//!
//! Purely cosmetic: a hint only raises a category's draw weight, it never
//! forces the outcome.

use std::collections::BTreeSet;

use super::preprocessing::tokenize;

/// Extra draw weight for each hinted category, on top of the base weight of 1.0
pub const HINT_BOOST: f64 = 8.0;

const KEYWORD_HINTS: &[(&str, u16)] = &[
    ("livre", 2705),
    ("roman", 2705),
    ("tome", 2705),
    ("occasion", 10),
    ("bd", 2403),
    ("manga", 2403),
    ("collector", 2403),
    ("jeu", 40),
    ("jeux", 40),
    ("vidéo", 40),
    ("manette", 50),
    ("casque", 50),
    ("console", 60),
    ("playstation", 60),
    ("ps5", 60),
    ("xbox", 60),
    ("nintendo", 60),
    ("switch", 60),
    ("figurine", 1140),
    ("funko", 1140),
    ("pop", 1140),
    ("marvel", 1140),
    ("cartes", 1160),
    ("pokemon", 1160),
    ("yu", 1160),
    ("warhammer", 1180),
    ("donjons", 1180),
    ("jouet", 1280),
    ("peluche", 1280),
    ("lego", 1280),
    ("poupée", 1280),
    ("société", 1281),
    ("puzzle", 1281),
    ("drone", 1300),
    ("maquette", 1300),
    ("chaussettes", 1301),
    ("trampoline", 1302),
    ("toboggan", 1302),
    ("bébé", 1320),
    ("poussette", 1320),
    ("biberon", 1320),
    ("canapé", 1560),
    ("chaise", 1560),
    ("table", 1560),
    ("armoire", 1560),
    ("couette", 1920),
    ("drap", 1920),
    ("oreiller", 1920),
    ("coussin", 1920),
    ("chocolat", 1940),
    ("café", 1940),
    ("thé", 1940),
    ("bonbons", 1940),
    ("lampe", 2060),
    ("cadre", 2060),
    ("décoration", 2060),
    ("chien", 2220),
    ("chat", 2220),
    ("croquettes", 2220),
    ("magazine", 2280),
    ("journal", 2280),
    ("revue", 2280),
    ("retro", 2462),
    ("stylo", 2522),
    ("cahier", 2522),
    ("papeterie", 2522),
    ("jardin", 2582),
    ("tondeuse", 2582),
    ("barbecue", 2582),
    ("piscine", 2583),
    ("gonflable", 2583),
    ("spa", 2583),
    ("perceuse", 2585),
    ("outil", 2585),
    ("visseuse", 2585),
    ("pc", 2905),
    ("steam", 2905),
    ("téléchargement", 2905),
];

/// Category codes hinted by any token of `text`, ascending and de-duplicated
pub fn hinted_categories(text: &str) -> BTreeSet<u16> {
    tokenize(text)
        .iter()
        .filter_map(|token| hint_for(token))
        .collect()
}

/// The category a single token hints at, if any
pub fn hint_for(token: &str) -> Option<u16> {
    KEYWORD_HINTS
        .iter()
        .find(|(keyword, _)| *keyword == token)
        .map(|(_, code)| *code)
}
