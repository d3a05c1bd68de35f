/// A ready-made product for the demo page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoProduct {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub static DEMO_PRODUCTS: [DemoProduct; 6] = [
    DemoProduct {
        name: "Livre",
        title: "Harry Potter à l'école des sorciers",
        description: "Roman fantastique J.K. Rowling",
    },
    DemoProduct {
        name: "Console",
        title: "Console PlayStation 5",
        description: "Jeux vidéo Sony nouvelle génération",
    },
    DemoProduct {
        name: "Piscine",
        title: "Piscine gonflable ronde",
        description: "Piscine été jardin 3m diamètre",
    },
    DemoProduct {
        name: "Figurine",
        title: "Figurine Pop Marvel Spider-Man",
        description: "Funko Pop vinyle collection",
    },
    DemoProduct {
        name: "Téléphone",
        title: "iPhone 15 Pro Max 256GB",
        description: "Smartphone Apple OLED 5G",
    },
    DemoProduct {
        name: "Jouet",
        title: "LEGO Star Wars Millennium Falcon",
        description: "Jeu construction 1351 pièces",
    },
];

impl DemoProduct {
    /// Normalized text the classifier sees for this product
    pub fn text(&self) -> String {
        crate::classifier::normalize(self.title, self.description)
    }
}

/// Finds a demo product by its (case-insensitive) name
pub fn find_demo_product(name: &str) -> Option<&'static DemoProduct> {
    DEMO_PRODUCTS
        .iter()
        .find(|product| product.name.to_lowercase() == name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(find_demo_product("console").map(|p| p.title), Some("Console PlayStation 5"));
        assert_eq!(find_demo_product("TÉLÉPHONE").map(|p| p.name), Some("Téléphone"));
        assert!(find_demo_product("voiture").is_none());
    }

    #[test]
    fn test_text_is_normalized() {
        assert_eq!(DEMO_PRODUCTS[2].text(), "Piscine gonflable ronde Piscine été jardin 3m diamètre");
    }
}
