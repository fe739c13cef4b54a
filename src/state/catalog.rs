//! Grocery catalog: products, categories and product detail

use std::fmt;

use serde::{Deserialize, Serialize};

/// Product category shown on the home screen filter bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Biscuits,
    Snacks,
    Spices,
    Dairy,
    Drinks,
    Bakery,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Biscuits,
        Category::Snacks,
        Category::Spices,
        Category::Dairy,
        Category::Drinks,
        Category::Bakery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Biscuits => "Biscuits",
            Category::Snacks => "Snacks",
            Category::Spices => "Spices",
            Category::Dairy => "Dairy",
            Category::Drinks => "Drinks",
            Category::Bakery => "Bakery",
        }
    }

    /// Case-insensitive lookup by display name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product card in the home screen grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price_cents: u64,
    pub category: Category,
    pub rating: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionInfo {
    pub serving_size: String,
    pub calories: u32,
    pub total_fat: String,
    pub sugars: String,
}

/// Single-product view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub description: String,
    pub reviews: u32,
    pub variants: Vec<String>,
    pub features: Vec<String>,
    pub nutrition: Option<NutritionInfo>,
    pub image_count: usize,
    pub fun_facts: Vec<String>,
}

/// Read-only product catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

const DEFAULT_RATING: f32 = 4.5;

impl Catalog {
    /// Catalog seeded with the storefront's grocery list
    pub fn new() -> Self {
        let seed: [(&str, &str, u64, Category); 12] = [
            ("1", "Oreo Chocolate Cookies", 299, Category::Biscuits),
            ("2", "Lays Potato Chips", 199, Category::Snacks),
            ("3", "McCormick Cinnamon Powder", 349, Category::Spices),
            ("4", "Amul Butter 500g", 499, Category::Dairy),
            ("5", "Coca-Cola 2L Bottle", 179, Category::Drinks),
            ("6", "Britannia Fruit Cake", 599, Category::Bakery),
            ("7", "Parle-G Biscuits", 99, Category::Biscuits),
            ("8", "Pringles Sour Cream", 249, Category::Snacks),
            ("9", "Taj Mahal Tea 500g", 899, Category::Spices),
            ("10", "Nestle Yogurt 1kg", 329, Category::Dairy),
            ("11", "Tropicana Orange Juice", 449, Category::Drinks),
            ("12", "Bourbon Chocolate Cream", 149, Category::Biscuits),
        ];

        let products = seed
            .into_iter()
            .map(|(id, name, price_cents, category)| Product {
                id: id.to_string(),
                name: name.to_string(),
                price_cents,
                category,
                rating: DEFAULT_RATING,
            })
            .collect();

        Self::from_products(products)
    }

    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Filter labels: "All" followed by every category
    pub fn categories(&self) -> Vec<String> {
        std::iter::once("All".to_string())
            .chain(Category::ALL.iter().map(|c| c.to_string()))
            .collect()
    }

    /// Products in catalog order, optionally restricted to one category.
    ///
    /// `None` and `"All"` return everything; an unknown name matches nothing.
    pub fn products(&self, category: Option<&str>) -> Vec<Product> {
        match category {
            None => self.products.clone(),
            Some(name) if name.eq_ignore_ascii_case("all") => self.products.clone(),
            Some(name) => match Category::from_name(name) {
                Some(category) => self
                    .products
                    .iter()
                    .filter(|p| p.category == category)
                    .cloned()
                    .collect(),
                None => Vec::new(),
            },
        }
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Detail view for a product; products without authored copy get empty sections
    pub fn detail(&self, id: &str) -> Option<ProductDetail> {
        let product = self.product(id)?.clone();
        if product.id == "1" {
            return Some(oreo_detail(product));
        }

        Some(ProductDetail {
            product,
            description: String::new(),
            reviews: 0,
            variants: Vec::new(),
            features: Vec::new(),
            nutrition: None,
            image_count: 1,
            fun_facts: Vec::new(),
        })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn oreo_detail(mut product: Product) -> ProductDetail {
    product.rating = 4.9;

    ProductDetail {
        product,
        description: "America's favorite cookie! Oreo sandwich cookies feature a delicious \
combination of crunchy chocolate wafers and sweet creme filling. Perfect for dunking in \
milk or enjoying straight from the package."
            .to_string(),
        reviews: 8563,
        variants: strings(&["Original", "Double Stuf", "Mega Stuf", "Golden", "Mint"]),
        features: strings(&[
            "Iconic sandwich cookie design",
            "Perfect cookie-to-creme ratio",
            "Great for dunking in milk",
            "Satisfying crunch with smooth filling",
            "Twist, lick, dunk tradition",
        ]),
        nutrition: Some(NutritionInfo {
            serving_size: "3 cookies (34g)".to_string(),
            calories: 160,
            total_fat: "7g".to_string(),
            sugars: "14g".to_string(),
        }),
        image_count: 3,
        fun_facts: strings(&[
            "First introduced in 1912",
            "Over 500 billion Oreos have been sold worldwide",
            "The Oreo twist-off rate is about 50/50 worldwide",
            "There's a proper way to eat an Oreo (twist, lick, dunk)",
        ]),
    }
}
