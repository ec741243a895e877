//! platewise-catalog: recipe API client, bundled catalog, CSV import, search and stats

pub mod api;
pub mod client;
pub mod csv_import;
pub mod sample;
pub mod search;
pub mod stats;

pub use api::{ApiRecipe, RecipePage};
pub use client::{CatalogClient, CatalogOrigin, DEFAULT_API_BASE_URL, LoadedCatalog, load_catalog};
pub use csv_import::{parse_recipe_csv, parse_recipe_csv_reader};
pub use sample::sample_catalog;
pub use search::RecipeQuery;
pub use stats::{CatalogStats, CategoryCount};
