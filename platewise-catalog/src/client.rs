//! HTTP client for the recipe API, plus catalog loading with a bundled
//! fallback.

use anyhow::{Context, Result, bail};
use platewise_core::Recipe;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::{ApiRecipe, RecipePage};
use crate::sample::sample_catalog;
use crate::search::RecipeQuery;
use crate::stats::CatalogStats;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building recipe API client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn fetch_recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>> {
        let page: RecipePage = self.get_json("recipes/", &query.to_query_pairs()).await?;
        Ok(page.into_recipes())
    }

    pub async fn fetch_recipe(&self, slug: &str) -> Result<Recipe> {
        let path = format!("recipes/{}/", slug.trim());
        let api: ApiRecipe = self.get_json(&path, &[]).await?;
        Ok(api.into())
    }

    pub async fn fetch_stats(&self) -> Result<CatalogStats> {
        self.get_json("stats/", &[]).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.url(path);
        debug!(%url, params = query.len(), "recipe API request");
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("recipe API error: {status} {txt}");
        }
        resp.json().await.with_context(|| format!("parse response of {url}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    Api,
    Bundled,
}

#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub recipes: Vec<Recipe>,
    pub origin: CatalogOrigin,
}

/// Fetch the full catalog, or the bundled one when `client` is `None` or the
/// API request fails. The failure is logged, not returned.
pub async fn load_catalog(client: Option<&CatalogClient>) -> Result<LoadedCatalog> {
    if let Some(client) = client {
        match fetch_full_catalog(client).await {
            Ok(recipes) => {
                debug!(count = recipes.len(), "loaded catalog from recipe API");
                return Ok(LoadedCatalog {
                    recipes,
                    origin: CatalogOrigin::Api,
                });
            }
            Err(e) => warn!(error = %format!("{e:#}"), "recipe API unavailable, using bundled catalog"),
        }
    }

    Ok(LoadedCatalog {
        recipes: sample_catalog()?,
        origin: CatalogOrigin::Bundled,
    })
}

/// The list endpoint omits ingredients, and allergy and dislike filtering
/// needs them, so each listed recipe is completed from its detail endpoint.
async fn fetch_full_catalog(client: &CatalogClient) -> Result<Vec<Recipe>> {
    let mut recipes = client.fetch_recipes(&RecipeQuery::default()).await?;

    for recipe in recipes.iter_mut().filter(|r| r.ingredients.is_empty()) {
        let Some(slug) = recipe.slug.clone() else {
            bail!("recipe {:?} has no slug, cannot load its ingredients", recipe.name);
        };
        let detail = client
            .fetch_recipe(&slug)
            .await
            .with_context(|| format!("recipe detail for {slug}"))?;
        if detail.ingredients.is_empty() {
            warn!(recipe = %recipe.name, %slug, "recipe API lists no ingredients");
        }
        recipe.ingredients = detail.ingredients;
        if recipe.instructions.is_empty() {
            recipe.instructions = detail.instructions;
        }
    }

    Ok(recipes)
}
