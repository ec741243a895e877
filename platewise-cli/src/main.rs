use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use platewise_catalog::{
    CatalogClient, CatalogStats, RecipeQuery, load_catalog, parse_recipe_csv, sample_catalog,
};
use platewise_core::{
    MealPlanOrchestrator, PlanRequest, PlanSource, Recipe, current_week_start,
    profile_calorie_target,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod llm;
mod render;
mod setup;
mod state;

use config::Config;
use llm::ProviderKind;
use state::{Store, StoredPlan};

#[derive(Parser, Debug)]
#[command(
    name = "platewise",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PLATEWISE_BUILD_SHA"), ")"),
    about = "Weekly meal plans from your profile and a recipe catalog"
)]
struct Cli {
    /// Debug logging on stderr (otherwise RUST_LOG, default warn)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive five-step profile setup
    Setup,

    /// Show or clear the stored profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },

    /// Generate (or reuse) this week's meal plan
    Plan {
        /// Number of days (default: [planner] days in config.toml)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(config::MAX_PLAN_DAYS)))]
        days: Option<u32>,

        /// Read the recipe catalog from a CSV file instead of the API
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Skip the recipe API and the language model
        #[arg(long)]
        offline: bool,

        /// Replace an existing plan for this week
        #[arg(long)]
        regenerate: bool,
    },

    /// Print this week's stored plan
    Show {
        /// Show one day in detail (1-based)
        #[arg(long)]
        day: Option<usize>,
    },

    /// Browse the recipe catalog
    Recipes {
        /// Free text over name, description and category
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Ingredient that must appear (repeatable)
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,

        /// Maximum total time in minutes
        #[arg(long)]
        max_time: Option<u32>,

        #[arg(long)]
        vegetarian: bool,

        #[arg(long)]
        vegan: bool,

        #[arg(long)]
        gluten_free: bool,

        #[arg(long)]
        offline: bool,
    },

    /// Show one recipe by name or slug
    Recipe {
        name: String,

        #[arg(long)]
        offline: bool,
    },

    /// Catalog statistics
    Stats {
        #[arg(long)]
        offline: bool,
    },

    /// Write profile and plans as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Merge an exported JSON file into local state
    Import { path: PathBuf },

    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    Show,
    Clear {
        /// Also delete every stored plan
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Paste an API key and store it in auth.json
    SetKey {
        #[arg(long, value_enum)]
        provider: ProviderKind,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = Store::open()?;
    let cfg = config::load_config(store.root())?;

    match cli.command {
        Command::Setup => {
            let existing = store.read_profile()?;
            let profile = setup::run_setup(existing.as_ref())?;
            store.write_profile(&profile)?;
            println!("\nWrote {}", store.profile_path().display());
            println!("\nNext: platewise plan");
        }

        Command::Profile { command } => match command {
            ProfileCommand::Show => match store.read_profile()? {
                Some(p) => {
                    println!("{}", serde_json::to_string_pretty(&p)?);
                    println!("\nDaily calorie target: {} kcal", profile_calorie_target(&p));
                }
                None => println!("No profile yet. Run: platewise setup"),
            },
            ProfileCommand::Clear { all } => {
                if all {
                    store.clear_all()?;
                    println!("Cleared profile and plans.");
                } else {
                    store.clear_profile()?;
                    println!("Cleared profile.");
                }
            }
        },

        Command::Plan {
            days,
            catalog,
            offline,
            regenerate,
        } => {
            plan(&store, &cfg, days, catalog, offline, regenerate).await?;
        }

        Command::Show { day } => show(&store, &cfg, day)?,

        Command::Recipes {
            search,
            category,
            ingredients,
            max_time,
            vegetarian,
            vegan,
            gluten_free,
            offline,
        } => {
            let query = RecipeQuery {
                search,
                category,
                ingredients,
                max_time,
                vegetarian,
                vegan,
                gluten_free,
            };
            let recipes = search_recipes(&cfg, &query, offline).await?;
            for r in &recipes {
                println!("{}", render::recipe_line(r));
            }
            println!("\n{} recipe(s)", recipes.len());
        }

        Command::Recipe { name, offline } => {
            let recipe = find_recipe(&cfg, &name, offline).await?;
            print!("{}", render::recipe_detail(&recipe));
        }

        Command::Stats { offline } => {
            let stats = catalog_stats(&cfg, offline).await?;
            print!("{}", render::stats_view(&stats));
        }

        Command::Export { out } => {
            let bundle = store.export()?;
            let json = serde_json::to_string_pretty(&bundle)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
                    println!("Exported {} plan(s) to {}", bundle.weekly_plans.len(), path.display());
                }
                None => println!("{json}"),
            }
        }

        Command::Import { path } => {
            let s = std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
            let bundle = serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
            let n = store.import(bundle)?;
            println!("Imported {n} plan(s) from {}", path.display());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(store.root())?,
        },

        Command::Auth { command } => match command {
            AuthCommand::SetKey { provider } => auth::set_key(store.root(), provider)?,
        },
    }

    Ok(())
}

fn catalog_client(cfg: &Config) -> Result<CatalogClient> {
    CatalogClient::new(
        &cfg.catalog.api_base_url,
        Duration::from_secs(cfg.catalog.timeout_secs),
    )
}

async fn load_recipes(cfg: &Config, csv: Option<PathBuf>, offline: bool) -> Result<Vec<Recipe>> {
    if let Some(path) = csv {
        let recipes = parse_recipe_csv(&path)?;
        info!(count = recipes.len(), path = %path.display(), "loaded catalog from CSV");
        return Ok(recipes);
    }
    let client = if offline { None } else { Some(catalog_client(cfg)?) };
    Ok(load_catalog(client.as_ref()).await?.recipes)
}

async fn plan(
    store: &Store,
    cfg: &Config,
    days: Option<u32>,
    csv: Option<PathBuf>,
    offline: bool,
    regenerate: bool,
) -> Result<()> {
    let Some(profile) = store.read_profile()? else {
        bail!("No profile found at {}. Run: platewise setup", store.profile_path().display());
    };
    let week_start = current_week_start(&cfg.planner.timezone)?;
    let target = profile_calorie_target(&profile);

    if !regenerate {
        if let Some(existing) = store.plan_for_week(profile.user_id(), week_start)? {
            print!("{}", render::week_summary(&existing.plan, existing.source, target));
            println!("\nUsing the saved plan for this week (pass --regenerate for a new one).");
            return Ok(());
        }
    }

    let catalog = load_recipes(cfg, csv, offline).await?;
    let auth = auth::load_auth(store.root())?;
    let generator = llm::build_generator(&cfg.llm, &auth, offline)?;
    let orchestrator = MealPlanOrchestrator::new(generator);

    let request = PlanRequest {
        profile: &profile,
        catalog: &catalog,
        days: days.unwrap_or(cfg.planner.days),
        week_start,
    };
    let generated = orchestrator.generate(&request).await?;

    print!("{}", render::week_summary(&generated.plan, generated.source, target));
    if generated.source == PlanSource::Fallback {
        if let Some(reason) = &generated.fallback_reason {
            println!("\nNote: picked recipes without the AI ({reason}).");
        }
    }

    store.save_plan(StoredPlan::new(generated.plan, generated.source))?;
    println!("\nSaved. See a day with: platewise show --day 1");
    Ok(())
}

fn show(store: &Store, cfg: &Config, day: Option<usize>) -> Result<()> {
    let profile = store.read_profile()?.unwrap_or_default();
    let week_start = current_week_start(&cfg.planner.timezone)?;
    let Some(stored) = store.plan_for_week(profile.user_id(), week_start)? else {
        bail!("No plan for the week of {week_start}. Run: platewise plan");
    };

    match day {
        Some(n) => {
            let Some(d) = n.checked_sub(1).and_then(|i| stored.plan.days.get(i)) else {
                bail!("day {n} is out of range (1-{})", stored.plan.days.len());
            };
            print!("{}", render::day_detail(d));
        }
        None => {
            let target = profile_calorie_target(&profile);
            print!("{}", render::week_summary(&stored.plan, stored.source, target));
            for d in &stored.plan.days {
                println!();
                print!("{}", render::day_detail(d));
            }
        }
    }
    Ok(())
}

async fn search_recipes(cfg: &Config, query: &RecipeQuery, offline: bool) -> Result<Vec<Recipe>> {
    if !offline {
        match catalog_client(cfg)?.fetch_recipes(query).await {
            Ok(recipes) => return Ok(recipes),
            Err(e) => warn!(error = %format!("{e:#}"), "recipe API unavailable, searching bundled catalog"),
        }
    }
    let catalog = sample_catalog()?;
    Ok(query.apply(&catalog).into_iter().cloned().collect())
}

async fn find_recipe(cfg: &Config, name: &str, offline: bool) -> Result<Recipe> {
    let catalog = load_recipes(cfg, None, offline).await?;
    let wanted = name.trim().to_lowercase();
    let Some(found) = catalog
        .into_iter()
        .find(|r| r.name.to_lowercase() == wanted || r.slug.as_deref() == Some(wanted.as_str()))
    else {
        bail!("no recipe named {name:?}");
    };

    // List entries carry no steps; the detail endpoint does.
    if let (false, Some(slug)) = (offline, found.slug.as_deref()) {
        match catalog_client(cfg)?.fetch_recipe(slug).await {
            Ok(detail) => return Ok(detail),
            Err(e) => warn!(error = %format!("{e:#}"), slug, "recipe detail unavailable"),
        }
    }
    Ok(found)
}

async fn catalog_stats(cfg: &Config, offline: bool) -> Result<CatalogStats> {
    if !offline {
        match catalog_client(cfg)?.fetch_stats().await {
            Ok(stats) => return Ok(stats),
            Err(e) => warn!(error = %format!("{e:#}"), "recipe API unavailable, using bundled catalog"),
        }
    }
    Ok(CatalogStats::from_recipes(&sample_catalog()?))
}
