//! On-disk state under `~/.platewise` (or `$PLATEWISE_HOME`).
//!
//! profile.json  the single user profile
//! plans.json    weekly plans, at most one per (user id, week start)

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use platewise_core::{PlanSource, UserProfile, WeeklyPlan};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub fn platewise_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("PLATEWISE_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".platewise"))
}

pub fn ensure_platewise_home() -> Result<PathBuf> {
    let dir = platewise_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPlan {
    pub plan: WeeklyPlan,
    pub source: PlanSource,
    #[serde(default)]
    pub created_at_utc: Option<String>,
}

impl StoredPlan {
    pub fn new(plan: WeeklyPlan, source: PlanSource) -> Self {
        Self {
            plan,
            source,
            created_at_utc: Some(Utc::now().to_rfc3339()),
        }
    }

    fn same_key(&self, other: &StoredPlan) -> bool {
        self.plan.user_id == other.plan.user_id && self.plan.week_start == other.plan.week_start
    }
}

/// Everything `platewise export` writes and `platewise import` reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportBundle {
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub weekly_plans: Vec<StoredPlan>,
    pub export_date: String,
}

#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn open() -> Result<Self> {
        Ok(Self::at(ensure_platewise_home()?))
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn profile_path(&self) -> PathBuf {
        self.root.join("profile.json")
    }

    pub fn plans_path(&self) -> PathBuf {
        self.root.join("plans.json")
    }

    pub fn read_profile(&self) -> Result<Option<UserProfile>> {
        read_json(&self.profile_path())
    }

    pub fn write_profile(&self, profile: &UserProfile) -> Result<()> {
        write_json(&self.profile_path(), profile)
    }

    pub fn clear_profile(&self) -> Result<()> {
        remove_if_exists(&self.profile_path())
    }

    /// Profile and every stored plan.
    pub fn clear_all(&self) -> Result<()> {
        self.clear_profile()?;
        remove_if_exists(&self.plans_path())
    }

    /// All plans, or only those of `user_id`.
    pub fn plans(&self, user_id: Option<&str>) -> Result<Vec<StoredPlan>> {
        let all: Vec<StoredPlan> = read_json(&self.plans_path())?.unwrap_or_default();
        Ok(match user_id {
            Some(id) => all.into_iter().filter(|p| p.plan.user_id == id).collect(),
            None => all,
        })
    }

    /// Save, replacing any plan with the same user and week start.
    pub fn save_plan(&self, stored: StoredPlan) -> Result<()> {
        let mut all = self.plans(None)?;
        all.retain(|p| !p.same_key(&stored));
        all.push(stored);
        write_json(&self.plans_path(), &all)
    }

    pub fn plan_for_week(&self, user_id: &str, week_start: NaiveDate) -> Result<Option<StoredPlan>> {
        Ok(self
            .plans(Some(user_id))?
            .into_iter()
            .find(|p| p.plan.week_start == week_start))
    }

    pub fn export(&self) -> Result<ExportBundle> {
        let profile = self.read_profile()?;
        let user_id = profile.as_ref().map(|p| p.user_id().to_string());
        Ok(ExportBundle {
            weekly_plans: self.plans(user_id.as_deref())?,
            profile,
            export_date: Utc::now().to_rfc3339(),
        })
    }

    /// Merge a bundle into the store. Returns the number of plans imported.
    pub fn import(&self, bundle: ExportBundle) -> Result<usize> {
        if let Some(profile) = &bundle.profile {
            self.write_profile(profile)?;
        }
        let n = bundle.weekly_plans.len();
        for plan in bundle.weekly_plans {
            self.save_plan(plan)?;
        }
        Ok(n)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(value))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("remove {}", path.display()))?;
    }
    Ok(())
}
