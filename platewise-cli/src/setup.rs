//! Interactive profile setup.
//!
//! Five steps: body, goal, activity, diet, preferences. Pressing enter keeps
//! the value shown in brackets (the existing profile, or the defaults).

use anyhow::{Context, Result, bail};
use platewise_core::{
    ActivityLevel, DietType, Goal, Sex, UserProfile, profile_calorie_target,
};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn line(&mut self, label: &str, current: &str) -> Result<String> {
        write!(self.output, "{label} [{current}]: ")?;
        self.output.flush().ok();
        let mut s = String::new();
        let n = self.input.read_line(&mut s).context("reading input")?;
        if n == 0 {
            bail!("input closed during setup");
        }
        let s = s.trim();
        Ok(if s.is_empty() { current.to_string() } else { s.to_string() })
    }

    fn number<T: FromStr + Display + Copy>(&mut self, label: &str, current: T, valid: impl Fn(T) -> bool) -> Result<T> {
        loop {
            let raw = self.line(label, &current.to_string())?;
            match raw.parse::<T>() {
                Ok(v) if valid(v) => return Ok(v),
                _ => writeln!(self.output, "  please enter a valid number")?,
            }
        }
    }

    /// Pick one of `options` by number or by name.
    fn choice<T: Copy + PartialEq + Display>(&mut self, label: &str, options: &[T], current: T) -> Result<T> {
        for (i, o) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {o}", i + 1)?;
        }
        loop {
            let raw = self.line(label, &current.to_string())?;
            let picked = match raw.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => Some(options[n - 1]),
                _ => options.iter().copied().find(|o| o.to_string() == raw.to_lowercase()),
            };
            match picked {
                Some(v) => return Ok(v),
                None => writeln!(self.output, "  please pick 1-{}", options.len())?,
            }
        }
    }

    fn list(&mut self, label: &str, current: &[String]) -> Result<Vec<String>> {
        let shown = if current.is_empty() { "none".to_string() } else { current.join(", ") };
        let raw = self.line(&format!("{label} (comma separated, '-' for none)"), &shown)?;
        if raw == "-" || raw == "none" {
            return Ok(Vec::new());
        }
        Ok(split_terms(&raw))
    }

    fn yes_no(&mut self, label: &str, current: bool) -> Result<bool> {
        let raw = self.line(label, if current { "y" } else { "n" })?;
        Ok(matches!(raw.to_lowercase().as_str(), "y" | "yes" | "true"))
    }
}

/// Lowercased, trimmed, de-duplicated terms.
pub fn split_terms(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for t in raw.split(',').map(|t| t.trim().to_lowercase()) {
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}

pub fn run_setup_with<R: BufRead, W: Write>(input: R, output: W, existing: Option<&UserProfile>) -> Result<UserProfile> {
    let mut p = Prompter { input, output };
    let mut profile = existing.cloned().unwrap_or_default();

    writeln!(p.output, "Platewise setup\n")?;

    writeln!(p.output, "Step 1/5: about you")?;
    let name = p.line("Name (optional)", profile.name.as_deref().unwrap_or(""))?;
    profile.name = Some(name).filter(|n| !n.is_empty());
    profile.age = p.number("Age", profile.age, |a| (1..=120).contains(&a))?;
    profile.sex = p.choice("Sex", &[Sex::Female, Sex::Male, Sex::Other], profile.sex)?;
    profile.height_cm = p.number("Height (cm)", profile.height_cm, |h: f64| h > 0.0 && h < 300.0)?;
    profile.weight_kg = p.number("Weight (kg)", profile.weight_kg, |w: f64| w > 0.0 && w < 500.0)?;

    writeln!(p.output, "\nStep 2/5: goal")?;
    profile.goal = p.choice(
        "Goal",
        &[Goal::LoseFat, Goal::MaintainWeight, Goal::BuildMuscle, Goal::GainWeight],
        profile.goal,
    )?;

    writeln!(p.output, "\nStep 3/5: activity")?;
    profile.activity_level = p.choice(
        "Activity level",
        &[
            ActivityLevel::Sedentary,
            ActivityLevel::LightlyActive,
            ActivityLevel::ModeratelyActive,
            ActivityLevel::VeryActive,
            ActivityLevel::ExtremelyActive,
        ],
        profile.activity_level,
    )?;

    writeln!(p.output, "\nStep 4/5: diet")?;
    profile.diet_type = p.choice(
        "Diet type",
        &[
            DietType::Anything,
            DietType::Vegetarian,
            DietType::Vegan,
            DietType::Keto,
            DietType::Paleo,
            DietType::Mediterranean,
            DietType::Carnivore,
        ],
        profile.diet_type,
    )?;
    profile.allergies = p.list("Allergies", &profile.allergies)?;

    writeln!(p.output, "\nStep 5/5: preferences")?;
    profile.dislikes = p.list("Dislikes", &profile.dislikes)?;
    profile.favorites = p.list("Favorite ingredients", &profile.favorites)?;
    profile.meals_per_day = p.number("Meals per day", profile.meals_per_day, |m| (1..=6).contains(&m))?;
    profile.include_snacks = p.yes_no("Include snacks? (y/n)", profile.include_snacks)?;
    profile.include_smoothies = p.yes_no("Include smoothies? (y/n)", profile.include_smoothies)?;

    writeln!(
        p.output,
        "\nDaily calorie target: {} kcal",
        profile_calorie_target(&profile)
    )?;
    Ok(profile)
}

pub fn run_setup(existing: Option<&UserProfile>) -> Result<UserProfile> {
    let stdin = std::io::stdin();
    run_setup_with(stdin.lock(), std::io::stdout(), existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str) -> (UserProfile, String) {
        let mut out = Vec::new();
        let p = run_setup_with(Cursor::new(input.to_string()), &mut out, None).unwrap();
        (p, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_enter_everywhere_keeps_defaults() {
        let (p, out) = run(&"\n".repeat(16));
        let defaults = UserProfile::default();
        assert_eq!(p, defaults);
        assert!(out.contains("Step 5/5"));
    }

    #[test]
    fn test_full_answers() {
        let input = "Sam\n30\n2\n175\n70\n1\nmoderately_active\n3\nPeanuts, shellfish\nmushrooms\navocado,quinoa, avocado\n4\ny\nn\n";
        let (p, out) = run(input);
        assert_eq!(p.name.as_deref(), Some("Sam"));
        assert_eq!(p.age, 30);
        assert_eq!(p.sex, Sex::Male);
        assert_eq!(p.goal, Goal::LoseFat);
        assert_eq!(p.activity_level, ActivityLevel::ModeratelyActive);
        assert_eq!(p.diet_type, DietType::Vegan);
        assert_eq!(p.allergies, vec!["peanuts", "shellfish"]);
        assert_eq!(p.favorites, vec!["avocado", "quinoa"]);
        assert_eq!(p.meals_per_day, 4);
        assert!(p.include_snacks && !p.include_smoothies);
        assert!(out.contains("Daily calorie target: 2044 kcal"));
    }

    #[test]
    fn test_invalid_answers_are_asked_again() {
        let input = "\nabc\n-4\n40\n9\nother\n\n\n\n\n\n\n\n\n\n\n\n";
        let (p, out) = run(input);
        assert_eq!(p.age, 40);
        assert_eq!(p.sex, Sex::Other);
        assert!(out.contains("please enter a valid number"));
        assert!(out.contains("please pick 1-3"));
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut out = Vec::new();
        assert!(run_setup_with(Cursor::new("Sam\n".to_string()), &mut out, None).is_err());
    }
}
