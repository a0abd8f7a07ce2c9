//! Weekly menu model.
//!
//! A [`WeeklyMenu`] assigns at most one recipe to each lunch and dinner slot
//! of a Monday-to-Sunday week. The menu is keyed by the ISO date of its
//! Monday, which is also the key it is persisted under.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;
use crate::recipe::{MealTime, Recipe};
use crate::shopping::ShoppingListEntry;

/// Day of the planning week. Declaration order is calendar order from Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    /// Monday, the first day of the week.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday, the last day of the week.
    Sunday,
}

impl Weekday {
    /// All days in week order.
    pub const ALL: [Weekday; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Zero-based position in the week.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The day before, or `None` for Monday.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// The weekday id used in documents and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    /// Capitalised name for display.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Weekday {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == wanted)
            .ok_or_else(|| Error::InvalidWeekday {
                value: s.to_string(),
            })
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

/// A plannable meal slot within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    /// Midday meal.
    Lunch,
    /// Evening meal.
    Dinner,
}

impl Meal {
    /// Both meals in the order they are served.
    pub const ALL: [Meal; 2] = [Self::Lunch, Self::Dinner];

    /// The recipe category tag that makes a recipe eligible for this meal.
    #[must_use]
    pub fn meal_time(self) -> MealTime {
        match self {
            Self::Lunch => MealTime::Lunch,
            Self::Dinner => MealTime::Dinner,
        }
    }

    /// Lower-case meal name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.meal_time().as_str()
    }
}

impl std::fmt::Display for Meal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Meal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            _ => Err(Error::InvalidMeal {
                value: s.to_string(),
            }),
        }
    }
}

/// The two meal slots of one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    /// Recipe for lunch, if assigned.
    #[serde(default)]
    pub lunch: Option<Recipe>,
    /// Recipe for dinner, if assigned.
    #[serde(default)]
    pub dinner: Option<Recipe>,
}

impl DayPlan {
    /// The recipe in the given slot.
    #[must_use]
    pub fn get(&self, meal: Meal) -> Option<&Recipe> {
        match meal {
            Meal::Lunch => self.lunch.as_ref(),
            Meal::Dinner => self.dinner.as_ref(),
        }
    }

    fn slot_mut(&mut self, meal: Meal) -> &mut Option<Recipe> {
        match meal {
            Meal::Lunch => &mut self.lunch,
            Meal::Dinner => &mut self.dinner,
        }
    }

    /// Whether neither slot is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lunch.is_none() && self.dinner.is_none()
    }
}

/// Return the Monday of the week containing `date`.
#[must_use]
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn deserialize_monday<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    NaiveDate::deserialize(deserializer).map(monday_of)
}

/// One week of lunch and dinner assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyMenu {
    #[serde(deserialize_with = "deserialize_monday")]
    week_start: NaiveDate,
    #[serde(default)]
    days: BTreeMap<Weekday, DayPlan>,
}

impl WeeklyMenu {
    /// Create an empty menu for the week containing `date`.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            week_start: monday_of(date),
            days: BTreeMap::new(),
        }
    }

    /// Rebuild a menu from stored day plans. Empty days are dropped.
    #[must_use]
    pub fn from_days(date: NaiveDate, days: BTreeMap<Weekday, DayPlan>) -> Self {
        let mut days = days;
        days.retain(|_, plan| !plan.is_empty());
        Self {
            week_start: monday_of(date),
            days,
        }
    }

    /// The assigned day plans, keyed by weekday.
    #[must_use]
    pub fn days(&self) -> &BTreeMap<Weekday, DayPlan> {
        &self.days
    }

    /// The Monday this menu starts on.
    #[must_use]
    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    /// The Sunday this menu ends on.
    #[must_use]
    pub fn week_end(&self) -> NaiveDate {
        self.week_start + Duration::days(6)
    }

    /// Document key: the ISO date of the week's Monday.
    #[must_use]
    pub fn week_id(&self) -> String {
        self.week_start.format("%Y-%m-%d").to_string()
    }

    /// Calendar date of `day` within this week.
    #[must_use]
    pub fn date_of(&self, day: Weekday) -> NaiveDate {
        self.week_start + Duration::days(i64::from(day as u8))
    }

    /// The plan for `day`, if anything was ever assigned to it.
    #[must_use]
    pub fn day(&self, day: Weekday) -> Option<&DayPlan> {
        self.days.get(&day)
    }

    /// The recipe in a slot.
    #[must_use]
    pub fn slot(&self, day: Weekday, meal: Meal) -> Option<&Recipe> {
        self.days.get(&day).and_then(|plan| plan.get(meal))
    }

    /// Put `recipe` into a slot, returning whatever was there before.
    pub fn assign(&mut self, day: Weekday, meal: Meal, recipe: Recipe) -> Option<Recipe> {
        self.days
            .entry(day)
            .or_default()
            .slot_mut(meal)
            .replace(recipe)
    }

    /// Empty a slot, returning the recipe that was in it.
    pub fn remove(&mut self, day: Weekday, meal: Meal) -> Option<Recipe> {
        let plan = self.days.get_mut(&day)?;
        let removed = plan.slot_mut(meal).take();
        if plan.is_empty() {
            self.days.remove(&day);
        }
        removed
    }

    /// Remove every assignment.
    pub fn clear(&mut self) {
        self.days.clear();
    }

    /// Assigned slots in day-then-meal order.
    pub fn slots(&self) -> impl Iterator<Item = (Weekday, Meal, &Recipe)> + '_ {
        self.days.iter().flat_map(|(day, plan)| {
            Meal::ALL
                .into_iter()
                .filter_map(move |meal| plan.get(meal).map(|recipe| (*day, meal, recipe)))
        })
    }

    /// Ids of every assigned recipe.
    #[must_use]
    pub fn assigned_ids(&self) -> HashSet<&str> {
        self.slots().map(|(_, _, recipe)| recipe.id.as_str()).collect()
    }

    /// Number of assigned slots.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.slots().count()
    }

    /// Whether no slot is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.values().all(DayPlan::is_empty)
    }

    /// Plain-text summary of the week followed by its shopping list, suitable
    /// for sharing in a message.
    #[must_use]
    pub fn share_text(&self, shopping: &[ShoppingListEntry]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "WEEKLY MENU");
        let _ = writeln!(
            out,
            "{} - {}",
            self.week_start.format("%-d"),
            self.week_end().format("%-d %b %Y")
        );

        for day in Weekday::ALL {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "{} ({})",
                day.display_name(),
                self.date_of(day).format("%-d %b")
            );
            for meal in Meal::ALL {
                let name = self
                    .slot(day, meal)
                    .map_or("not assigned", |recipe| recipe.name.as_str());
                let label = match meal {
                    Meal::Lunch => "Lunch: ",
                    Meal::Dinner => "Dinner:",
                };
                let _ = writeln!(out, "  {label} {name}");
            }
        }

        if !shopping.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "SHOPPING LIST");
            for entry in shopping {
                if entry.count > 1 {
                    let _ = writeln!(out, "- {} (x{})", entry.name, entry.count);
                } else {
                    let _ = writeln!(out, "- {}", entry.name);
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn recipe(name: &str) -> Recipe {
        Recipe::new(name, ["sal"], ["cocinar"])
    }

    #[test]
    fn test_monday_of() {
        // 2026-03-04 is a Wednesday
        assert_eq!(monday_of(date(2026, 3, 4)), date(2026, 3, 2));
        assert_eq!(monday_of(date(2026, 3, 2)), date(2026, 3, 2));
        assert_eq!(monday_of(date(2026, 3, 8)), date(2026, 3, 2));
    }

    #[test]
    fn test_new_normalizes_to_monday() {
        let menu = WeeklyMenu::new(date(2026, 3, 6));
        assert_eq!(menu.week_start(), date(2026, 3, 2));
        assert_eq!(menu.week_end(), date(2026, 3, 8));
        assert_eq!(menu.week_id(), "2026-03-02");
        assert!(menu.is_empty());
    }

    #[test]
    fn test_date_of() {
        let menu = WeeklyMenu::new(date(2026, 3, 2));
        assert_eq!(menu.date_of(Weekday::Monday), date(2026, 3, 2));
        assert_eq!(menu.date_of(Weekday::Sunday), date(2026, 3, 8));
    }

    #[test]
    fn test_weekday_previous() {
        assert_eq!(Weekday::Monday.previous(), None);
        assert_eq!(Weekday::Tuesday.previous(), Some(Weekday::Monday));
        assert_eq!(Weekday::Sunday.previous(), Some(Weekday::Saturday));
    }

    #[test]
    fn test_weekday_parse() {
        assert_eq!("Tuesday".parse::<Weekday>().unwrap(), Weekday::Tuesday);
        assert_eq!(" sunday ".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert!(matches!(
            "funday".parse::<Weekday>(),
            Err(Error::InvalidWeekday { .. })
        ));
    }

    #[test]
    fn test_weekday_from_chrono() {
        assert_eq!(Weekday::from(chrono::Weekday::Mon), Weekday::Monday);
        assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Sunday);
    }

    #[test]
    fn test_meal_parse() {
        assert_eq!("LUNCH".parse::<Meal>().unwrap(), Meal::Lunch);
        assert_eq!("dinner".parse::<Meal>().unwrap(), Meal::Dinner);
        assert!(matches!(
            "brunch".parse::<Meal>(),
            Err(Error::InvalidMeal { .. })
        ));
    }

    #[test]
    fn test_assign_and_slot() {
        let mut menu = WeeklyMenu::new(date(2026, 3, 2));
        assert!(menu
            .assign(Weekday::Monday, Meal::Lunch, recipe("Lentejas"))
            .is_none());

        let previous = menu.assign(Weekday::Monday, Meal::Lunch, recipe("Paella"));
        assert_eq!(previous.unwrap().name, "Lentejas");
        assert_eq!(
            menu.slot(Weekday::Monday, Meal::Lunch).unwrap().name,
            "Paella"
        );
        assert!(menu.slot(Weekday::Monday, Meal::Dinner).is_none());
        assert!(menu.slot(Weekday::Friday, Meal::Lunch).is_none());
    }

    #[test]
    fn test_remove() {
        let mut menu = WeeklyMenu::new(date(2026, 3, 2));
        menu.assign(Weekday::Friday, Meal::Dinner, recipe("Pizza"));

        assert_eq!(
            menu.remove(Weekday::Friday, Meal::Dinner).unwrap().name,
            "Pizza"
        );
        assert!(menu.remove(Weekday::Friday, Meal::Dinner).is_none());
        assert!(menu.day(Weekday::Friday).is_none());
        assert!(menu.is_empty());
    }

    #[test]
    fn test_slots_order() {
        let mut menu = WeeklyMenu::new(date(2026, 3, 2));
        menu.assign(Weekday::Wednesday, Meal::Dinner, recipe("C"));
        menu.assign(Weekday::Monday, Meal::Dinner, recipe("B"));
        menu.assign(Weekday::Monday, Meal::Lunch, recipe("A"));

        let order: Vec<_> = menu
            .slots()
            .map(|(day, meal, r)| (day, meal, r.name.clone()))
            .collect();
        assert_eq!(
            order,
            vec![
                (Weekday::Monday, Meal::Lunch, "A".to_string()),
                (Weekday::Monday, Meal::Dinner, "B".to_string()),
                (Weekday::Wednesday, Meal::Dinner, "C".to_string()),
            ]
        );
        assert_eq!(menu.assigned_count(), 3);
    }

    #[test]
    fn test_assigned_ids() {
        let mut menu = WeeklyMenu::new(date(2026, 3, 2));
        menu.assign(Weekday::Monday, Meal::Lunch, recipe("Gazpacho"));
        menu.assign(Weekday::Tuesday, Meal::Lunch, recipe("Gazpacho"));

        let ids = menu.assigned_ids();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains("gazpacho"));
    }

    #[test]
    fn test_clear() {
        let mut menu = WeeklyMenu::new(date(2026, 3, 2));
        menu.assign(Weekday::Monday, Meal::Lunch, recipe("A"));
        menu.clear();
        assert!(menu.is_empty());
        assert_eq!(menu.assigned_count(), 0);
    }

    #[test]
    fn test_serialization_uses_weekday_ids() {
        let mut menu = WeeklyMenu::new(date(2026, 3, 2));
        menu.assign(Weekday::Thursday, Meal::Dinner, recipe("Crema"));

        let json = serde_json::to_string(&menu).unwrap();
        assert!(json.contains("\"thursday\""));
        assert!(json.contains("\"2026-03-02\""));

        let back: WeeklyMenu = serde_json::from_str(&json).unwrap();
        assert_eq!(back, menu);
    }

    #[test]
    fn test_deserialize_normalizes_week_start() {
        let json = r#"{"week_start":"2026-03-05"}"#;
        let menu: WeeklyMenu = serde_json::from_str(json).unwrap();
        assert_eq!(menu.week_id(), "2026-03-02");
        assert!(menu.is_empty());
    }

    #[test]
    fn test_share_text() {
        let mut menu = WeeklyMenu::new(date(2026, 3, 2));
        menu.assign(Weekday::Monday, Meal::Lunch, recipe("Lentejas"));
        let shopping = vec![
            ShoppingListEntry::new("Sal", 2),
            ShoppingListEntry::new("Limón", 1),
        ];

        let text = menu.share_text(&shopping);
        assert!(text.starts_with("WEEKLY MENU\n2 - 8 Mar 2026\n"));
        assert!(text.contains("Monday (2 Mar)\n  Lunch:  Lentejas\n  Dinner: not assigned"));
        assert!(text.contains("Sunday (8 Mar)"));
        assert!(text.contains("SHOPPING LIST\n- Sal (x2)\n- Limón\n"));
    }

    #[test]
    fn test_share_text_without_shopping_list() {
        let menu = WeeklyMenu::new(date(2026, 3, 2));
        assert!(!menu.share_text(&[]).contains("SHOPPING LIST"));
    }
}
