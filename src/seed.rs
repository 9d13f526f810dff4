//! Planning theme and question rows for a database seed.
//!
//! Nothing here touches a database. The planners turn extracted records
//! into themes and numbered questions; the caller persists them. Theme
//! identifiers live in a [`ThemeTable`] that is handed in and handed back,
//! so several workbooks can be planned against the same numbering.

use crate::model::{HeaderMap, Record};
use serde::Serialize;
use std::collections::HashMap;

/// A theme and the identifier assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    /// Identifier, starting at 1
    pub id: u32,
    /// Name as it appeared in the sheet
    pub name: String,
    /// Title-cased display title
    pub title: String,
}

/// Name → identifier table for themes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ThemeTable {
    themes: Vec<Theme>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl ThemeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier for `name`, assigning the next one if it is new.
    pub fn assign(&mut self, name: &str) -> u32 {
        if let Some(&idx) = self.by_name.get(name) {
            return self.themes[idx].id;
        }
        let id = self.themes.len() as u32 + 1;
        self.by_name.insert(name.to_string(), self.themes.len());
        self.themes.push(Theme {
            id,
            name: name.to_string(),
            title: title_case(name),
        });
        id
    }

    /// Identifier for an existing theme.
    pub fn id(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).map(|&idx| self.themes[idx].id)
    }

    /// Themes in identifier order.
    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Number of themes.
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    /// Whether the table has no themes.
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

/// A question to insert under a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionSeed {
    /// Identifier of the owning theme
    pub theme_id: u32,
    /// 1-based position within the theme, counted per plan
    pub ordinal: u32,
    /// Question text, trimmed
    pub text: String,
}

/// Output of a planning call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReflectionPlan {
    /// Theme table after planning
    pub themes: ThemeTable,
    /// Questions in insertion order
    pub questions: Vec<QuestionSeed>,
}

impl ReflectionPlan {
    fn push_question(&mut self, counters: &mut HashMap<u32, u32>, theme_id: u32, text: &str) {
        let ordinal = counters.entry(theme_id).or_insert(0);
        *ordinal += 1;
        self.questions.push(QuestionSeed {
            theme_id,
            ordinal: *ordinal,
            text: text.to_string(),
        });
    }
}

/// Upper-case the first letter of each alphabetic run, lower-case the rest.
///
/// `"WALK OF HAPPINESS"` becomes `"Walk Of Happiness"`. Surrounding
/// whitespace is trimmed.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for ch in s.trim().chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Wide layout: each header column is a theme, each non-empty cell below it
/// is a question of that theme.
///
/// Blank header names are not themes; values under them are dropped.
pub fn plan_column_themes(
    header: &HeaderMap,
    records: &[Record],
    themes: ThemeTable,
) -> ReflectionPlan {
    let mut plan = ReflectionPlan {
        themes,
        questions: Vec::new(),
    };
    let mut counters = HashMap::new();

    for name in header.names() {
        if name.is_empty() {
            log::debug!("ignoring blank header column");
            continue;
        }
        plan.themes.assign(name);
    }

    for record in records {
        for (name, value) in record.iter() {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if let Some(theme_id) = plan.themes.id(name) {
                plan.push_question(&mut counters, theme_id, value);
            }
        }
    }

    plan
}

/// Long layout: each record names its theme in `theme_field` and its
/// question in `question_field`.
///
/// Records where either field is missing or blank are skipped.
pub fn plan_theme_rows(
    records: &[Record],
    theme_field: &str,
    question_field: &str,
    themes: ThemeTable,
) -> ReflectionPlan {
    let mut plan = ReflectionPlan {
        themes,
        questions: Vec::new(),
    };
    let mut counters = HashMap::new();

    for record in records {
        let theme = record.get(theme_field).map(str::trim).unwrap_or("");
        let question = record.get(question_field).map(str::trim).unwrap_or("");
        if theme.is_empty() || question.is_empty() {
            continue;
        }
        let theme_id = plan.themes.assign(theme);
        plan.push_question(&mut counters, theme_id, question);
    }

    plan
}
