//! User-facing labels in each supported language

use crate::config::Language;

const MONTHS_FR: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Label set for one language
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub language: Language,
    pub month: &'static str,
    pub total: &'static str,
    pub uncategorized: &'static str,
    pub year_end: &'static str,
    pub all_years: &'static str,
    pub name: &'static str,
    pub date: &'static str,
    pub price: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub no_expenses: &'static str,
}

impl Labels {
    pub fn new(language: Language) -> Self {
        match language {
            Language::Fr => Self {
                language,
                month: "Mois",
                total: "Total",
                uncategorized: "(Sans catégorie)",
                year_end: "Projection fin d'année",
                all_years: "toutes les années",
                name: "Nom",
                date: "Date",
                price: "Prix",
                category: "Catégorie",
                description: "Description",
                color: "Couleur",
                no_expenses: "Aucune dépense.",
            },
            Language::En => Self {
                language,
                month: "Month",
                total: "Total",
                uncategorized: "(Uncategorized)",
                year_end: "Year-end projection",
                all_years: "all years",
                name: "Name",
                date: "Date",
                price: "Price",
                category: "Category",
                description: "Description",
                color: "Color",
                no_expenses: "No expenses found.",
            },
        }
    }

    /// Month name for 1..=12 (the number itself when out of range)
    pub fn month_name(&self, month: u32) -> String {
        let names = match self.language {
            Language::Fr => &MONTHS_FR,
            Language::En => &MONTHS_EN,
        };
        month
            .checked_sub(1)
            .and_then(|index| names.get(index as usize))
            .map(|name| name.to_string())
            .unwrap_or_else(|| month.to_string())
    }

    /// Label of the year-to-date row through `month`
    pub fn to_date_through(&self, month: u32) -> String {
        let month = self.month_name(month);
        match self.language {
            Language::Fr => format!("Total à date (jusqu'à {})", month),
            Language::En => format!("Total to date (through {})", month),
        }
    }

    /// Label of the year-to-date row when it spans the whole year
    pub fn full_year(&self) -> String {
        match self.language {
            Language::Fr => "Total année (jusqu'à Décembre)".to_string(),
            Language::En => "Year total (through December)".to_string(),
        }
    }

    /// Title of the pivot for a year (or "all years")
    pub fn pivot_title(&self, year: &str) -> String {
        match self.language {
            Language::Fr => format!("Totaux par mois / catégorie ({})", year),
            Language::En => format!("Totals by month / category ({})", year),
        }
    }

    /// Title of the budget grid for a year
    pub fn budget_title(&self, year: i32) -> String {
        match self.language {
            Language::Fr => format!("Budgets {}", year),
            Language::En => format!("Budgets for {}", year),
        }
    }
}
