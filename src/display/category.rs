//! Category display formatting

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::storage::CategoryOptions;

use super::labels::Labels;

/// Render categories in registry order with their colors
///
/// A category without a color shows `-`.
pub fn format_category_list(options: &CategoryOptions, labels: &Labels) -> String {
    let mut builder = Builder::default();
    builder.push_record(["#", labels.category, labels.color].map(str::to_string));

    for (index, category) in options.categories.iter().enumerate() {
        let color = if category.has_color() {
            category.color.clone()
        } else {
            "-".to_string()
        };
        builder.push_record([(index + 1).to_string(), category.name.clone(), color]);
    }

    let mut table = builder.build();
    table.with(Style::psql());
    format!("{}\n", table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Language;
    use crate::models::Category;

    #[test]
    fn test_category_list() {
        let options = CategoryOptions {
            categories: vec![Category::new("Food", "#fff"), Category::new("Pets", "")],
        };

        let output = format_category_list(&options, &Labels::new(Language::En));
        assert!(output.contains("Category"));
        assert!(output.contains("Food"));
        assert!(output.contains("#fff"));
        assert!(output.lines().any(|l| l.contains("Pets") && l.contains('-')));
    }
}
