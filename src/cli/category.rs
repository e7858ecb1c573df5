//! Category CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_category_list, Labels};
use crate::error::LedgerResult;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories with their colors
    List,

    /// Add a category
    Add {
        /// Category name
        name: String,
    },

    /// Remove a category (expenses keep their category text)
    Remove {
        /// Category name, any case
        name: String,
    },

    /// Set the display color of a category
    Color {
        /// Category name, any case
        name: String,
        /// "#RGB" or "#RRGGBB"; anything else clears the color
        color: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> LedgerResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let options = service.list()?;
            print!(
                "{}",
                format_category_list(&options, &Labels::new(settings.language))
            );
        }

        CategoryCommands::Add { name } => {
            let category = service.add(&name)?;
            println!("Created category: {}", category.name);
        }

        CategoryCommands::Remove { name } => {
            let category = service.remove(&name)?;
            println!("Removed category: {}", category.name);
        }

        CategoryCommands::Color { name, color } => {
            let category = service.set_color(&name, &color)?;
            if category.has_color() {
                println!("Category '{}' color: {}", category.name, category.color);
            } else {
                println!("Category '{}' color cleared", category.name);
            }
        }
    }

    Ok(())
}
