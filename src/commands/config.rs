//! The `config` command.

use crate::commands::ConfigAction;
use crate::error::Result;
use crate::settings::store::ConfigStore;

/// Applies `action` to `store` and returns the text to print.
pub fn handle(action: &ConfigAction, store: &ConfigStore) -> Result<String> {
    match action {
        ConfigAction::Save { name, settings } => {
            store.save(name, settings)?;
            Ok(format!("Saved configuration {}\n", name))
        }
        ConfigAction::Show { name } => {
            let settings = store.load(name)?;
            Ok(toml::to_string_pretty(&settings)?)
        }
        ConfigAction::List => {
            let names = store.list()?;
            Ok(names.iter().map(|name| format!("{}\n", name)).collect())
        }
        ConfigAction::Delete { name } => {
            store.delete(name)?;
            Ok(format!("Deleted configuration {}\n", name))
        }
    }
}
