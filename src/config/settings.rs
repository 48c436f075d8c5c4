use crate::domain::ByeSelection;

const DEFAULT_DATABASE_PATH: &str = "swiss_tournament.db";

/// Values new tournaments start with
#[derive(Debug, Clone)]
pub struct DefaultsSettings {
    pub avoid_rematches: bool,
    pub bye_selection: ByeSelection,
}

impl Default for DefaultsSettings {
    fn default() -> Self {
        Self {
            avoid_rematches: true,
            bye_selection: ByeSelection::Worst,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: String,
    pub defaults: DefaultsSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    /// Defaults, with `DATABASE_PATH` taken from the environment when set
    pub fn new() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string()),
            defaults: DefaultsSettings::default(),
        }
    }

    pub fn with_database_path(mut self, database_path: impl Into<String>) -> Self {
        self.database_path = database_path.into();
        self
    }
}
