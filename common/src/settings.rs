use dotenvy::dotenv;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides, e.g. `STUDENTORG_SEED__STUDENTS=100`.
pub const ENV_PREFIX: &str = "STUDENTORG_";

/// Names an extra TOML file merged after the standard locations.
pub const CONFIG_PATH_ENV: &str = "STUDENTORG_CONFIG_PATH";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    pub database: DatabaseSettings,
    #[serde(default)]
    pub seed: SeedSettings,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DatabaseSettings {
    pub url: String,
    /// Echo every SQL statement through the log.
    #[serde(default)]
    pub log_statements: bool,
}

/// How many rows the seed command attempts per step.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SeedSettings {
    pub organizations: u32,
    pub students: u32,
    pub members: u32,
    /// Fixes the random generator so repeated runs produce the same data.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            organizations: 10,
            students: 50,
            members: 10,
            rng_seed: None,
        }
    }
}

impl Settings {
    /// Layered configuration sources, lowest priority first. Callers may
    /// merge further providers (command-line values) before extracting.
    pub fn figment() -> Figment {
        dotenv().ok();

        let mut figment = Figment::from(Serialized::defaults(Settings::default_settings()));

        // 1. System Config
        figment = figment.merge(Toml::file("/etc/studentorg/config.toml"));

        // 2. User Config
        if let Some(config_dir) = dirs::config_dir() {
            figment = figment.merge(Toml::file(config_dir.join("studentorg/config.toml")));
        }

        // 3. Local Config
        figment = figment.merge(Toml::file("studentorg.toml"));

        // 4. Explicit Config File
        if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
            figment = figment.merge(Toml::file(config_path));
        }

        // 5. Environment Variables
        figment = figment.merge(
            Env::raw()
                .only(&["DATABASE_URL"])
                .map(|_| "database.url".into()),
        );
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    #[allow(clippy::result_large_err)]
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn default_settings() -> Settings {
        Settings {
            database: DatabaseSettings {
                url: "sqlite://studentorg.db?mode=rwc".to_string(),
                log_statements: false,
            },
            seed: SeedSettings::default(),
            debug: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_sources() {
        Jail::expect_with(|_jail| {
            let settings = Settings::new()?;
            assert_eq!(settings.seed, SeedSettings::default());
            assert_eq!(settings.database.url, "sqlite://studentorg.db?mode=rwc");
            assert!(!settings.debug);
            Ok(())
        });
    }

    #[test]
    fn local_file_is_overridden_by_environment() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "studentorg.toml",
                r#"
                debug = true

                [seed]
                organizations = 3
                students = 5
                members = 4
                rng_seed = 42
                "#,
            )?;
            jail.set_env("STUDENTORG_SEED__STUDENTS", "7");

            let settings = Settings::new()?;
            assert!(settings.debug);
            assert_eq!(settings.seed.organizations, 3);
            assert_eq!(settings.seed.students, 7);
            assert_eq!(settings.seed.members, 4);
            assert_eq!(settings.seed.rng_seed, Some(42));
            Ok(())
        });
    }

    #[test]
    fn database_url_reads_standard_variable() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "postgres://localhost/studentorg");

            let settings = Settings::new()?;
            assert_eq!(settings.database.url, "postgres://localhost/studentorg");
            Ok(())
        });
    }

    #[test]
    fn prefixed_database_url_wins_over_standard_variable() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "postgres://localhost/ignored");
            jail.set_env("STUDENTORG_DATABASE__URL", "sqlite::memory:");

            let settings = Settings::new()?;
            assert_eq!(settings.database.url, "sqlite::memory:");
            Ok(())
        });
    }

    #[test]
    fn explicit_config_path_is_merged() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[seed]\nmembers = 25\n")?;
            jail.set_env(CONFIG_PATH_ENV, "custom.toml");

            let settings = Settings::new()?;
            assert_eq!(settings.seed.members, 25);
            assert_eq!(settings.seed.organizations, 10);
            Ok(())
        });
    }
}
