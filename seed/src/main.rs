use anyhow::Context;
use clap::Parser;
use common::db::establish_connection;
use common::settings::Settings;
use figment::{providers::Serialized, Figment};
use migration::{Migrator, MigratorTrait};
use seed::{FakeDataGenerator, SeedPlan, Seeder};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Create initial data for the application. Idempotent where possible.
#[derive(Parser, Debug)]
#[command(name = "seed")]
struct Cli {
    /// Number of organizations to create [default: 10]
    #[arg(long)]
    orgs: Option<u32>,

    /// Number of students to create [default: 50]
    #[arg(long)]
    students: Option<u32>,

    /// Number of memberships to create [default: 10]
    #[arg(long)]
    members: Option<u32>,
}

impl Cli {
    /// Command-line values override every configuration source.
    fn merge_into(&self, mut figment: Figment) -> Figment {
        if let Some(orgs) = self.orgs {
            figment = figment.merge(Serialized::default("seed.organizations", orgs));
        }
        if let Some(students) = self.students {
            figment = figment.merge(Serialized::default("seed.students", students));
        }
        if let Some(members) = self.members {
            figment = figment.merge(Serialized::default("seed.members", members));
        }
        figment
    }
}

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "seed=debug,common=debug"
    } else {
        "seed=info,common=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings: Settings = cli
        .merge_into(Settings::figment())
        .extract()
        .context("Failed to load settings")?;

    init_tracing(settings.debug);
    tracing::info!("Starting seed...");

    let db = establish_connection(&settings.database)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Running migrations...");
    Migrator::up(&db, None)
        .await
        .context("Failed to apply migrations")?;

    let plan = SeedPlan::from(&settings.seed);
    let generator = FakeDataGenerator::new(settings.seed.rng_seed);
    let mut seeder = Seeder::new(Arc::new(db), generator);

    let mut stdout = std::io::stdout().lock();
    seeder
        .run(&plan, &mut stdout)
        .await
        .context("Seeding failed")?;

    tracing::info!("Seed completed.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use figment::Jail;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn options_are_optional() {
        let cli = Cli::try_parse_from(["seed"]).unwrap();
        assert_eq!(cli.orgs, None);
        assert_eq!(cli.students, None);
        assert_eq!(cli.members, None);
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["seed", "--verbose"]).is_err());
        assert!(Cli::try_parse_from(["seed", "--orgs", "many"]).is_err());
    }

    #[test]
    fn cli_values_override_configuration() {
        Jail::expect_with(|jail| {
            jail.create_file("studentorg.toml", "[seed]\norganizations = 8\nmembers = 9\n")?;
            jail.set_env("STUDENTORG_SEED__STUDENTS", "12");
            let cli = Cli::try_parse_from(["seed", "--orgs", "3", "--students", "5"]).unwrap();

            let settings: Settings = cli.merge_into(Settings::figment()).extract()?;
            let plan = SeedPlan::from(&settings.seed);

            assert_eq!(
                plan,
                SeedPlan {
                    organizations: 3,
                    students: 5,
                    members: 9,
                }
            );
            Ok(())
        });
    }

    #[test]
    fn defaults_match_documented_counts() {
        Jail::expect_with(|_jail| {
            let cli = Cli::try_parse_from(["seed"]).unwrap();

            let settings: Settings = cli.merge_into(Settings::figment()).extract()?;

            assert_eq!(
                SeedPlan::from(&settings.seed),
                SeedPlan {
                    organizations: 10,
                    students: 50,
                    members: 10,
                }
            );
            Ok(())
        });
    }
}
