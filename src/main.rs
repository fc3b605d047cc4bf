use anyhow::Result;
use stickerdl::{
    CatalogOrganizer, Choice, DownloadStats, Error, HttpSource, LogSettings, Settings, TreeMirror,
    menu,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let settings = Settings::load()?;
    init_tracing(&settings.log);

    let choice = match menu::prompt_stdin() {
        Ok(choice) => choice,
        Err(Error::InvalidChoice(input)) => {
            info!(input = %input, "rejected menu selection");
            println!("Invalid choice!");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if choice.runs_mirror() {
        if choice == Choice::Both {
            println!("\n--- Method 1: Direct GitHub ---");
        }

        let source = HttpSource::new(&settings.mirror.user_agent)?;
        let mirror = TreeMirror::new(source, settings.mirror.clone());
        let report = mirror.run().await?;

        println!("\n✅ Download completed successfully!");
        println!(
            "{} downloaded, {} skipped, {} failed, {} ignored",
            report.downloaded, report.skipped, report.failed, report.ignored
        );

        let stats = DownloadStats::collect(mirror.download_dir(), &settings.mirror.extension);
        println!("\nStats: {stats}");
    }

    if choice.runs_catalog() {
        if choice == Choice::Both {
            println!("\n--- Method 2: API Organized ---");
        }

        let source = HttpSource::new(&settings.catalog.user_agent)?;
        let organizer = CatalogOrganizer::new(source, settings.catalog.clone());
        let report = organizer.run().await?;

        println!(
            "\n✅ Successfully downloaded {} stickers into {} categories ({} skipped, {} failed)",
            report.downloaded, report.categories, report.skipped, report.failed
        );
    }

    Ok(())
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(log: &LogSettings) {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match log.level.parse::<EnvFilter>() {
            Ok(filter) => filter,
            Err(e) => {
                eprintln!(
                    "WARN: log level '{}' is not a valid tracing filter ({}); falling back to 'info'",
                    log.level, e
                );
                EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    if log.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
