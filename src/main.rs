use clap::Parser;
use museum_survey::config::cli::{Command, LogFormat, SubmitArgs};
use museum_survey::core::notify::{rating_color, sheet_row, SHEET_HEADERS};
use museum_survey::core::submission::{check_endpoint, query_pairs};
use museum_survey::core::BackupStore;
use museum_survey::domain::model::{Language, SurveyResponse};
use museum_survey::utils::error::ErrorSeverity;
use museum_survey::utils::{logger, validation, validation::Validate};
use museum_survey::{
    export_csv, ArtifactGenerator, Cli, LocalStorage, MuseumConfig, NotificationPolicy,
    StorageBackupLog, SurveyError, SurveySubmitter, TemplateCatalog,
};
use std::collections::HashMap;
use std::path::Path;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(),
    }
    tracing::debug!("CLI arguments: {:?}", cli);

    if let Err(e) = run(cli.command).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(command: Command) -> museum_survey::Result<()> {
    match command {
        Command::Generate {
            config,
            output,
            bundle,
            templates,
        } => {
            let config = load_config(&config)?;
            validation::validate_path("output", &output.to_string_lossy())?;

            let catalog = match templates {
                Some(path) => TemplateCatalog::builtin().with_extra_file(path)?,
                None => TemplateCatalog::builtin(),
            };
            let generator = ArtifactGenerator::with_catalog(LocalStorage::new(output), catalog);
            let report = generator.generate(&config, bundle).await?;

            println!("✅ Generated {} files:", report.artifacts.len());
            for path in &report.artifacts {
                println!("   📄 {}", path);
            }
            if let Some(bundle) = report.bundle {
                println!("📦 Bundle: {}", bundle);
            }
        }

        Command::Submit(args) => submit(args).await?,

        Command::Export { backup_dir, output } => {
            let log = StorageBackupLog::new(LocalStorage::new(backup_dir.clone()));
            let entries = log.load_all().await?;
            if entries.is_empty() {
                println!("No backup survey data found in {}", log.location());
                return Ok(());
            }

            let csv = export_csv(&entries)?;
            let output = output.unwrap_or_else(|| {
                backup_dir.join(museum_survey::core::export::export_file_name(
                    chrono::Utc::now().date_naive(),
                ))
            });
            tokio::fs::write(&output, csv).await?;

            tracing::info!("Exported {} backup survey responses", entries.len());
            println!("📁 Exported {} responses to {}", entries.len(), output.display());
        }

        Command::Simulate { config, ratings } => {
            let config = load_config(&config)?;
            let mut response = SurveyResponse::new(config.default_language);
            for pair in &ratings {
                response.ratings.set_from_pair(pair)?;
            }
            simulate(&config, &response);
        }

        Command::TestEndpoint { config } => {
            let config = load_config(&config)?;
            let web_app_url =
                validation::validate_required_field("apps_script_url", &config.apps_script_url)?;

            let check = check_endpoint(&reqwest::Client::new(), web_app_url).await?;
            let mark = if check.is_success() { "✅" } else { "⚠️" };
            println!("{} GET Response status: {}", mark, check.status);
            println!("GET Response text: {}", check.body);
        }

        Command::Status { config, backup_dir } => {
            let config = load_config(&config)?;
            let log = StorageBackupLog::new(LocalStorage::new(backup_dir));
            let backups = log.load_all().await?;

            println!("Survey integration status:");
            println!("  - Museum: {}", config.museum_name());
            println!(
                "  - Apps Script: {}",
                config.apps_script_url.as_deref().unwrap_or("(not configured)")
            );
            println!(
                "  - Google Sheet ID: {}",
                config.google_sheet_id.as_deref().unwrap_or("(not configured)")
            );
            println!("  - Backup log: {}", log.location());
            println!("  - Backup responses stored: {}", backups.len());
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> museum_survey::Result<MuseumConfig> {
    tracing::info!("📁 Loading configuration from: {}", path.display());
    let config = MuseumConfig::from_file(path)?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");
    Ok(config)
}

async fn submit(args: SubmitArgs) -> museum_survey::Result<()> {
    args.validate()?;
    let config = load_config(&args.config)?;
    let web_app_url = validation::validate_required_field("apps_script_url", &config.apps_script_url)?;

    let response = args.to_response(config.default_language)?;
    if !response.has_ratings() {
        eprintln!("{}", Language::missing_ratings_alert());
    }

    let backup = StorageBackupLog::new(LocalStorage::new(args.backup_dir.clone()));
    let submitter = SurveySubmitter::new(web_app_url.clone(), backup);

    match submitter.submit(&response).await {
        Ok(receipt) => {
            println!("{}", receipt.notice);
            tracing::info!("Backend: {}", receipt.message);
            Ok(())
        }
        Err(e @ SurveyError::ValidationError { .. }) => Err(e),
        Err(e @ SurveyError::BackupFailed { .. }) => {
            eprintln!("{}", response.language.submission_error_notice());
            Err(e)
        }
        Err(e) => {
            eprintln!("{}", response.language.submission_error_notice());
            eprintln!("📁 Backup log: {}", submitter.backup().location());
            Err(e)
        }
    }
}

fn simulate(config: &MuseumConfig, response: &SurveyResponse) {
    let params: HashMap<String, String> = query_pairs(response)
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

    let timestamp = response.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
    println!("Sheet row:");
    for (header, cell) in SHEET_HEADERS.iter().zip(sheet_row(&timestamp, &params)) {
        println!("  {:<22} {}", header, cell);
    }

    let policy = NotificationPolicy::from_config(config);
    match policy.evaluate_params(&params) {
        Some(notification) => {
            println!("Email ({:?}, priority {}):", notification.level, notification.level.priority());
            println!("  Subject:    {}", notification.subject);
            println!("  Recipients: {}", notification.recipients.join(","));
            println!(
                "  Average:    {:.1}/5.0 ({})",
                notification.average_rating,
                rating_color(notification.average_rating, config.low_rating_threshold)
            );
            for question in &notification.low_ratings {
                println!("  🚨 Low rating: {}", question.label());
            }
        }
        None => println!("No email: alerts-only mode and no rating at or below the threshold"),
    }
}
