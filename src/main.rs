use clap::Parser;
use coretax_xml::utils::error::ErrorSeverity;
use coretax_xml::utils::{logger, validation::Validate};
use coretax_xml::{CliConfig, EtlEngine, EtlError, InvoicePipeline, TomlConfig};
use std::path::Path;

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn report_error(context: &str, e: &EtlError) {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}: {}", context, e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
}

async fn convert_one(
    input: &Path,
    settings: &TomlConfig,
    dry_run: bool,
    monitor: bool,
) -> Result<(), EtlError> {
    let pipeline = InvoicePipeline::for_input(input, settings);
    let output = pipeline.output_path();
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor);

    if dry_run {
        let outcome = engine.dry_run().await?;
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
        return Ok(());
    }

    let outcome = engine.run().await?;
    println!(
        "✅ {} -> {} ({})",
        input.display(),
        output.display(),
        outcome.report.summary()
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = CliConfig::parse();

    if config.json_log {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting coretax-xml");
    tracing::debug!("CLI config: {:?}", config);

    let settings = match config.validate().and_then(|_| config.resolve()) {
        Ok(settings) => settings,
        Err(e) => {
            report_error("Configuration", &e);
            std::process::exit(exit_code(e.severity()));
        }
    };

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let mut worst: Option<ErrorSeverity> = None;
    for input in &config.inputs {
        if let Err(e) = convert_one(input, &settings, config.dry_run, config.monitor).await {
            report_error(&input.display().to_string(), &e);
            worst = worst.max(Some(e.severity()));
        }
    }

    match worst {
        Some(severity) => {
            let code = exit_code(severity);
            if code > 0 {
                std::process::exit(code);
            }
        }
        None => tracing::info!("✅ All {} workbook(s) converted", config.inputs.len()),
    }
}
