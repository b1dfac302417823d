use crate::config::toml_config::TomlConfig;
use crate::domain::mapping::UnmatchedPolicy;
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extensions, validate_path, Validate};
use clap::Parser;
use std::path::{Path, PathBuf};

pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm"];

const DEFAULT_PRETTY_INDENT: usize = 2;

#[derive(Debug, Clone, Parser)]
#[command(name = "coretax-xml")]
#[command(about = "Convert CoreTax Faktur workbooks into TaxInvoiceBulk XML")]
pub struct CliConfig {
    /// Workbooks to convert; each one produces `<stem>.xml`.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(short, long, help = "Settings file (TOML)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Write XML files here instead of beside each input")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, help = "Indent the XML output")]
    pub pretty: bool,

    #[arg(long, value_enum, help = "Handling of detail rows without a matching invoice")]
    pub unmatched: Option<UnmatchedPolicy>,

    #[arg(long, help = "Accept inputs without an .xlsx/.xlsm extension")]
    pub force: bool,

    #[arg(long, help = "Convert and report without writing any file")]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub json_log: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

impl CliConfig {
    /// Settings file (or defaults) with command-line overrides applied.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::debug!("Loading settings from {}", path.display());
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        if let Some(dir) = &self.output_dir {
            settings.output.directory = Some(dir.clone());
        }
        if self.pretty && settings.output.indent.unwrap_or(0) == 0 {
            settings.output.indent = Some(DEFAULT_PRETTY_INDENT);
        }
        if let Some(policy) = self.unmatched {
            settings.assembly.unmatched_details = policy;
        }

        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        for input in &self.inputs {
            validate_path("inputs", &input.to_string_lossy())?;
        }

        if !self.force {
            let files: Vec<&Path> = self.inputs.iter().map(PathBuf::as_path).collect();
            validate_file_extensions("inputs", &files, WORKBOOK_EXTENSIONS)?;
        }

        if let Some(dir) = &self.output_dir {
            validate_path("output_dir", &dir.to_string_lossy())?;
        }

        Ok(())
    }
}
