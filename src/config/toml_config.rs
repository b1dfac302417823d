use crate::core::serializer::XmlOptions;
use crate::core::ConfigProvider;
use crate::domain::mapping::{
    SheetSpec, Template, UnmatchedPolicy, DETAIL_ROW, DETAIL_SHEET, END_MARKER, HEADER_ROW,
    HEADER_SHEET, JOIN_KEY_COLUMN,
};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional settings file. Every section and key may be omitted.
///
/// ```toml
/// [workbook]
/// header_sheet = "Faktur"
/// header_row = 3
///
/// [assembly]
/// unmatched_details = "warn"
///
/// [output]
/// directory = "${HOME}/coretax-out"
/// indent = 2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub workbook: WorkbookConfig,
    pub assembly: AssemblyConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookConfig {
    pub header_sheet: String,
    pub header_row: usize,
    pub detail_sheet: String,
    pub detail_row: usize,
    pub end_marker: String,
    pub join_key: String,
}

impl Default for WorkbookConfig {
    fn default() -> Self {
        Self {
            header_sheet: HEADER_SHEET.to_string(),
            header_row: HEADER_ROW,
            detail_sheet: DETAIL_SHEET.to_string(),
            detail_row: DETAIL_ROW,
            end_marker: END_MARKER.to_string(),
            join_key: JOIN_KEY_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    pub unmatched_details: UnmatchedPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: Option<PathBuf>,
    pub indent: Option<usize>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        let wb = &self.workbook;
        validate_non_empty_string("workbook.header_sheet", &wb.header_sheet)?;
        validate_non_empty_string("workbook.detail_sheet", &wb.detail_sheet)?;
        validate_positive_number("workbook.header_row", wb.header_row, 1)?;
        validate_positive_number("workbook.detail_row", wb.detail_row, 1)?;
        validate_non_empty_string("workbook.end_marker", &wb.end_marker)?;
        validate_non_empty_string("workbook.join_key", &wb.join_key)?;

        if let Some(dir) = &self.output.directory {
            validate_path("output.directory", &dir.to_string_lossy())?;
        }
        if let Some(indent) = self.output.indent {
            validate_range("output.indent", indent, 0, 8)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn template(&self) -> Template {
        let wb = &self.workbook;
        Template {
            header_sheet: SheetSpec::new(wb.header_sheet.trim(), wb.header_row),
            detail_sheet: SheetSpec::new(wb.detail_sheet.trim(), wb.detail_row),
            end_marker: wb.end_marker.trim().to_string(),
            join_key: wb.join_key.trim().to_string(),
            ..Template::coretax()
        }
    }

    fn unmatched_policy(&self) -> UnmatchedPolicy {
        self.assembly.unmatched_details
    }

    fn xml_options(&self) -> XmlOptions {
        XmlOptions {
            indent: self.output.indent.filter(|width| *width > 0),
        }
    }

    fn output_dir(&self) -> Option<&Path> {
        self.output.directory.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
