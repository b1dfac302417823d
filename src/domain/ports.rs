use crate::core::serializer::XmlOptions;
use crate::domain::mapping::{Template, UnmatchedPolicy};
use crate::domain::model::{CellValue, Conversion, SourceTables};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// A rectangular grid of cells addressed by 1-based row number.
pub trait SheetSource {
    fn name(&self) -> &str;

    /// Cells of the given 1-based row, `None` past the last row.
    fn row(&self, index: usize) -> Option<&[CellValue]>;

    fn row_count(&self) -> usize;
}

pub trait ConfigProvider: Send + Sync {
    fn template(&self) -> Template;
    fn unmatched_policy(&self) -> UnmatchedPolicy;
    fn xml_options(&self) -> XmlOptions;
    fn output_dir(&self) -> Option<&Path>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceTables>;
    async fn transform(&self, tables: SourceTables) -> Result<Conversion>;
    async fn load(&self, conversion: Conversion) -> Result<String>;
}
