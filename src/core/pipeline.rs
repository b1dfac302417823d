use crate::adapters::storage::LocalStorage;
use crate::adapters::workbook::Workbook;
use crate::core::convert::{convert_tables, output_path_for, read_tables, ConvertOptions};
use crate::core::{ConfigProvider, Conversion, Pipeline, SourceTables, Storage};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Converts one workbook file and writes the XML through a [`Storage`].
pub struct InvoicePipeline<S: Storage> {
    storage: S,
    input: PathBuf,
    output_name: String,
    options: ConvertOptions,
}

impl<S: Storage> InvoicePipeline<S> {
    pub fn new(
        storage: S,
        input: impl Into<PathBuf>,
        output_name: impl Into<String>,
        options: ConvertOptions,
    ) -> Self {
        Self {
            storage,
            input: input.into(),
            output_name: output_name.into(),
            options,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }
}

impl InvoicePipeline<LocalStorage> {
    /// Pipeline writing `<stem>.xml` beside the input, or into the configured output folder.
    pub fn for_input<C: ConfigProvider>(input: &Path, config: &C) -> Self {
        let output = output_path_for(input, config.output_dir());
        let base = output
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let name = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output.xml".to_string());

        let options = ConvertOptions {
            template: config.template(),
            unmatched: config.unmatched_policy(),
            xml: config.xml_options(),
        };

        Self::new(LocalStorage::new(base), input, name, options)
    }

    pub fn output_path(&self) -> PathBuf {
        self.storage.base_path().join(&self.output_name)
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for InvoicePipeline<S> {
    async fn extract(&self) -> Result<SourceTables> {
        tracing::info!("📥 Reading workbook {}", self.input.display());
        let data = tokio::fs::read(&self.input).await?;

        let mut workbook = Workbook::from_bytes(data)?;
        let tables = read_tables(&mut workbook, &self.options.template)?;

        tracing::info!(
            "📊 Extracted {} invoice rows and {} detail rows",
            tables.headers.len(),
            tables.details.len()
        );
        Ok(tables)
    }

    async fn transform(&self, tables: SourceTables) -> Result<Conversion> {
        tracing::info!("🔧 Assembling invoices");
        let conversion = convert_tables(&tables, &self.options)?;
        tracing::info!("✅ {}", conversion.report.summary());
        Ok(conversion)
    }

    async fn load(&self, conversion: Conversion) -> Result<String> {
        tracing::debug!(
            "Writing {} bytes of XML as {}",
            conversion.xml.len(),
            self.output_name
        );
        self.storage
            .write_file(&self.output_name, &conversion.xml)
            .await?;
        Ok(self.output_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Row;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().unwrap().get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn tables() -> SourceTables {
        SourceTables {
            headers: vec![Row::new()
                .with("Baris", "1")
                .with("ID TKU Penjual", "0123456789012345000000")],
            details: vec![Row::new().with("Baris", "1").with("Harga Satuan", "5000")],
        }
    }

    #[tokio::test]
    async fn test_transform_and_load() {
        let storage = MockStorage::default();
        let pipeline = InvoicePipeline::new(
            storage.clone(),
            "faktur.xlsx",
            "faktur.xml",
            ConvertOptions::default(),
        );

        let conversion = pipeline.transform(tables()).await.unwrap();
        assert_eq!(conversion.report.line_items, 1);
        assert_eq!(conversion.document.tin, "0123456789012345");

        let written = pipeline.load(conversion).await.unwrap();
        assert_eq!(written, "faktur.xml");

        let xml = String::from_utf8(storage.get_file("faktur.xml").unwrap()).unwrap();
        assert!(xml.contains("<Price>5000.00</Price>"));
    }

    #[test]
    fn test_for_input_uses_settings() {
        let mut settings = crate::config::TomlConfig::default();
        settings.output.directory = Some(PathBuf::from("/srv/xml"));
        settings.output.indent = Some(4);

        let pipeline = InvoicePipeline::for_input(Path::new("/data/Maret.xlsx"), &settings);

        assert_eq!(pipeline.input(), Path::new("/data/Maret.xlsx"));
        assert_eq!(pipeline.output_path(), PathBuf::from("/srv/xml/Maret.xml"));
        assert_eq!(pipeline.options().xml.indent, Some(4));
    }

    #[tokio::test]
    async fn test_extract_missing_file_is_io_error() {
        let pipeline = InvoicePipeline::new(
            MockStorage::default(),
            "/definitely/not/here.xlsx",
            "here.xml",
            ConvertOptions::default(),
        );
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, crate::utils::error::EtlError::IoError(_)));
    }
}
