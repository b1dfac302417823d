pub mod assembly;
pub mod convert;
pub mod etl;
pub mod normalize;
pub mod pipeline;
pub mod reader;
pub mod serializer;

pub use crate::domain::model::{Conversion, SourceTables};
pub use crate::domain::ports::{ConfigProvider, Pipeline, SheetSource, Storage};
pub use crate::utils::error::Result;
