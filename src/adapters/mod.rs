// Adapters layer: concrete implementations for external systems (workbook files, output storage).

pub mod storage;
pub mod workbook;
