//! Workbook adapters: [`excel_write`] materialises sheet tables with
//! `rust_xlsxwriter`, [`excel_read`] parses them back with `calamine`.

pub mod excel_read;
pub mod excel_write;

use std::fs;
use std::path::Path;

use crate::error::Result;

/// Creates the directory that will hold `path`, if it has one.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
