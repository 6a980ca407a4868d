use crate::domain::model::ReportTable;
use crate::utils::error::{EtlError, Result};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

fn table_to_csv(table: &ReportTable) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

/// 將多張表寫成分段 CSV：`# 表名`、標題列與資料列，之間以空行分隔
pub fn render_sections(tables: &[ReportTable]) -> Result<String> {
    let mut output = String::new();
    for table in tables {
        output.push_str(&format!("# {}\n", table.name));
        output.push_str(&table_to_csv(table)?);
        output.push('\n');
    }
    Ok(output)
}

/// 把多個輸出檔打包成一個 ZIP
pub fn bundle_zip(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, data) in files {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(data)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
