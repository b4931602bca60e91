use crate::csv_export::export_csv;
use crate::error::{ExportError, Result};
use response_store::FormResponse;
use schema_engine::{Form, FormVersion};
use std::io::Write;
use zip::write::FileOptions;
use zip::ZipWriter;

/// One form's slice of a bulk export: the form, the version its responses
/// were exported against, and the responses themselves.
pub struct FormExport<'a> {
    pub form: &'a Form,
    pub version: &'a FormVersion,
    pub responses: &'a [FormResponse],
}

/// §4.12 bulk export: `form_ids[]` -> an archive of per-form CSVs, one
/// `{slug}.csv` entry per form.
pub fn bulk_csv_archive(exports: &[FormExport<'_>]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for export in exports {
            let csv_text = export_csv(export.version, export.responses)?;
            zip.start_file(format!("{}.csv", export.form.slug), options)
                .map_err(|e| ExportError::Archive(e.to_string()))?;
            zip.write_all(csv_text.as_bytes()).map_err(|e| ExportError::Archive(e.to_string()))?;
        }
        zip.finish().map_err(|e| ExportError::Archive(e.to_string()))?;
    }
    Ok(buffer)
}
