//! CSV and PDF export of record collections
//!
//! Rendering delegates to the csv and printpdf crates; this service only
//! flattens records into rows.

use printpdf::{BuiltinFont, Mm, PdfDocument};
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    store::Store,
};

/// Exportable collections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportDataType {
    Books,
    Members,
    Transactions,
    Reservations,
}

impl ExportDataType {
    fn as_str(&self) -> &'static str {
        match self {
            ExportDataType::Books => "books",
            ExportDataType::Members => "members",
            ExportDataType::Transactions => "transactions",
            ExportDataType::Reservations => "reservations",
        }
    }
}

impl std::str::FromStr for ExportDataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "books" => Ok(ExportDataType::Books),
            "members" => Ok(ExportDataType::Members),
            "transactions" => Ok(ExportDataType::Transactions),
            "reservations" => Ok(ExportDataType::Reservations),
            _ => Err(format!("Invalid export data type: {}", s)),
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(format!("Invalid export format: {}", s)),
        }
    }
}

/// A rendered export ready to be served
pub struct Export {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

/// Serialize records to CSV with a header row
pub fn csv_bytes<T: Serialize>(records: &[T]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| AppError::Internal(format!("CSV serialization failed: {}", e)))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV serialization failed: {}", e)))
}

/// Render lines of text into a single-column PDF report
fn pdf_bytes(title: &str, lines: &[String]) -> AppResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(title, Mm(210.0), Mm(297.0), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Internal(format!("PDF rendering failed: {}", e)))?;

    let mut current = doc.get_page(page).get_layer(layer);
    current.use_text(title, 14.0, Mm(15.0), Mm(280.0), &font);

    let mut y = 270.0;
    for line in lines {
        if y < 15.0 {
            let (next_page, next_layer) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
            current = doc.get_page(next_page).get_layer(next_layer);
            y = 280.0;
        }
        current.use_text(line, 10.0, Mm(15.0), Mm(y), &font);
        y -= 6.0;
    }

    doc.save_to_bytes()
        .map_err(|e| AppError::Internal(format!("PDF rendering failed: {}", e)))
}

#[derive(Clone)]
pub struct ExportService {
    store: Store,
}

impl ExportService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Render one collection in the requested format
    pub fn export(&self, data_type: ExportDataType, format: ExportFormat) -> AppResult<Export> {
        let bytes = match format {
            ExportFormat::Csv => match data_type {
                ExportDataType::Books => csv_bytes(&self.store.books.load())?,
                ExportDataType::Members => csv_bytes(&self.store.members.load())?,
                ExportDataType::Transactions => csv_bytes(&self.store.transactions.load())?,
                ExportDataType::Reservations => csv_bytes(&self.store.reservations.load())?,
            },
            ExportFormat::Pdf => {
                let title = format!("Library {} report", data_type.as_str());
                pdf_bytes(&title, &self.pdf_lines(data_type))?
            }
        };

        let (content_type, extension) = match format {
            ExportFormat::Csv => ("text/csv", "csv"),
            ExportFormat::Pdf => ("application/pdf", "pdf"),
        };

        Ok(Export {
            bytes,
            content_type,
            filename: format!("{}.{}", data_type.as_str(), extension),
        })
    }

    fn pdf_lines(&self, data_type: ExportDataType) -> Vec<String> {
        match data_type {
            ExportDataType::Books => self
                .store
                .books
                .load()
                .into_iter()
                .map(|b| format!("{}  {}  by {}  ({} copies)", b.isbn, b.title, b.author, b.quantity))
                .collect(),
            ExportDataType::Members => self
                .store
                .members
                .load()
                .into_iter()
                .map(|m| format!("{}  {}  {}", m.email, m.name, m.phone))
                .collect(),
            ExportDataType::Transactions => self
                .store
                .transactions
                .load()
                .into_iter()
                .map(|t| {
                    let returned = t
                        .return_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "active".to_string());
                    format!(
                        "#{}  {}  {}  borrowed {}  returned {}",
                        t.id, t.book_isbn, t.member_email, t.borrow_date, returned
                    )
                })
                .collect(),
            ExportDataType::Reservations => self
                .store
                .reservations
                .load()
                .into_iter()
                .map(|r| {
                    format!(
                        "#{}  {}  {}  {}  due {}",
                        r.id, r.book_isbn, r.member_email, r.status, r.due_date
                    )
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::Book;

    fn service() -> (ExportService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path()).unwrap();
        store
            .books
            .save(&[Book {
                isbn: "9780306406157".to_string(),
                title: "Physics".to_string(),
                author: "Author".to_string(),
                quantity: 2,
            }])
            .unwrap();
        (ExportService::new(store), dir)
    }

    #[test]
    fn test_csv_export_has_header_and_rows() {
        let (export, _dir) = service();
        let result = export.export(ExportDataType::Books, ExportFormat::Csv).unwrap();
        let text = String::from_utf8(result.bytes).unwrap();
        assert!(text.starts_with("isbn,title,author,quantity"));
        assert!(text.contains("9780306406157,Physics,Author,2"));
        assert_eq!(result.content_type, "text/csv");
        assert_eq!(result.filename, "books.csv");
    }

    #[test]
    fn test_pdf_export_produces_pdf_bytes() {
        let (export, _dir) = service();
        let result = export.export(ExportDataType::Books, ExportFormat::Pdf).unwrap();
        assert!(result.bytes.starts_with(b"%PDF"));
        assert_eq!(result.content_type, "application/pdf");
    }

    #[test]
    fn test_data_type_parsing() {
        assert_eq!("books".parse::<ExportDataType>().unwrap(), ExportDataType::Books);
        assert!("loans".parse::<ExportDataType>().is_err());
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}
