//! DOCX text extraction (docx-rs).
//!
//! Body paragraphs come first, in document order, followed by every table
//! cell (table, row, cell order). Empty paragraphs and blank cells are
//! skipped. Nested tables inside cells are not visited.

use super::{ExtractError, TextExtractor};
use crate::intake::DocumentKind;
use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Docx
    }

    fn extract(&self, data: &[u8]) -> Result<String, ExtractError> {
        let docx = read_docx(data)
            .map_err(|e| ExtractError::ReadFailed(format!("Failed to load DOCX: {}", e)))?;

        let mut paragraphs: Vec<String> = Vec::new();
        let mut cells: Vec<String> = Vec::new();

        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(para) => {
                    let text = paragraph_text(para);
                    if !text.is_empty() {
                        paragraphs.push(text);
                    }
                }
                DocumentChild::Table(table) => collect_cells(table, &mut cells),
                _ => {}
            }
        }

        paragraphs.extend(cells);
        Ok(paragraphs.join("\n"))
    }
}

/// Text of a paragraph: its runs (including hyperlinked runs) concatenated.
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    push_paragraph_children(&para.children, &mut text);
    text
}

fn push_paragraph_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(run, out),
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, out),
            _ => {}
        }
    }
}

fn push_run(run: &Run, out: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}

#[allow(irrefutable_let_patterns)]
fn collect_cells(table: &Table, out: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row else {
            continue;
        };
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell else {
                continue;
            };
            let text = cell
                .children
                .iter()
                .filter_map(|content| match content {
                    TableCellContent::Paragraph(para) => Some(paragraph_text(para)),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n");

            let text = text.trim();
            if !text.is_empty() {
                out.push(text.to_string());
            }
        }
    }
}
