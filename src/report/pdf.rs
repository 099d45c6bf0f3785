//! PDF rendering of per-employee overtime reports.

use std::fs;
use std::path::{Path, PathBuf};

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use rust_decimal::Decimal;
use tracing::info;

use super::ReportEmitter;
use crate::calculation::{format_amount, format_duration, overtime_amount};
use crate::error::{EngineError, EngineResult};
use crate::models::{AccessEvent, EmployeeOvertimeResult, ReportRange};

const TITLE: &str = "Extra Hours Access Report";
const HEADERS: [&str; 4] = ["Entry", "Exit", "Duration", "Amount"];
/// Share of the table width given to each column.
const COLUMN_SHARES: [f32; 4] = [0.30, 0.30, 0.18, 0.22];
const SIGNATURES: [&str; 2] = ["Supervisor", "Human Resources"];
/// Vertical space needed below the table for the notes and signature lines.
const FOOTER_HEIGHT: f32 = 150.0;

/// Encodes text for the WinAnsi-encoded standard font.
///
/// Latin-1 characters map to their own byte; anything else becomes `?`.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn format_event(event: &AccessEvent) -> String {
    let stamp = event.timestamp.format("%d/%m/%Y %H:%M:%S").to_string();
    if event.synthetic {
        format!("{} *", stamp)
    } else {
        stamp
    }
}

/// Everything printed on one employee's report.
struct ReportContent {
    details: Vec<String>,
    rows: Vec<Vec<String>>,
    total: Vec<String>,
    notes: Vec<String>,
    employee_name: String,
}

impl ReportContent {
    fn build(
        range: &ReportRange,
        result: &EmployeeOvertimeResult,
        hourly_rate: Decimal,
        narrative_log: Option<&Path>,
    ) -> Self {
        let rows = result
            .spans
            .iter()
            .map(|span| {
                vec![
                    format_event(&span.entry),
                    format_event(&span.exit),
                    format_duration(span.duration_secs),
                    format_amount(overtime_amount(span.duration_secs, hourly_rate)),
                ]
            })
            .collect();

        let total_seconds = result.total_seconds();
        let total = vec![
            "Total".to_string(),
            String::new(),
            format_duration(total_seconds),
            format_amount(overtime_amount(total_seconds, hourly_rate)),
        ];

        let mut details = vec![format!("Employee: {}", result.employee.name)];
        if !result.employee.registration.is_empty() {
            details.push(format!("Registration: {}", result.employee.registration));
        }
        details.push(format!("Period: {}", range));

        let mut notes = vec!["* event placed at an extra-hours window boundary".to_string()];
        if let Some(path) = narrative_log {
            notes.push(format!(
                "Calculation details are in the log: {}",
                path.display()
            ));
        }

        Self {
            details,
            rows,
            total,
            notes,
            employee_name: result.employee.name.clone(),
        }
    }
}

/// A single-font A4 document with hand-managed object ids.
struct PdfDocument {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    font_id: Ref,
    page_refs: Vec<Ref>,
    current_content_id: Option<Ref>,
    next_id: i32,

    page_w: f32,
    page_h: f32,
    margin: f32,
    row_h: f32,

    font_size: f32,
    header_font_size: f32,
    title_font_size: f32,
}

impl PdfDocument {
    fn new() -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            font_id,
            page_refs: Vec::new(),
            current_content_id: None,
            next_id: 4,

            page_w: 595.0,
            page_h: 842.0,
            margin: 50.0,
            row_h: 20.0,

            font_size: 10.0,
            header_font_size: 11.0,
            title_font_size: 16.0,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    fn new_page(&mut self) -> Content {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();

        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
            .contents(content_id);
        page.resources().fonts().pair(Name(b"F1"), self.font_id);

        self.current_content_id = Some(content_id);

        Content::new()
    }

    fn finalize_page(&mut self, content: Content) {
        if let Some(id) = self.current_content_id.take() {
            self.pdf.stream(id, &content.finish());
        }
    }

    fn draw_text(&self, content: &mut Content, x: f32, y: f32, size: f32, text: &str) {
        let bytes = encode_text(text);
        content.begin_text();
        content.set_font(Name(b"F1"), size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&bytes));
        content.end_text();
    }

    fn fill_band(&self, content: &mut Content, y: f32, width: f32, gray: f32) {
        content.save_state();
        content.set_fill_rgb(gray, gray, gray);
        content.rect(self.margin, y, width, self.row_h);
        content.fill_nonzero();
        content.restore_state();
    }

    fn draw_row(&self, content: &mut Content, y: f32, widths: &[f32], row: &[String], size: f32) {
        let mut x = self.margin;

        for (text, w) in row.iter().zip(widths) {
            self.draw_text(content, x + 4.0, y + 6.0, size, text);
            content.save_state();
            content.set_stroke_rgb(0.0, 0.0, 0.0);
            content.rect(x, y, *w, self.row_h);
            content.stroke();
            content.restore_state();
            x += w;
        }
    }

    /// Draws the title, page number and employee details; returns the next free y.
    fn draw_page_header(&self, content: &mut Content, details: &[String], page: usize) -> f32 {
        let mut y = self.page_h - self.margin;
        self.draw_text(content, self.margin, y, self.title_font_size, TITLE);

        let page_label = format!("Page {}", page);
        self.draw_text(
            content,
            self.page_w - self.margin - 40.0,
            self.margin - 30.0,
            self.font_size,
            &page_label,
        );

        y -= 30.0;
        for line in details {
            self.draw_text(content, self.margin, y, self.header_font_size, line);
            y -= 16.0;
        }

        y - 20.0
    }

    fn table_header(&self, content: &mut Content, y: f32, widths: &[f32]) {
        let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
        self.fill_band(content, y, widths.iter().sum(), 0.95);
        self.draw_row(content, y, widths, &header, self.header_font_size);
    }

    fn draw_footer(&self, content: &mut Content, mut y: f32, notes: &[String], employee: &str) {
        for note in notes {
            self.draw_text(content, self.margin, y, self.font_size, note);
            y -= 16.0;
        }

        y -= 60.0;
        let labels: Vec<&str> = std::iter::once(employee).chain(SIGNATURES).collect();
        let slot = (self.page_w - 2.0 * self.margin) / labels.len() as f32;

        for (i, label) in labels.iter().enumerate() {
            let x = self.margin + slot * i as f32;
            content.save_state();
            content.set_line_width(0.8);
            content.move_to(x + 10.0, y);
            content.line_to(x + slot - 10.0, y);
            content.stroke();
            content.restore_state();
            self.draw_text(content, x + 10.0, y - 14.0, self.font_size, label);
        }
    }

    /// Lays out the report, paginating the table when it overflows.
    fn write_report(&mut self, report: &ReportContent) {
        let table_w = self.page_w - 2.0 * self.margin;
        let widths: Vec<f32> = COLUMN_SHARES.iter().map(|s| s * table_w).collect();

        let mut remaining: &[Vec<String>] = &report.rows;
        let mut page = 1;
        let mut content = self.new_page();
        let mut y = self.draw_page_header(&mut content, &report.details, page);

        self.table_header(&mut content, y, &widths);
        y -= self.row_h;

        while !remaining.is_empty() {
            if y - self.row_h < self.margin {
                self.finalize_page(content);
                page += 1;
                content = self.new_page();
                y = self.draw_page_header(&mut content, &report.details, page);
                self.table_header(&mut content, y, &widths);
                y -= self.row_h;
            }

            self.draw_row(&mut content, y, &widths, &remaining[0], self.font_size);
            y -= self.row_h;
            remaining = &remaining[1..];
        }

        if y - self.row_h < self.margin {
            self.finalize_page(content);
            page += 1;
            content = self.new_page();
            y = self.draw_page_header(&mut content, &report.details, page);
        }
        self.fill_band(&mut content, y, table_w, 0.95);
        self.draw_row(&mut content, y, &widths, &report.total, self.header_font_size);
        y -= self.row_h + 24.0;

        if y - FOOTER_HEIGHT < self.margin {
            self.finalize_page(content);
            page += 1;
            content = self.new_page();
            y = self.draw_page_header(&mut content, &report.details, page);
        }
        self.draw_footer(&mut content, y, &report.notes, &report.employee_name);

        self.finalize_page(content);
    }

    fn finish(mut self) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        let mut pages = self.pdf.pages(self.pages_id);
        pages.count(self.page_refs.len() as i32);
        pages.kids(self.page_refs.iter().copied());
        drop(pages);
        self.pdf.finish()
    }
}

/// Writes one A4 PDF per employee under `{reports_dir}/{start}_to_{end}/`.
///
/// # Example
///
/// ```no_run
/// use overtime_engine::report::PdfReportEmitter;
/// use rust_decimal::Decimal;
///
/// let emitter = PdfReportEmitter::new("./RELATORIOS/reports", Decimal::new(1500, 2));
/// ```
#[derive(Debug, Clone)]
pub struct PdfReportEmitter {
    reports_dir: PathBuf,
    hourly_rate: Decimal,
}

impl PdfReportEmitter {
    /// Creates an emitter writing under `reports_dir` and pricing at `hourly_rate`.
    pub fn new(reports_dir: impl Into<PathBuf>, hourly_rate: Decimal) -> Self {
        Self {
            reports_dir: reports_dir.into(),
            hourly_rate,
        }
    }

    /// Renders the report to bytes without touching the filesystem.
    pub fn render(
        &self,
        range: &ReportRange,
        result: &EmployeeOvertimeResult,
        narrative_log: Option<&Path>,
    ) -> Vec<u8> {
        let content = ReportContent::build(range, result, self.hourly_rate, narrative_log);
        let mut document = PdfDocument::new();
        document.write_report(&content);
        document.finish()
    }
}

impl ReportEmitter for PdfReportEmitter {
    fn emit(
        &self,
        range: &ReportRange,
        result: &EmployeeOvertimeResult,
        narrative_log: Option<&Path>,
    ) -> EngineResult<PathBuf> {
        let dir = self.reports_dir.join(range.file_stem());
        fs::create_dir_all(&dir).map_err(|e| EngineError::io(&dir, e))?;

        let path = dir.join(format!("{}.pdf", result.employee.file_stem()));
        let bytes = self.render(range, result, narrative_log);
        fs::write(&path, bytes).map_err(|e| EngineError::io(&path, e))?;

        info!(
            employee_id = result.employee.id,
            path = %path.display(),
            "Employee {} - {} report written",
            result.employee.id,
            result.employee.name
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, Employee, WorkedSpan};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::str::FromStr;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn week() -> ReportRange {
        ReportRange::weekly_ending_before(NaiveDate::from_ymd_opt(2026, 1, 19).unwrap())
    }

    fn result_with(spans: Vec<WorkedSpan>) -> EmployeeOvertimeResult {
        EmployeeOvertimeResult {
            employee: Employee {
                id: 42,
                registration: "0042".to_string(),
                name: "João da Silva".to_string(),
            },
            spans,
        }
    }

    fn span(entry: &str, exit: &str, synthetic_exit: bool) -> WorkedSpan {
        let exit_event = if synthetic_exit {
            AccessEvent::synthetic(make_datetime(exit), Direction::Exit)
        } else {
            AccessEvent::new(make_datetime(exit), Direction::Exit)
        };
        WorkedSpan::between(
            AccessEvent::new(make_datetime(entry), Direction::Entry),
            exit_event,
        )
        .unwrap()
    }

    fn rate() -> Decimal {
        Decimal::from_str("15").unwrap()
    }

    #[test]
    fn test_encode_text_latin1() {
        assert_eq!(encode_text("João"), vec![b'J', b'o', 0xE3, b'o']);
        assert_eq!(encode_text("€"), vec![b'?']);
    }

    #[test]
    fn test_synthetic_events_marked() {
        let result = result_with(vec![span("2026-01-14 22:10:00", "2026-01-14 23:59:00", true)]);
        let content = ReportContent::build(&week(), &result, rate(), None);

        assert_eq!(content.rows[0][0], "14/01/2026 22:10:00");
        assert_eq!(content.rows[0][1], "14/01/2026 23:59:00 *");
        assert_eq!(content.rows[0][2], "01:49:00");
    }

    #[test]
    fn test_total_row_prices_total_duration() {
        let result = result_with(vec![
            span("2026-01-12 09:30:00", "2026-01-12 10:15:00", false),
            span("2026-01-13 09:00:00", "2026-01-13 09:00:50", false),
        ]);
        let content = ReportContent::build(&week(), &result, rate(), None);

        // 2750 s at 15/h = 11.4583...
        assert_eq!(content.total[2], "00:45:50");
        assert_eq!(content.total[3], "R$ 11,46");
        assert_eq!(content.rows[0][3], "R$ 11,25");
    }

    #[test]
    fn test_log_path_referenced_when_present() {
        let result = result_with(vec![span("2026-01-12 09:30:00", "2026-01-12 10:15:00", false)]);
        let log = PathBuf::from("logs/2026-01-12_to_2026-01-18.txt");
        let content = ReportContent::build(&week(), &result, rate(), Some(&log));

        assert!(content.notes.iter().any(|n| n.contains("2026-01-12_to_2026-01-18.txt")));
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let result = result_with(vec![span("2026-01-12 09:30:00", "2026-01-12 10:15:00", false)]);
        let emitter = PdfReportEmitter::new("unused", rate());

        let bytes = emitter.render(&week(), &result, None);

        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_long_report_paginates() {
        let spans = (0..80)
            .map(|_| span("2026-01-12 09:30:00", "2026-01-12 10:15:00", false))
            .collect();
        let emitter = PdfReportEmitter::new("unused", rate());

        let bytes = emitter.render(&week(), &result_with(spans), None);
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.contains("/Count 3") || text.contains("/Count 4"));
    }

    #[test]
    fn test_emit_writes_under_range_folder() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = PdfReportEmitter::new(dir.path(), rate());
        let result = result_with(vec![span("2026-01-12 09:30:00", "2026-01-12 10:15:00", false)]);

        let path = emitter.emit(&week(), &result, None).unwrap();

        assert_eq!(
            path,
            dir.path()
                .join("2026-01-12_to_2026-01-18")
                .join("42_João_da_Silva.pdf")
        );
        assert!(path.exists());
    }
}
