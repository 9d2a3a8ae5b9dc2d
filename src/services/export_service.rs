use std::borrow::Cow;

use rust_xlsxwriter::*;

use crate::error::Result;
use crate::models::applicant::{Applicant, ApplicationStatus};
use crate::utils::time::local_date_label;

pub const COLUMNS: [&str; 9] = [
    "Name",
    "Email",
    "Phone",
    "City",
    "Age",
    "Education",
    "Status",
    "Registration",
    "Date",
];

pub struct ExportService;

impl ExportService {
    fn row(applicant: &Applicant) -> [String; 9] {
        [
            applicant.full_name.clone(),
            applicant.email.clone(),
            applicant.phone.clone(),
            applicant.city.clone(),
            applicant.age.clone(),
            applicant.education.clone(),
            applicant.status.to_string(),
            if applicant.registration_completed { "Yes" } else { "No" }.to_string(),
            applicant
                .created_at
                .map(local_date_label)
                .unwrap_or_else(|| "N/A".to_string()),
        ]
    }

    /// Quotes a field when it contains a delimiter, quote or line break;
    /// embedded quotes are doubled (RFC 4180).
    fn escape_csv(field: &str) -> Cow<'_, str> {
        if field.contains([',', '"', '\r', '\n']) {
            Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
        } else {
            Cow::Borrowed(field)
        }
    }

    pub fn applicants_csv<'a, I>(applicants: I) -> String
    where
        I: IntoIterator<Item = &'a Applicant>,
    {
        let mut out = COLUMNS.join(",");
        out.push_str("\r\n");
        for applicant in applicants {
            let row = Self::row(applicant);
            let line = row
                .iter()
                .map(|f| Self::escape_csv(f))
                .collect::<Vec<_>>()
                .join(",");
            out.push_str(&line);
            out.push_str("\r\n");
        }
        out
    }

    /// `<owner>_Applications.<ext>`, with characters unsafe in a
    /// Content-Disposition filename replaced.
    pub fn filename(owner: Option<&str>, extension: &str) -> String {
        let owner = owner.map(str::trim).filter(|o| !o.is_empty()).unwrap_or("Reference");
        let safe: String = owner
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("{}_Applications.{}", safe, extension)
    }

    fn status_color(status: ApplicationStatus) -> Color {
        match status {
            ApplicationStatus::New => Color::RGB(0x1F2937),
            ApplicationStatus::Applied => Color::RGB(0x1E40AF),
            ApplicationStatus::Shortlisted => Color::RGB(0x92400E),
            ApplicationStatus::InterviewScheduled => Color::RGB(0x6B21A8),
            ApplicationStatus::Hired => Color::RGB(0x166534),
            ApplicationStatus::Rejected => Color::RGB(0x991B1B),
        }
    }

    /// Styled workbook with the same columns as the CSV export.
    pub fn applicants_xlsx<'a, I>(applicants: I, title: &str) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = &'a Applicant>,
    {
        let applicants: Vec<&Applicant> = applicants.into_iter().collect();

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Applications")?;

        let header_bg = Color::RGB(0x0F172A);
        let border_color = Color::RGB(0xE2E8F0);
        let widths = [28.0, 30.0, 16.0, 16.0, 8.0, 20.0, 20.0, 14.0, 14.0];
        for (i, width) in widths.iter().enumerate() {
            worksheet.set_column_width(i as u16, *width)?;
        }

        let title_format = Format::new()
            .set_font_size(14)
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(header_bg)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);
        worksheet.set_row_height(0, 32)?;
        worksheet.merge_range(0, 0, 0, (COLUMNS.len() - 1) as u16, title, &title_format)?;

        let header_format = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(0x1E293B))
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        for (i, name) in COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(1, i as u16, *name, &header_format)?;
        }

        for (idx, applicant) in applicants.iter().enumerate() {
            let row = 2 + idx as u32;
            let bg = if idx % 2 == 0 { Color::RGB(0xF8FAFC) } else { Color::White };
            let cell = Format::new()
                .set_font_size(10)
                .set_background_color(bg)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            let status_cell = cell
                .clone()
                .set_bold()
                .set_font_color(Self::status_color(applicant.status));

            for (col, value) in Self::row(applicant).iter().enumerate() {
                let format = if col == 6 { &status_cell } else { &cell };
                worksheet.write_string_with_format(row, col as u16, value, format)?;
            }
        }

        worksheet.set_freeze_panes(2, 0)?;
        Ok(workbook.save_to_buffer()?)
    }
}
