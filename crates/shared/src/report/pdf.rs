use std::io::BufWriter;

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use crate::config::ReportFormat;

use super::{REPORT_DISCLAIMER, ReportData, ReportRenderError, ReportRenderer, text_or};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const TOP_MM: f32 = 280.0;
const BOTTOM_MARGIN_MM: f32 = 20.0;
const LEFT_MM: f32 = 20.0;
const INDENT_MM: f32 = 25.0;
const BODY_WRAP_CHARS: usize = 95;

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReportRenderer;

impl ReportRenderer for PdfReportRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Pdf
    }

    fn render(&self, report: &ReportData) -> Result<Vec<u8>, ReportRenderError> {
        let title = "Medical Consultation Report";
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportRenderError::Pdf(format!("font error: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportRenderError::Pdf(format!("font error: {e}")))?;

        {
            let mut cursor = PageCursor {
                doc: &doc,
                layer: doc.get_page(page).get_layer(layer),
                y: Mm(TOP_MM),
            };

            cursor.line(title.to_uppercase(), 16.0, LEFT_MM, &bold, 8.0);
            cursor.line(
                format!(
                    "Consultation date: {}",
                    report.consultation_date.format("%Y-%m-%d %H:%M")
                ),
                9.0,
                LEFT_MM,
                &font,
                4.5,
            );
            cursor.line(
                format!("Assistant: {}", report.assistant_name),
                9.0,
                LEFT_MM,
                &font,
                4.5,
            );
            cursor.gap(6.0);

            let patient = &report.patient;
            let patient_lines = [
                format!("Name: {}", patient.display_name()),
                format!(
                    "Age: {}",
                    patient
                        .age
                        .map(|age| age.to_string())
                        .unwrap_or_else(|| "Not provided".to_string())
                ),
                format!("Gender: {}", text_or(patient.gender.as_deref(), "Not provided")),
                format!(
                    "Medical history: {}",
                    text_or(patient.medical_history.as_deref(), "None provided")
                ),
            ];
            cursor.section("PATIENT INFORMATION", &patient_lines, "", &font, &bold);
            cursor.section(
                "SYMPTOMS REPORTED",
                &report.symptoms,
                "No specific symptoms reported.",
                &font,
                &bold,
            );
            cursor.section(
                "POSSIBLE DIAGNOSES",
                &report.diagnoses,
                "No specific diagnosis reached.",
                &font,
                &bold,
            );
            cursor.section(
                "TREATMENT PLAN",
                &report.treatments,
                "No treatments discussed.",
                &font,
                &bold,
            );
            cursor.section(
                "RECOMMENDATIONS",
                &report.recommendations,
                "Follow up with your healthcare provider.",
                &font,
                &bold,
            );

            cursor.line("CONSULTATION SUMMARY", 11.0, LEFT_MM, &bold, 6.0);
            cursor.paragraph(&report.summary, 9.0, &font);
            cursor.gap(6.0);

            cursor.line("IMPORTANT DISCLAIMER", 9.0, LEFT_MM, &bold, 5.0);
            cursor.paragraph(REPORT_DISCLAIMER, 8.0, &font);
        }

        let mut buf = BufWriter::new(Vec::new());
        doc.save(&mut buf)
            .map_err(|e| ReportRenderError::Pdf(format!("save error: {e}")))?;
        buf.into_inner()
            .map_err(|e| ReportRenderError::Pdf(format!("buffer error: {e}")))
    }
}

/// Tracks the write position and starts a new page before running off the bottom.
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: Mm,
}

impl PageCursor<'_> {
    fn line(
        &mut self,
        text: impl Into<String>,
        size: f32,
        x_mm: f32,
        font: &IndirectFontRef,
        advance_mm: f32,
    ) {
        if self.y.0 < BOTTOM_MARGIN_MM {
            let (page, layer) =
                self.doc
                    .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = Mm(TOP_MM);
        }
        self.layer.use_text(text, size, Mm(x_mm), self.y, font);
        self.y -= Mm(advance_mm);
    }

    fn gap(&mut self, mm: f32) {
        self.y -= Mm(mm);
    }

    fn paragraph(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        for line in wrap_text(text, BODY_WRAP_CHARS) {
            self.line(line, size, LEFT_MM, font, 4.5);
        }
    }

    fn section(
        &mut self,
        title: &str,
        items: &[String],
        empty: &str,
        font: &IndirectFontRef,
        bold: &IndirectFontRef,
    ) {
        self.line(title, 11.0, LEFT_MM, bold, 6.0);
        if items.is_empty() && !empty.is_empty() {
            self.line(empty, 9.0, INDENT_MM, font, 4.5);
        }
        for item in items {
            for (index, line) in wrap_text(item, BODY_WRAP_CHARS - 4).into_iter().enumerate() {
                let text = if index == 0 { format!("- {line}") } else { format!("  {line}") };
                self.line(text, 9.0, INDENT_MM, font, 4.5);
            }
        }
        self.gap(4.0);
    }
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{PdfReportRenderer, wrap_text};
    use crate::models::PatientProfile;
    use crate::report::{ReportData, ReportRenderer};

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn renders_a_pdf_document() {
        let report = ReportData {
            patient: PatientProfile::default(),
            consultation_date: Utc::now(),
            symptoms: (0..80).map(|index| format!("symptom {index}")).collect(),
            diagnoses: vec!["Common Cold".to_string()],
            treatments: Vec::new(),
            recommendations: vec!["Rest".to_string()],
            summary: "Short visit.".to_string(),
            assistant_name: "Dr. Smith".to_string(),
        };

        let bytes = PdfReportRenderer.render(&report).expect("pdf renders");
        assert!(bytes.starts_with(b"%PDF"));
    }
}
