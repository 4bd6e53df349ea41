use crate::config::ReportFormat;

use super::{REPORT_DISCLAIMER, ReportData, ReportRenderError, ReportRenderer, text_or};

const RULE_WIDTH: usize = 60;
const SECTION_RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextReportRenderer;

impl ReportRenderer for TextReportRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }

    fn render(&self, report: &ReportData) -> Result<Vec<u8>, ReportRenderError> {
        Ok(render_text(report).into_bytes())
    }
}

pub(crate) fn render_text(report: &ReportData) -> String {
    let patient = &report.patient;
    let mut out = String::new();

    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push_str("\nMEDICAL CONSULTATION REPORT\n");
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push_str("\n\n");

    section(&mut out, "PATIENT INFORMATION");
    out.push_str(&format!("Name: {}\n", patient.display_name()));
    out.push_str(&format!(
        "Age: {}\n",
        patient
            .age
            .map(|age| age.to_string())
            .unwrap_or_else(|| "Not provided".to_string())
    ));
    out.push_str(&format!(
        "Gender: {}\n",
        text_or(patient.gender.as_deref(), "Not provided")
    ));
    out.push_str(&format!(
        "Contact: {}\n",
        text_or(patient.contact.as_deref(), "Not provided")
    ));
    out.push_str(&format!(
        "Medical History: {}\n",
        text_or(patient.medical_history.as_deref(), "None provided")
    ));
    out.push_str(&format!(
        "Consultation Date: {}\n\n",
        report.consultation_date.format("%Y-%m-%d %H:%M:%S")
    ));

    numbered(
        &mut out,
        "SYMPTOMS REPORTED",
        &report.symptoms,
        "No specific symptoms reported.",
    );
    numbered(
        &mut out,
        "DIAGNOSIS",
        &report.diagnoses,
        "No specific diagnosis reached.",
    );
    numbered(
        &mut out,
        "TREATMENT PLAN",
        &report.treatments,
        "No treatments discussed.",
    );
    numbered(
        &mut out,
        "RECOMMENDATIONS",
        &report.recommendations,
        "Follow up with healthcare provider.",
    );

    section(&mut out, "CONSULTATION SUMMARY");
    out.push_str(&report.summary);
    out.push_str("\n\n");

    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(REPORT_DISCLAIMER);
    out.push_str(&format!(
        "\nGenerated by {} - AI Medical Assistant\n",
        report.assistant_name
    ));
    out
}

fn section(out: &mut String, title: &str) {
    out.push_str(title);
    out.push_str(":\n");
    out.push_str(&"-".repeat(SECTION_RULE_WIDTH));
    out.push('\n');
}

fn numbered(out: &mut String, title: &str, items: &[String], empty: &str) {
    section(out, title);
    if items.is_empty() {
        out.push_str(empty);
        out.push('\n');
    }
    for (index, item) in items.iter().enumerate() {
        out.push_str(&format!("{}. {item}\n", index + 1));
    }
    out.push('\n');
}
