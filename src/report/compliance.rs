use crate::answers::ChecklistAnswer;
use crate::document::{ChecklistItem, NodeData};
use crate::traversal::{CapturedAnswers, HistoryEntry};
use chrono::{Local, NaiveDateTime};

/// Answers for one checklist visit, one line per item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceSection {
    pub label: String,
    pub lines: Vec<String>,
}

/// The compliance log of a call: every checklist visited, in visiting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceLog {
    pub sections: Vec<ComplianceSection>,
}

fn render_item(item: &ChecklistItem, answer: Option<ChecklistAnswer>) -> String {
    let mark = match (item.is_yes_no(), answer) {
        (true, Some(ChecklistAnswer::Yes)) => "YES",
        (true, Some(ChecklistAnswer::No)) => "NO",
        (_, Some(_)) => "X",
        (_, None) => " ",
    };
    format!("[{}] {}", mark, item.text)
}

impl ComplianceLog {
    /// Builds the log from recorded history. `None` means no checklist was visited, which is
    /// a "nothing to report" outcome rather than a failure.
    pub fn from_history(history: &[HistoryEntry]) -> Option<Self> {
        let sections: Vec<ComplianceSection> = history
            .iter()
            .filter_map(|entry| {
                let NodeData::Checklist(data) = &entry.node().data else {
                    return None;
                };
                let answers = match entry.captured() {
                    CapturedAnswers::Checklist(answers) => Some(answers),
                    _ => None,
                };
                let lines = ChecklistItem::parse_all(&data.items)
                    .iter()
                    .map(|item| {
                        let answer = answers.and_then(|a| a.get(&item.text)).copied();
                        render_item(item, answer)
                    })
                    .collect();
                Some(ComplianceSection {
                    label: data.label.clone(),
                    lines,
                })
            })
            .collect();

        if sections.is_empty() {
            None
        } else {
            Some(Self { sections })
        }
    }

    /// Every item line across all sections.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .flat_map(|s| s.lines.iter().map(String::as_str))
    }

    /// Renders the plain-text log stamped with `generated_at`.
    pub fn render(&self, generated_at: NaiveDateTime) -> String {
        let mut report = format!(
            "COMPLIANCE LOG - {}\n",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        );
        for section in &self.sections {
            report.push_str(&format!("\n[{}]\n", section.label));
            for line in &section.lines {
                report.push_str(line);
                report.push('\n');
            }
        }
        report
    }

    pub fn render_now(&self) -> String {
        self.render(Local::now().naive_local())
    }
}
