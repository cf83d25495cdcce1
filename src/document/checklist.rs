/// Suffix marking a checklist line as a yes/no question. Matched case-insensitively.
pub const YES_NO_MARKER: &str = "(yes/no)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    YesNo,
    Checkbox,
}

/// One parsed line of a checklist node's `items` text.
///
/// `text` is the cleaned line (marker removed, trimmed) and doubles as the answer key,
/// so editing an item's wording drops any answer recorded under the old wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    pub text: String,
    pub kind: ItemKind,
}

impl ChecklistItem {
    /// Parses one raw line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        if line.trim().is_empty() {
            return None;
        }
        // ASCII lowering keeps byte offsets aligned with `line`.
        let lowered = line.to_ascii_lowercase();
        let (text, kind) = match lowered.find(YES_NO_MARKER) {
            Some(at) => {
                let mut cleaned = String::with_capacity(line.len());
                cleaned.push_str(&line[..at]);
                cleaned.push_str(&line[at + YES_NO_MARKER.len()..]);
                (cleaned.trim().to_string(), ItemKind::YesNo)
            }
            None => (line.trim().to_string(), ItemKind::Checkbox),
        };
        Some(Self { text, kind })
    }

    pub fn parse_all(items: &str) -> Vec<Self> {
        items.lines().filter_map(Self::parse).collect()
    }

    pub fn is_yes_no(&self) -> bool {
        self.kind == ItemKind::YesNo
    }
}
