//! The quote builder: form state collected from the agent and the script rendered from it.

use super::join_natural;
use super::madlibs::substitute;
use crate::document::{
    Carrier, CoverageField, DEFAULT_QUOTE_TEMPLATE, DEFAULT_VEHICLE_TEMPLATE, QuoteSettings,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const PRICING_PLACEHOLDER: &str = "<p><i>Enter pricing to generate script.</i></p>";
pub const DEFAULT_CLOSING: &str = "Did you want this policy to start effective today?";
pub const DEFAULT_TERM: &str = "6-month";
pub const FALLBACK_COVERAGE_FORMAT: &str = "{label} with {value}";
pub const NO_POLICY_COVERAGES: &str = "This includes basic state minimums";
pub const NO_VEHICLE_COVERAGES: &str = "state minimums";
pub const DEFAULT_CARRIER_NAME: &str = "our partner";
pub const DEFAULT_VEHICLE_NAME: &str = "Vehicle";

/// A selected coverage and the free-text value typed next to it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoverageSelection {
    pub coverage_id: String,
    pub value: Option<String>,
}

impl CoverageSelection {
    pub fn new(coverage_id: impl Into<String>) -> Self {
        Self {
            coverage_id: coverage_id.into(),
            value: None,
        }
    }

    pub fn with_value(coverage_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            coverage_id: coverage_id.into(),
            value: Some(value.into()),
        }
    }
}

fn toggle(selections: &mut Vec<CoverageSelection>, coverage_id: &str) -> bool {
    match selections.iter().position(|s| s.coverage_id == coverage_id) {
        Some(index) => {
            selections.remove(index);
            false
        }
        None => {
            selections.push(CoverageSelection::new(coverage_id));
            true
        }
    }
}

fn set_value(selections: &mut [CoverageSelection], coverage_id: &str, value: &str) -> bool {
    match selections.iter_mut().find(|s| s.coverage_id == coverage_id) {
        Some(selection) => {
            selection.value = Some(value.to_string());
            true
        }
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VehicleQuote {
    pub name: String,
    pub coverages: Vec<CoverageSelection>,
}

impl VehicleQuote {
    /// Selects or deselects a coverage. Returns whether it is now selected.
    pub fn toggle_coverage(&mut self, coverage_id: &str) -> bool {
        toggle(&mut self.coverages, coverage_id)
    }

    /// Sets the value of a selected coverage. Returns `false` if it is not selected.
    pub fn set_value(&mut self, coverage_id: &str, value: &str) -> bool {
        set_value(&mut self.coverages, coverage_id, value)
    }
}

/// Transient quote inputs for one visit to a quote node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteForm {
    pub down_payment: String,
    pub monthly: String,
    pub term: String,
    pub carrier_id: Option<String>,
    pub policy: Vec<CoverageSelection>,
    /// Always holds at least one vehicle.
    pub vehicles: Vec<VehicleQuote>,
}

impl Default for QuoteForm {
    fn default() -> Self {
        Self {
            down_payment: String::new(),
            monthly: String::new(),
            term: DEFAULT_TERM.to_string(),
            carrier_id: None,
            policy: Vec::new(),
            vehicles: vec![VehicleQuote::default()],
        }
    }
}

impl QuoteForm {
    /// Both monetary amounts are filled in.
    pub fn has_pricing(&self) -> bool {
        !self.down_payment.trim().is_empty() && !self.monthly.trim().is_empty()
    }

    /// Selects or deselects a policy-level coverage; deselecting discards its value.
    pub fn toggle_policy_coverage(&mut self, coverage_id: &str) -> bool {
        toggle(&mut self.policy, coverage_id)
    }

    pub fn set_policy_value(&mut self, coverage_id: &str, value: &str) -> bool {
        set_value(&mut self.policy, coverage_id, value)
    }

    /// Appends an unnamed vehicle and returns its index.
    pub fn add_vehicle(&mut self) -> usize {
        self.vehicles.push(VehicleQuote::default());
        self.vehicles.len() - 1
    }

    /// Removes a vehicle unless it is the last one.
    pub fn remove_vehicle(&mut self, index: usize) -> bool {
        if self.vehicles.len() <= 1 || index >= self.vehicles.len() {
            return false;
        }
        self.vehicles.remove(index);
        true
    }

    pub fn vehicle_mut(&mut self, index: usize) -> Option<&mut VehicleQuote> {
        self.vehicles.get_mut(index)
    }

    /// Copies the first vehicle's coverages and values onto vehicle `index`.
    pub fn match_first_vehicle(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.vehicles.len() {
            return false;
        }
        let coverages = self.vehicles[0].coverages.clone();
        self.vehicles[index].coverages = coverages;
        true
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

/// Renders the spoken phrase for one coverage.
///
/// The format is the field's own, else the settings-level one, else a hard fallback. A
/// format that needs `{value}` with no value supplied renders just the bold label.
pub fn format_coverage(settings: &QuoteSettings, field: &CoverageField, value: Option<&str>) -> String {
    let format = non_blank(field.format.as_deref())
        .or_else(|| non_blank(settings.coverage_format.as_deref()))
        .unwrap_or(FALLBACK_COVERAGE_FORMAT);
    let value = non_blank(value);
    if format.contains("{value}") && value.is_none() {
        return format!("<b>{}</b>", field.label);
    }
    substitute(format, |key| match key {
        "label" => Some(field.label.as_str()),
        "value" => Some(value.unwrap_or_default()),
        _ => None,
    })
}

fn phrases(settings: &QuoteSettings, selections: &[CoverageSelection]) -> Vec<String> {
    selections
        .iter()
        .filter_map(|s| {
            settings
                .coverage(&s.coverage_id)
                .map(|field| format_coverage(settings, field, s.value.as_deref()))
        })
        .collect()
}

fn with_currency(amount: &str) -> String {
    let amount = amount.trim();
    if amount.contains('$') {
        amount.to_string()
    } else {
        format!("${}", amount)
    }
}

/// Produces the quote script read to the customer.
///
/// Returns [`PRICING_PLACEHOLDER`] until both the down payment and the monthly amount are set.
pub fn render_quote(
    settings: &QuoteSettings,
    carriers: &IndexMap<String, Carrier>,
    form: &QuoteForm,
    closing_question: Option<&str>,
) -> String {
    if !form.has_pricing() {
        return PRICING_PLACEHOLDER.to_string();
    }

    let policy_phrases = phrases(settings, &form.policy);
    let policy = if policy_phrases.is_empty() {
        NO_POLICY_COVERAGES.to_string()
    } else {
        format!("On the policy level, we have included {}", join_natural(&policy_phrases))
    };

    let vehicle_template = non_blank(Some(settings.vehicle_template.as_str())).unwrap_or(DEFAULT_VEHICLE_TEMPLATE);
    let vehicles = form
        .vehicles
        .iter()
        .map(|vehicle| {
            let covered = phrases(settings, &vehicle.coverages);
            let coverages = if covered.is_empty() {
                NO_VEHICLE_COVERAGES.to_string()
            } else {
                join_natural(&covered)
            };
            let name = non_blank(Some(vehicle.name.as_str())).unwrap_or(DEFAULT_VEHICLE_NAME);
            let name = format!("<b>{}</b>", name);
            substitute(vehicle_template, |key| match key {
                "name" => Some(name.as_str()),
                "coverages" => Some(coverages.as_str()),
                _ => None,
            })
        })
        .collect::<Vec<_>>()
        .join(". ");

    let carrier = form
        .carrier_id
        .as_deref()
        .and_then(|id| carriers.get(id))
        .and_then(|c| non_blank(Some(c.name.as_str())))
        .unwrap_or(DEFAULT_CARRIER_NAME);
    let closing = non_blank(closing_question).unwrap_or(DEFAULT_CLOSING);
    let template = non_blank(Some(settings.template.as_str())).unwrap_or(DEFAULT_QUOTE_TEMPLATE);

    let down = with_currency(&form.down_payment);
    let monthly = with_currency(&form.monthly);
    substitute(template, |key| match key {
        "carrier" => Some(carrier),
        "policy" => Some(policy.as_str()),
        "vehicles" => Some(vehicles.as_str()),
        "down" => Some(down.as_str()),
        "monthly" => Some(monthly.as_str()),
        "term" => Some(form.term.as_str()),
        "closing" => Some(closing),
        _ => None,
    })
}
