//! Pure rendering helpers: placeholder substitution, list joining and HTML flattening.

mod html;
mod join;
mod madlibs;
pub mod quote;

pub use html::html_to_text;
pub use join::join_natural;
pub use madlibs::{bracket_variables, extract_variables, fill_template};
pub use quote::{CoverageSelection, QuoteForm, VehicleQuote, format_coverage, render_quote};
