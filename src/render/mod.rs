//! Text rendering of listing pages using Jinja2-compatible templates.
//!
//! The built-in template prints a listing for the terminal. A user template
//! can replace it; it receives the same context:
//!
//! - `page`: the [`ListingPage`], including `title`, `state` (`loading`,
//!   `ready` or `error`), `empty`, `error`, `filters` and `cards`
//! - `rendered_at`: render timestamp (RFC 3339)
//!
//! Each card exposes `title`, `description`, `badge.label`, `details`
//! (`label`/`value` pairs), `progress` (`label`, `percent`, `summary`) and
//! `action` (`label`, `href`).

use std::io::Write;

use chrono::Utc;
use minijinja::{Environment, context};

use crate::error::SiteError;
use crate::listing::ListingPage;

const TEMPLATE_NAME: &str = "listing";
const PROGRESS_WIDTH: usize = 20;
const PROGRESS_CELLS: f64 = 20.0;

/// Built-in terminal template.
pub const DEFAULT_TEMPLATE: &str = r"{{ page.title }}
{{ page.subtitle }}
{% for filter in page.filters %}{{ filter.label }}: {{ filter.selected_label }}{% if not loop.last %} | {% endif %}{% endfor %}

{% if page.state == 'loading' %}{{ page.loading_message }}
{% elif page.state == 'error' %}! {{ page.error }}
{% elif page.empty %}{{ page.empty_title }}
{{ page.empty_hint }}
{% else %}{% for card in page.cards %}* {{ card.title }}{% if card.badge %} [{{ card.badge.label }}]{% endif %}
{% if card.description %}  {{ card.description }}
{% endif %}{% for detail in card.details %}  {{ detail.label }}: {{ detail.value }}
{% endfor %}{% if card.progress %}  {{ card.progress.label }}: {{ card.progress.percent | bar }} {{ card.progress.summary }}
{% endif %}{% if card.action %}  -> {{ card.action.label }}{% if card.action.href %} ({{ card.action.href }}){% endif %}
{% endif %}
{% endfor %}{{ page.cards | length }} result{% if page.cards | length != 1 %}s{% endif %}
{% endif %}";

/// Renders a fixed-width text progress bar for a percentage in `[0, 100]`.
fn bar(percent: f64) -> String {
    let filled = filled_cells(percent);
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH.saturating_sub(filled))
    )
}

fn filled_cells(percent: f64) -> usize {
    #[expect(
        clippy::float_arithmetic,
        reason = "scales a bounded percentage onto a small cell count"
    )]
    let cells = (percent.clamp(0.0, 100.0) / 100.0 * PROGRESS_CELLS).round();
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "cells is integral and within 0..=20"
    )]
    let filled = cells as usize;
    filled.min(PROGRESS_WIDTH)
}

/// Writes `page` using `template_source`, or the built-in template when
/// `None`.
///
/// # Errors
///
/// Returns [`SiteError::Render`] if the template has syntax errors or fails
/// to render, and [`SiteError::Io`] if writing fails.
pub fn write_page<W: Write>(
    writer: &mut W,
    page: &ListingPage,
    template_source: Option<&str>,
) -> Result<(), SiteError> {
    let output = render_page(page, template_source)?;
    writer
        .write_all(output.as_bytes())
        .map_err(|error| SiteError::Io {
            message: format!("failed to write listing: {error}"),
        })
}

/// Renders `page` to a string.
///
/// # Errors
///
/// Returns [`SiteError::Render`] if the template has syntax errors or fails
/// to render.
pub fn render_page(page: &ListingPage, template_source: Option<&str>) -> Result<String, SiteError> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
    env.add_filter("bar", bar);

    env.add_template(TEMPLATE_NAME, template_source.unwrap_or(DEFAULT_TEMPLATE))
        .map_err(|error| SiteError::Render {
            message: format!("invalid template syntax: {error}"),
        })?;
    let template = env
        .get_template(TEMPLATE_NAME)
        .map_err(|error| SiteError::Render {
            message: format!("failed to retrieve template: {error}"),
        })?;

    template
        .render(context! {
            page => page,
            rendered_at => Utc::now().to_rfc3339(),
        })
        .map_err(|error| SiteError::Render {
            message: format!("template rendering failed: {error}"),
        })
}

#[cfg(test)]
mod tests;
