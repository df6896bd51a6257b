//! Reporting period selection
//!
//! The period travels in the `range` query parameter so every page
//! link is self-contained.

use clochette_config::{Config, TimeRange};
use clochette_core::TimeContext;
use serde::Deserialize;

/// Query string shared by the period-aware pages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangeQuery {
    pub range: Option<String>,
    pub page: Option<usize>,
}

impl RangeQuery {
    pub fn context(&self, config: &Config) -> TimeContext {
        let fallback = config.time_range.default_range;
        match self.range.as_deref() {
            Some(range) => TimeContext::parse(range, fallback),
            None => TimeContext::new(fallback),
        }
    }

    /// 1-based page number
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }
}

/// `range=...` query fragment for links keeping the period
pub fn range_param(context: &TimeContext) -> String {
    format!("range={}", urlencoding::encode(&context.to_query()))
}

/// Period selector reloading `path` with the chosen range
pub fn range_selector(context: &TimeContext, path: &str) -> String {
    let options: String = [
        (TimeRange::Month, "Mois en cours"),
        (TimeRange::Quarter, "Trimestre en cours"),
        (TimeRange::Year, "Année en cours"),
        (TimeRange::All, "Tout"),
    ]
    .iter()
    .map(|(range, label)| {
        format!(
            "<option value='{}'{}>{}</option>",
            range,
            if *range == context.range { " selected" } else { "" },
            label
        )
    })
    .collect();
    let custom_selected = if context.range == TimeRange::Custom { " selected" } else { "" };
    let start = context.custom_start.map(|d| d.to_string()).unwrap_or_default();
    let end = context.custom_end.map(|d| d.to_string()).unwrap_or_default();

    format!(
        r#"<form method='get' action='{path}' class='flex items-center gap-3 mb-4 p-3 bg-white rounded-lg border shadow-sm' id='page-time-selector'>
            <span class='text-sm font-medium text-gray-600 flex-shrink-0'>Période :</span>
            <select name='range' class='px-2 py-1.5 text-sm border rounded-lg bg-white' onchange='if (this.value !== "custom") this.form.submit()'>
                {options}
                <option value='custom'{custom_selected}>Personnalisée</option>
            </select>
            <input type='date' id='custom-start' value='{start}' class='px-2 py-1.5 text-sm border rounded'>
            <span class='text-gray-400'>au</span>
            <input type='date' id='custom-end' value='{end}' class='px-2 py-1.5 text-sm border rounded'>
            <button type='button' onclick='applyCustomRange(this.form)' class='px-3 py-1.5 text-sm border rounded-lg hover:bg-gray-50'>Appliquer</button>
            <span class='flex-1 text-right text-sm text-gray-500'>{description}</span>
        </form>
        <script>
        function applyCustomRange(form) {{
            const start = document.getElementById('custom-start').value;
            const end = document.getElementById('custom-end').value;
            if (start && end) {{
                window.location = form.action + '?range=' + encodeURIComponent('custom:' + start + ',' + end);
            }}
        }}
        </script>"#,
        path = path,
        options = options,
        custom_selected = custom_selected,
        start = start,
        end = end,
        description = context.description()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_range_uses_configured_default() {
        let mut config = Config::default();
        config.time_range.default_range = TimeRange::Year;
        let query = RangeQuery::default();
        assert_eq!(query.context(&config).range, TimeRange::Year);
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_page_never_zero() {
        let query = RangeQuery { range: None, page: Some(0) };
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_range_param_is_encoded() {
        let context = TimeContext::parse("custom:2026-01-01,2026-01-31", TimeRange::Month);
        assert_eq!(range_param(&context), "range=custom%3A2026-01-01%2C2026-01-31");
    }

    #[test]
    fn test_selector_marks_current_range() {
        let html = range_selector(&TimeContext::new(TimeRange::Quarter), "/treasury");
        assert!(html.contains("<option value='quarter' selected>"));
        assert!(html.contains("action='/treasury'"));
    }
}
