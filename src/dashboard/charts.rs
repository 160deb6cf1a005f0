//! Chart generation and rendering for the dashboard.
//!
//! Charts are generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, JsFunction,
        Tooltip, Trigger,
    },
    series::bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{entry::CategorySummary, html::HeadElement};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

fn category_labels(summaries: &[CategorySummary]) -> Vec<String> {
    summaries
        .iter()
        .map(|summary| summary.category.label().to_owned())
        .collect()
}

/// A bar per category showing what is still owed.
pub(super) fn outstanding_chart(summaries: &[CategorySummary]) -> Chart {
    let values: Vec<f64> = summaries
        .iter()
        .map(|summary| summary.stats.outstanding())
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Outstanding")
                .subtext("Balance still owed per ledger"),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(category_labels(summaries)),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(bar::Bar::new().name("Outstanding").data(values))
}

/// Stacked bars per category splitting the total into paid and outstanding.
pub(super) fn settlement_chart(summaries: &[CategorySummary]) -> Chart {
    let paid: Vec<f64> = summaries.iter().map(|summary| summary.stats.paid).collect();
    let outstanding: Vec<f64> = summaries
        .iter()
        .map(|summary| summary.stats.outstanding())
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Settlement")
                .subtext("Paid and outstanding per ledger")
                .left(20)
                .top("1%"),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().left(250).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(category_labels(summaries)),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            bar::Bar::new()
                .name("Paid")
                .stack("Total")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(paid),
        )
        .series(
            bar::Bar::new()
                .name("Outstanding")
                .stack("Total")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(outstanding),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const numberFormatter = new Intl.NumberFormat('en-US', {
              maximumFractionDigits: 0
            });
            return (number) ? 'Rs ' + numberFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use crate::{
        dashboard::charts::{outstanding_chart, settlement_chart},
        entry::{Category, NewEntry, summarize_by_category},
    };

    #[test]
    fn outstanding_chart_has_a_bar_per_category() {
        let entries = vec![
            NewEntry::new(Category::ChequeReceivables, "2025-03-01", "Acme", 1234.0)
                .into_entry("1".to_owned()),
        ];

        let options = outstanding_chart(&summarize_by_category(&entries)).to_string();

        for category in Category::ALL {
            assert!(options.contains(category.label()), "missing {category:?}");
        }
        assert!(options.contains("1234"));
    }

    #[test]
    fn settlement_chart_stacks_paid_and_outstanding() {
        let options = settlement_chart(&summarize_by_category(&[])).to_string();

        assert!(options.contains("\"Paid\""));
        assert!(options.contains("\"Outstanding\""));
        assert!(options.contains("\"stack\""));
    }
}
