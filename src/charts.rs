//! Chart generation for the spending report.
//!
//! This module creates ECharts visualizations from [Insights]:
//! - **Daily spending**: the recent daily totals with a smoothed trend line
//! - **Weekly spending**: the recent weekly totals
//! - **Spending by item**: a doughnut of the largest items
//! - **Top items**: a horizontal bar chart of the largest items
//!
//! Each chart is serialized as a JSON configuration for the ECharts library.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, JsFunction,
        Tooltip, Trigger,
    },
    series::{Bar, Line, Pie},
};

use crate::{
    calendar::{day_label, week_label},
    stats::Insights,
};

/// A report chart with its HTML container ID and ECharts configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Builds every chart shown in the report.
pub fn report_charts(insights: &Insights, currency_symbol: &str) -> Vec<ReportChart> {
    vec![
        ReportChart {
            id: "daily-chart",
            options: daily_chart(insights, currency_symbol).to_string(),
        },
        ReportChart {
            id: "weekly-chart",
            options: weekly_chart(insights, currency_symbol).to_string(),
        },
        ReportChart {
            id: "item-breakdown-chart",
            options: item_breakdown_chart(insights, currency_symbol).to_string(),
        },
        ReportChart {
            id: "top-items-chart",
            options: top_items_chart(insights, currency_symbol).to_string(),
        },
    ]
}

/// Daily totals for the most recent days with spending, with the moving
/// average drawn as a line.
pub fn daily_chart(insights: &Insights, currency_symbol: &str) -> Chart {
    let labels: Vec<String> = insights
        .recent_days
        .iter()
        .map(|day| day_label(day.date))
        .collect();
    let totals: Vec<f64> = insights.recent_days.iter().map(|day| day.total).collect();
    let trend: Vec<f64> = insights
        .recent_days
        .iter()
        .map(|day| round_cents(day.trend))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Daily spending")
                .subtext("Last fourteen days with spending"),
        )
        .tooltip(currency_tooltip(currency_symbol))
        .legend(Legend::new().right("4%"))
        .grid(default_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(currency_axis(currency_symbol))
        .series(Bar::new().name("Spent").data(totals))
        .series(Line::new().name("Trend").smooth(true).data(trend))
}

/// Weekly totals for the most recent weeks with spending.
pub fn weekly_chart(insights: &Insights, currency_symbol: &str) -> Chart {
    let labels: Vec<String> = insights
        .recent_weeks
        .iter()
        .map(|week| week_label(week.start))
        .collect();
    let totals: Vec<f64> = insights.recent_weeks.iter().map(|week| week.total).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Weekly spending")
                .subtext("Last eight weeks with spending"),
        )
        .tooltip(currency_tooltip(currency_symbol))
        .grid(default_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(currency_axis(currency_symbol))
        .series(
            Bar::new()
                .name("Spent")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(totals),
        )
}

/// The share of spending of the largest items, with the rest grouped
/// together.
pub fn item_breakdown_chart(insights: &Insights, currency_symbol: &str) -> Chart {
    let data: Vec<(f64, String)> = insights
        .item_breakdown
        .iter()
        .map(|item| (item.total, item.label.clone()))
        .collect();

    Chart::new()
        .title(Title::new().text("Spending by item"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter(currency_symbol)),
        )
        .legend(Legend::new().bottom("1%"))
        .series(
            Pie::new()
                .name("Spent")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

/// The largest items as a horizontal bar chart, largest at the top.
pub fn top_items_chart(insights: &Insights, currency_symbol: &str) -> Chart {
    // ECharts draws the first category at the bottom.
    let labels: Vec<String> = insights
        .top_items
        .iter()
        .rev()
        .map(|item| item.label.clone())
        .collect();
    let totals: Vec<f64> = insights
        .top_items
        .iter()
        .rev()
        .map(|item| item.total)
        .collect();

    Chart::new()
        .title(Title::new().text("Top items"))
        .tooltip(currency_tooltip(currency_symbol))
        .grid(default_grid())
        .x_axis(currency_axis(currency_symbol))
        .y_axis(Axis::new().type_(AxisType::Category).data(labels))
        .series(Bar::new().name("Spent").data(totals))
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn default_grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .contain_label(true)
}

fn currency_axis(currency_symbol: &str) -> Axis {
    Axis::new()
        .type_(AxisType::Value)
        .axis_label(AxisLabel::new().formatter(currency_formatter(currency_symbol)))
}

#[inline]
fn currency_formatter(currency_symbol: &str) -> JsFunction {
    // A JSON string is also a valid JavaScript string literal.
    let symbol = serde_json::Value::from(currency_symbol).to_string();

    JsFunction::new_with_args(
        "number",
        &format!(
            "return (number) ? {symbol} + Number(number).toLocaleString('en-US', {{
                minimumFractionDigits: 2,
                maximumFractionDigits: 2
            }}) : \"-\";"
        ),
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip(currency_symbol: &str) -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter(currency_symbol))
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
