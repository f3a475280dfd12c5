//! Renders the spending report as a standalone HTML page.
//!
//! The page shows the headline totals, the insight cards and the charts from
//! [crate::charts]. Charts are drawn by ECharts, loaded from a CDN.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::{
    aggregation::format_change,
    calendar::{long_day_label, week_label},
    charts::{ReportChart, report_charts},
    currency::CurrencyFormat,
    stats::{Insights, PeriodTotal, Summary},
};

const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// Render the report page for `summary` and `insights`.
///
/// `insights` is `None` when there are no expenses, in which case the page
/// shows an empty state instead of the insight cards and charts.
pub fn render_report(
    summary: &Summary,
    insights: Option<&Insights>,
    currency: &CurrencyFormat,
) -> String {
    let charts = insights
        .map(|insights| report_charts(insights, currency.symbol()))
        .unwrap_or_default();

    let content = html! {
        main class="max-w-5xl mx-auto p-4 space-y-6"
        {
            h1 class="text-2xl font-bold" { "Spending report" }

            (summary_view(summary, currency))

            @match insights {
                Some(insights) => {
                    (insight_cards_view(insights, currency))
                    (charts_view(&charts))
                }
                None => (empty_state_view()),
            }
        }
    };

    base("Spending report", &charts, &content).into_string()
}

fn base(title: &str, charts: &[ReportChart], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Spendlog" }

                style
                {
                    r#"
                    body { font-family: system-ui, sans-serif; margin: 0; }
                    .card { border: 1px solid #e5e7eb; border-radius: 0.5rem; padding: 0.75rem; }
                    .muted { color: #6b7280; }
                    .grid { display: grid; gap: 0.75rem; grid-template-columns: repeat(auto-fit, minmax(14rem, 1fr)); }
                    .chart { min-height: 320px; }
                    "#
                }

                @if !charts.is_empty() {
                    script src=(ECHARTS_URL) {}
                    script { (charts_script(charts)) }
                }
            }

            body { (content) }
        }
    }
}

fn summary_view(summary: &Summary, currency: &CurrencyFormat) -> Markup {
    html! {
        section id="summary" class="grid"
        {
            (period_card("Today", "vs yesterday", &summary.today, currency))
            (period_card("Last 7 days", "vs previous 7 days", &summary.last_7_days, currency))
            (period_card("This month", "vs last month", &summary.this_month, currency))
        }
    }
}

fn period_card(
    label: &str,
    comparison: &str,
    period: &PeriodTotal,
    currency: &CurrencyFormat,
) -> Markup {
    html! {
        div class="card"
        {
            div class="muted" { (label) }
            div class="amount" { (currency.format(period.total)) }
            div class="change muted"
            {
                (format_change(period.change_percent)) " " (comparison)
            }
        }
    }
}

fn insight_cards_view(insights: &Insights, currency: &CurrencyFormat) -> Markup {
    let (top_day, top_day_total) = insights.top_day;
    let (top_week, top_week_total) = insights.top_week;

    html! {
        section id="insights" class="grid"
        {
            (insight_card("Top item", &insights.top_item.label, currency.format(insights.top_item.total)))
            (insight_card("Highest spend day", &long_day_label(top_day), currency.format(top_day_total)))
            (insight_card("Highest spend week", &week_label(top_week), currency.format(top_week_total)))
        }
    }
}

fn insight_card(label: &str, value: &str, amount: String) -> Markup {
    html! {
        div class="card"
        {
            div class="muted" { (label) }
            div class="value" { (value) }
            div class="amount muted" { (amount) }
        }
    }
}

fn empty_state_view() -> Markup {
    html! {
        section id="empty-state" class="card"
        {
            div { "Stats will appear here" }
            div class="muted"
            {
                "Add a few expenses to see insights about where and when you spend the most."
            }
        }
    }
}

fn charts_view(charts: &[ReportChart]) -> Markup {
    html! {
        section id="charts" class="grid"
        {
            @for chart in charts {
                div id=(chart.id) class="card chart" {}
            }
        }
    }
}

/// Generates the script that initializes an ECharts instance for each chart
/// container, following the system dark mode setting.
fn charts_script(charts: &[ReportChart]) -> PreEscaped<String> {
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
                chart.id,
                // Item labels must not close the script element.
                chart.options.replace("</", "<\\/")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    PreEscaped(format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    ))
}

#[cfg(test)]
mod tests {
    use scraper::{ElementRef, Html, Selector};
    use time::{
        OffsetDateTime,
        macros::{datetime, offset},
    };

    use crate::{
        calendar::{Calendar, Zone},
        currency::CurrencyFormat,
        expense::{Expense, ExpenseId},
        stats::{Insights, Summary},
    };

    use super::render_report;

    fn expense(id: &str, description: &str, amount: f64, date: OffsetDateTime) -> Expense {
        Expense {
            id: ExpenseId::new(id),
            description: description.to_owned(),
            amount,
            date,
        }
    }

    fn test_calendar() -> Calendar {
        Calendar::new(Zone::Fixed(offset!(UTC))).with_now(datetime!(2025-10-18 15:00 UTC))
    }

    fn render(expenses: &[Expense]) -> Html {
        let calendar = test_calendar();
        let summary = Summary::compute(expenses, &calendar);
        let insights = Insights::compute(expenses, &calendar);
        let currency = CurrencyFormat::new("₹").unwrap();

        let html = Html::parse_document(&render_report(&summary, insights.as_ref(), &currency));
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );

        html
    }

    fn select<'a>(html: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
        let selector = Selector::parse(selector).unwrap();
        html.select(&selector).collect()
    }

    fn text(element: &ElementRef) -> String {
        element.text().collect::<String>()
    }

    #[test]
    fn empty_report_shows_empty_state() {
        let html = render(&[]);

        let empty_state = select(&html, "#empty-state");
        assert_eq!(empty_state.len(), 1);
        assert!(text(&empty_state[0]).contains("Stats will appear here"));
        assert!(select(&html, "#charts").is_empty());
        assert!(select(&html, "script").is_empty());
    }

    #[test]
    fn empty_report_still_shows_zero_totals() {
        let html = render(&[]);

        let amounts: Vec<String> = select(&html, "#summary .amount")
            .iter()
            .map(text)
            .collect();
        assert_eq!(amounts, vec!["₹0.00", "₹0.00", "₹0.00"]);
    }

    #[test]
    fn report_shows_summary_cards() {
        let html = render(&[
            expense("1", "Coffee", 10.0, datetime!(2025-10-18 08:00 UTC)),
            expense("2", "Lunch", 20.0, datetime!(2025-10-17 12:00 UTC)),
        ]);

        let cards = select(&html, "#summary .card");
        assert_eq!(cards.len(), 3);
        assert!(text(&cards[0]).contains("Today"));
        assert!(text(&cards[0]).contains("₹10.00"));
        assert!(text(&cards[0]).contains("-50% vs yesterday"));
        assert!(text(&cards[1]).contains("₹30.00"));
    }

    #[test]
    fn report_shows_insight_cards() {
        let html = render(&[
            expense("1", "Coffee", 10.0, datetime!(2025-10-18 08:00 UTC)),
            expense("2", "Lunch", 20.0, datetime!(2025-10-17 12:00 UTC)),
        ]);

        let cards = select(&html, "#insights .card");
        assert_eq!(cards.len(), 3);
        assert!(text(&cards[0]).contains("Lunch"));
        assert!(text(&cards[1]).contains("Friday, Oct 17"));
        assert!(text(&cards[2]).contains("Oct 12 - Oct 18"));
        assert!(text(&cards[2]).contains("₹30.00"));
    }

    #[test]
    fn report_has_chart_containers_and_script() {
        let html = render(&[expense(
            "1",
            "Coffee",
            10.0,
            datetime!(2025-10-18 08:00 UTC),
        )]);

        for id in [
            "daily-chart",
            "weekly-chart",
            "item-breakdown-chart",
            "top-items-chart",
        ] {
            assert_eq!(select(&html, &format!("#{id}")).len(), 1, "missing #{id}");
        }

        let scripts = select(&html, "script");
        assert_eq!(scripts.len(), 2);
        assert!(text(&scripts[1]).contains("echarts.init"));
    }

    #[test]
    fn descriptions_are_escaped() {
        let html = render(&[expense(
            "1",
            "<b>Snacks</b>",
            10.0,
            datetime!(2025-10-18 08:00 UTC),
        )]);

        let cards = select(&html, "#insights .value");
        assert_eq!(text(&cards[0]), "<b>Snacks</b>");
        assert!(select(&html, "#insights b").is_empty());
    }

    #[test]
    fn descriptions_cannot_close_the_script() {
        let html = render(&[expense(
            "1",
            "</script><p id=\"injected\">",
            10.0,
            datetime!(2025-10-18 08:00 UTC),
        )]);

        assert!(select(&html, "#injected").is_empty());
    }
}
