use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::PathBuf,
    process::exit,
};

use clap::{Parser, Subcommand, ValueEnum};

use spendlog::{
    Calendar, Config, CurrencyFormat, DEFAULT_CURRENCY_SYMBOL, DEFAULT_DB_PATH, Error, Expense,
    ExpenseForm, ExpenseId, ExpenseStore, Insights, KeyValueStore, PeriodTotal, Summary,
    day_label, export_csv, export_json, filter, format_change, group_by_day, import_json,
    long_day_label, rank, render_report, setup_logging, week_label,
};

/// A personal expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database.
    #[arg(long, env = "SPENDLOG_DB", default_value = DEFAULT_DB_PATH, global = true)]
    db_path: PathBuf,

    /// Canonical timezone name used to group expenses by day, e.g.
    /// "Asia/Kolkata". Defaults to the system's current UTC offset.
    #[arg(long, env = "SPENDLOG_TIMEZONE", global = true)]
    timezone: Option<String>,

    /// The symbol to prefix amounts with.
    #[arg(long, env = "SPENDLOG_CURRENCY", default_value = DEFAULT_CURRENCY_SYMBOL, global = true)]
    currency: String,

    /// Also write debug logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new expense.
    Add {
        /// What the money was spent on.
        description: String,
        /// How much was spent, e.g. "12.50" or "12,50".
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// The day the money was spent as YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Change an existing expense.
    Edit {
        /// The ID of the expense to change.
        id: String,
        /// The new description.
        #[arg(long)]
        description: Option<String>,
        /// The new amount.
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        /// The new date as YYYY-MM-DD.
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete an expense.
    Delete {
        /// The ID of the expense to delete.
        id: String,
    },
    /// List expenses grouped by day, newest first.
    List {
        /// Only show the most recent days.
        #[arg(long, short)]
        limit: Option<usize>,
    },
    /// Show spending totals and insights.
    Stats,
    /// Show previously used descriptions that match a query.
    Suggest {
        /// Text the description should contain. Matches everything if empty.
        #[arg(default_value = "")]
        query: String,
    },
    /// Write the spending report as an HTML page.
    Report {
        /// File path to write the HTML to.
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Export all expenses.
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// File path to write to. Defaults to stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Import expenses from a JSON export, skipping IDs that already exist.
    Import {
        /// File path of the JSON export.
        file: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ExportFormat {
    Csv,
    Json,
}

fn main() {
    let args = Args::parse();
    let config = Config {
        db_path: args.db_path,
        timezone: args.timezone,
        currency_symbol: args.currency,
        log_file: args.log_file,
    };

    if let Err(error) = setup_logging(config.log_file.as_deref()) {
        print_error(format!("could not set up logging: {error}"));
        exit(1);
    }

    if let Err(error) = run(args.command, &config) {
        print_error(error);
        exit(1);
    }
}

fn run(command: Command, config: &Config) -> Result<(), Error> {
    let calendar = config.calendar()?;
    let currency = config.currency()?;
    let mut store = config.open_store()?;

    match command {
        Command::Add {
            description,
            amount,
            date,
        } => {
            let form = ExpenseForm {
                description,
                amount,
                date: date.unwrap_or_default(),
            };
            let expense = form.into_expense(&calendar, store.expenses())?;

            println!(
                "Added {}: {} {}",
                expense.id,
                expense.description,
                currency.format(expense.amount)
            );
            store.add(expense);
        }
        Command::Edit {
            id,
            description,
            amount,
            date,
        } => {
            let original = find_expense(&store, &id)?;
            let mut form = ExpenseForm::from_expense(&original, &calendar);

            if let Some(description) = description {
                form.description = description;
            }
            if let Some(amount) = amount {
                form.amount = amount;
            }
            if let Some(date) = date {
                form.date = date;
            }

            let edited = form.into_edited(&original, &calendar)?;
            println!(
                "Updated {}: {} {}",
                edited.id,
                edited.description,
                currency.format(edited.amount)
            );
            store.update(edited);
        }
        Command::Delete { id } => {
            let expense = find_expense(&store, &id)?;
            store.remove(&expense.id);
            println!("Deleted {}: {}", expense.id, expense.description);
        }
        Command::List { limit } => {
            print_list(store.expenses(), &calendar, &currency, limit);
        }
        Command::Stats => {
            print_stats(store.expenses(), &calendar, &currency);
        }
        Command::Suggest { query } => {
            let ranked = rank(store.expenses());
            for suggestion in filter(&ranked, &query) {
                println!("{} ({}x)", suggestion.text, suggestion.count);
            }
        }
        Command::Report { output } => {
            let summary = Summary::compute(store.expenses(), &calendar);
            let insights = Insights::compute(store.expenses(), &calendar);
            let html = render_report(&summary, insights.as_ref(), &currency);

            std::fs::write(&output, html)?;
            println!("Report written to {}", output.display());
        }
        Command::Export { format, output } => {
            let writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(File::create(path)?),
                None => Box::new(io::stdout().lock()),
            };

            match format {
                ExportFormat::Csv => export_csv(store.expenses(), writer)?,
                ExportFormat::Json => export_json(store.expenses(), writer)?,
            }

            if let Some(path) = output {
                println!(
                    "Exported {} expenses to {}",
                    store.expenses().len(),
                    path.display()
                );
            }
        }
        Command::Import { file } => {
            let records = import_json(BufReader::new(File::open(&file)?))?;
            let total = records.len();
            let imported = store.import(records);

            println!(
                "Imported {imported} of {total} expenses from {}",
                file.display()
            );
        }
    }

    Ok(())
}

fn find_expense<S: KeyValueStore>(store: &ExpenseStore<S>, id: &str) -> Result<Expense, Error> {
    let id = ExpenseId::new(id);

    store
        .get(&id)
        .cloned()
        .ok_or(Error::ExpenseNotFound(id))
}

fn print_list(
    expenses: &[Expense],
    calendar: &Calendar,
    currency: &CurrencyFormat,
    limit: Option<usize>,
) {
    let days = group_by_day(expenses, calendar);

    if days.is_empty() {
        println!("No expenses yet. Add one with `spendlog add <description> <amount>`.");
        return;
    }

    for day in days.iter().take(limit.unwrap_or(usize::MAX)) {
        println!(
            "{:<36} {:>14}",
            day_label(day.date),
            currency.format(day.total)
        );

        for expense in &day.expenses {
            println!(
                "  {:<15} {:<18} {:>14}",
                expense.id,
                expense.description,
                currency.format(expense.amount)
            );
        }
    }
}

fn print_stats(expenses: &[Expense], calendar: &Calendar, currency: &CurrencyFormat) {
    let summary = Summary::compute(expenses, calendar);

    print_period("Today", "vs yesterday", &summary.today, currency);
    print_period(
        "Last 7 days",
        "vs previous 7 days",
        &summary.last_7_days,
        currency,
    );
    print_period("This month", "vs last month", &summary.this_month, currency);
    println!();

    let Some(insights) = Insights::compute(expenses, calendar) else {
        println!("Stats will appear here");
        println!("Add a few expenses to see insights about where and when you spend the most.");
        return;
    };

    let (top_day, top_day_total) = insights.top_day;
    let (top_week, top_week_total) = insights.top_week;

    println!("{:<20} {}", "Total", currency.format(insights.total));
    println!(
        "{:<20} {} ({})",
        "Top item",
        insights.top_item.label,
        currency.format(insights.top_item.total)
    );
    println!(
        "{:<20} {} ({})",
        "Highest spend day",
        long_day_label(top_day),
        currency.format(top_day_total)
    );
    println!(
        "{:<20} {} ({})",
        "Highest spend week",
        week_label(top_week),
        currency.format(top_week_total)
    );

    println!("\nRecent days");
    for day in &insights.recent_days {
        println!(
            "  {:<18} {:>14}  trend {:>14}",
            day_label(day.date),
            currency.format(day.total),
            currency.format(day.trend)
        );
    }

    println!("\nRecent weeks");
    for week in &insights.recent_weeks {
        let change = week
            .change_percent
            .map(format_change)
            .unwrap_or_default();
        println!(
            "  {:<18} {:>14}  {change}",
            week_label(week.start),
            currency.format(week.total)
        );
    }

    println!("\nSpending by item");
    for item in &insights.item_breakdown {
        let share = insights.share_percent(item);
        println!(
            "  {:<18} {:>14}  {share}%",
            item.label,
            currency.format(item.total)
        );
    }
}

fn print_period(label: &str, comparison: &str, period: &PeriodTotal, currency: &CurrencyFormat) {
    println!(
        "{:<20} {:>14}  {} {comparison}",
        label,
        currency.format(period.total),
        format_change(period.change_percent)
    );
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

/// From https://crates.io/crates/capitalize
fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
