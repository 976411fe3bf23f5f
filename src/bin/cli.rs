//! A command line front end for the spendtrack core.
//!
//! Every command signs in (or registers) and then calls the same public API
//! a graphical client would use.

use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use time::{Date, OffsetDateTime, macros::format_description};
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use spendtrack::{
    Authenticator, Error, IdGenerator, Ledger, Session,
    db::initialize,
    models::{CategoryName, DatabaseID, Debt, Expense, Subscription, UserID, monthly_total},
    stores::{
        CategoryStore, DebtStore, ExpenseStore, SubscriptionStore,
        sqlite::{
            SQLiteCategoryStore, SQLiteDebtStore, SQLiteExpenseStore, SQLiteLedgerStore,
            SQLiteSubscriptionStore, SQLiteUserStore,
        },
    },
};

/// Track budget categories, expenses, subscriptions, and debts.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, default_value = "spendtrack.db")]
    db_path: String,

    /// The account to act as. Not needed for `register`.
    #[arg(short, long, default_value = "")]
    username: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new account.
    Register,
    /// List budget categories with their limits and spent totals.
    Categories,
    /// Create a budget category.
    AddCategory {
        /// The display name of the category.
        name: String,
        /// The spending limit for the category.
        max_amount: f64,
    },
    /// Delete a category, leaving its expenses uncategorized.
    DeleteCategory {
        /// The ID of the category to delete.
        category_id: DatabaseID,
    },
    /// List expenses, newest first.
    Expenses,
    /// Record an expense.
    AddExpense {
        /// A short description of what the money was spent on.
        name: String,
        /// The amount of money spent.
        amount: f64,
        /// The date of the expense (YYYY-MM-DD), defaulting to today.
        #[arg(long)]
        date: Option<String>,
        /// The ID of the category the expense counts against.
        #[arg(long)]
        category_id: Option<DatabaseID>,
        /// A reference to an attached receipt.
        #[arg(long)]
        receipt: Option<String>,
    },
    /// Delete an expense.
    DeleteExpense {
        /// The ID of the expense to delete.
        expense_id: DatabaseID,
    },
    /// List subscriptions and their monthly total.
    Subscriptions,
    /// Record a subscription.
    AddSubscription {
        /// The display name of the subscription.
        name: String,
        /// The amount charged per billing cycle.
        amount: f64,
        /// The next billing date (YYYY-MM-DD).
        date: String,
    },
    /// List debts with what is still outstanding.
    Debts,
    /// Record a debt.
    AddDebt {
        /// The display name of the debt.
        name: String,
        /// The full amount owed.
        total_amount: f64,
        /// The amount paid off so far.
        paid_amount: f64,
        /// When the debt is due (YYYY-MM-DD).
        due_date: String,
    },
}

fn main() {
    setup_logging();

    let args = Args::parse();

    let connection = Connection::open(&args.db_path).expect("could not open the database");
    initialize(&connection).expect("could not set up the database schema");
    let connection = Arc::new(Mutex::new(connection));

    let app = App {
        authenticator: Authenticator::new(SQLiteUserStore::new(connection.clone())),
        ledger: Ledger::new(
            SQLiteLedgerStore::new(connection.clone()),
            SQLiteCategoryStore::new(connection.clone()),
            SQLiteUserStore::new(connection.clone()),
        ),
        categories: SQLiteCategoryStore::new(connection.clone()),
        expenses: SQLiteExpenseStore::new(connection.clone()),
        subscriptions: SQLiteSubscriptionStore::new(connection.clone()),
        debts: SQLiteDebtStore::new(connection),
        session: Session::new(),
        ids: IdGenerator::new(),
    };

    if let Err(error) = run(app, &args.username, args.command) {
        match error {
            Error::MissingUser => eprintln!("{error}"),
            error => eprintln!("error: {error}"),
        }
        std::process::exit(1);
    }
}

struct App {
    authenticator: Authenticator<SQLiteUserStore>,
    ledger: Ledger<SQLiteLedgerStore, SQLiteCategoryStore, SQLiteUserStore>,
    categories: SQLiteCategoryStore,
    expenses: SQLiteExpenseStore,
    subscriptions: SQLiteSubscriptionStore,
    debts: SQLiteDebtStore,
    session: Session,
    ids: IdGenerator,
}

fn run(mut app: App, username: &str, command: Command) -> Result<(), Error> {
    if let Command::Register = command {
        let password = prompt_password("Choose a password: ");
        let user_id = app.authenticator.register(username, &password)?;
        println!("Registered {username} with ID {user_id}.");
        return Ok(());
    }

    let user_id = sign_in(&app.authenticator, &app.session, username)?;

    match command {
        Command::Register => unreachable!("handled above"),
        Command::Categories => {
            for category in app.categories.get_by_user(user_id)? {
                println!(
                    "{:>20}  {}: {:.2} of {:.2} spent",
                    category.id, category.name, category.spent_amount, category.max_amount
                );
            }
        }
        Command::AddCategory { name, max_amount } => {
            let category =
                app.ledger
                    .create_category(user_id, CategoryName::new(&name)?, max_amount)?;
            println!("Created category {} with ID {}.", category.name, category.id);
        }
        Command::DeleteCategory { category_id } => {
            if app.ledger.delete_category(category_id, user_id)? {
                println!("Deleted category {category_id}.");
            } else {
                println!("No category with ID {category_id}.");
            }
        }
        Command::Expenses => {
            for expense in app.expenses.get_by_user(user_id)? {
                let category = match expense.category_id {
                    Some(category_id) => category_id.to_string(),
                    None => "uncategorized".to_string(),
                };
                println!(
                    "{:>20}  {}  {:<24} {:>10.2}  ({category})",
                    expense.id, expense.date, expense.name, expense.amount
                );
            }
        }
        Command::AddExpense {
            name,
            amount,
            date,
            category_id,
            receipt,
        } => {
            let date = parse_date_or_today(date.as_deref());
            let expense = app.ledger.create_expense(
                Expense::build(user_id, &name, amount, date)
                    .category_id(category_id)
                    .receipt_ref(receipt),
            )?;
            println!("Recorded expense {} with ID {}.", expense.name, expense.id);
        }
        Command::DeleteExpense { expense_id } => {
            if app.ledger.delete_expense(expense_id, user_id)? {
                println!("Deleted expense {expense_id}.");
            } else {
                println!("No expense with ID {expense_id}.");
            }
        }
        Command::Subscriptions => {
            let subscriptions = app.subscriptions.get_by_user(user_id)?;
            for subscription in &subscriptions {
                println!(
                    "{:>20}  {}  {:<24} {:>10.2}",
                    subscription.id, subscription.date, subscription.name, subscription.amount
                );
            }
            println!("Monthly total: {:.2}", monthly_total(&subscriptions));
        }
        Command::AddSubscription { name, amount, date } => {
            if amount <= 0.0 {
                return Err(Error::NonPositiveAmount(amount));
            }
            let subscription = app.subscriptions.create(Subscription {
                id: app.ids.generate(),
                user_id,
                name,
                amount,
                date: parse_date(&date),
                icon_ref: None,
                created_at: OffsetDateTime::now_utc(),
            })?;
            println!(
                "Recorded subscription {} with ID {}.",
                subscription.name, subscription.id
            );
        }
        Command::Debts => {
            for debt in app.debts.get_by_user(user_id)? {
                println!(
                    "{:>20}  {:<24} {:>10.2} outstanding (due {}, {:.0}% paid)",
                    debt.id,
                    debt.name,
                    debt.outstanding(),
                    debt.due_date,
                    debt.paid_ratio() * 100.0
                );
            }
        }
        Command::AddDebt {
            name,
            total_amount,
            paid_amount,
            due_date,
        } => {
            let debt = app.debts.create(Debt {
                id: app.ids.generate(),
                user_id,
                name,
                total_amount,
                paid_amount,
                due_date: parse_date(&due_date),
                created_at: OffsetDateTime::now_utc(),
            })?;
            println!("Recorded debt {} with ID {}.", debt.name, debt.id);
        }
    }

    Ok(())
}

fn sign_in(
    authenticator: &Authenticator<SQLiteUserStore>,
    session: &Session,
    username: &str,
) -> Result<UserID, Error> {
    let password = prompt_password("Password: ");

    match authenticator.authenticate(username, &password)? {
        Some(user_id) => {
            session.log_in(user_id);
            Ok(user_id)
        }
        None => {
            eprintln!("Invalid username or password.");
            std::process::exit(1);
        }
    }
}

fn prompt_password(prompt: &str) -> String {
    rpassword::prompt_password(prompt).expect("could not read the password")
}

fn parse_date(value: &str) -> Date {
    let format = format_description!("[year]-[month]-[day]");

    match Date::parse(value, &format) {
        Ok(date) => date,
        Err(error) => {
            eprintln!("Invalid date \"{value}\": {error}");
            std::process::exit(1);
        }
    }
}

fn parse_date_or_today(value: Option<&str>) -> Date {
    match value {
        Some(value) => parse_date(value),
        None => OffsetDateTime::now_utc().date(),
    }
}

fn setup_logging() {
    let stderr_log = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stderr_log
                .with_filter(filter::LevelFilter::WARN)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}
