//! These structs provide the CLI interface for the fintrack CLI.

use crate::metrics::{GoalOrder, SortField, TransactionQuery, Window};
use crate::model::{
    Amount, GoalUpdate, NewGoal, NewTransaction, TransactionType, TransactionUpdate,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// fintrack: A command-line tool for tracking personal finances.
///
/// Record income and expenses, track progress towards savings goals, view a monthly dashboard
/// and back everything up to a single JSON file. All data stays on your machine, in the
/// directory given by --fintrack-home.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the fintrack home directory and its configuration file.
    ///
    /// This is the first command you should run. The first time the data directory is opened it
    /// is filled with sample categories, transactions and goals so that there is something to
    /// look at. Use `fintrack reset --yes` followed by `fintrack import` to start from your own
    /// data instead.
    Init,
    /// List, add, update or delete transactions.
    Tx(TxArgs),
    /// List, add, update, contribute to or delete savings goals.
    Goal(GoalArgs),
    /// List the categories.
    Categories,
    /// Show this month's totals, the expense breakdown and the last six months.
    Dashboard,
    /// Write all data to a JSON backup file.
    Export(ExportArgs),
    /// Replace all data with the contents of a JSON backup file.
    Import(ImportArgs),
    /// Delete all transactions, goals and categories.
    Reset(ResetArgs),
    /// Show the most recent exports.
    History,
    /// Show or set the dark mode preference.
    DarkMode(DarkModeArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where fintrack data and configuration is held. Defaults to ~/fintrack
    #[arg(long, env = "FINTRACK_HOME", default_value_t = default_fintrack_home())]
    fintrack_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, fintrack_home: PathBuf) -> Self {
        Self {
            log_level,
            fintrack_home: fintrack_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn fintrack_home(&self) -> &DisplayPath {
        &self.fintrack_home
    }
}

/// (Not shown): Args for the `fintrack tx` command.
#[derive(Debug, Parser, Clone)]
pub struct TxArgs {
    #[command(subcommand)]
    command: TxCommand,
}

impl TxArgs {
    pub fn new(command: TxCommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &TxCommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum TxCommand {
    /// List transactions, newest first unless --sort says otherwise.
    List(TxListArgs),
    /// Record a new income or expense.
    Add(TxAddArgs),
    /// Change fields of an existing transaction. Fields that are not given are kept.
    Update(TxUpdateArgs),
    /// Delete a transaction.
    Delete(IdArgs),
}

/// (Not shown): Args for the `fintrack tx list` command.
#[derive(Debug, Parser, Clone)]
pub struct TxListArgs {
    /// Which period to show: week, month, <n>months (e.g. 3months) or all
    #[arg(long, default_value_t = Window::Month)]
    window: Window,

    /// Only show transactions of this category id
    #[arg(long)]
    category: Option<String>,

    /// Only show income or expense transactions
    #[arg(long = "type")]
    kind: Option<TransactionType>,

    /// Only show transactions whose description contains this text, ignoring case
    #[arg(long)]
    search: Option<String>,

    /// The field to sort by: date, description, amount or category
    #[arg(long, default_value_t = SortField::Date)]
    sort: SortField,

    /// Sort ascending instead of descending
    #[arg(long)]
    asc: bool,
}

impl TxListArgs {
    pub fn query(&self) -> TransactionQuery {
        TransactionQuery {
            window: self.window,
            category: self.category.clone(),
            kind: self.kind,
            search: self.search.clone(),
            sort: self.sort,
            descending: !self.asc,
        }
    }
}

impl From<TransactionQuery> for TxListArgs {
    fn from(query: TransactionQuery) -> Self {
        Self {
            window: query.window,
            category: query.category,
            kind: query.kind,
            search: query.search,
            sort: query.sort,
            asc: !query.descending,
        }
    }
}

/// (Not shown): Args for the `fintrack tx add` command.
#[derive(Debug, Parser, Clone)]
pub struct TxAddArgs {
    /// What the money was for
    description: String,

    /// The amount, always positive, e.g. 42.50
    #[arg(long)]
    amount: Amount,

    /// income or expense
    #[arg(long = "type", default_value_t = TransactionType::Expense)]
    kind: TransactionType,

    /// The category id, see `fintrack categories`
    #[arg(long)]
    category: String,

    /// The date as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl TxAddArgs {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<Amount>,
        kind: TransactionType,
        category: impl Into<String>,
        date: Option<NaiveDate>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            kind,
            category: category.into(),
            date,
        }
    }

    /// The transaction to create, dated `today` unless a date was given.
    pub fn new_transaction(&self, today: NaiveDate) -> NewTransaction {
        NewTransaction {
            description: self.description.clone(),
            amount: self.amount,
            kind: self.kind,
            category: self.category.clone(),
            date: self.date.unwrap_or(today),
        }
    }
}

/// (Not shown): Args for the `fintrack tx update` command.
#[derive(Debug, Parser, Clone)]
pub struct TxUpdateArgs {
    /// The id of the transaction to change
    id: String,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    amount: Option<Amount>,

    #[arg(long = "type")]
    kind: Option<TransactionType>,

    #[arg(long)]
    category: Option<String>,

    /// The date as YYYY-MM-DD
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl TxUpdateArgs {
    pub fn new(id: impl Into<String>, update: TransactionUpdate) -> Self {
        Self {
            id: id.into(),
            description: update.description,
            amount: update.amount,
            kind: update.kind,
            category: update.category,
            date: update.date,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn update(&self) -> TransactionUpdate {
        TransactionUpdate {
            description: self.description.as_deref().map(|s| s.trim().to_string()),
            amount: self.amount,
            kind: self.kind,
            category: self.category.clone(),
            date: self.date,
        }
    }
}

/// (Not shown): Args for commands that only need an id.
#[derive(Debug, Parser, Clone)]
pub struct IdArgs {
    id: String,
}

impl IdArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// (Not shown): Args for the `fintrack goal` command.
#[derive(Debug, Parser, Clone)]
pub struct GoalArgs {
    #[command(subcommand)]
    command: GoalCommand,
}

impl GoalArgs {
    pub fn new(command: GoalCommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &GoalCommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum GoalCommand {
    /// List goals with their progress and an overall summary.
    List(GoalListArgs),
    /// Create a new savings goal.
    Add(GoalAddArgs),
    /// Change fields of an existing goal. Fields that are not given are kept.
    Update(GoalUpdateArgs),
    /// Add money to a goal.
    Contribute(ContributeArgs),
    /// Delete a goal.
    Delete(IdArgs),
}

/// (Not shown): Args for the `fintrack goal list` command.
#[derive(Debug, Parser, Clone)]
pub struct GoalListArgs {
    /// The order: progress, deadline or amount
    #[arg(long, default_value_t = GoalOrder::Progress)]
    sort: GoalOrder,
}

impl GoalListArgs {
    pub fn new(sort: GoalOrder) -> Self {
        Self { sort }
    }

    pub fn sort(&self) -> GoalOrder {
        self.sort
    }
}

/// (Not shown): Args for the `fintrack goal add` command.
#[derive(Debug, Parser, Clone)]
pub struct GoalAddArgs {
    /// The name of the goal
    name: String,

    /// The amount to save
    #[arg(long)]
    target: Amount,

    /// The date to reach the target by, as YYYY-MM-DD
    #[arg(long)]
    deadline: NaiveDate,

    /// An emoji shown next to the name
    #[arg(long)]
    icon: Option<String>,
}

impl GoalAddArgs {
    pub fn new(
        name: impl Into<String>,
        target: impl Into<Amount>,
        deadline: NaiveDate,
        icon: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            deadline,
            icon,
        }
    }

    pub fn new_goal(&self) -> NewGoal {
        NewGoal {
            name: self.name.clone(),
            icon: self.icon.clone(),
            target_amount: self.target,
            deadline: self.deadline,
        }
    }
}

/// (Not shown): Args for the `fintrack goal update` command.
#[derive(Debug, Parser, Clone)]
pub struct GoalUpdateArgs {
    /// The id of the goal to change
    id: String,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    icon: Option<String>,

    #[arg(long)]
    target: Option<Amount>,

    /// Overwrites the amount saved so far
    #[arg(long)]
    current: Option<Amount>,

    /// The date as YYYY-MM-DD
    #[arg(long)]
    deadline: Option<NaiveDate>,
}

impl GoalUpdateArgs {
    pub fn new(id: impl Into<String>, update: GoalUpdate) -> Self {
        Self {
            id: id.into(),
            name: update.name,
            icon: update.icon,
            target: update.target_amount,
            current: update.current_amount,
            deadline: update.deadline,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn update(&self) -> GoalUpdate {
        GoalUpdate {
            name: self.name.as_deref().map(|s| s.trim().to_string()),
            icon: self.icon.clone(),
            target_amount: self.target,
            current_amount: self.current,
            deadline: self.deadline,
        }
    }
}

/// (Not shown): Args for the `fintrack goal contribute` command.
#[derive(Debug, Parser, Clone)]
pub struct ContributeArgs {
    /// The id of the goal
    id: String,

    /// The amount to add
    amount: Amount,
}

impl ContributeArgs {
    pub fn new(id: impl Into<String>, amount: impl Into<Amount>) -> Self {
        Self {
            id: id.into(),
            amount: amount.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// (Not shown): Args for the `fintrack export` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ExportArgs {
    /// The directory to write the backup to. Defaults to $FINTRACK_HOME/backups
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self { output }
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

/// (Not shown): Args for the `fintrack import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// The backup file, as written by `fintrack export`
    file: PathBuf,

    /// Replace the current data. Without this the backup is only checked and summarized.
    #[arg(long)]
    yes: bool,
}

impl ImportArgs {
    pub fn new(file: impl Into<PathBuf>, yes: bool) -> Self {
        Self {
            file: file.into(),
            yes,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// (Not shown): Args for the `fintrack reset` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ResetArgs {
    /// Really delete everything. This cannot be undone, so export first.
    #[arg(long)]
    yes: bool,
}

impl ResetArgs {
    pub fn new(yes: bool) -> Self {
        Self { yes }
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnOff {
    On,
    Off,
}

serde_plain::derive_display_from_serialize!(OnOff);
serde_plain::derive_fromstr_from_deserialize!(OnOff);

/// (Not shown): Args for the `fintrack dark-mode` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct DarkModeArgs {
    /// "on" or "off". Leave out to show the current setting.
    state: Option<OnOff>,
}

impl DarkModeArgs {
    pub fn new(state: Option<OnOff>) -> Self {
        Self { state }
    }

    /// The requested setting, `None` to only show it.
    pub fn state(&self) -> Option<bool> {
        self.state.map(|s| s == OnOff::On)
    }
}

fn default_fintrack_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("fintrack"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --fintrack-home or FINTRACK_HOME instead of relying on the \
                default fintrack home directory. If you continue using the program right now, \
                you may have problems!",
            );
            PathBuf::from("fintrack")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
