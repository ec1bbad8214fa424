use crate::export::ExportFormat;
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for artcenter
#[derive(Parser)]
#[command(
    name = "artcenter",
    version = env!("CARGO_PKG_VERSION"),
    about = "Classes, enrollments, attendance and tuition reporting for an arts-education center",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their default values")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage classes and their weekly schedule
    Class {
        #[command(subcommand)]
        action: ClassAction,
    },

    /// Manage students
    Student {
        #[command(subcommand)]
        action: PersonAction,
    },

    /// Manage teachers
    Teacher {
        #[command(subcommand)]
        action: PersonAction,
    },

    /// Manage enrollments
    Enroll {
        #[command(subcommand)]
        action: EnrollAction,
    },

    /// Record attendance for one session
    Attend {
        /// Class id
        class: String,

        /// Session date (YYYY-MM-DD)
        date: String,

        /// Period: morning, afternoon or evening
        period: String,

        /// Person id (a student unless --teacher)
        person: String,

        #[arg(long = "teacher", help = "The person is a teacher")]
        teacher: bool,

        #[arg(long = "absent", help = "Record the person as absent")]
        absent: bool,
    },

    /// Show the attendance sheet of a class for one date
    Roll {
        /// Class id
        class: String,

        /// Date (YYYY-MM-DD)
        date: String,
    },

    /// List attendance records over a range
    Attendance {
        #[arg(long, short, help = "Range: YYYY, YYYY-MM, YYYY-MM-DD or start:end")]
        range: String,

        #[arg(long = "class", help = "Only this class")]
        class: Option<String>,

        #[arg(long = "person", help = "Only this person")]
        person: Option<String>,

        #[arg(long = "teacher", requires = "person", help = "--person is a teacher")]
        teacher: bool,
    },

    /// Tuition fees
    Fee {
        #[command(subcommand)]
        action: FeeAction,
    },

    /// Recorded expenses
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },

    /// Monthly revenue / expenses / profit for a year
    Report {
        #[arg(long, help = "Calendar year")]
        year: i32,

        #[arg(long, value_enum, requires = "file")]
        format: Option<ExportFormat>,

        #[arg(long, value_name = "FILE", help = "Absolute output path")]
        file: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Run the data-quality audit
    Audit {
        #[arg(long, help = "Audit date (YYYY-MM-DD, default today)")]
        date: Option<String>,

        #[arg(long, short, help = "Also check attendance in this range")]
        range: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ClassAction {
    /// Add or update a class
    Add {
        /// Class id, e.g. Piano-A3
        id: String,

        #[arg(long, help = "Subject (must be one of the configured subjects)")]
        subject: String,

        #[arg(
            long = "slot",
            value_name = "DAY:PERIOD",
            help = "Weekly slot, e.g. mon:morning (repeatable)"
        )]
        slots: Vec<String>,

        #[arg(long, help = "Display name (defaults to the id)")]
        name: Option<String>,

        #[arg(long, help = "Monthly fee in VND")]
        fee: Option<i64>,
    },

    /// List classes
    List,

    /// Show the dated sessions of a class
    Sessions {
        /// Class id
        id: String,

        #[arg(long, short, help = "Range: YYYY, YYYY-MM, YYYY-MM-DD or start:end")]
        range: String,
    },
}

#[derive(Subcommand)]
pub enum PersonAction {
    /// Add or update a person
    Add {
        /// Person id
        id: String,

        #[arg(long, help = "Full name")]
        name: String,

        #[arg(long)]
        phone: Option<String>,
    },

    /// List persons
    List,
}

#[derive(Subcommand)]
pub enum EnrollAction {
    /// Enroll a person in a class
    Add {
        /// Person id (a student unless --teacher)
        person: String,

        /// Class id
        class: String,

        #[arg(long = "teacher", help = "The person is a teacher")]
        teacher: bool,

        #[arg(long, default_value = "active", help = "trial or active")]
        status: String,

        #[arg(long, help = "First covered date (YYYY-MM-DD)")]
        start: String,

        #[arg(long, help = "Last covered date (YYYY-MM-DD), open-ended if omitted")]
        end: Option<String>,
    },

    /// Change the status of an enrollment
    Status {
        /// Enrollment id
        id: i64,

        /// New status: active or inactive
        status: String,

        #[arg(long, help = "End date (YYYY-MM-DD)")]
        end: Option<String>,
    },

    /// List enrollments
    List {
        #[arg(long = "class")]
        class: Option<String>,
    },

    /// Check whether a person may attend a class on a date
    Check {
        person: String,
        class: String,
        date: String,

        #[arg(long = "teacher")]
        teacher: bool,
    },

    /// Persons without an enrollment covering a date
    Unenrolled {
        #[arg(long, help = "Date (YYYY-MM-DD, default today)")]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum FeeAction {
    /// Compute the tuition of a student in a class for one month
    Quote {
        person: String,
        class: String,

        #[arg(long, help = "Month (YYYY-MM)")]
        month: String,
    },

    /// Set the monthly fee of a subject on all its classes
    Set { subject: String, amount: i64 },

    /// Show the current fee table
    List,
}

#[derive(Subcommand)]
pub enum ExpenseAction {
    /// Record an expense
    Add(ExpenseArgs),

    /// List expenses
    List {
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Args)]
pub struct ExpenseArgs {
    #[arg(long, help = "Reason, e.g. \"Lương T1/2024\" for a teacher salary")]
    pub reason: String,

    #[arg(long, help = "Amount in VND")]
    pub amount: i64,

    #[arg(long)]
    pub month: u32,

    #[arg(long)]
    pub year: i32,
}
