//! Clap derive structures for the `stride` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// stride -- kubectl-style CLI for running-club administration
#[derive(Debug, Parser)]
#[command(
    name = "stride",
    version,
    about = "Administer a running club from the command line",
    long_about = "Manage running-club members, running records, and training groups\n\
        on a stride server through its JSON REST API.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "STRIDE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 'c', env = "STRIDE_SERVER", global = true)]
    pub server: Option<String>,

    /// API bearer token
    #[arg(long, env = "STRIDE_API_TOKEN", global = true, hide_env = true)]
    pub api_token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "STRIDE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "STRIDE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "STRIDE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage club members
    #[command(alias = "member", alias = "m")]
    Members(MembersArgs),

    /// Manage running records
    #[command(alias = "record", alias = "r")]
    Records(RecordsArgs),

    /// Manage training groups
    #[command(alias = "group", alias = "g")]
    Groups(GroupsArgs),

    /// View and update the signed-in account
    Account(AccountArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared pagination arguments for all list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Zero-based page index
    #[arg(long, default_value = "0")]
    pub page: u32,

    /// Records per page (overrides profile page_size)
    #[arg(long, short = 's')]
    pub size: Option<u32>,

    /// Sort expression, e.g. "id,asc" or "recordDate,desc"
    #[arg(long)]
    pub sort: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MEMBERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MembersArgs {
    #[command(subcommand)]
    pub command: MembersCommand,
}

#[derive(Debug, Subcommand)]
pub enum MembersCommand {
    /// List club members
    #[command(alias = "ls")]
    List(ListArgs),

    /// Get member details
    Get {
        /// Member id
        id: i64,
    },

    /// Register a new member
    Create {
        /// Login name (unique on the server)
        #[arg(long)]
        login: String,

        /// Display nickname
        #[arg(long)]
        nickname: Option<String>,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Training group id
        #[arg(long)]
        group: Option<i64>,
    },

    /// Update an existing member
    Update {
        /// Member id
        id: i64,

        /// New login name
        #[arg(long)]
        login: Option<String>,

        /// New nickname
        #[arg(long)]
        nickname: Option<String>,

        /// New email address
        #[arg(long)]
        email: Option<String>,

        /// New training group id
        #[arg(long)]
        group: Option<i64>,
    },

    /// Freeze a member (keeps history, blocks new runs)
    Freeze {
        /// Member id
        id: i64,
    },

    /// Reactivate a frozen member
    Activate {
        /// Member id
        id: i64,
    },

    /// Delete a member
    #[command(alias = "rm")]
    Delete {
        /// Member id
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RECORDS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RecordsArgs {
    #[command(subcommand)]
    pub command: RecordsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecordsCommand {
    /// List running records
    #[command(alias = "ls")]
    List(ListArgs),

    /// Get record details
    Get {
        /// Record id
        id: i64,
    },

    /// Log a new run for a member
    Create {
        /// Member id the run belongs to
        #[arg(long)]
        user: i64,

        /// Distance in meters
        #[arg(long)]
        distance: u32,

        /// Duration in seconds
        #[arg(long)]
        duration: u32,

        /// Run date (RFC 3339, e.g. 2026-08-30T07:00:00Z); defaults to now
        #[arg(long)]
        date: Option<chrono::DateTime<chrono::Utc>>,
    },

    /// Update an existing record
    Update {
        /// Record id
        id: i64,

        /// New distance in meters
        #[arg(long)]
        distance: Option<u32>,

        /// New duration in seconds
        #[arg(long)]
        duration: Option<u32>,

        /// New run date (RFC 3339)
        #[arg(long)]
        date: Option<chrono::DateTime<chrono::Utc>>,
    },

    /// Mark a record as verified
    Verify {
        /// Record id
        id: i64,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record id
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GROUPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// List training groups
    #[command(alias = "ls")]
    List(ListArgs),

    /// Get group details
    Get {
        /// Group id
        id: i64,
    },

    /// Create a training group
    Create {
        /// Group name
        #[arg(long)]
        name: String,

        /// Member id of the group leader
        #[arg(long)]
        leader: Option<i64>,
    },

    /// Update an existing group
    Update {
        /// Group id
        id: i64,

        /// New group name
        #[arg(long)]
        name: Option<String>,

        /// New leader member id
        #[arg(long)]
        leader: Option<i64>,
    },

    /// Delete a group
    #[command(alias = "rm")]
    Delete {
        /// Group id
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACCOUNT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Show the signed-in account
    Show,

    /// Update the signed-in account's profile
    Update {
        /// First name
        #[arg(long)]
        first_name: Option<String>,

        /// Last name
        #[arg(long)]
        last_name: Option<String>,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Language key for server-rendered mail (e.g. "en")
        #[arg(long)]
        lang: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an API token in the system keyring
    SetToken {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },

    /// Remove a profile's API token from the system keyring
    ClearToken {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
