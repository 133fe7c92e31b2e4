use crate::core::dashboard::StatusFilter;
use crate::domain::model::{Priority, TicketStatus};
use crate::domain::ports::{AssignmentFilter, TicketFilters};
use crate::email::TemplateKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "phone-portal")]
#[command(version, about = "Manage phone numbers, support tickets and notification emails")]
pub struct Cli {
    #[arg(long, short, default_value = "phone-portal.toml", help = "Path to the TOML configuration file")]
    pub config: PathBuf,

    #[arg(long, help = "Override api.base_url")]
    pub base_url: Option<String>,

    #[arg(long, help = "Override api.token")]
    pub token: Option<String>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 號碼儀表板
    #[command(subcommand)]
    Numbers(NumbersCommand),

    /// 查詢號碼信譽
    Reputation {
        number: String,

        #[arg(long, help = "Run a fresh lookup instead of using stored data")]
        refresh: bool,
    },

    /// 管理端工單
    #[command(subcommand)]
    Tickets(TicketsCommand),

    /// 通知信範本
    #[command(subcommand)]
    Email(EmailCommand),
}

#[derive(Debug, Subcommand)]
pub enum NumbersCommand {
    List {
        #[arg(long, help = "Match number, country or area code")]
        search: Option<String>,

        #[arg(long, default_value = "all", help = "all, assigned, pending_cancellation, cancelled, suspended, ...")]
        status: StatusFilter,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long, help = "One of 6, 12, 24, 48, 96")]
        page_size: Option<usize>,
    },

    Export {
        #[arg(long, short)]
        output: PathBuf,

        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },

    Cancel {
        #[arg(required = true, num_args = 1..)]
        numbers: Vec<String>,

        #[arg(long)]
        reason: Option<String>,

        #[arg(long)]
        priority: Option<Priority>,

        #[arg(long, help = "Keep successful requests even if others fail")]
        no_rollback: bool,
    },

    Backorder {
        number: String,

        #[arg(long, default_value = "Requested from command line")]
        reason: String,

        #[arg(long, default_value = "medium")]
        priority: Priority,
    },
}

#[derive(Debug, Subcommand)]
pub enum TicketsCommand {
    List {
        #[command(flatten)]
        filters: TicketFilterArgs,
    },

    Assign {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,

        #[arg(long)]
        to: String,
    },

    Status {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,

        #[arg(long)]
        status: TicketStatus,
    },
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct TicketFilterArgs {
    #[arg(long)]
    pub status: Option<TicketStatus>,

    #[arg(long)]
    pub priority: Option<Priority>,

    #[arg(long, help = "any, unassigned or a user id")]
    pub assigned: Option<AssignmentFilter>,

    #[arg(long)]
    pub search: Option<String>,
}

impl From<TicketFilterArgs> for TicketFilters {
    fn from(args: TicketFilterArgs) -> Self {
        TicketFilters {
            status: args.status,
            priority: args.priority,
            assigned: args.assigned.unwrap_or_default(),
            search: args.search,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    Render {
        kind: TemplateKind,

        #[arg(long, help = "JSON file with the template data")]
        data: PathBuf,

        #[arg(long, help = "Write subject/html/text files here instead of stdout")]
        out: Option<PathBuf>,
    },

    /// 列出所有範本名稱
    List,
}
