use clap::Parser;
use phone_portal::adapters::export::export_numbers_csv;
use phone_portal::config::cli::{Cli, Command, EmailCommand, NumbersCommand, TicketsCommand};
use phone_portal::config::{LogFormat, PortalConfig};
use phone_portal::core::dashboard::{NumberDashboard, StatusFilter};
use phone_portal::domain::ports::TicketFilters;
use phone_portal::email::layout::format_money;
use phone_portal::utils::error::{PortalError, Result};
use phone_portal::utils::{logger, validation::Validate};
use phone_portal::{
    render_template, BulkCancelReport, HttpPortalClient, NumberPortal, TemplateKind, TicketAdmin,
};
use std::path::Path;
use std::sync::Arc;

const DEFAULT_CONFIG_PATH: &str = "phone-portal.toml";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = load_config(&cli);
    let json = cli.json_logs
        || matches!(&loaded, Ok(config) if config.log_format() == LogFormat::Json);
    if json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting phone-portal CLI");

    let result = match loaded {
        Ok(config) => run(cli.command, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.exit_code());
    }
}

fn load_config(cli: &Cli) -> Result<PortalConfig> {
    let mut config = if cli.config.exists() {
        PortalConfig::from_file(&cli.config)?
    } else if cli.config == Path::new(DEFAULT_CONFIG_PATH) {
        // 沒有預設設定檔時允許全靠命令列參數
        PortalConfig::default()
    } else {
        return Err(PortalError::MissingConfigError {
            field: format!("config file {}", cli.config.display()),
        });
    };

    config.apply_overrides(cli.base_url.clone(), cli.token.clone());

    match &cli.command {
        Command::Email(_) => config.validate_email_settings()?,
        _ => config.validate()?,
    }
    Ok(config)
}

async fn run(command: Command, config: PortalConfig) -> Result<()> {
    match command {
        Command::Numbers(action) => run_numbers(action, &config).await,
        Command::Reputation { number, refresh } => {
            let mut portal = number_portal(&config)?;
            let data = portal.reputation(&number, refresh).await?;

            println!("📡 {} ({})", number, data.risk_label());
            println!("   Danger level: {}/100", data.danger_level);
            println!("   Comments: {}", data.total_comments.max(data.comments.len()));
            for comment in data.comments.iter().take(5) {
                println!("   - {}", comment.text);
            }
            if let Some(checked) = data.last_checked {
                println!("   Last checked: {}", checked.format("%Y-%m-%d %H:%M"));
            }
            Ok(())
        }
        Command::Tickets(action) => run_tickets(action, &config).await,
        Command::Email(action) => run_email(action, &config),
    }
}

fn number_portal(config: &PortalConfig) -> Result<NumberPortal<HttpPortalClient>> {
    let client = Arc::new(HttpPortalClient::from_config(config)?);
    let dashboard = NumberDashboard::new(config.items_per_page())?;
    Ok(NumberPortal::new(client, dashboard, config.cancellation_options()))
}

fn apply_filters(dashboard: &mut NumberDashboard, search: Option<String>, status: StatusFilter) {
    if let Some(search) = search {
        dashboard.set_search_term(search);
    }
    dashboard.set_status_filter(status);
}

async fn run_numbers(action: NumbersCommand, config: &PortalConfig) -> Result<()> {
    match action {
        NumbersCommand::List {
            search,
            status,
            page,
            page_size,
        } => {
            let mut portal = number_portal(config)?;
            portal.load().await?;

            let dashboard = portal.dashboard_mut();
            if let Some(size) = page_size {
                dashboard.set_page_size(size)?;
            }
            apply_filters(dashboard, search, status);
            dashboard.go_to_page(page);

            print_numbers(portal.dashboard());
            Ok(())
        }
        NumbersCommand::Export {
            output,
            search,
            status,
        } => {
            phone_portal::utils::validation::validate_file_extension(
                "output",
                &output.to_string_lossy(),
                &["csv"],
            )?;

            let mut portal = number_portal(config)?;
            portal.load().await?;
            apply_filters(portal.dashboard_mut(), search, status);

            let count = export_numbers_csv(portal.dashboard(), &output)?;
            println!("📁 Exported {} numbers to {}", count, output.display());
            Ok(())
        }
        NumbersCommand::Cancel {
            numbers,
            reason,
            priority,
            no_rollback,
        } => {
            let mut options = config.cancellation_options();
            if let Some(reason) = reason {
                options.reason = reason;
            }
            if let Some(priority) = priority {
                options.priority = priority;
            }
            if no_rollback {
                options.rollback_on_failure = false;
            }

            let client = Arc::new(HttpPortalClient::from_config(config)?);
            let dashboard = NumberDashboard::new(config.items_per_page())?;
            let mut portal = NumberPortal::new(client, dashboard, options);
            portal.load().await?;

            for number in &numbers {
                if !portal.dashboard().selection().contains(number) {
                    portal.dashboard_mut().toggle_selection(number)?;
                }
            }

            let report = portal.cancel_selected().await?;
            print_cancel_report(&report);
            report.into_result().map(|_| ())
        }
        NumbersCommand::Backorder {
            number,
            reason,
            priority,
        } => {
            let mut portal = number_portal(config)?;
            let created = portal.request_backorder(&number, &reason, priority).await?;
            println!(
                "✅ Backorder request {} submitted for {} ({})",
                created.id,
                created.phone_number,
                created.priority.as_str()
            );
            Ok(())
        }
    }
}

fn print_numbers(dashboard: &NumberDashboard) {
    let summary = dashboard.summary();
    println!(
        "📊 {} numbers, monthly cost {}, {} open requests, {} open backorders",
        summary.total_numbers,
        format_money(summary.monthly_cost, "USD"),
        summary.pending_requests,
        summary.pending_backorders
    );

    let rows = dashboard.paginated();
    if rows.is_empty() {
        println!("No phone numbers match the current filters.");
        return;
    }

    println!(
        "{:<18} {:<16} {:<10} {:<22} {:>10}",
        "NUMBER", "COUNTRY", "TYPE", "STATUS", "MONTHLY"
    );
    for number in &rows {
        println!(
            "{:<18} {:<16} {:<10} {:<22} {:>10}",
            number.number,
            number.country,
            number.number_type.as_str(),
            dashboard.display_status(number).as_str(),
            format_money(number.monthly_rate, &number.currency)
        );
    }

    let filtered = dashboard.filtered().len();
    if let Some((start, end)) = dashboard.paginator().item_range(filtered) {
        let window = dashboard
            .page_window()
            .iter()
            .map(|p| {
                if *p == dashboard.current_page() {
                    format!("[{}]", p)
                } else {
                    p.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "Showing {}-{} of {} | page {} of {} | {}",
            start,
            end,
            filtered,
            dashboard.current_page(),
            dashboard.total_pages(),
            window
        );
    }
}

fn print_cancel_report(report: &BulkCancelReport) {
    for request in &report.succeeded {
        println!("✅ {} cancellation requested ({})", request.phone_number, request.id);
    }
    for failure in &report.failed {
        println!("❌ {}: {}", failure.number, failure.message);
    }
    for number in &report.rolled_back {
        println!("↩️ {} request withdrawn", number);
    }
    for failure in &report.rollback_failed {
        println!("⚠️ {} could not be withdrawn: {}", failure.number, failure.message);
    }
}

async fn run_tickets(action: TicketsCommand, config: &PortalConfig) -> Result<()> {
    let client = Arc::new(HttpPortalClient::from_config(config)?);

    match action {
        TicketsCommand::List { filters } => {
            let mut admin = TicketAdmin::new(client, TicketFilters::from(filters));
            admin.refresh().await?;

            let stats = admin.console().stats();
            println!(
                "📊 {} tickets: {} open, {} in progress, {} waiting, {} resolved, {} closed, {} unassigned, {} urgent",
                stats.total,
                stats.open,
                stats.in_progress,
                stats.waiting_user,
                stats.resolved,
                stats.closed,
                stats.unassigned,
                stats.urgent
            );
            for ticket in admin.console().tickets() {
                println!(
                    "{:<26} {:<14} {:<8} {:<16} {}",
                    ticket.ticket_number.as_deref().unwrap_or(&ticket.id),
                    ticket.status.as_str(),
                    ticket.priority.as_str(),
                    ticket.assigned_to.as_deref().unwrap_or("-"),
                    ticket.subject
                );
            }
            Ok(())
        }
        TicketsCommand::Assign { ids, to } => {
            let mut admin = TicketAdmin::new(client, TicketFilters::default());
            admin.refresh().await?;
            select_tickets(&mut admin, &ids)?;

            let updated = admin.bulk_assign(&to).await?;
            println!("✅ Assigned {} tickets to {}", updated, to);
            Ok(())
        }
        TicketsCommand::Status { ids, status } => {
            let mut admin = TicketAdmin::new(client, TicketFilters::default());
            admin.refresh().await?;
            select_tickets(&mut admin, &ids)?;

            let updated = admin.bulk_update_status(status).await?;
            println!("✅ Moved {} tickets to {}", updated, status.as_str());
            Ok(())
        }
    }
}

fn select_tickets(admin: &mut TicketAdmin<HttpPortalClient>, ids: &[String]) -> Result<()> {
    for id in ids {
        if admin.console().find(id).is_none() {
            tracing::warn!("⚠️ Ticket {} is not in the current list, skipping", id);
            continue;
        }
        if !admin.console().selection().contains(id) {
            admin.console_mut().toggle_selection(id)?;
        }
    }
    Ok(())
}

fn run_email(action: EmailCommand, config: &PortalConfig) -> Result<()> {
    match action {
        EmailCommand::List => {
            for kind in TemplateKind::ALL {
                println!("{}", kind);
            }
            Ok(())
        }
        EmailCommand::Render { kind, data, out } => {
            let raw = std::fs::read_to_string(&data)?;
            let value: serde_json::Value = serde_json::from_str(&raw)?;
            let email = render_template(kind, value, &config.branding())?;

            match out {
                Some(dir) => {
                    std::fs::create_dir_all(&dir)?;
                    let html_path = dir.join(format!("{}.html", kind));
                    let text_path = dir.join(format!("{}.txt", kind));
                    std::fs::write(&html_path, &email.html)?;
                    std::fs::write(&text_path, format!("Subject: {}\n\n{}", email.subject, email.text))?;
                    println!("📁 {} -> {}", kind, html_path.display());
                    println!("📁 {} -> {}", kind, text_path.display());
                }
                None => {
                    println!("Subject: {}\n", email.subject);
                    println!("{}", email.text);
                }
            }
            Ok(())
        }
    }
}
