use clap::Parser;
use phone_portal::email::layout::escape_html;
use phone_portal::email::samples::sample_data;
use phone_portal::utils::logger;
use phone_portal::{render_template, Branding, PortalConfig, TemplateKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "email-preview")]
#[command(about = "Render every notification template with sample data")]
struct Args {
    /// 讀取 [email] 設定的 TOML 檔
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = "email-preview")]
    out: PathBuf,

    /// 只渲染指定的範本
    #[arg(long)]
    only: Option<TemplateKind>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    if let Err(e) = run(&args) {
        tracing::error!("❌ Preview failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }
}

fn run(args: &Args) -> phone_portal::Result<()> {
    let branding = match &args.config {
        Some(path) => {
            tracing::info!("📂 Loading branding from {}", path.display());
            let config = PortalConfig::from_file(path)?;
            config.validate_email_settings()?;
            config.branding()
        }
        None => Branding::default(),
    };

    std::fs::create_dir_all(&args.out)?;

    let kinds: Vec<TemplateKind> = match args.only {
        Some(kind) => vec![kind],
        None => TemplateKind::ALL.to_vec(),
    };

    let mut index = String::from("<!DOCTYPE html><html><head><meta charset=\"utf-8\" /><title>Email previews</title></head><body><h1>Email previews</h1><ul>");

    for kind in &kinds {
        let email = render_template(*kind, sample_data(*kind), &branding)?;

        std::fs::write(args.out.join(format!("{}.html", kind)), &email.html)?;
        std::fs::write(
            args.out.join(format!("{}.txt", kind)),
            format!("Subject: {}\n\n{}", email.subject, email.text),
        )?;

        index.push_str(&format!(
            "<li><a href=\"{kind}.html\">{kind}</a> ({subject}) &middot; <a href=\"{kind}.txt\">text</a></li>",
            kind = kind,
            subject = escape_html(&email.subject)
        ));
        tracing::debug!("Rendered {}", kind);
    }

    index.push_str("</ul></body></html>");
    let index_path = args.out.join("index.html");
    std::fs::write(&index_path, index)?;

    tracing::info!("📁 Wrote {} previews to {}", kinds.len(), args.out.display());
    println!("✅ {} templates rendered, open {}", kinds.len(), index_path.display());
    Ok(())
}
