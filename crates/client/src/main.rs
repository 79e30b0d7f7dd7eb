mod prompt;
mod render;

use api_types::post::MediaType;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use engine::{DateRange, MonthSelection};
use gramstats::{
    Dashboard, GuardView, PostsMode, RefreshOutcome, TokenRefreshForm,
    config::{self, ConfigArgs},
    error::Result,
    route::{LOGIN_ROUTE, SETUP_ROUTE, monthly_route, posts_route, yearly_route},
};

#[derive(Parser, Debug)]
#[command(name = "gramstats")]
#[command(about = "Instagram analytics dashboard client")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session token.
    Login {
        #[arg(long)]
        username: String,
    },
    /// Forget the persisted session token.
    Logout,
    /// Create a backend user.
    Register {
        #[arg(long)]
        username: String,
    },
    /// List the accounts visible to the signed-in user.
    Accounts,
    /// Month-by-month statistics of one year.
    Yearly {
        #[arg(long)]
        account: String,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Day-by-day statistics of one month (defaults to the previous month).
    Monthly {
        #[arg(long)]
        account: String,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Posts with engagement, optionally filtered.
    Posts {
        #[arg(long)]
        account: String,
        /// First day included (YYYY-MM-DD).
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day included (YYYY-MM-DD).
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Media type to keep; repeat for several.
        #[arg(long = "type")]
        media_types: Vec<String>,
        #[arg(long, value_enum)]
        mode: Option<PostsMode>,
    },
    /// Refresh long-lived account tokens; the app secret is prompted.
    RefreshTokens {
        #[arg(long)]
        app_id: String,
        #[arg(long, env = "GRAMSTATS_ACCESS_TOKEN")]
        access_token: String,
    },
}

/// Message for a guard outcome that blocks the page.
fn blocked_reason(view: &GuardView) -> Option<String> {
    match view {
        GuardView::Render => None,
        GuardView::Redirect(to) if to == LOGIN_ROUTE => {
            Some("not signed in; run `gramstats login --username <name>`".to_string())
        }
        GuardView::Redirect(to) => Some(format!("redirected to {to}")),
        GuardView::Placeholder => Some("session not resolved".to_string()),
    }
}

/// Exits when the guard does not let the page render.
fn require_render(view: GuardView) {
    if let Some(reason) = blocked_reason(&view) {
        eprintln!("{reason}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "gramstats={level},engine={level}",
            level = settings.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    if let Command::Posts {
        mode: Some(mode), ..
    } = &cli.command
    {
        settings.posts_mode = *mode;
    }

    let mut dashboard = Dashboard::from_config(&settings)?;
    dashboard.start();

    match cli.command {
        Command::Login { username } => {
            let password = prompt::prompt_secret("Password: ")?;
            dashboard.login(&username, &password).await?;
            println!("logged in as {username}");
        }
        Command::Logout => {
            dashboard.logout();
            println!("logged out");
        }
        Command::Register { username } => {
            let password = prompt::prompt_secret("Password: ")?;
            let user = dashboard.register(&username, &password).await?;
            println!("registered user: {} ({})", user.username, user.id);
        }
        Command::Accounts => {
            require_render(dashboard.open("/").await);
            dashboard.refresh_accounts().await;
            let accounts = dashboard.accounts();
            if let Some(err) = accounts.error() {
                eprintln!("{err}");
                std::process::exit(1);
            }
            render::accounts(accounts.accounts(), accounts.current_account());
        }
        Command::Yearly { account, year } => {
            require_render(dashboard.open(&yearly_route(&account, year)).await);
            let Some(mut report) = dashboard.yearly_report() else {
                std::process::exit(2);
            };
            report.load(dashboard.gateway()).await;
            match (report.resource().data(), report.resource().error()) {
                (_, Some(err)) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
                (Some(data), None) => render::yearly(data),
                (None, None) => println!("no data"),
            }
        }
        Command::Monthly {
            account,
            year,
            month,
        } => {
            let fallback = MonthSelection::previous_month(dashboard.today());
            let route = monthly_route(
                &account,
                year.unwrap_or(fallback.year()),
                month.unwrap_or(fallback.month()),
            );
            require_render(dashboard.open(&route).await);
            let Some(mut report) = dashboard.monthly_report() else {
                std::process::exit(2);
            };
            report.load(dashboard.gateway()).await;
            match (report.resource().data(), report.resource().error()) {
                (_, Some(err)) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
                (Some(data), None) => render::monthly(data),
                (None, None) => println!("no data"),
            }
        }
        Command::Posts {
            account,
            from,
            to,
            media_types,
            ..
        } => {
            require_render(dashboard.open(&posts_route(&account)).await);
            let feed = dashboard.posts_mut();
            feed.set_date_range(DateRange::new(from, to));
            feed.set_categories(media_types.iter().map(|raw| MediaType::from(raw.as_str())));
            dashboard.mount_posts();

            let feed = dashboard.posts_mut();
            feed.settle().await;
            if let Some(err) = feed.error() {
                eprintln!("{err}");
                std::process::exit(1);
            }
            render::posts(&feed.view(), feed.has_active_filters());
        }
        Command::RefreshTokens {
            app_id,
            access_token,
        } => {
            require_render(dashboard.open(SETUP_ROUTE).await);
            let mut form = TokenRefreshForm::default();
            form.app_id = app_id;
            form.app_secret = prompt::prompt_secret("App secret: ")?;
            form.access_token = access_token;
            let outcome = form.submit(dashboard.gateway()).await?;
            render::refresh(&outcome);
            if matches!(outcome, RefreshOutcome::Failed { .. }) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
