//! portal - terminal client for the smart complaint portal.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use models::{ComplaintStatus, Role};
use service::auth::domain::{LoginInput, RegisterInput};
use service::board::{BoardConfig, BoardView, ComplaintBoard, ComplaintRow, ListFilter};
use service::complaints::NewComplaint;
use service::guard::{GuardOutcome, LoginPageOutcome, MismatchPolicy, Navigator};
use service::{Portal, ServiceError};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "portal")]
#[command(version, about = "Smart complaint portal client", long_about = None)]
struct Cli {
    /// Emit JSON logs on stderr
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in for a role
    Login {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        /// Defaults to student
        #[arg(long)]
        role: Option<Role>,
    },
    /// Drop the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show or rename the student profile
    Profile {
        #[arg(long)]
        name: Option<String>,
    },
    /// Student and department complaint views
    #[command(subcommand)]
    Complaints(ComplaintsCommand),
    /// Department batch status updates
    #[command(subcommand)]
    Queue(QueueCommand),
    /// Admin complaint management
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
enum ComplaintsCommand {
    /// List complaints (students: own; departments: assigned queue or a status page)
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        search: Option<String>,
        /// Department status page: assigned, in_progress or resolved
        #[arg(long)]
        page: Option<ComplaintStatus>,
        /// Show every row instead of the most recent
        #[arg(long)]
        all: bool,
    },
    /// File a new complaint
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        department: Option<String>,
    },
    Show { id: String },
    History { id: String },
    /// Department: change one complaint's status
    Status { id: String, status: String },
    Departments,
}

#[derive(Subcommand, Debug)]
enum QueueCommand {
    /// Assigned complaints awaiting action
    Show,
    /// Stage `ID=STATUS` edits and send them as one batch
    Apply {
        #[arg(value_name = "ID=STATUS")]
        updates: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Unassigned or pending complaints
    Queue,
    Escalations,
    Departments,
    Assign { id: String, department_id: String },
    Status { id: String, status: String },
    History { id: String },
}

/// Redirects have no browser to land in; report them instead.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn replace(&self, target: &str) {
        eprintln!("-> {target}");
    }
}

fn init_logging(json: bool) {
    // Load .env first so RUST_LOG and PORTAL_API_URL take effect
    dotenv().ok();
    if json {
        common::utils::logging::init_logging_json();
    } else {
        common::utils::logging::init_logging_default();
    }
}

fn user_error(e: ServiceError) -> anyhow::Error {
    anyhow!(e.user_message())
}

async fn require(portal: &Portal, roles: &[Role]) -> Result<()> {
    match portal.guard.require_auth(roles).await.map_err(user_error)? {
        GuardOutcome::Allowed => Ok(()),
        GuardOutcome::Redirected { to, session_cleared } => {
            if session_cleared {
                Err(anyhow!("session was invalid and has been cleared; sign in again ({to})"))
            } else {
                Err(anyhow!("not available for this account ({to})"))
            }
        }
    }
}

async fn current_role(portal: &Portal) -> Option<Role> {
    portal.sessions.user().await.and_then(|u| u.role_name()).and_then(|r| r.known())
}

fn print_rows(rows: &[ComplaintRow], empty: &str) {
    if rows.is_empty() {
        println!("{empty}");
        return;
    }
    for r in rows {
        println!(
            "{:<8} {:<43} {:<14} {:<12} [{}] {}",
            r.short_id, r.title, r.department, r.status_label, r.badge, r.created
        );
    }
}

async fn print_board(mut board: ComplaintBoard<service::board::ApiBackend>, filter: &ListFilter, empty: &str) -> Result<()> {
    board.refresh().await.map_err(user_error)?;
    print_rows(&board.rows(filter), empty);
    let s = board.stats();
    match board.config().view {
        BoardView::Student => println!(
            "total {}  open {}  resolved {}  escalated {}",
            s.total, s.open(), s.resolved, s.escalated
        ),
        BoardView::DepartmentQueue | BoardView::DepartmentPage(_) => println!(
            "assigned {}  in progress {}  resolved {}  escalated {}",
            s.assigned, s.in_progress, s.resolved, s.escalated
        ),
        _ => println!(
            "total {}  pending {}  assigned {}  in progress {}  resolved {}  escalated {}",
            s.total, s.pending, s.assigned, s.in_progress, s.resolved, s.escalated
        ),
    }
    Ok(())
}

async fn print_history(portal: &Portal, id: &str) -> Result<()> {
    let entries = portal.complaints.history(id).await.map_err(user_error)?;
    if entries.is_empty() {
        println!("No history entries found for this complaint.");
    }
    for entry in entries {
        println!("{}  {}", common::text::format_date_time(entry.timestamp.as_deref()), entry.readable_action());
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = configs::AppConfig::load_and_validate()?;
    let portal = Portal::from_config(config, Arc::new(TerminalNavigator)).await.map_err(user_error)?;

    match cli.command {
        Command::Login { role, email, password } => {
            let policy: MismatchPolicy = portal.mismatch_policy();
            if let LoginPageOutcome::Redirected { to } =
                portal.guard.redirect_if_logged_in(Some(role), policy).await.map_err(user_error)?
            {
                println!("Already signed in as {role} ({to})");
                return Ok(());
            }
            let input = LoginInput { email, password, role: Some(role.to_string()) };
            let session = portal.auth.login(input).await.map_err(user_error)?;
            println!("Signed in as {}", session.user.display_name(role.as_str()));
            println!("{}", portal.guard.paths().dashboard_path(session.user.role.as_deref()));
        }
        Command::Register { name, email, password, confirm_password, role } => {
            if let LoginPageOutcome::Redirected { to } = portal
                .guard
                .redirect_if_logged_in(None, MismatchPolicy::KeepSession)
                .await
                .map_err(user_error)?
            {
                println!("Already signed in ({to})");
                return Ok(());
            }
            let input = RegisterInput { name, email, password, confirm_password, role: role.map(|r| r.to_string()) };
            let session = portal.auth.register(input).await.map_err(user_error)?;
            println!("Account created for {}", session.user.display_name("student"));
        }
        Command::Logout => {
            let role = current_role(&portal).await.unwrap_or(Role::Student);
            portal.guard.logout_and_redirect(role.as_str()).await.map_err(user_error)?;
            println!("Signed out");
        }
        Command::Whoami => {
            require(&portal, &Role::ALL).await?;
            let user = portal.sessions.user().await.unwrap_or_default();
            println!("{} <{}> {}", user.display_name("-"), user.email.as_deref().unwrap_or("-"), user.role.as_deref().unwrap_or("-"));
        }
        Command::Profile { name } => {
            require(&portal, &[Role::Student]).await?;
            let profile = match name {
                Some(name) => portal.users.update_me(&name).await.map_err(user_error)?,
                None => portal.users.me().await.map_err(user_error)?,
            };
            println!("name:    {}", profile.name.as_deref().unwrap_or("-"));
            println!("email:   {}", profile.email.as_deref().unwrap_or("-"));
            println!("role:    {}", profile.role.as_deref().unwrap_or("-"));
            println!("joined:  {}", common::text::format_date(profile.created_at.as_deref()));
        }
        Command::Complaints(cmd) => complaints(&portal, cmd).await?,
        Command::Queue(cmd) => queue(&portal, cmd).await?,
        Command::Admin(cmd) => admin(&portal, cmd).await?,
    }
    Ok(())
}

async fn complaints(portal: &Portal, cmd: ComplaintsCommand) -> Result<()> {
    match cmd {
        ComplaintsCommand::List { search, page, all } => {
            require(portal, &[Role::Student, Role::Department]).await?;
            let view = match (current_role(portal).await, page) {
                (Some(Role::Department), Some(status)) => BoardView::DepartmentPage(status),
                (Some(Role::Department), None) => BoardView::DepartmentQueue,
                _ => BoardView::Student,
            };
            let mut config = BoardConfig::for_view(view);
            if all {
                config.row_limit = None;
            }
            let filter = ListFilter { search, status: None };
            print_board(portal.board_with(config), &filter, "No complaints found.").await?;
        }
        ComplaintsCommand::Create { title, description, department } => {
            require(portal, &[Role::Student]).await?;
            let created = portal
                .complaints
                .create(NewComplaint { title, description, department_id: department })
                .await
                .map_err(user_error)?;
            println!("Complaint {} submitted ({})", common::text::short_id(&created.id), created.status_label());
        }
        ComplaintsCommand::Show { id } => {
            require(portal, &Role::ALL).await?;
            let c = portal.complaints.by_id(&id).await.map_err(user_error)?;
            println!("{} {}", common::text::short_id(&c.id), c.title);
            println!("status:     {}", c.status_label());
            println!("department: {}", c.department_name.as_deref().or(c.department_id.as_deref()).unwrap_or("Unassigned"));
            println!("created:    {}", common::text::format_date_time(c.created_at.as_deref()));
            println!();
            println!("{}", c.description);
        }
        ComplaintsCommand::History { id } => {
            require(portal, &Role::ALL).await?;
            print_history(portal, &id).await?;
        }
        ComplaintsCommand::Status { id, status } => {
            require(portal, &[Role::Department]).await?;
            let mut board = portal.board(BoardView::DepartmentQueue);
            board.refresh().await.map_err(user_error)?;
            match board.change_status(&id, &status).await.map_err(user_error)? {
                Some(c) => println!("{} is now {}", common::text::short_id(&c.id), c.status_label()),
                None => println!("Status unchanged"),
            }
        }
        ComplaintsCommand::Departments => {
            require(portal, &Role::ALL).await?;
            for d in portal.complaints.departments().await.map_err(user_error)? {
                println!("{:<10} {}", d.id.as_deref().unwrap_or("-"), d.name);
            }
        }
    }
    Ok(())
}

async fn queue(portal: &Portal, cmd: QueueCommand) -> Result<()> {
    require(portal, &[Role::Department]).await?;
    let mut board = portal.board(BoardView::DepartmentQueue);
    match cmd {
        QueueCommand::Show => print_board(board, &ListFilter::default(), "No assigned complaints in queue.").await?,
        QueueCommand::Apply { updates } => {
            board.refresh().await.map_err(user_error)?;
            for raw in &updates {
                let (id, status) = raw
                    .split_once('=')
                    .ok_or_else(|| anyhow!("expected ID=STATUS, got {raw}"))?;
                board.stage(id.trim(), status).map_err(user_error)?;
            }
            let staged = board.pending_updates().len();
            match board.apply_staged().await {
                Ok(sent) => println!("Queue updated ({sent})"),
                Err(e) => {
                    error!(staged, "queue update failed");
                    return Err(user_error(e));
                }
            }
        }
    }
    Ok(())
}

async fn admin(portal: &Portal, cmd: AdminCommand) -> Result<()> {
    require(portal, &[Role::Admin]).await?;
    match cmd {
        AdminCommand::List { search, status } => {
            print_board(portal.board(BoardView::AdminAll), &ListFilter { search, status }, "No complaints found.").await?
        }
        AdminCommand::Queue => {
            print_board(portal.board(BoardView::AdminQueue), &ListFilter::default(), "No complaints in the assignment queue.").await?
        }
        AdminCommand::Escalations => {
            print_board(portal.board(BoardView::AdminEscalations), &ListFilter::default(), "No escalated complaints.").await?
        }
        AdminCommand::Departments => {
            for d in portal.admin.departments().await.map_err(user_error)? {
                println!(
                    "{:<10} {:<24} {:<10} {}",
                    d.id.as_deref().unwrap_or("-"),
                    d.name,
                    d.department_code.as_deref().unwrap_or("-"),
                    d.contact_email.as_deref().unwrap_or("-")
                );
            }
        }
        AdminCommand::Assign { id, department_id } => {
            let mut board = portal.board(BoardView::AdminQueue);
            board.refresh().await.map_err(user_error)?;
            let c = board.assign(&id, &department_id).await.map_err(user_error)?;
            println!("Complaint {} assigned to {}", common::text::short_id(&c.id), c.department_name.as_deref().unwrap_or(&department_id));
        }
        AdminCommand::Status { id, status } => {
            let mut board = portal.board(BoardView::AdminAll);
            board.refresh().await.map_err(user_error)?;
            match board.change_status(&id, &status).await.map_err(user_error)? {
                Some(c) => println!("{} is now {}", common::text::short_id(&c.id), c.status_label()),
                None => println!("Status unchanged"),
            }
        }
        AdminCommand::History { id } => print_history(portal, &id).await?,
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    // Log panics instead of exiting silently
    std::panic::set_hook(Box::new(|info| {
        error!(event = "panic", message = %info, "unhandled panic occurred");
    }));

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => {
            info!(event = "done", "command finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
