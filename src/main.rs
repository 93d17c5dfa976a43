use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trellis::config::{CliOverrides, Config, default_config_path};
use trellis_common::MemberRole;

mod cmd;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(version, about = "Terminal client and same-origin proxy for a Kanban board API")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    /// Board API base URL (overrides trellis.toml and TRELLIS_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Path to trellis.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the same-origin proxy in front of the board API
    Serve {
        /// Port to serve on
        #[arg(short, long)]
        port: Option<u16>,

        /// Backend base URL to forward to
        #[arg(long)]
        backend_url: Option<String>,

        /// Enable dev mode (permissive CORS, listen on all interfaces)
        #[arg(long)]
        dev: bool,

        /// Open the health endpoint in a browser once started
        #[arg(long)]
        open: bool,
    },
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        full_name: Option<String>,
        /// Prompted for when not given
        #[arg(long, env = "TRELLIS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign in
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when not given
        #[arg(long, env = "TRELLIS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the saved session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List your boards
    Boards,
    /// Show and manage a board
    Board {
        #[command(subcommand)]
        command: BoardCommands,
    },
    /// Manage the lists on a board
    List {
        #[command(subcommand)]
        command: ListCommands,
    },
    /// Show and manage cards
    Card {
        #[command(subcommand)]
        command: CardCommands,
    },
    /// Comment on cards
    Comment {
        #[command(subcommand)]
        command: CommentCommands,
    },
    /// Manage board members
    Member {
        #[command(subcommand)]
        command: MemberCommands,
    },
    /// Invite people to a board by email
    Invite {
        #[command(subcommand)]
        command: InviteCommands,
    },
    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum BoardCommands {
    /// Show a board with its lists and cards
    Show { id: i64 },
    Create {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Background color, e.g. "#0079bf"
        #[arg(long)]
        color: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Remove the description
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,
        #[arg(long)]
        color: Option<String>,
    },
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum ListCommands {
    /// Append a list to a board
    Add {
        #[arg(long)]
        board: i64,
        title: String,
    },
    Rename {
        #[arg(long)]
        board: i64,
        list: i64,
        title: String,
    },
    /// Delete a list and all its cards
    Delete {
        #[arg(long)]
        board: i64,
        list: i64,
    },
}

#[derive(Subcommand)]
pub enum CardCommands {
    /// Show a card with assignees and comments
    Show { id: i64 },
    /// Append a card to a list
    Add {
        #[arg(long)]
        board: i64,
        #[arg(long)]
        list: i64,
        title: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Edit fields; pass an empty string to clear description or due date
    Edit {
        id: i64,
        /// Edit from the board view of this board
        #[arg(long)]
        board: Option<i64>,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },
    /// Move a card to another list (or another spot in the same one)
    Move {
        id: i64,
        #[arg(long)]
        board: i64,
        #[arg(long)]
        to_list: i64,
        /// Target position; defaults to the bottom of the list
        #[arg(long)]
        position: Option<i32>,
    },
    Delete {
        id: i64,
        /// Delete from the board view of this board
        #[arg(long)]
        board: Option<i64>,
    },
    /// Set the assignees; omit --user to clear them all
    Assign {
        id: i64,
        #[arg(long = "user")]
        users: Vec<i64>,
    },
}

#[derive(Subcommand)]
pub enum CommentCommands {
    Add {
        #[arg(long)]
        card: i64,
        content: String,
    },
    Edit {
        #[arg(long)]
        card: i64,
        comment: i64,
        content: String,
    },
    Delete {
        #[arg(long)]
        card: i64,
        comment: i64,
    },
}

#[derive(Subcommand)]
pub enum MemberCommands {
    List {
        #[arg(long)]
        board: i64,
    },
    /// Add an existing user to the board by email
    Invite {
        #[arg(long)]
        board: i64,
        email: String,
        #[arg(long, default_value = "member")]
        role: MemberRole,
    },
    Role {
        #[arg(long)]
        board: i64,
        member: i64,
        role: MemberRole,
    },
    Remove {
        #[arg(long)]
        board: i64,
        member: i64,
    },
}

#[derive(Subcommand)]
pub enum InviteCommands {
    Create {
        #[arg(long)]
        board: i64,
        email: String,
    },
    /// Accept an invite token sent to you
    Accept { token: String },
    List {
        #[arg(long)]
        board: i64,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Write a trellis.toml with the defaults
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    trellis::logging::init(cli.verbose, cli.log_json);

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut overrides = CliOverrides {
        api_url: cli.api_url.clone(),
        ..CliOverrides::default()
    };
    if let Commands::Serve {
        port, backend_url, ..
    } = &cli.command
    {
        overrides.port = *port;
        overrides.proxy_backend_url = backend_url.clone();
    }
    let config = Config::load(Some(&config_path), overrides)?;
    tracing::debug!(?config, "configuration resolved");
    let ctx = cmd::Context::new(config, cli.yes);

    match cli.command {
        Commands::Serve { open, dev, .. } => {
            cmd::cmd_serve(
                ctx.config.proxy_port,
                ctx.config.proxy_backend_url.clone(),
                open,
                dev,
            )
            .await?;
        }
        Commands::Signup {
            email,
            username,
            full_name,
            password,
        } => cmd::cmd_signup(&ctx, email, username, full_name, password).await?,
        Commands::Login { email, password } => cmd::cmd_login(&ctx, email, password).await?,
        Commands::Logout => cmd::cmd_logout(&ctx).await?,
        Commands::Whoami => cmd::cmd_whoami(&ctx).await?,
        Commands::Boards => cmd::cmd_boards(&ctx).await?,
        Commands::Board { command } => cmd::cmd_board(&ctx, command).await?,
        Commands::List { command } => cmd::cmd_list(&ctx, command).await?,
        Commands::Card { command } => cmd::cmd_card(&ctx, command).await?,
        Commands::Comment { command } => cmd::cmd_comment(&ctx, command).await?,
        Commands::Member { command } => cmd::cmd_member(&ctx, command).await?,
        Commands::Invite { command } => cmd::cmd_invite(&ctx, command).await?,
        Commands::Config { command } => cmd::cmd_config(&ctx, &config_path, command)?,
    }

    Ok(())
}
