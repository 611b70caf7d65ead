use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "termlex")]
#[command(about = "termlex CLI — resolve clinical value sets into NLP synonym lexicons")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config profile name
    #[arg(
        short,
        long,
        global = true,
        env = "TERMLEX_PROFILE",
        default_value = "default"
    )]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store credentials for the value-set and concept services
    Login(LoginArgs),
    /// Logout (remove stored credentials)
    Logout,
    /// Show which credentials are stored
    Whoami,
    /// Resolve value sets to synonym lexicons
    Resolve(ResolveArgs),
    /// Resolve value sets to their flat code lists
    Codes(CodesArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Value-set source username
    #[arg(long, env = "TERMLEX_VS_USERNAME")]
    pub vs_username: String,
    /// Value-set source password
    #[arg(long, env = "TERMLEX_VS_PASSWORD")]
    pub vs_password: String,
    /// Concept service account username
    #[arg(short, long)]
    pub username: Option<String>,
    /// Concept service account password
    #[arg(long)]
    pub password: Option<String>,
    /// Concept service API key (alternative to username/password)
    #[arg(long, env = "TERMLEX_API_KEY")]
    pub api_key: Option<String>,
}

#[derive(clap::Args)]
pub struct ResolveArgs {
    /// Value set OIDs to resolve (e.g. 2.16.840.1.113762.1.4.1223.9)
    #[arg(required = true)]
    pub oids: Vec<String>,
    /// Follow broader-than relations when expanding concepts
    #[arg(long)]
    pub hierarchy: bool,
    /// Skip concept expansion; use the display names the documents carry
    #[arg(long)]
    pub names_only: bool,
}

#[derive(clap::Args)]
pub struct CodesArgs {
    /// Value set OIDs to resolve
    #[arg(required = true)]
    pub oids: Vec<String>,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (value-set-url, concept-url, ticket-url, format)
    pub key: String,
    /// Value
    pub value: String,
}
