use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(name = "portal", version)]
pub struct Opts {
    #[clap(subcommand)]
    pub cmd: SubCmd,

    #[clap(flatten)]
    pub opt: GlobalOpts,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Configuration file. Defaults to `<config dir>/judge-portal/config.toml`
    #[clap(long, short, global = true, name = "config-file")]
    pub config: Option<PathBuf>,

    /// Backend host (include port if needed), overriding the config file
    #[clap(long, global = true)]
    pub host: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SubCmd {
    /// Read a folder of `.in`/`.out` files into test cases
    #[clap(name = "ingest")]
    Ingest(IngestSubCmd),

    /// Watch the verdict of a submission until interrupted
    #[clap(name = "verdict")]
    Verdict(VerdictSubCmd),

    /// Show whether problems are solved, with recent submissions
    #[clap(name = "status")]
    Status(StatusSubCmd),

    /// Show or edit a user profile
    #[clap(name = "profile", subcommand)]
    Profile(ProfileSubCmd),
}

#[derive(Args, Debug, Clone)]
pub struct IngestSubCmd {
    /// The folder to ingest
    #[clap(required = true)]
    pub dir: PathBuf,

    /// Print the ingested test cases as JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct VerdictSubCmd {
    /// Submission id
    #[clap(required = true)]
    pub submission: String,

    /// TOML file mapping problem ids to titles
    #[clap(long, short)]
    pub problems: Option<PathBuf>,

    /// Stop once the verdict is final
    #[clap(long)]
    pub stop_on_final: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusSubCmd {
    /// Problem ids to look up
    #[clap(long = "problem", short, required = true)]
    pub problems: Vec<String>,

    /// User id, overriding the config file
    #[clap(long)]
    pub uid: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProfileSubCmd {
    /// Print the profile
    Show {
        #[clap(long)]
        uid: Option<String>,
    },

    /// Change profile fields
    Edit(ProfileEditSubCmd),
}

#[derive(Args, Debug, Clone)]
pub struct ProfileEditSubCmd {
    #[clap(long)]
    pub uid: Option<String>,

    #[clap(long)]
    pub username: Option<String>,

    #[clap(long)]
    pub email: Option<String>,

    #[clap(long)]
    pub name: Option<String>,

    #[clap(long)]
    pub school: Option<String>,
}
