use crate::domain::model::{Id, UserRole};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "study-portal")]
#[command(about = "Terminal client for the study portal content service")]
#[command(version)]
pub struct CliArgs {
    /// TOML configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Content service endpoint, overrides [service].endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Directory holding the session file, overrides [session].directory
    #[arg(long)]
    pub session_dir: Option<String>,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Render a page, e.g. `/`, `/branch/computer`, `/subject/12`, `/search?q=heaps`
    Open {
        path: String,
        /// Semester number to open on a branch page
        #[arg(long)]
        semester: Option<u32>,
        /// Question paper order on a subject page
        #[arg(long, value_enum, default_value_t = SortArg::Newest)]
        sort: SortArg,
        /// Show MCQ answers and explanations
        #[arg(long)]
        answers: bool,
    },
    /// Search subjects, notes, question papers and MCQs
    Search { terms: Vec<String> },
    /// Answer a subject's MCQs; `--answer <MCQ_ID>=<OPTION>` with options numbered from 1
    Practice {
        subject_id: Id,
        #[arg(long = "answer", value_parser = parse_answer)]
        answers: Vec<(Id, usize)>,
    },
    /// Save a notes file or question paper to disk
    Download {
        #[arg(value_enum)]
        kind: DownloadArg,
        id: Id,
        /// Output directory
        #[arg(long, short, default_value = ".")]
        output: PathBuf,
    },
    Login,
    Logout,
    Whoami,
    /// Manage the caller's profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
    /// Content management (admin only)
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProfileCommand {
    Show,
    Set {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum AdminCommand {
    /// Show the branch / semester / subject tree
    Overview,
    AddBranch {
        name: String,
    },
    RenameBranch {
        id: Id,
        name: String,
    },
    AddSemester {
        branch_id: Id,
        number: u32,
    },
    AddSubject {
        branch_id: Id,
        semester_id: Id,
        name: String,
    },
    RenameSubject {
        id: Id,
        branch_id: Id,
        semester_id: Id,
        name: String,
    },
    AddNotes {
        subject_id: Id,
        #[arg(long)]
        title: String,
        #[arg(long)]
        year: u32,
        /// Comma-separated
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long)]
        file: PathBuf,
    },
    AddPaper {
        subject_id: Id,
        #[arg(long)]
        year: u32,
        #[arg(long, default_value = "")]
        exam_type: String,
        #[arg(long)]
        file: PathBuf,
    },
    AddMcq {
        subject_id: Id,
        #[arg(long)]
        question: String,
        /// Repeat for each option
        #[arg(long = "option", required = true)]
        options: Vec<String>,
        /// Correct option, numbered from 1
        #[arg(long)]
        correct: usize,
        #[arg(long, default_value = "")]
        explanation: String,
    },
    SetSyllabus {
        subject_id: Id,
        overview: String,
    },
    Delete {
        #[arg(value_enum)]
        kind: KindArg,
        /// Subject id for syllabi
        id: Id,
    },
    AssignRole {
        principal: String,
        #[arg(value_enum)]
        role: RoleArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Newest,
    Oldest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DownloadArg {
    Notes,
    Paper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Branch,
    Semester,
    Subject,
    Notes,
    Paper,
    Mcq,
    Syllabus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Admin,
    User,
    Guest,
}

impl From<RoleArg> for UserRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => UserRole::Admin,
            RoleArg::User => UserRole::User,
            RoleArg::Guest => UserRole::Guest,
        }
    }
}

/// `40=2` -> question 40, second option (index 1).
fn parse_answer(value: &str) -> Result<(Id, usize), String> {
    let (id, option) = value
        .split_once('=')
        .ok_or_else(|| format!("expected <MCQ_ID>=<OPTION>, got '{}'", value))?;
    let id: Id = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid MCQ id '{}'", id))?;
    let option: usize = option
        .trim()
        .parse()
        .map_err(|_| format!("invalid option '{}'", option))?;
    if option == 0 {
        return Err("options are numbered from 1".to_string());
    }
    Ok((id, option - 1))
}
