use crate::adapters::{FileSession, HttpContentService, LocalStorage};
use crate::app::notice::{Notice, NoticeLevel};
use crate::app::render;
use crate::app::routes::Route;
use crate::app::views::admin::{
    AdminPanel, BranchForm, ContentKind, McqForm, NotesForm, QuestionPaperForm, SemesterForm,
    SubjectForm, SyllabusForm,
};
use crate::app::views::materials::{self, DownloadKind, SortOrder};
use crate::app::views::practice::{self, PracticeView};
use crate::app::views::profile::{self, ProfileForm};
use crate::app::views::subject::{self, SubjectView};
use crate::app::views::{branch, search};
use crate::config::cli::{AdminCommand, CliArgs, Command, DownloadArg, KindArg, ProfileCommand, SortArg};
use crate::config::PortalConfig;
use crate::core::auth::needs_profile_setup;
use crate::core::{AdminGate, AuthFlow, DataAccess, Guarded};
use crate::domain::model::{BlobSource, Id, PendingBlob, Principal};
use crate::domain::ports::{BlobStore, ContentService, IdentityProvider, Storage};
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::Validate;
use std::path::Path;

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Newest => SortOrder::NewestFirst,
            SortArg::Oldest => SortOrder::OldestFirst,
        }
    }
}

impl From<DownloadArg> for DownloadKind {
    fn from(kind: DownloadArg) -> Self {
        match kind {
            DownloadArg::Notes => DownloadKind::Notes,
            DownloadArg::Paper => DownloadKind::QuestionPaper,
        }
    }
}

impl From<KindArg> for ContentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Branch => ContentKind::Branch,
            KindArg::Semester => ContentKind::Semester,
            KindArg::Subject => ContentKind::Subject,
            KindArg::Notes => ContentKind::Notes,
            KindArg::Paper => ContentKind::QuestionPaper,
            KindArg::Mcq => ContentKind::Mcq,
            KindArg::Syllabus => ContentKind::Syllabus,
        }
    }
}

/// Config file (or defaults) with command-line overrides applied, validated.
pub fn load_config(args: &CliArgs) -> Result<PortalConfig> {
    let config = match &args.config {
        Some(path) => PortalConfig::from_file(path)?,
        None => PortalConfig::default(),
    };
    let config = config
        .with_endpoint(args.endpoint.clone())
        .with_session_dir(args.session_dir.clone());
    config.validate()?;
    Ok(config)
}

fn session_for(config: &PortalConfig) -> FileSession<LocalStorage> {
    let session = FileSession::new(LocalStorage::new(&config.session.directory))
        .with_file_name(config.session_file());
    match config.credential() {
        Some(credential) => session.with_credential(credential),
        None => session,
    }
}

/// Run one command against the configured service and return the text to print.
pub async fn run(args: CliArgs, config: &PortalConfig) -> Result<String> {
    let auth = AuthFlow::new(session_for(config));
    let identity = auth.identity().await?;
    let data = DataAccess::new(HttpContentService::new(config)?.with_identity(identity.as_ref()));

    if let Command::Login = args.command {
        let identity = auth.login().await?;
        let data = DataAccess::new(HttpContentService::new(config)?.with_identity(Some(&identity)));
        let mut output = format!("🔑 Logged in as {}", identity.principal);
        match data.caller_user_profile().await {
            Ok(profile) if needs_profile_setup(true, Some(&profile)) => output.push_str(
                "\nWelcome! Please provide your name to complete your registration:\n  study-portal profile set --name <NAME> [--email <EMAIL>]",
            ),
            Ok(_) => {}
            Err(e) => tracing::warn!("⚠️ Could not load profile after login: {}", e),
        }
        return Ok(output);
    }

    execute(args.command, &data, &auth).await
}

fn notice_output(notice: Notice) -> Result<String> {
    match notice.level {
        NoticeLevel::Success => Ok(notice.to_string()),
        NoticeLevel::Error => Err(PortalError::ActionFailed {
            message: notice.message,
        }),
    }
}

/// Dispatch a command. `Login` is handled by [`run`], which owns token refresh.
pub async fn execute<S, I>(command: Command, data: &DataAccess<S>, auth: &AuthFlow<I>) -> Result<String>
where
    S: ContentService + BlobStore,
    I: IdentityProvider,
{
    match command {
        Command::Open {
            path,
            semester,
            sort,
            answers,
        } => open(data, auth, Route::parse(&path), semester, sort.into(), answers).await,
        Command::Search { terms } => {
            let query = terms.join(" ");
            let view = search::load(data, Some(query.as_str())).await?;
            Ok(render::search(&view))
        }
        Command::Practice {
            subject_id,
            answers,
        } => practice(data, subject_id, &answers).await,
        Command::Download { kind, id, output } => download(data, kind.into(), id, &output).await,
        Command::Login => {
            let identity = auth.login().await?;
            Ok(format!("🔑 Logged in as {}", identity.principal))
        }
        Command::Logout => {
            auth.logout(data.cache()).await?;
            Ok("👋 Logged out".to_string())
        }
        Command::Whoami => {
            let identity = auth.identity().await?;
            let profile = match identity {
                Some(_) => data.caller_user_profile().await?,
                None => None,
            };
            Ok(render::whoami(identity.as_ref(), profile.as_ref()))
        }
        Command::Profile { action } => match action {
            ProfileCommand::Show => {
                let identity = auth.identity().await?;
                let profile = data.caller_user_profile().await?;
                Ok(render::whoami(identity.as_ref(), profile.as_ref()))
            }
            ProfileCommand::Set { name, email } => {
                notice_output(profile::save(data, &ProfileForm { name, email }).await)
            }
        },
        Command::Admin { action } => admin(data, action).await,
    }
}

async fn open<S, I>(
    data: &DataAccess<S>,
    auth: &AuthFlow<I>,
    route: Route,
    semester: Option<u32>,
    order: SortOrder,
    reveal_answers: bool,
) -> Result<String>
where
    S: ContentService + BlobStore,
    I: IdentityProvider,
{
    tracing::debug!("🧭 Opening {}", route);
    match route {
        Route::Home => Ok(render::home()),
        Route::Branch(slug) => Ok(render::branch(&branch::load(data, &slug, semester).await?)),
        Route::Subject(id) => {
            let mut view = subject::load(data, id, order).await;
            if reveal_answers {
                if let SubjectView::Loaded(page) = &mut view {
                    if let Ok(browser) = &mut page.mcqs {
                        browser.reveal_all();
                    }
                }
            }
            Ok(render::subject(&view))
        }
        Route::Search(query) => Ok(render::search(&search::load(data, query.as_deref()).await?)),
        Route::Auth => Ok(match auth.identity().await? {
            Some(identity) => format!("Logged in as {}", identity.principal),
            None => "Not logged in. Run `study-portal login` to sign in.".to_string(),
        }),
        Route::Admin => {
            let mut gate = AdminGate::new();
            gate.check(data).await;
            let guarded = match gate.guard(|| AdminPanel::new(data)) {
                Guarded::Content(panel) => Guarded::Content(panel.overview().await?),
                Guarded::Denied => Guarded::Denied,
                Guarded::Checking => Guarded::Checking,
            };
            Ok(render::admin(&guarded))
        }
        Route::Practice(subject_id) => Ok(render::practice(&practice::load(data, subject_id).await)),
        Route::NotFound(path) => Ok(render::not_found(&path)),
    }
}

async fn practice<S: ContentService + BlobStore>(
    data: &DataAccess<S>,
    subject_id: Id,
    answers: &[(Id, usize)],
) -> Result<String> {
    let (subject, mut session) = match practice::load(data, subject_id).await {
        PracticeView::Ready { subject, session } => (subject, session),
        view => return Ok(render::practice(&view)),
    };

    for &(mcq_id, option) in answers {
        session.answer(mcq_id, option)?;
    }

    if session.all_answered() {
        session.submit(data).await?;
    } else if !answers.is_empty() {
        let missing: Vec<String> = session
            .mcqs()
            .iter()
            .filter(|m| session.selected(m.id).is_none())
            .map(|m| m.id.to_string())
            .collect();
        return Err(PortalError::validation(format!(
            "Please answer all questions before submitting (missing MCQ ids: {})",
            missing.join(", ")
        )));
    }

    Ok(render::practice(&PracticeView::Ready { subject, session }))
}

async fn download<S: ContentService + BlobStore>(
    data: &DataAccess<S>,
    kind: DownloadKind,
    id: Id,
    output: &Path,
) -> Result<String> {
    let download = materials::fetch(data, kind, id).await?;
    let file_name = download.file_name.replace(['/', '\\'], "_");

    let storage = LocalStorage::new(output);
    storage.write_file(&file_name, &download.bytes).await?;

    let saved = output.join(&file_name);
    tracing::info!("📁 Saved {} bytes to {}", download.bytes.len(), saved.display());
    Ok(format!("📁 Saved {}", saved.display()))
}

async fn pending_file(path: &Path) -> Result<BlobSource> {
    let bytes = tokio::fs::read(path).await?;
    let name = path.display().to_string();
    let blob = PendingBlob::from_bytes(bytes)
        .with_upload_progress(move |percentage| tracing::info!("📤 {}: {:.0}%", name, percentage));
    Ok(BlobSource::Pending(blob))
}

async fn admin<S: ContentService + BlobStore>(data: &DataAccess<S>, action: AdminCommand) -> Result<String> {
    let mut gate = AdminGate::new();
    gate.check(data).await;
    let panel = match gate.guard(|| AdminPanel::new(data)) {
        Guarded::Content(panel) => panel,
        Guarded::Denied | Guarded::Checking => {
            return Err(PortalError::UnauthorizedError {
                method: "isCallerAdmin".to_string(),
                message: render::ACCESS_DENIED.to_string(),
            })
        }
    };

    let notice = match action {
        AdminCommand::Overview => {
            return Ok(render::admin(&Guarded::Content(panel.overview().await?)));
        }
        AdminCommand::AddBranch { name } => panel.add_branch(&BranchForm { name }).await,
        AdminCommand::RenameBranch { id, name } => {
            panel.rename_branch(id, &BranchForm { name }).await
        }
        AdminCommand::AddSemester { branch_id, number } => {
            panel
                .add_semester(&SemesterForm {
                    branch_id: Some(branch_id),
                    number: Some(number),
                })
                .await
        }
        AdminCommand::AddSubject {
            branch_id,
            semester_id,
            name,
        } => {
            panel
                .add_subject(&SubjectForm {
                    branch_id: Some(branch_id),
                    semester_id: Some(semester_id),
                    name,
                })
                .await
        }
        AdminCommand::RenameSubject {
            id,
            branch_id,
            semester_id,
            name,
        } => {
            let form = SubjectForm {
                branch_id: Some(branch_id),
                semester_id: Some(semester_id),
                name,
            };
            panel.rename_subject(id, &form).await
        }
        AdminCommand::AddNotes {
            subject_id,
            title,
            year,
            tags,
            file,
        } => {
            let form = NotesForm {
                subject_id: Some(subject_id),
                title,
                year: Some(year),
                tags,
                file: Some(pending_file(&file).await?),
            };
            panel.upload_notes(form).await
        }
        AdminCommand::AddPaper {
            subject_id,
            year,
            exam_type,
            file,
        } => {
            let form = QuestionPaperForm {
                subject_id: Some(subject_id),
                year: Some(year),
                exam_type,
                file: Some(pending_file(&file).await?),
            };
            panel.upload_question_paper(form).await
        }
        AdminCommand::AddMcq {
            subject_id,
            question,
            options,
            correct,
            explanation,
        } => {
            let mut form = McqForm::new().with_options(options);
            form.subject_id = Some(subject_id);
            form.question = question;
            form.explanation = explanation;
            let index = correct
                .checked_sub(1)
                .ok_or_else(|| PortalError::validation("Options are numbered from 1"))?;
            form.set_correct_answer(index)?;
            panel.add_mcq(&form).await
        }
        AdminCommand::SetSyllabus {
            subject_id,
            overview,
        } => {
            panel
                .save_syllabus(&SyllabusForm {
                    subject_id: Some(subject_id),
                    overview,
                })
                .await
        }
        AdminCommand::Delete { kind, id } => panel.delete(kind.into(), id).await,
        AdminCommand::AssignRole { principal, role } => {
            panel.assign_role(&Principal(principal), role.into()).await
        }
    };

    notice_output(notice)
}
