//! Plain-text rendering of the view models.

use crate::app::catalog::CATALOG;
use crate::app::views::admin::BranchTree;
use crate::app::views::branch::BranchView;
use crate::app::views::materials::{notes_file_name, paper_file_name};
use crate::app::views::mcq::McqBrowser;
use crate::app::views::practice::{PracticeSession, PracticeView};
use crate::app::views::search::SearchView;
use crate::app::views::subject::SubjectView;
use crate::app::views::Section;
use crate::core::Guarded;
use crate::domain::model::{Identity, McqPracticeResult, Notes, QuestionPaper, Syllabus, UserProfile};

pub const ACCESS_DENIED: &str =
    "You don't have permission to access this page. Admin privileges are required.";

fn option_label(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

fn empty_state(lines: &mut Vec<String>, title: &str, description: &str) {
    lines.push(format!("  {}", title));
    lines.push(format!("  {}", description));
}

pub fn home() -> String {
    let mut lines = vec!["Study Portal".to_string(), String::new(), "Branches".to_string()];
    for entry in CATALOG {
        lines.push(format!("  {:<26} {}  (/branch/{})", entry.name, entry.description, entry.slug));
    }
    lines.join("\n")
}

pub fn not_found(path: &str) -> String {
    format!("Page not found: {}", path)
}

pub fn branch(view: &BranchView) -> String {
    let page = match view {
        BranchView::NotFound => {
            let mut lines = Vec::new();
            empty_state(
                &mut lines,
                "Branch not found",
                "The branch you're looking for doesn't exist.",
            );
            return lines.join("\n");
        }
        BranchView::Loaded(page) => page,
    };

    let mut lines = vec![
        page.entry.name.to_string(),
        page.entry.description.to_string(),
        String::new(),
        "Select Semester".to_string(),
    ];

    if page.semesters.is_empty() {
        empty_state(
            &mut lines,
            "No semesters available",
            "Semesters will appear here once added by administrators.",
        );
    } else {
        let numbers: Vec<String> = page
            .semesters
            .iter()
            .map(|s| {
                let selected = page
                    .selected
                    .as_ref()
                    .is_some_and(|sel| sel.semester.id == s.id);
                if selected {
                    format!("[Semester {}]", s.number)
                } else {
                    format!("Semester {}", s.number)
                }
            })
            .collect();
        lines.push(format!("  {}", numbers.join("  ")));
    }

    if let Some(selected) = &page.selected {
        lines.push(String::new());
        lines.push("Subjects".to_string());
        if selected.subjects.is_empty() {
            empty_state(
                &mut lines,
                "No subjects available",
                "Subjects for this semester will appear here once added.",
            );
        }
        for subject in &selected.subjects {
            lines.push(format!("  {}  (/subject/{})", subject.name, subject.id));
        }
    }

    lines.join("\n")
}

fn section_lines<T>(
    lines: &mut Vec<String>,
    heading: &str,
    section: &Section<T>,
    render: impl FnOnce(&mut Vec<String>, &T),
) {
    lines.push(String::new());
    lines.push(heading.to_string());
    match section {
        Ok(value) => render(lines, value),
        Err(message) => lines.push(format!("  {}", message)),
    }
}

fn notes_lines(lines: &mut Vec<String>, notes: &[Notes]) {
    if notes.is_empty() {
        empty_state(lines, "No notes available", "Notes will appear here once uploaded.");
    }
    for item in notes {
        let tags = if item.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", item.tags.join(", "))
        };
        lines.push(format!(
            "  #{} {} ({}){}  -> {}",
            item.id,
            item.title,
            item.year,
            tags,
            notes_file_name(item)
        ));
    }
}

fn paper_lines(lines: &mut Vec<String>, papers: &[QuestionPaper]) {
    if papers.is_empty() {
        empty_state(
            lines,
            "No question papers available",
            "Question papers will appear here once uploaded.",
        );
    }
    for paper in papers {
        let exam_type = paper
            .exam_type
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Exam");
        lines.push(format!(
            "  #{} {} {}  -> {}",
            paper.id,
            paper.year,
            exam_type,
            paper_file_name(paper)
        ));
    }
}

pub fn mcq_browser(browser: &McqBrowser) -> String {
    let mut lines = Vec::new();
    mcq_lines(&mut lines, browser);
    lines.join("\n")
}

fn mcq_lines(lines: &mut Vec<String>, browser: &McqBrowser) {
    if browser.is_empty() {
        empty_state(
            lines,
            "No MCQs available",
            "Practice questions will appear here once added.",
        );
    }
    for (number, mcq) in browser.mcqs().iter().enumerate() {
        lines.push(format!("  Q{}. {}", number + 1, mcq.question));
        for (index, option) in mcq.options.iter().enumerate() {
            lines.push(format!("     {}. {}", option_label(index), option));
        }
        if browser.is_revealed(mcq.id) {
            lines.push(format!(
                "     Answer: {}. {}",
                option_label(mcq.correct_answer),
                mcq.correct_option().unwrap_or("?")
            ));
            if let Some(explanation) = &mcq.explanation {
                lines.push(format!("     Explanation: {}", explanation));
            }
        }
    }
}

fn syllabus_lines(lines: &mut Vec<String>, syllabus: &Option<Syllabus>) {
    match syllabus {
        Some(syllabus) => lines.extend(syllabus.overview.lines().map(|l| format!("  {}", l))),
        None => empty_state(
            lines,
            "No syllabus available",
            "The syllabus for this subject has not been added yet.",
        ),
    }
}

pub fn subject(view: &SubjectView) -> String {
    let page = match view {
        SubjectView::Failed => return "Failed to load subject. Please try again.".to_string(),
        SubjectView::Loaded(page) => page,
    };

    let mut lines = vec![page.subject.name.clone()];
    section_lines(&mut lines, "Notes", &page.notes, |l, n| notes_lines(l, n));
    section_lines(
        &mut lines,
        &format!("Question Papers ({})", page.order),
        &page.papers,
        |l, p| paper_lines(l, p),
    );
    section_lines(&mut lines, "MCQs", &page.mcqs, |l, b| {
        mcq_lines(l, b);
        if !b.is_empty() {
            l.push(format!("  Practice: /practice/{}", page.subject.id));
        }
    });
    section_lines(&mut lines, "Syllabus", &page.syllabus, syllabus_lines);
    lines.join("\n")
}

pub fn search(view: &SearchView) -> String {
    let mut lines = Vec::new();
    match view {
        SearchView::Prompt => {
            lines.push("Enter a search term to find content".to_string());
            empty_state(
                &mut lines,
                "Start searching",
                "Use the search bar above to find subjects, notes, question papers, and MCQs.",
            );
        }
        SearchView::NoResults { query } => {
            lines.push(format!("Results for \"{}\"", query));
            empty_state(
                &mut lines,
                "No results found",
                &format!(
                    "No content found matching \"{}\". Try different keywords.",
                    query
                ),
            );
        }
        SearchView::Results { query, result } => {
            lines.push(format!("Results for \"{}\"", query));
            if !result.subjects.is_empty() {
                lines.push(format!("\nSubjects ({})", result.subjects.len()));
                for subject in &result.subjects {
                    lines.push(format!("  {}  (/subject/{})", subject.name, subject.id));
                }
            }
            if !result.notes.is_empty() {
                lines.push(format!("\nNotes ({})", result.notes.len()));
                notes_lines(&mut lines, &result.notes);
            }
            if !result.question_papers.is_empty() {
                lines.push(format!("\nQuestion Papers ({})", result.question_papers.len()));
                paper_lines(&mut lines, &result.question_papers);
            }
            if !result.mcqs.is_empty() {
                lines.push(format!("\nMCQs ({})", result.mcqs.len()));
                for mcq in view.shown_mcqs() {
                    lines.push(format!("  {}  (/subject/{})", mcq.question, mcq.subject_id));
                }
            }
        }
    }
    lines.join("\n")
}

pub fn practice(view: &PracticeView) -> String {
    match view {
        PracticeView::Failed => "Failed to load practice session.".to_string(),
        PracticeView::Empty { subject } => {
            let mut lines = vec![subject.name.clone()];
            empty_state(
                &mut lines,
                "No MCQs available",
                "There are no questions available for practice in this subject yet.",
            );
            lines.join("\n")
        }
        PracticeView::Ready { subject, session } => match session.result() {
            Some(result) => practice_result(result),
            None => practice_question(&subject.name, session),
        },
    }
}

fn practice_question(subject: &str, session: &PracticeSession) -> String {
    let Some(mcq) = session.current() else {
        return format!("{}\n  No MCQs available", subject);
    };

    let mut lines = vec![
        format!("{} practice", subject),
        format!(
            "Question {} of {}  ({:.0}%)",
            session.current_index() + 1,
            session.len(),
            session.progress()
        ),
        String::new(),
        mcq.question.clone(),
    ];
    let selected = session.selected(mcq.id);
    for (index, option) in mcq.options.iter().enumerate() {
        let marker = if selected == Some(index) { "(x)" } else { "( )" };
        lines.push(format!("  {} {}. {}", marker, option_label(index), option));
    }
    if session.is_last() && !session.all_answered() {
        lines.push(String::new());
        lines.push("Please answer all questions before submitting".to_string());
    }
    lines.join("\n")
}

pub fn practice_result(result: &McqPracticeResult) -> String {
    let verdict = if result.passed() {
        "Great job! You passed."
    } else {
        "Keep practicing!"
    };
    [
        "Practice Complete!".to_string(),
        format!("{:.1}%", result.score),
        format!(
            "{} out of {} correct",
            result.correct_answers, result.total_questions
        ),
        verdict.to_string(),
    ]
    .join("\n")
}

pub fn access_denied() -> String {
    format!("Access Denied\n{}", ACCESS_DENIED)
}

/// The denied and checking screens never include panel content.
pub fn admin(guarded: &Guarded<Vec<BranchTree>>) -> String {
    let tree = match guarded {
        Guarded::Checking => return "Checking permissions...".to_string(),
        Guarded::Denied => return access_denied(),
        Guarded::Content(tree) => tree,
    };

    let mut lines = vec!["Admin Panel".to_string(), String::new(), "Content".to_string()];
    if tree.is_empty() {
        lines.push("  No branches yet".to_string());
    }
    for node in tree {
        lines.push(format!("  [{}] {}", node.branch.id, node.branch.name));
        for (semester, subjects) in &node.semesters {
            lines.push(format!("    [{}] Semester {}", semester.id, semester.number));
            for subject in subjects {
                lines.push(format!("      [{}] {}", subject.id, subject.name));
            }
        }
    }
    lines.join("\n")
}

pub fn whoami(identity: Option<&Identity>, profile: Option<&UserProfile>) -> String {
    let Some(identity) = identity else {
        return "Not logged in".to_string();
    };
    let mut lines = vec![
        format!("Principal: {}", identity.principal),
        format!(
            "Logged in: {}",
            identity.authenticated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
    ];
    match profile {
        Some(profile) => {
            lines.push(format!("Name: {}", profile.name));
            if let Some(email) = &profile.email {
                lines.push(format!("Email: {}", email));
            }
        }
        None => lines.push(
            "No profile yet. Run `study-portal profile set --name <NAME>` to complete registration."
                .to_string(),
        ),
    }
    lines.join("\n")
}
