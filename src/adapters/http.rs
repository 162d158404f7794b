use crate::config::ServiceConfig;
use crate::domain::model::{
    Branch, ExternalBlob, Id, Identity, Mcq, McqAnswer, McqDraft, McqPracticeResult, Notes,
    NotesDraft, PendingBlob, Principal, QuestionPaper, QuestionPaperDraft, SearchResult, Semester,
    Subject, Syllabus, UserProfile, UserRole,
};
use crate::domain::ports::{BlobStore, ContentService};
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

/// JSON-over-HTTP binding of the content service.
///
/// Every operation is `POST {endpoint}/rpc/{operation}` with camelCase named
/// arguments. Binaries go through `{endpoint}/blobs` in fixed-size chunks.
#[derive(Debug, Clone)]
pub struct HttpContentService {
    client: Client,
    base: Url,
    token: Option<String>,
    chunk_size: usize,
}

#[derive(Debug, Deserialize)]
struct BlobSlot {
    id: String,
    url: String,
}

impl HttpContentService {
    pub fn new<C: ServiceConfig>(config: &C) -> Result<Self> {
        // Url::join 需要結尾斜線，否則會取代最後一段路徑
        let mut endpoint = config.endpoint().to_string();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base = Url::parse(&endpoint)?;

        let client = Client::builder()
            .user_agent(concat!("study-portal/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            base,
            token: None,
            chunk_size: config.upload_chunk_size().max(1),
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_identity(self, identity: Option<&Identity>) -> Self {
        match identity {
            Some(identity) => self.with_token(identity.token.clone()),
            None => self,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.base
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode<T: DeserializeOwned>(&self, method: &str, response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("📡 {} -> {}", method, status);

        if status.is_success() {
            let body = if body.trim().is_empty() { "null" } else { body.as_str() };
            return Ok(serde_json::from_str(body)?);
        }

        let message = remote_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(PortalError::UnauthorizedError {
                method: method.to_string(),
                message,
            })
        } else {
            Err(PortalError::RejectedError {
                method: method.to_string(),
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, args: Value) -> Result<T> {
        let url = self.base.join(&format!("rpc/{}", method))?;
        tracing::debug!("📡 Calling {}", url);
        let response = self.authorize(self.client.post(url)).json(&args).send().await?;
        self.decode(method, response).await
    }
}

/// Pull the service's message out of an error body: `{"error": "..."}` or raw text.
fn remote_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Some(message.to_string());
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn with_id<T: serde::Serialize>(id: Id, draft: &T) -> Result<Value> {
    let mut args = serde_json::to_value(draft)?;
    args["id"] = json!(id);
    Ok(args)
}

#[async_trait]
impl ContentService for HttpContentService {
    async fn add_branch(&self, name: &str) -> Result<Id> {
        self.call("addBranch", json!({ "name": name })).await
    }

    async fn get_branch(&self, id: Id) -> Result<Option<Branch>> {
        self.call("getBranch", json!({ "id": id })).await
    }

    async fn get_branches(&self) -> Result<Vec<Branch>> {
        self.call("getBranches", json!({})).await
    }

    async fn update_branch(&self, id: Id, name: &str) -> Result<()> {
        self.call("updateBranch", json!({ "id": id, "name": name })).await
    }

    async fn delete_branch(&self, id: Id) -> Result<()> {
        self.call("deleteBranch", json!({ "id": id })).await
    }

    async fn add_semester(&self, branch_id: Id, number: u32) -> Result<Id> {
        self.call("addSemester", json!({ "branchId": branch_id, "number": number }))
            .await
    }

    async fn get_semesters(&self) -> Result<Vec<Semester>> {
        self.call("getSemesters", json!({})).await
    }

    async fn get_semesters_by_branch(&self, branch_id: Id) -> Result<Vec<Semester>> {
        self.call("getSemestersByBranch", json!({ "branchId": branch_id }))
            .await
    }

    async fn update_semester(&self, id: Id, branch_id: Id, number: u32) -> Result<()> {
        self.call(
            "updateSemester",
            json!({ "id": id, "branchId": branch_id, "number": number }),
        )
        .await
    }

    async fn delete_semester(&self, id: Id) -> Result<()> {
        self.call("deleteSemester", json!({ "id": id })).await
    }

    async fn add_subject(&self, branch_id: Id, semester_id: Id, name: &str) -> Result<Id> {
        self.call(
            "addSubject",
            json!({ "branchId": branch_id, "semesterId": semester_id, "name": name }),
        )
        .await
    }

    async fn get_subject(&self, id: Id) -> Result<Option<Subject>> {
        self.call("getSubject", json!({ "id": id })).await
    }

    async fn get_subjects(&self) -> Result<Vec<Subject>> {
        self.call("getSubjects", json!({})).await
    }

    async fn get_subjects_by_semester(&self, semester_id: Id) -> Result<Vec<Subject>> {
        self.call("getSubjectsBySemester", json!({ "semesterId": semester_id }))
            .await
    }

    async fn update_subject(
        &self,
        id: Id,
        branch_id: Id,
        semester_id: Id,
        name: &str,
    ) -> Result<()> {
        self.call(
            "updateSubject",
            json!({ "id": id, "branchId": branch_id, "semesterId": semester_id, "name": name }),
        )
        .await
    }

    async fn delete_subject(&self, id: Id) -> Result<()> {
        self.call("deleteSubject", json!({ "id": id })).await
    }

    async fn add_notes(&self, draft: &NotesDraft) -> Result<Id> {
        self.call("addNotes", serde_json::to_value(draft)?).await
    }

    async fn get_notes_by_id(&self, id: Id) -> Result<Option<Notes>> {
        self.call("getNotesById", json!({ "id": id })).await
    }

    async fn get_notes_by_subject(&self, subject_id: Id) -> Result<Vec<Notes>> {
        self.call("getNotesBySubject", json!({ "subjectId": subject_id }))
            .await
    }

    async fn update_notes(&self, id: Id, draft: &NotesDraft) -> Result<()> {
        self.call("updateNotes", with_id(id, draft)?).await
    }

    async fn delete_notes(&self, id: Id) -> Result<()> {
        self.call("deleteNotes", json!({ "id": id })).await
    }

    async fn add_question_paper(&self, draft: &QuestionPaperDraft) -> Result<Id> {
        self.call("addQuestionPaper", serde_json::to_value(draft)?).await
    }

    async fn get_question_paper_by_id(&self, id: Id) -> Result<Option<QuestionPaper>> {
        self.call("getQuestionPaperById", json!({ "id": id })).await
    }

    async fn get_question_papers_by_subject(&self, subject_id: Id) -> Result<Vec<QuestionPaper>> {
        self.call(
            "getQuestionPapersBySubject",
            json!({ "subjectId": subject_id }),
        )
        .await
    }

    async fn update_question_paper(&self, id: Id, draft: &QuestionPaperDraft) -> Result<()> {
        self.call("updateQuestionPaper", with_id(id, draft)?).await
    }

    async fn delete_question_paper(&self, id: Id) -> Result<()> {
        self.call("deleteQuestionPaper", json!({ "id": id })).await
    }

    async fn add_mcq(&self, draft: &McqDraft) -> Result<Id> {
        self.call("addMCQ", serde_json::to_value(draft)?).await
    }

    async fn get_mcq_by_id(&self, id: Id) -> Result<Option<Mcq>> {
        self.call("getMCQById", json!({ "id": id })).await
    }

    async fn get_mcqs_by_subject(&self, subject_id: Id) -> Result<Vec<Mcq>> {
        self.call("getMCQsBySubject", json!({ "subjectId": subject_id }))
            .await
    }

    async fn update_mcq(&self, id: Id, draft: &McqDraft) -> Result<()> {
        self.call("updateMCQ", with_id(id, draft)?).await
    }

    async fn delete_mcq(&self, id: Id) -> Result<()> {
        self.call("deleteMCQ", json!({ "id": id })).await
    }

    async fn add_syllabus(&self, subject_id: Id, overview: &str) -> Result<()> {
        self.call(
            "addSyllabus",
            json!({ "subjectId": subject_id, "overview": overview }),
        )
        .await
    }

    async fn get_syllabus_by_subject(&self, subject_id: Id) -> Result<Option<Syllabus>> {
        self.call("getSyllabusBySubject", json!({ "subjectId": subject_id }))
            .await
    }

    async fn update_syllabus(&self, subject_id: Id, overview: &str) -> Result<()> {
        self.call(
            "updateSyllabus",
            json!({ "subjectId": subject_id, "overview": overview }),
        )
        .await
    }

    async fn delete_syllabus(&self, subject_id: Id) -> Result<()> {
        self.call("deleteSyllabus", json!({ "subjectId": subject_id }))
            .await
    }

    async fn search(&self, term: &str) -> Result<SearchResult> {
        self.call("search", json!({ "searchTerm": term })).await
    }

    async fn evaluate_mcq_answers(&self, answers: &[McqAnswer]) -> Result<McqPracticeResult> {
        self.call("evaluateMCQAnswers", json!({ "answers": answers }))
            .await
    }

    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>> {
        self.call("getCallerUserProfile", json!({})).await
    }

    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<()> {
        self.call("saveCallerUserProfile", json!({ "profile": profile }))
            .await
    }

    async fn get_user_profile(&self, user: &Principal) -> Result<Option<UserProfile>> {
        self.call("getUserProfile", json!({ "user": user })).await
    }

    async fn is_caller_admin(&self) -> Result<bool> {
        self.call("isCallerAdmin", json!({})).await
    }

    async fn get_caller_user_role(&self) -> Result<UserRole> {
        self.call("getCallerUserRole", json!({})).await
    }

    async fn assign_caller_user_role(&self, user: &Principal, role: UserRole) -> Result<()> {
        self.call(
            "assignCallerUserRole",
            json!({ "user": user, "role": role }),
        )
        .await
    }
}

#[async_trait]
impl BlobStore for HttpContentService {
    async fn upload(&self, blob: PendingBlob) -> Result<ExternalBlob> {
        let total = blob.bytes.len();
        let url = self.base.join("blobs")?;
        let response = self
            .authorize(self.client.post(url))
            .json(&json!({ "size": total, "contentType": blob.content_type }))
            .send()
            .await?;
        let slot: BlobSlot = self.decode("createBlob", response).await?;
        tracing::debug!("📤 Blob slot {} created for {} bytes", slot.id, total);

        let mut sent = 0usize;
        for (index, chunk) in blob.bytes.chunks(self.chunk_size).enumerate() {
            let url = self
                .base
                .join(&format!("blobs/{}/chunks/{}", slot.id, index))?;
            let response = self
                .authorize(self.client.put(url))
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(chunk.to_vec())
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(PortalError::UploadError {
                    message: format!("chunk {} rejected with {}", index, response.status()),
                });
            }

            sent += chunk.len();
            blob.report(sent as f64 / total as f64 * 100.0);
        }

        if total == 0 {
            blob.report(100.0);
        }

        Ok(ExternalBlob::from_url(slot.url))
    }

    async fn fetch_bytes(&self, blob: &ExternalBlob) -> Result<Vec<u8>> {
        // join 對絕對 URL 會直接回傳該 URL
        let url = self.base.join(blob.direct_url())?;
        // token 只送往服務本身，外部儲存不帶
        let request = if url.origin() == self.base.origin() {
            self.authorize(self.client.get(url))
        } else {
            self.client.get(url)
        };
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::RejectedError {
                method: "fetchBlob".to_string(),
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("download failed").to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_message_prefers_error_field() {
        assert_eq!(
            remote_message(r#"{"error": "Unauthorized: Only admins can add notes"}"#),
            Some("Unauthorized: Only admins can add notes".to_string())
        );
        assert_eq!(
            remote_message("subject not found\n"),
            Some("subject not found".to_string())
        );
        assert_eq!(remote_message("   "), None);
    }

    #[test]
    fn test_with_id_merges_draft() {
        let draft = McqDraft {
            subject_id: 3,
            question: "2 + 2?".to_string(),
            options: vec!["3".to_string(), "4".to_string()],
            correct_answer: 1,
            explanation: None,
        };
        let args = with_id(9, &draft).unwrap();
        assert_eq!(args["id"], 9);
        assert_eq!(args["subjectId"], 3);
        assert_eq!(args["correctAnswer"], 1);
        assert!(args["explanation"].is_null());
    }
}
