pub mod admin;
pub mod branch;
pub mod materials;
pub mod mcq;
pub mod practice;
pub mod profile;
pub mod search;
pub mod subject;

/// Per-section load outcome; the error is the message shown in place of the section.
pub type Section<T> = std::result::Result<T, String>;

pub(crate) fn section<T>(result: crate::utils::error::Result<T>, message: &str) -> Section<T> {
    result.map_err(|e| {
        tracing::warn!("⚠️ {}: {}", message, e);
        message.to_string()
    })
}
