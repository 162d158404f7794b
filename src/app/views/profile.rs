use crate::app::notice::Notice;
use crate::core::DataAccess;
use crate::domain::model::UserProfile;
use crate::domain::ports::{BlobStore, ContentService};
use crate::utils::error::{PortalError, Result};

/// First-login profile form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<UserProfile> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(PortalError::validation("Please enter your name"));
        }
        let email = self.email.trim();
        Ok(UserProfile {
            name: name.to_string(),
            email: (!email.is_empty()).then(|| email.to_string()),
        })
    }
}

pub async fn save<S: ContentService + BlobStore>(data: &DataAccess<S>, form: &ProfileForm) -> Notice {
    let result = match form.validate() {
        Ok(profile) => data.save_caller_user_profile(&profile).await,
        Err(e) => return Notice::error(e.user_friendly_message()),
    };
    // 後端訊息不直接顯示給使用者
    if result.is_err() {
        return Notice::error("Failed to create profile. Please try again.");
    }
    Notice::success("Profile created successfully!")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::needs_profile_setup;
    use crate::core::testing::MockService;

    #[test]
    fn test_profile_form_trims_and_drops_blank_email() {
        let form = ProfileForm {
            name: "  Asha ".to_string(),
            email: "   ".to_string(),
        };
        assert_eq!(
            form.validate().unwrap(),
            UserProfile {
                name: "Asha".to_string(),
                email: None
            }
        );

        let form = ProfileForm {
            name: " ".to_string(),
            email: "a@b.c".to_string(),
        };
        assert!(form.validate().is_err());
    }

    #[tokio::test]
    async fn test_save_clears_setup_prompt() {
        let data = DataAccess::new(MockService::seeded());
        let profile = data.caller_user_profile().await.unwrap();
        assert!(needs_profile_setup(true, Some(&profile)));

        let notice = save(
            &data,
            &ProfileForm {
                name: "Asha".to_string(),
                email: "asha@example.edu".to_string(),
            },
        )
        .await;
        assert!(!notice.is_error());

        let profile = data.caller_user_profile().await.unwrap();
        assert!(!needs_profile_setup(true, Some(&profile)));
    }

    #[tokio::test]
    async fn test_failed_save_uses_fixed_message() {
        let data = DataAccess::new(MockService::seeded());
        data.service().fail_next("saveCallerUserProfile", "internal trap");
        let notice = save(
            &data,
            &ProfileForm {
                name: "Asha".to_string(),
                email: String::new(),
            },
        )
        .await;
        assert_eq!(notice, Notice::error("Failed to create profile. Please try again."));
    }
}
