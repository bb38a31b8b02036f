//! Player identity widget
//!
//! Purely cosmetic and in memory: login and registration accept whatever is
//! typed, nothing is verified and nothing survives a reload.

use serde::{Deserialize, Serialize};

/// Text fields of the login/register form
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl ProfileForm {
    pub fn new(username: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.email.is_empty() && self.password.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub games_played: u32,
    pub total_score: u64,
    pub wins: u32,
}

/// The signed-in player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub email: String,
    pub stats: PlayerStats,
}

impl Identity {
    /// Single letter for the avatar badge
    pub fn initial(&self) -> Option<char> {
        self.username.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

/// Holds at most one identity
#[derive(Debug, Clone, Default)]
pub struct IdentitySlot {
    current: Option<Identity>,
}

impl IdentitySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.current.as_ref().map(|id| id.username.as_str())
    }

    /// Sign in with whatever the form holds. The form is cleared afterwards.
    pub fn login(&mut self, form: &mut ProfileForm) -> &Identity {
        self.sign_in(form, "login")
    }

    /// Same as [`login`](Self::login); there is no account store to register with.
    pub fn register(&mut self, form: &mut ProfileForm) -> &Identity {
        self.sign_in(form, "register")
    }

    pub fn logout(&mut self) {
        if let Some(old) = self.current.take() {
            log::info!("{} signed out", old.username);
        }
    }

    fn sign_in(&mut self, form: &mut ProfileForm, how: &str) -> &Identity {
        let ProfileForm { username, email, .. } = std::mem::take(form);
        log::info!("{} via {}", username, how);
        self.current.insert(Identity {
            id: "1".to_string(),
            username,
            email,
            stats: PlayerStats::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_creates_fresh_identity_and_clears_form() {
        let mut slot = IdentitySlot::new();
        let mut form = ProfileForm::new("ada", "ada@example.com", "hunter2");
        let identity = slot.login(&mut form).clone();

        assert_eq!(identity.id, "1");
        assert_eq!(identity.username, "ada");
        assert_eq!(identity.email, "ada@example.com");
        assert_eq!(identity.stats, PlayerStats::default());
        assert!(form.is_empty());
        assert_eq!(slot.username(), Some("ada"));
    }

    #[test]
    fn test_register_behaves_like_login() {
        let mut slot = IdentitySlot::new();
        let mut form = ProfileForm::new("bob", "bob@example.com", "pw");
        slot.register(&mut form);
        assert_eq!(slot.current().map(|i| i.id.as_str()), Some("1"));
        assert!(form.is_empty());
    }

    #[test]
    fn test_password_is_not_kept() {
        let mut slot = IdentitySlot::new();
        let mut form = ProfileForm::new("eve", "eve@example.com", "s3cret");
        slot.login(&mut form);
        let json = serde_json::to_string(slot.current().expect("signed in")).expect("serializes");
        assert!(!json.contains("s3cret"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_logout_clears() {
        let mut slot = IdentitySlot::new();
        slot.login(&mut ProfileForm::new("ada", "", ""));
        slot.logout();
        assert!(slot.current().is_none());
        // idempotent
        slot.logout();
        assert!(slot.current().is_none());
    }

    #[test]
    fn test_relogin_replaces_identity() {
        let mut slot = IdentitySlot::new();
        slot.login(&mut ProfileForm::new("ada", "", ""));
        slot.login(&mut ProfileForm::new("grace", "", ""));
        assert_eq!(slot.username(), Some("grace"));
        assert_eq!(slot.current().and_then(Identity::initial), Some('G'));
    }
}
