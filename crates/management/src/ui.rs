//! UI preferences: sidebar state, theme, accent color and operator profile.
//! Independent of the domain store.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub company: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiStore {
    pub collapsed: bool,
    pub theme: ThemeMode,
    pub accent_color: String,
    pub profile: Profile,
}

impl UiStore {
    pub fn new() -> Self {
        Self {
            collapsed: false,
            theme: ThemeMode::Light,
            accent_color: "#1677ff".to_string(),
            profile: Profile {
                name: "Alexey Ivanov".to_string(),
                email: "alexey.ivanov@example.com".to_string(),
                company: "Demo Agency".to_string(),
            },
        }
    }

    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
    }

    pub fn set_accent_color(&mut self, color: impl Into<String>) {
        self.accent_color = color.into();
    }

    pub fn update_profile(&mut self, patch: ProfilePatch) {
        let current = self.profile.clone();
        self.profile = Profile {
            name: patch.name.unwrap_or(current.name),
            email: patch.email.unwrap_or(current.email),
            company: patch.company.unwrap_or(current.company),
        };
    }
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_theme() {
        let mut ui = UiStore::new();
        ui.toggle_collapsed();
        assert!(ui.collapsed);
        ui.toggle_collapsed();
        assert!(!ui.collapsed);

        ui.set_theme(ThemeMode::Dark);
        assert_eq!(ui.theme, ThemeMode::Dark);
        ui.set_accent_color("#722ed1");
        assert_eq!(ui.accent_color, "#722ed1");
    }

    #[test]
    fn test_partial_profile_update() {
        let mut ui = UiStore::new();
        ui.update_profile(ProfilePatch {
            company: Some("Acme".into()),
            ..ProfilePatch::default()
        });
        assert_eq!(ui.profile.company, "Acme");
        assert_eq!(ui.profile.name, "Alexey Ivanov");
    }
}
