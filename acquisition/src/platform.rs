//! Platform capabilities the presentation shell needs around acquisition.

/// How to send the user to the settings where location access is granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsLink {
    /// Open this URL (iOS routes `app-settings:` to the app's settings page).
    Url(&'static str),
    /// Open the system's application settings screen for this app.
    AppSettings,
}

impl SettingsLink {
    /// The settings link of the platform this crate was built for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "ios") {
            Self::Url("app-settings:")
        } else {
            Self::AppSettings
        }
    }
}
