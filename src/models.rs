use serde::Deserialize;
use std::fmt;

/// Health of a monitored site, also used as notification severity.
///
/// Probes only ever produce `Up`, `Down` and `Error`. `Normal` tags the
/// startup message and `Info` is reserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    #[default]
    Up,
    Normal,
    Error,
    Info,
    Down,
}

impl HealthState {
    /// Attachment color shown by the chat sink.
    pub fn color(self) -> &'static str {
        match self {
            HealthState::Up => "#36a64f",
            HealthState::Normal => "#ffffff",
            HealthState::Error => "#db9f49",
            HealthState::Info => "#c0c0c0",
            HealthState::Down => "#a50008",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthState::Up => "UP",
            HealthState::Normal => "NORMAL",
            HealthState::Error => "ERROR",
            HealthState::Info => "INFO",
            HealthState::Down => "DOWN",
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A monitored endpoint as loaded from the sites file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Site {
    pub name: String,
    pub url: String,
    /// State as of the last completed probe. Starts at `Up` unless the
    /// config says otherwise, so healthy sites stay quiet on boot.
    #[serde(default, rename = "state")]
    pub last_state: HealthState,
}

impl Site {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            last_state: HealthState::default(),
        }
    }
}

/// Ordered sites, owned by the watch loop for the life of the process.
pub type SiteList = Vec<Site>;

/// Top-level shape of the sites file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SitesFile {
    #[serde(default)]
    pub sites: SiteList,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_up() {
        assert_eq!(HealthState::default(), HealthState::Up);
        assert_eq!(Site::new("a", "http://a").last_state, HealthState::Up);
    }

    #[test]
    fn colors_follow_variant_not_position() {
        assert_eq!(HealthState::Up.color(), "#36a64f");
        assert_eq!(HealthState::Normal.color(), "#ffffff");
        assert_eq!(HealthState::Error.color(), "#db9f49");
        assert_eq!(HealthState::Info.color(), "#c0c0c0");
        assert_eq!(HealthState::Down.color(), "#a50008");
    }

    #[test]
    fn site_state_is_optional_in_json() {
        let file: SitesFile = serde_json::from_str(
            r#"{"sites":[{"name":"A","url":"http://a"},{"name":"B","url":"http://b","state":"down"}]}"#,
        )
        .unwrap();
        assert_eq!(file.sites[0].last_state, HealthState::Up);
        assert_eq!(file.sites[1].last_state, HealthState::Down);
    }

    #[test]
    fn display_uses_uppercase_label() {
        assert_eq!(HealthState::Error.to_string(), "ERROR");
    }
}
