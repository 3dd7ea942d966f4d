//! Staleness notifications.
//!
//! The page does not render banners itself; it hands [`Message`]s to a
//! [`MessageBanner`] collaborator. [`StalenessNotifier`] decides when the
//! "outdated version" warning is due and makes sure it is raised once per
//! resolved version.

use crate::logging::docs_log;
use crate::resolve::Resolution;

/// Severity of a banner message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A banner message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub content: String,
    pub kind: MessageKind,
    /// Display duration; `None` keeps the message until dismissed.
    pub show_ms: Option<u64>,
}

impl Message {
    /// A warning that stays until dismissed.
    pub fn persistent_warning(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: MessageKind::Warning,
            show_ms: None,
        }
    }
}

/// Displays banner messages.
pub trait MessageBanner {
    fn show_message(&mut self, message: Message);
}

/// Banner that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBanner;

impl MessageBanner for NoBanner {
    fn show_message(&mut self, _message: Message) {}
}

/// Raises the outdated-version warning once per resolved version.
#[derive(Debug, Clone)]
pub struct StalenessNotifier {
    message: String,
    last_checked: Option<(String, String, String)>,
}

impl StalenessNotifier {
    /// Create a notifier using `message` as banner text.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            last_checked: None,
        }
    }

    /// Re-evaluate after a resolution. Returns `true` if a warning was shown.
    ///
    /// Nothing happens when project, resolved version and latest version are
    /// the same as in the previous call.
    pub fn check(
        &mut self,
        project: &str,
        resolution: &Resolution,
        banner: &mut dyn MessageBanner,
    ) -> bool {
        let key = (
            project.to_string(),
            resolution.version.clone(),
            resolution.latest.clone(),
        );
        if self.last_checked.as_ref() == Some(&key) {
            return false;
        }
        self.last_checked = Some(key);

        if !resolution.is_stale() {
            return false;
        }

        docs_log!(
            info,
            "'{}' {} is outdated (latest {})",
            project,
            resolution.version,
            resolution.latest
        );
        banner.show_message(Message::persistent_warning(self.message.clone()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::VersionDescriptor;

    #[derive(Default)]
    struct Recorder(Vec<Message>);

    impl MessageBanner for Recorder {
        fn show_message(&mut self, message: Message) {
            self.0.push(message);
        }
    }

    fn resolution(version: &str) -> Resolution {
        Resolution {
            catalog: vec![
                VersionDescriptor::new("1.0.0"),
                VersionDescriptor::new("2.0.0"),
            ],
            version: version.to_string(),
            latest: "2.0.0".to_string(),
        }
    }

    #[test]
    fn test_warns_on_outdated_version() {
        let mut notifier = StalenessNotifier::new("outdated");
        let mut banner = Recorder::default();

        assert!(notifier.check("a", &resolution("1.0.0"), &mut banner));
        assert_eq!(banner.0, [Message::persistent_warning("outdated")]);
        assert_eq!(banner.0[0].show_ms, None);
        assert_eq!(banner.0[0].kind, MessageKind::Warning);
    }

    #[test]
    fn test_does_not_double_fire() {
        let mut notifier = StalenessNotifier::new("outdated");
        let mut banner = Recorder::default();

        notifier.check("a", &resolution("1.0.0"), &mut banner);
        assert!(!notifier.check("a", &resolution("1.0.0"), &mut banner));
        assert_eq!(banner.0.len(), 1);
    }

    #[test]
    fn test_latest_is_silent_and_refires_after_change() {
        let mut notifier = StalenessNotifier::new("outdated");
        let mut banner = Recorder::default();

        assert!(!notifier.check("a", &resolution("2.0.0"), &mut banner));
        assert!(notifier.check("a", &resolution("1.0.0"), &mut banner));
        assert!(!notifier.check("a", &resolution("2.0.0"), &mut banner));
        assert!(notifier.check("a", &resolution("1.0.0"), &mut banner));
        assert_eq!(banner.0.len(), 2);
    }
}
