//! Invocation environment: display server and launcher signals

use crate::types::env;

/// Graphical session type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayServer {
    Wayland,
    X11,
}

/// What the invoking environment tells us about the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// `None` when no graphical display is reachable
    pub display: Option<DisplayServer>,
    /// Running as a rofi script mode (and not as the detached child)
    pub launcher: bool,
}

impl Session {
    pub fn detect() -> Self {
        Self::from_env(|key| std::env::var(key).ok())
    }

    pub fn from_env<E>(environment: E) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        let is_set = |key: &str| environment(key).is_some_and(|v| !v.is_empty());

        let display = if is_set(env::WAYLAND_DISPLAY) {
            Some(DisplayServer::Wayland)
        } else if is_set(env::DISPLAY) {
            Some(DisplayServer::X11)
        } else {
            None
        };

        // rofi sets ROFI_RETV=0 on the first call, so presence is what counts
        let launcher = environment(env::LAUNCHER).is_some() && !is_set(env::LAUNCHER_GUARD);

        Self { display, launcher }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(vars: &[(&str, &str)]) -> Session {
        let owned: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Session::from_env(|key| {
            owned
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
    }

    #[test]
    fn test_no_display() {
        let s = session(&[]);
        assert_eq!(s.display, None);
        assert!(!s.launcher);

        let s = session(&[("DISPLAY", ""), ("WAYLAND_DISPLAY", "")]);
        assert_eq!(s.display, None);
    }

    #[test]
    fn test_wayland_wins_over_x11() {
        let s = session(&[("DISPLAY", ":0"), ("WAYLAND_DISPLAY", "wayland-1")]);
        assert_eq!(s.display, Some(DisplayServer::Wayland));
    }

    #[test]
    fn test_x11() {
        assert_eq!(session(&[("DISPLAY", ":0")]).display, Some(DisplayServer::X11));
    }

    #[test]
    fn test_launcher_signal_and_guard() {
        assert!(session(&[("ROFI_RETV", "0")]).launcher);
        assert!(session(&[("ROFI_RETV", "1")]).launcher);
        assert!(!session(&[("ROFI_RETV", "1"), ("TOTPICK_LAUNCHER_CHILD", "1")]).launcher);
    }
}
