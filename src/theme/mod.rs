//! Theme preference
//!
//! Owns the user's light/dark choice and keeps three surfaces in sync:
//! the in-memory value, the persisted preference file, and the dark-mode
//! flag consulted by all styled output.
//!
//! One `ThemePreference` is created per session and passed to whatever
//! needs it; there is no ambient theme global beyond the presentation
//! flag itself.

use anyhow::Result;

use crate::config::PrefStore;

/// Key the theme value persists under
pub const THEME_STORAGE_KEY: &str = "memo-app-theme";

/// Light/dark presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The other theme
    pub fn flip(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => anyhow::bail!("Unknown theme: {} (expected 'light' or 'dark')", s),
        }
    }
}

/// Where the resolved theme gets applied
///
/// Production uses [`TerminalTarget`]; tests inject a recording fake.
pub trait PresentationTarget {
    /// Whether there is anywhere to present at all (no-op otherwise,
    /// e.g. output piped to a file)
    fn is_available(&self) -> bool;

    /// Environment's dark-mode signal
    fn prefers_dark(&self) -> bool;

    /// Set or clear the dark marker on the presentation root
    fn apply_dark(&mut self, dark: bool);
}

/// The real terminal as a presentation target
#[derive(Debug, Default)]
pub struct TerminalTarget;

impl TerminalTarget {
    pub fn new() -> Self {
        Self
    }
}

impl PresentationTarget for TerminalTarget {
    fn is_available(&self) -> bool {
        console::user_attended()
    }

    fn prefers_dark(&self) -> bool {
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|v| colorfgbg_prefers_dark(&v))
            .unwrap_or(false)
    }

    fn apply_dark(&mut self, dark: bool) {
        crate::render::set_dark_mode(dark);
    }
}

/// Interpret a COLORFGBG value ("fg;bg" or "fg;default;bg")
///
/// Backgrounds 0-6 and 8 are the dark ANSI colors; 7 and the brights are
/// light.
fn colorfgbg_prefers_dark(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(bg <= 6 || bg == 8)
}

/// The theme-preference state machine
///
/// Lifecycle: created with `light` as placeholder, resolved exactly once
/// by [`initialize`](Self::initialize), thereafter mutated only by
/// explicit toggle/set. Every mutation is persisted and applied
/// immediately; persistence failures propagate to the caller.
pub struct ThemePreference<T: PresentationTarget> {
    theme: Theme,
    mounted: bool,
    store: PrefStore,
    target: T,
}

impl ThemePreference<TerminalTarget> {
    /// Preference backed by the user-global pref file and the real terminal
    pub fn bootstrap() -> Self {
        Self::new(PrefStore::open_default(), TerminalTarget::new())
    }
}

impl<T: PresentationTarget> ThemePreference<T> {
    pub fn new(store: PrefStore, target: T) -> Self {
        Self {
            theme: Theme::default(),
            mounted: false,
            store,
            target,
        }
    }

    /// Resolve the initial theme: stored value, else the environment's
    /// dark signal
    ///
    /// Runs at most once; later calls are no-ops. When no value was
    /// stored, the resolved one is written back so storage and memory
    /// agree. Headless sessions skip resolution entirely and stay
    /// unmounted.
    pub fn initialize(&mut self) -> Result<()> {
        if self.mounted {
            return Ok(());
        }
        if !self.target.is_available() {
            return Ok(());
        }

        let stored = self
            .store
            .get(THEME_STORAGE_KEY)?
            .and_then(|s| s.parse::<Theme>().ok());

        let resolved = match stored {
            Some(theme) => theme,
            None => {
                let theme = if self.target.prefers_dark() {
                    Theme::Dark
                } else {
                    Theme::Light
                };
                self.store.set(THEME_STORAGE_KEY, theme.as_str())?;
                theme
            }
        };

        self.theme = resolved;
        self.target.apply_dark(resolved == Theme::Dark);
        self.mounted = true;

        tracing::debug!(theme = %resolved, "theme resolved");
        Ok(())
    }

    /// Flip between light and dark, returning the new theme
    pub fn toggle(&mut self) -> Result<Theme> {
        let next = self.theme.flip();
        self.set(next)?;
        Ok(next)
    }

    /// Set an explicit theme
    ///
    /// Order is fixed: state update, persistence, presentation flag.
    pub fn set(&mut self, theme: Theme) -> Result<()> {
        self.theme = theme;
        self.store.set(THEME_STORAGE_KEY, theme.as_str())?;
        self.target.apply_dark(theme == Theme::Dark);
        Ok(())
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark(&self) -> bool {
        self.theme == Theme::Dark
    }

    /// Whether the initial resolution has completed
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The injected presentation target
    pub fn target(&self) -> &T {
        &self.target
    }
}
