//! User configuration: keybindings, wheel feel and persistence.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/cog-picker/config.toml` (default
//! `~/.config/cog-picker/config.toml`).  Unknown keys and malformed values
//! are skipped; numbers are clamped into ranges the engine accepts.

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::style::StyleTuning;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions on the picker screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    StepUp,
    StepDown,
    PrevWheel,
    NextWheel,
    ResetWheel,
    SetNow,
    Confirm,
    OpenSettings,
    Quit,
}

impl Action {
    /// Ordered list of all actions (order of the saved config file).
    pub const ALL: &[Action] = &[
        Action::StepUp,
        Action::StepDown,
        Action::PrevWheel,
        Action::NextWheel,
        Action::ResetWheel,
        Action::SetNow,
        Action::Confirm,
        Action::OpenSettings,
        Action::Quit,
    ];

    fn config_key(self) -> &'static str {
        match self {
            Action::StepUp => "step_up",
            Action::StepDown => "step_down",
            Action::PrevWheel => "prev_wheel",
            Action::NextWheel => "next_wheel",
            Action::ResetWheel => "reset_wheel",
            Action::SetNow => "set_now",
            Action::Confirm => "confirm",
            Action::OpenSettings => "open_settings",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code plus modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT are compared; SUPER and friends are ignored.
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && (self.modifiers & MODIFIER_MASK) == (event.modifiers & MODIFIER_MASK)
    }

    /// User-facing form, e.g. `"Shift+Tab"`, `"↑"`, `"q"`.
    pub fn display(&self) -> String {
        self.render(|code| match code {
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Backspace => "Bksp".into(),
            KeyCode::Delete => "Del".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            other => config_key_name(other),
        })
    }

    /// Config-file form, e.g. `"Shift+Tab"`, `"Up"`, `"q"`.
    fn to_config_string(&self) -> String {
        self.render(config_key_name)
    }

    fn render(&self, key_name: impl Fn(KeyCode) -> String) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&key_name(self.code));
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Shift+Tab"`, `"k"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let (key_part, mods) = parts.split_last()?;

        for part in mods {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => KeyCode::F(s[1..].parse().ok()?),
            // Keep the original case for single characters (`N` vs `n`).
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

fn config_key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::BackTab => "BackTab".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration: keybindings and how the wheels feel.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Snap animation length.
    pub snap_ms: u64,
    /// Position units per wheel value.
    pub step_px: f64,
    /// Position units per terminal row when dragging.
    pub px_per_row: f64,
    /// Position units per scroll notch or step key.
    pub wheel_delta_px: f64,
    /// Quiet window after the last scroll before a forced snap.
    pub wheel_quiet_ms: u64,
    /// Frame pacing while anything animates.
    pub frame_ms: u64,
    /// Update the summary line while wheels spin, not only when they settle.
    pub live_preview: bool,
    pub style: StyleTuning,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            snap_ms: 180,
            step_px: 56.0,
            px_per_row: 28.0,
            wheel_delta_px: 28.0,
            wheel_quiet_ms: 80,
            frame_ms: 16,
            live_preview: false,
            style: StyleTuning::default(),
        }
    }
}

impl AppConfig {
    /// Built-in keybindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let shift = KeyModifiers::SHIFT;
        let mut m = HashMap::new();

        m.insert(StepUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(StepDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(
            PrevWheel,
            vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n), KeyBind::new(BackTab, shift)],
        );
        m.insert(
            NextWheel,
            vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n), KeyBind::new(Tab, n)],
        );
        m.insert(ResetWheel, vec![KeyBind::new(Char('r'), n)]);
        m.insert(SetNow, vec![KeyBind::new(Char('n'), n)]);
        m.insert(Confirm, vec![KeyBind::new(Enter, n)]);
        m.insert(OpenSettings, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    /// Find the action that matches a key event.  When several bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<(Action, u32)> = None;
        for (&action, binds) in &self.bindings {
            for bind in binds.iter().filter(|b| b.matches(event)) {
                let mc = bind.modifiers.bits().count_ones();
                if best.map_or(true, |(_, count)| mc > count) {
                    best = Some((action, mc));
                }
            }
        }
        best.map(|(action, _)| action)
    }

    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action).and_then(|b| b.first()) {
            Some(bind) => bind.display(),
            None => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: spin | {}/{}: wheel | {}: now | {}: confirm | {}: settings | {}: quit",
            self.short_binding(Action::StepUp),
            self.short_binding(Action::StepDown),
            self.short_binding(Action::PrevWheel),
            self.short_binding(Action::NextWheel),
            self.short_binding(Action::SetNow),
            self.short_binding(Action::Confirm),
            self.short_binding(Action::OpenSettings),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Self::parse(&contents)
            }
            Err(_) => Self::default(),
        }
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        tracing::debug!(path = %path.display(), "saved config");
        Ok(())
    }

    fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            if config.apply_setting(key, value) {
                continue;
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!(key, "unknown config key");
                continue;
            };
            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        // Under half a step, a notch snaps back to where it started.
        config.wheel_delta_px = config.wheel_delta_px.max(config.step_px / 2.0);
        config
    }

    /// Apply one non-binding setting.  Returns `false` if `key` is not a
    /// setting name.  Malformed values leave the default in place.
    fn apply_setting(&mut self, key: &str, value: &str) -> bool {
        let num = || value.parse::<f64>().ok().filter(|v| v.is_finite());
        match key {
            "snap_ms" => {
                if let Ok(v) = value.parse::<u64>() {
                    self.snap_ms = v.min(2000);
                }
            }
            "step_px" => {
                if let Some(v) = num() {
                    self.step_px = v.clamp(4.0, 512.0);
                }
            }
            "px_per_row" => {
                if let Some(v) = num() {
                    self.px_per_row = v.clamp(1.0, 512.0);
                }
            }
            "wheel_delta_px" => {
                if let Some(v) = num() {
                    self.wheel_delta_px = v.min(512.0);
                }
            }
            "wheel_quiet_ms" => {
                if let Ok(v) = value.parse::<u64>() {
                    self.wheel_quiet_ms = v.clamp(10, 1000);
                }
            }
            "frame_ms" => {
                if let Ok(v) = value.parse::<u64>() {
                    // Below 4ms the terminal can't keep up anyway.
                    self.frame_ms = v.clamp(4, 100);
                }
            }
            "live_preview" => self.live_preview = value == "true",
            "fade_rate" => {
                if let Some(v) = num() {
                    self.style.fade_rate = v.clamp(0.0, 1.0);
                }
            }
            "min_opacity" => {
                if let Some(v) = num() {
                    self.style.min_opacity = v.clamp(0.0, 1.0);
                }
            }
            "shrink_rate" => {
                if let Some(v) = num() {
                    self.style.shrink_rate = v.clamp(0.0, 1.0);
                }
            }
            "min_scale" => {
                if let Some(v) = num() {
                    self.style.min_scale = v.clamp(0.0, 1.0);
                }
            }
            "radius" => {
                if let Ok(v) = value.parse::<u32>() {
                    self.style.radius = v.clamp(1, 12);
                }
            }
            _ => return false,
        }
        true
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# cog-picker configuration".to_string(),
            String::new(),
            "# Wheel feel".to_string(),
            format!("snap_ms = {}", self.snap_ms),
            format!("step_px = {}", self.step_px),
            format!("px_per_row = {}", self.px_per_row),
            format!("wheel_delta_px = {}", self.wheel_delta_px),
            format!("wheel_quiet_ms = {}", self.wheel_quiet_ms),
            format!("frame_ms = {}", self.frame_ms),
            format!("live_preview = {}", self.live_preview),
            String::new(),
            "# Depth styling".to_string(),
            format!("fade_rate = {}", self.style.fade_rate),
            format!("min_opacity = {}", self.style.min_opacity),
            format!("shrink_rate = {}", self.style.shrink_rate),
            format!("min_scale = {}", self.style.min_scale),
            format!("radius = {}", self.style.radius),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab, BackTab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/cog-picker/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("cog-picker").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parses_modifiers_and_named_keys() {
        assert_eq!(
            KeyBind::parse("Ctrl+c"),
            Some(KeyBind::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
        );
        assert_eq!(
            KeyBind::parse("shift+backtab"),
            Some(KeyBind::new(KeyCode::BackTab, KeyModifiers::SHIFT))
        );
        assert_eq!(KeyBind::parse("F5"), Some(KeyBind::new(KeyCode::F(5), KeyModifiers::NONE)));
        assert_eq!(KeyBind::parse("N"), Some(KeyBind::new(KeyCode::Char('N'), KeyModifiers::NONE)));
        assert_eq!(KeyBind::parse("Hyper+x"), None);
        assert_eq!(KeyBind::parse("nonsense"), None);
    }

    #[test]
    fn default_bindings_resolve() {
        let config = AppConfig::default();
        assert_eq!(config.match_key(key(KeyCode::Up, KeyModifiers::NONE)), Some(Action::StepUp));
        assert_eq!(config.match_key(key(KeyCode::Char('j'), KeyModifiers::NONE)), Some(Action::StepDown));
        assert_eq!(config.match_key(key(KeyCode::Tab, KeyModifiers::NONE)), Some(Action::NextWheel));
        assert_eq!(config.match_key(key(KeyCode::Char('z'), KeyModifiers::NONE)), None);
        // Ctrl is compared, so Ctrl+k is not k.
        assert_eq!(config.match_key(key(KeyCode::Char('k'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn settings_are_parsed_and_clamped() {
        let config = AppConfig::parse(
            "# comment\n\
             snap_ms = 250\n\
             step_px = 0.5\n\
             wheel_delta_px = 1\n\
             wheel_quiet_ms = nope\n\
             frame_ms = 1\n\
             live_preview = true\n\
             min_opacity = 3\n\
             radius = 3\n\
             mystery = 7\n\
             step_up = Ctrl+p, w\n",
        );
        assert_eq!(config.snap_ms, 250);
        assert_eq!(config.step_px, 4.0);
        assert_eq!(config.wheel_delta_px, 2.0);
        assert_eq!(config.wheel_quiet_ms, 80);
        assert_eq!(config.frame_ms, 4);
        assert!(config.live_preview);
        assert_eq!(config.style.min_opacity, 1.0);
        assert_eq!(config.style.radius, 3);
        assert_eq!(
            config.match_key(key(KeyCode::Char('p'), KeyModifiers::CONTROL)),
            Some(Action::StepUp)
        );
        assert_eq!(config.match_key(key(KeyCode::Up, KeyModifiers::NONE)), None);
    }

    #[test]
    fn serialised_config_reads_back() {
        let mut config = AppConfig::default();
        config.snap_ms = 320;
        config.live_preview = true;
        config.bindings.insert(
            Action::Confirm,
            vec![KeyBind::new(KeyCode::Char(' '), KeyModifiers::NONE)],
        );

        let back = AppConfig::parse(&config.serialise());
        assert_eq!(back.snap_ms, 320);
        assert!(back.live_preview);
        assert_eq!(back.step_px, config.step_px);
        assert_eq!(back.style, config.style);
        assert_eq!(back.short_binding(Action::Confirm), "Space");
        assert_eq!(back.short_binding(Action::StepUp), "↑");
        assert_eq!(back.bindings, config.bindings);
    }
}
