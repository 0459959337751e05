/// A key press with its modifier state, as delivered by the host UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    /// Cmd on macOS.
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Parses strings such as `"Ctrl+Z"`, `"cmd+shift+z"` or `"Meta+Y"`.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut chord = KeyChord::default();
        let mut key = None;
        for part in spec.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "cmd" | "meta" | "super" => chord.meta = true,
                "shift" => chord.shift = true,
                "alt" | "option" => chord.alt = true,
                _ if key.is_none() => key = Some(part.to_string()),
                _ => return None,
            }
        }
        chord.key = key?;
        Some(chord)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
}

impl ShortcutAction {
    /// Ctrl/Cmd+Z undoes; Ctrl/Cmd+Y and Ctrl/Cmd+Shift+Z redo.
    pub fn from_chord(chord: &KeyChord) -> Option<Self> {
        if !(chord.ctrl || chord.meta) || chord.alt {
            return None;
        }
        match (chord.key.to_ascii_lowercase().as_str(), chord.shift) {
            ("z", false) => Some(ShortcutAction::Undo),
            ("z", true) | ("y", false) => Some(ShortcutAction::Redo),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_undo_and_redo_on_both_platforms() {
        assert_eq!(
            ShortcutAction::from_chord(&KeyChord::new("z").ctrl()),
            Some(ShortcutAction::Undo)
        );
        assert_eq!(
            ShortcutAction::from_chord(&KeyChord::new("Z").meta()),
            Some(ShortcutAction::Undo)
        );
        assert_eq!(
            ShortcutAction::from_chord(&KeyChord::new("y").ctrl()),
            Some(ShortcutAction::Redo)
        );
        assert_eq!(
            ShortcutAction::from_chord(&KeyChord::new("z").meta().shift()),
            Some(ShortcutAction::Redo)
        );
    }

    #[test]
    fn plain_keys_are_ignored() {
        assert_eq!(ShortcutAction::from_chord(&KeyChord::new("z")), None);
        assert_eq!(ShortcutAction::from_chord(&KeyChord::new("x").ctrl()), None);
    }

    #[test]
    fn parses_chord_strings() {
        let chord = KeyChord::parse("Cmd+Shift+Z").expect("chord");
        assert!(chord.meta && chord.shift && !chord.ctrl);
        assert_eq!(chord.key, "Z");
        assert_eq!(KeyChord::parse("Ctrl+"), None);
        assert_eq!(KeyChord::parse("Ctrl+Z+Y"), None);
    }
}
