use analysis::DisplayRecord;

/// Popup selection state for the map.
///
/// A single tagged value instead of independent hover and click slots, so at
/// most one record is alive at a time and a pinned popup cannot coexist with
/// an unrelated hover.
///
/// Transition contract:
/// - `hover_enter` replaces `None`/`Hover` and is ignored while `Pinned`.
/// - `hover_leave` clears `Hover` only.
/// - `pin` wins from any state.
/// - `dismiss` clears `Pinned` only.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    #[default]
    None,
    Hover(DisplayRecord),
    Pinned(DisplayRecord),
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self, Selection::Pinned(_))
    }

    /// The record currently shown, whichever way it got there.
    pub fn record(&self) -> Option<&DisplayRecord> {
        match self {
            Selection::None => None,
            Selection::Hover(record) | Selection::Pinned(record) => Some(record),
        }
    }

    /// Pointer entered a feature. Returns `true` if the selection changed.
    pub fn hover_enter(&mut self, record: DisplayRecord) -> bool {
        if self.is_pinned() {
            return false;
        }
        *self = Selection::Hover(record);
        true
    }

    /// Pointer left the hovered feature.
    pub fn hover_leave(&mut self) -> bool {
        if matches!(self, Selection::Hover(_)) {
            *self = Selection::None;
            return true;
        }
        false
    }

    /// Click pins a popup, replacing whatever was shown.
    pub fn pin(&mut self, record: DisplayRecord) {
        *self = Selection::Pinned(record);
    }

    /// The user closed a pinned popup.
    pub fn dismiss(&mut self) -> bool {
        if self.is_pinned() {
            *self = Selection::None;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }
}

#[cfg(test)]
mod tests {
    use super::Selection;
    use analysis::DisplayRecord;

    fn record(company: &str) -> DisplayRecord {
        DisplayRecord {
            lon_deg: 1.0,
            lat_deg: 2.0,
            area_ha: Some(3.0),
            company: company.to_string(),
            country: "Indonesia".to_string(),
            maps_url: "https://www.google.com/maps?q=2,1".to_string(),
        }
    }

    #[test]
    fn hover_enter_and_leave() {
        let mut sel = Selection::new();
        assert!(sel.is_none());

        assert!(sel.hover_enter(record("a")));
        assert_eq!(sel.record().map(|r| r.company.as_str()), Some("a"));

        assert!(sel.hover_enter(record("b")));
        assert_eq!(sel.record().map(|r| r.company.as_str()), Some("b"));

        assert!(sel.hover_leave());
        assert!(sel.is_none());
        assert!(!sel.hover_leave());
    }

    #[test]
    fn pinned_ignores_hover() {
        let mut sel = Selection::new();
        sel.pin(record("pinned"));
        assert!(sel.is_pinned());

        assert!(!sel.hover_enter(record("hover")));
        assert!(!sel.hover_leave());
        assert_eq!(sel.record().map(|r| r.company.as_str()), Some("pinned"));
    }

    #[test]
    fn pin_replaces_hover_and_dismiss_clears() {
        let mut sel = Selection::new();
        sel.hover_enter(record("hover"));
        sel.pin(record("pinned"));
        assert!(sel.is_pinned());

        assert!(sel.dismiss());
        assert!(sel.is_none());
        assert!(!sel.dismiss());
    }

    #[test]
    fn dismiss_does_not_clear_hover() {
        let mut sel = Selection::new();
        sel.hover_enter(record("hover"));
        assert!(!sel.dismiss());
        assert_eq!(sel.record().map(|r| r.company.as_str()), Some("hover"));
    }
}
