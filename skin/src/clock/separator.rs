/// Separator blink state
///
/// `Static` separators are always visible. Only `Animated` separators toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorState {
    Animated { visible: bool },
    Static,
}

impl Default for SeparatorState {
    fn default() -> Self {
        SeparatorState::Animated { visible: true }
    }
}

impl SeparatorState {
    pub fn is_visible(self) -> bool {
        match self {
            SeparatorState::Animated { visible } => visible,
            SeparatorState::Static => true,
        }
    }

    pub fn is_animated(self) -> bool {
        matches!(self, SeparatorState::Animated { .. })
    }

    /// Enabling keeps an animated state as is and restarts a static one visible
    pub fn with_animation(self, enabled: bool) -> Self {
        match (self, enabled) {
            (SeparatorState::Animated { .. }, true) => self,
            (SeparatorState::Static, true) => SeparatorState::Animated { visible: true },
            (_, false) => SeparatorState::Static,
        }
    }

    /// Next blink phase
    pub fn toggled(self) -> Self {
        match self {
            SeparatorState::Animated { visible } => SeparatorState::Animated { visible: !visible },
            SeparatorState::Static => SeparatorState::Static,
        }
    }
}
