/// Host controls reachable from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    ToggleBreath,
    ClearBubbles,
    ToggleWind,
    Puff,
    SensitivityUp,
    SensitivityDown,
    ThresholdUp,
    ThresholdDown,
    ToggleOverlay,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        "b" | "B" => Some(KeyAction::ToggleBreath),
        "c" | "C" => Some(KeyAction::ClearBubbles),
        "w" | "W" => Some(KeyAction::ToggleWind),
        " " => Some(KeyAction::Puff),
        "=" | "+" => Some(KeyAction::SensitivityUp),
        "-" | "_" => Some(KeyAction::SensitivityDown),
        "]" => Some(KeyAction::ThresholdUp),
        "[" => Some(KeyAction::ThresholdDown),
        "h" | "H" => Some(KeyAction::ToggleOverlay),
        _ => None,
    }
}

/// Whether the browser default for this action should be suppressed
/// (space scrolls the page).
#[inline]
pub fn consumes_default(action: KeyAction) -> bool {
    matches!(action, KeyAction::Puff)
}
