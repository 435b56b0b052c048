// src/site/toolbar.rs

use std::fmt;
use std::str::FromStr;

use crate::errors::DagfolioError;

/// Toolbar buttons; each maps to one canvas or simulator method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarAction {
    Run,
    Pause,
    Stop,
    ZoomIn,
    ZoomOut,
    Fit,
    Center,
    ToggleGroups,
    Refresh,
}

impl ToolbarAction {
    /// In toolbar order.
    pub const ALL: [ToolbarAction; 9] = [
        ToolbarAction::Run,
        ToolbarAction::Pause,
        ToolbarAction::Stop,
        ToolbarAction::ZoomIn,
        ToolbarAction::ZoomOut,
        ToolbarAction::Fit,
        ToolbarAction::Center,
        ToolbarAction::ToggleGroups,
        ToolbarAction::Refresh,
    ];

    /// Value of the button's `data-toolbar-action` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            ToolbarAction::Run => "run",
            ToolbarAction::Pause => "pause",
            ToolbarAction::Stop => "stop",
            ToolbarAction::ZoomIn => "zoom-in",
            ToolbarAction::ZoomOut => "zoom-out",
            ToolbarAction::Fit => "fit",
            ToolbarAction::Center => "center",
            ToolbarAction::ToggleGroups => "toggle-groups",
            ToolbarAction::Refresh => "refresh",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ToolbarAction::Run => "Run",
            ToolbarAction::Pause => "Pause",
            ToolbarAction::Stop => "Stop",
            ToolbarAction::ZoomIn => "Zoom in",
            ToolbarAction::ZoomOut => "Zoom out",
            ToolbarAction::Fit => "Fit to screen",
            ToolbarAction::Center => "Center",
            ToolbarAction::ToggleGroups => "Toggle groups",
            ToolbarAction::Refresh => "Refresh",
        }
    }
}

impl fmt::Display for ToolbarAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolbarAction {
    type Err = DagfolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        ToolbarAction::ALL
            .into_iter()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| DagfolioError::UnknownAction(s.to_string()))
    }
}
