/// A single instruction for the rendering surface, in the order it must be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ClearLog,
    ClearStatus,
    AppendLog { text: String, is_error: bool },
    SetProgressVisible(bool),
    SetProgressPercent(u8),
    SetProgressLabel(String),
    SetStatus { text: String, kind: StatusKind },
    /// `true` disables the trigger and shows the busy label; `false` restores both.
    SetControlBusy(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}
