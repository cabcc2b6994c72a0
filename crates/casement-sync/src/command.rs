use casement_common::Rect;

/// An inbound client request, already decoded from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bring the number of managed instances up to the configured maximum.
    Open,
    /// Move/resize the tracked window with this logical type.
    Move { window_type: String, rect: Rect },
    /// Close the tracked window with this logical type and its process.
    Close { window_type: String },
}
