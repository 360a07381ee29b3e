//! Display target abstraction.

/// A host-owned visual label that the sequencer types text onto.
///
/// Calls are fire-and-forget; the host applies them on its own render
/// schedule. Implementations use interior mutability since a playback
/// session only holds a shared reference.
pub trait DisplayTarget: Send + Sync {
    /// Replace the visible text.
    fn set_text(&self, text: &str);

    /// Show or hide the target.
    fn set_visible(&self, visible: bool);

    /// Set text opacity, where `0.0` is transparent and `1.0` is opaque.
    fn set_opacity(&self, opacity: f32);

    /// Whether the target can still be driven. Hosts return `false` once the
    /// underlying label has been destroyed.
    fn is_alive(&self) -> bool {
        true
    }
}
