/// Resolved styling passed to a view at construction time.
///
/// Hosts hand the view the values it needs directly; there is no global
/// style registry to consult.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTheme {
    /// Color of the selection outline and the resize handle.
    pub accent_color: String,
    /// Side length of the square resize handle.
    pub handle_size_px: u32,
}

impl Default for ViewTheme {
    fn default() -> Self {
        Self {
            accent_color: "#1976d2".to_string(),
            handle_size_px: 12,
        }
    }
}
