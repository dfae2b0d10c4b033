/// Colors for the control panel and the gesture cursor
pub mod colors {
    use bevy_egui::egui::Color32;

    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(12, 12, 14, 230);

    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(220, 220, 220);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);

    pub const ACCENT_GOLD: Color32 = Color32::from_rgb(212, 175, 55);

    pub const STATUS_SUCCESS: Color32 = Color32::from_rgb(78, 201, 176);
    pub const STATUS_WARNING: Color32 = Color32::from_rgb(206, 145, 87);
    pub const STATUS_ERROR: Color32 = Color32::from_rgb(230, 90, 90);

    pub const CURSOR_IDLE: Color32 = Color32::from_rgba_premultiplied(200, 200, 200, 180);
    pub const CURSOR_HOVER: Color32 = ACCENT_GOLD;
}
