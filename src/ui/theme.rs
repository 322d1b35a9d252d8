use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub branch: Color,
    pub operator: Color,
    pub cursor: Color,
    pub visited_bg: Color, // Cells the cursor has stood on
    pub hot_bg: Color,     // Cells revisited many times
    pub number: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for current line
    branch: Color::Rgb(137, 180, 250),         // Blue like keywords
    operator: Color::Rgb(249, 226, 175),       // Yellow like functions
    cursor: Color::Rgb(245, 194, 231),         // Pink
    visited_bg: Color::Rgb(49, 50, 68),
    hot_bg: Color::Rgb(88, 91, 112),
    number: Color::Rgb(250, 179, 135), // Orange for numbers
};
