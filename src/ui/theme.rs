//! Theme Colors for Ratatui
//! Usage:
//!   use ratatui::style::Color;
//!   let theme = Theme::dark();
//!   let primary_color = theme.primary;

use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub warning: Color,
    pub error: Color,
    pub success: Color,
    pub foreground: Color,
    pub background: Color,
    pub surface: Color,
    pub panel: Color,
    /// Total-CPU trace, the red line of the original dashboard.
    pub cpu_trace: Color,
    /// Memory trace.
    pub mem_trace: Color,
}

impl Theme {
    pub const fn dark() -> Self {
        Self {
            primary: Color::from_u32(0xed1c24),
            secondary: Color::from_u32(0x8a1115),
            accent: Color::from_u32(0xffaa22),
            warning: Color::from_u32(0xddaa00),
            error: Color::from_u32(0xff0000),
            success: Color::from_u32(0x00ff00),
            foreground: Color::from_u32(0xeeeeee),
            background: Color::from_u32(0x111111),
            surface: Color::from_u32(0x222222),
            panel: Color::from_u32(0x2d2d2d),
            cpu_trace: Color::from_u32(0xed1c24),
            mem_trace: Color::from_u32(0x00ffaa),
        }
    }

    /// Trace color for one logical core, spread across a lightness ramp so
    /// neighbouring cores stay distinguishable.
    pub fn core_trace(&self, core: usize, core_count: usize) -> Color {
        let base = Color::Rgb(0xed, 0x1c, 0x24);
        if core_count <= 1 {
            return base;
        }
        let factor = core as f32 / (core_count - 1) as f32 * 0.7;
        Self::lighten(base, factor)
    }

    /// Lighten a color by blending with white
    /// factor should be between 0.0 (no change) and 1.0 (white)
    pub fn lighten(color: Color, factor: f32) -> Color {
        let factor = factor.clamp(0.0, 1.0);
        match color {
            Color::Rgb(r, g, b) => {
                let r = r as f32 + (255.0 - r as f32) * factor;
                let g = g as f32 + (255.0 - g as f32) * factor;
                let b = b as f32 + (255.0 - b as f32) * factor;
                Color::Rgb(r as u8, g as u8, b as u8)
            }
            _ => color,
        }
    }

    /// Darken a color by blending with black
    /// factor should be between 0.0 (no change) and 1.0 (black)
    pub fn darken(color: Color, factor: f32) -> Color {
        let factor = factor.clamp(0.0, 1.0);
        match color {
            Color::Rgb(r, g, b) => {
                let r = r as f32 * (1.0 - factor);
                let g = g as f32 * (1.0 - factor);
                let b = b as f32 * (1.0 - factor);
                Color::Rgb(r as u8, g as u8, b as u8)
            }
            _ => color,
        }
    }
}
