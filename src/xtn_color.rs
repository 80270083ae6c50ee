use crossterm::style::Color;
use term_color_support::ColorSupport;

/// A trait to extend crossterm's Color with cross-platform consistency methods.
pub trait WTMatch {
    /// Adjusts the color to match the Windows Terminal (Campbell) visual style
    /// based on the current terminal's color capabilities.
    fn wtmatch(self) -> Color;
}

impl WTMatch for Color {
    fn wtmatch(self) -> Color {
        // Detect terminal color support (TrueColor, 256, or Basic)
        let support = ColorSupport::stdout();

        // Mapping table based on Windows Terminal "Campbell" RGB values.
        // Format: Some(((R, G, B), ANSI_256_Index))
        let mapping = match self {
            Color::Black =>       Some(((12, 12, 12),    232)),
            Color::DarkRed =>     Some(((197, 15, 31),   160)),
            Color::DarkGreen =>   Some(((19, 161, 14),   28)),
            Color::DarkYellow =>  Some(((193, 156, 0),   178)),
            Color::DarkBlue =>    Some(((0, 55, 218),    20)),
            Color::DarkMagenta => Some(((136, 23, 152),  90)),
            Color::DarkCyan =>    Some(((58, 150, 221),  38)),
            Color::Grey =>        Some(((204, 204, 204), 250)),
            Color::DarkGrey =>    Some(((118, 118, 118), 243)),
            Color::Red =>         Some(((231, 72, 86),   203)),
            Color::Green =>       Some(((22, 198, 12),   46)),
            Color::Yellow =>      Some(((249, 241, 165), 229)),
            Color::Blue =>        Some(((59, 120, 255),  63)),
            Color::Magenta =>     Some(((180, 0, 158),   163)),
            Color::Cyan =>        Some(((97, 214, 214),  116)),
            Color::White =>       Some(((242, 242, 242), 255)),
            _ => None, // Custom RGB or indexed colors are returned as-is
        };

        match mapping {
            Some((rgb, index256)) => {
                if support.has_16m {
                    // 1. TrueColor support: Return the exact sampled RGB value
                    Color::Rgb {
                        r: rgb.0,
                        g: rgb.1,
                        b: rgb.2,
                    }
                } else if support.has_256 {
                    // 2. 256-color support (e.g., macOS Terminal): Return a stable 16-255 index
                    Color::AnsiValue(index256)
                } else {
                    // 3. Basic 16-color support: Return the original ANSI variant
                    self
                }
            }
            None => self, // Return original if not a standard ANSI 16 color
        }
    }
}

/// Whether the terminal supports styled output at all.
/// Used for the one-time styled-vs-plain renderer decision at startup.
pub fn has_color() -> bool {
    ColorSupport::stdout().has_basic
}
