//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────┬────────────────┐
//! │                                              │  [PINK]        │
//! │   camera view (scaled color frame)           │  [ORANGE]      │
//! │   + hand cursors                             │  [RED]         │
//! │                                              │  [GREEN]       │
//! │                                              │  wave color ▣  │
//! │  status bar                                  │                │
//! │  key legend                                  │                │
//! └──────────────────────────────────────────────┴────────────────┘
//! ```
//!
//! The window is also the simulation input device: every poll the
//! mouse position is forwarded (normalized) to the sim sensor.

use minifb::{Key, MouseMode, Window, WindowOptions};

use hue_light::Color;
use skeleton_stream::ColorFrame;

use crate::sensor::SimInput;
use crate::session::ColorTarget;

use std::sync::mpsc::Sender;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 960;
pub const WIN_H: usize = 600;

const CAM_X: usize = 20;
const CAM_Y: usize = 20;
const CAM_W: usize = 640;
const CAM_H: usize = 480;

const STATUS_Y:   usize = WIN_H - 70;
const BG_COLOR:   u32   = 0xFF10_1826;
const PANEL_BG:   u32   = 0xFF16_213E;
const TEXT_BG:    u32   = 0xFF0F_3460;
const CURSOR_L:   u32   = 0xFFEE_EEEE; // left hand: outline ring
const CURSOR_R:   u32   = 0xFF66_CCFF; // right hand: filled dot

// ════════════════════════════════════════════════════════════════════════════
// ViewState
// ════════════════════════════════════════════════════════════════════════════

/// Everything the render loop shows; owned by the app, updated from
/// session events.
#[derive(Default)]
pub struct ViewState {
    pub status:   String,
    pub frame:    Option<ColorFrame>,
    /// Hand cursors in normalized screen space.
    pub hands:    Option<((f32, f32), (f32, f32))>,
    pub selected: Option<Color>,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:  Window,
    buf:     Vec<u32>,
    sim_tx:  Sender<SimInput>,
    targets: Vec<ColorTarget>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>, targets: Vec<ColorTarget>) -> Result<Self, String> {
        let mut window = Window::new(
            "Kinect Lamp — wave to set the light",
            WIN_W,
            WIN_H,
            WindowOptions { resize: false, ..WindowOptions::default() },
        )
        .map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            targets,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Forward the mouse to the sim sensor; returns false on quit keys.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() {
            return false;
        }
        if self.window.is_key_down(Key::Q) || self.window.is_key_down(Key::Escape) {
            return false;
        }

        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let _ = self.sim_tx.send(SimInput {
                x: (mx / WIN_W as f32).clamp(0.0, 1.0),
                y: (my / WIN_H as f32).clamp(0.0, 1.0),
            });
        }

        true
    }

    /// Render one frame.
    pub fn render(&mut self, view: &ViewState) {
        self.buf.fill(BG_COLOR);

        // ── Camera view ───────────────────────────────────────────────────
        self.fill_rect(CAM_X, CAM_Y, CAM_W, CAM_H, PANEL_BG);
        if let Some(frame) = &view.frame {
            self.blit_scaled(frame, CAM_X, CAM_Y, CAM_W, CAM_H);
        }
        self.draw_border(CAM_X, CAM_Y, CAM_W, CAM_H, 0xFF2A_3A5A);

        // ── Swatches ──────────────────────────────────────────────────────
        let targets = self.targets.clone();
        for target in &targets {
            let x = (target.rect.x * WIN_W as f32) as usize;
            let y = (target.rect.y * WIN_H as f32) as usize;
            let w = (target.rect.w * WIN_W as f32) as usize;
            let h = (target.rect.h * WIN_H as f32) as usize;
            self.fill_rect(x, y, w, h, target.color.argb());
            let border = if view.selected == Some(target.color) {
                0xFFFF_FFFF
            } else {
                0xFF00_0000
            };
            self.draw_border(x, y, w, h, border);
        }

        // ── Selected wave color well ──────────────────────────────────────
        let well_x = (0.73 * WIN_W as f32) as usize;
        let well_y = (0.86 * WIN_H as f32) as usize;
        self.draw_label("WAVE COLOR", well_x, well_y - 10, 0xFFAA_DDFF, 1);
        let well = view.selected.map(|c| c.argb()).unwrap_or(PANEL_BG);
        self.fill_rect(well_x, well_y, 48, 32, well);
        self.draw_border(well_x, well_y, 48, 32, 0xFFEE_EEEE);

        // ── Hand cursors ──────────────────────────────────────────────────
        if let Some((left, right)) = view.hands {
            self.draw_ring(left, 10, CURSOR_L);
            self.draw_dot(right, 7, CURSOR_R);
        }

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, CAM_X + CAM_W, 34, TEXT_BG);
        self.draw_label(&view.status, 12, STATUS_Y + 10, 0xFFEE_EEEE, 2);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(
            "MOVE MOUSE ACROSS THE MIDLINE 3X IN 3S TO WAVE  HOVER A SWATCH TO PICK  Q=QUIT",
            12,
            WIN_H - 18,
            0xFF88_88AA,
            1,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Camera blit ───────────────────────────────────────────────────────

    /// Nearest-neighbour scale of the color frame into the camera area.
    fn blit_scaled(&mut self, frame: &ColorFrame, x: usize, y: usize, w: usize, h: usize) {
        if frame.width == 0 || frame.height == 0 {
            return;
        }
        for dy in 0..h {
            let sy = dy * frame.height / h;
            for dx in 0..w {
                let sx = dx * frame.width / w;
                let px = frame.pixels[sy * frame.width + sx];
                self.set_pixel(x + dx, y + dy, px);
            }
        }
    }

    // ── Cursor shapes ─────────────────────────────────────────────────────

    fn draw_dot(&mut self, (nx, ny): (f32, f32), r: isize, color: u32) {
        let cx = (nx * WIN_W as f32) as isize;
        let cy = (ny * WIN_H as f32) as isize;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel_signed(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn draw_ring(&mut self, (nx, ny): (f32, f32), r: isize, color: u32) {
        let cx = (nx * WIN_W as f32) as isize;
        let cy = (ny * WIN_H as f32) as isize;
        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = dx * dx + dy * dy;
                if d2 <= r * r && d2 >= (r - 2) * (r - 2) {
                    self.set_pixel_signed(cx + dx, cy + dy, color);
                }
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for col in x..(x + w).min(WIN_W) {
            if y < WIN_H {
                self.buf[y * WIN_W + col] = color;
            }
            if y + h - 1 < WIN_H {
                self.buf[(y + h - 1) * WIN_W + col] = color;
            }
        }
        for row in y..(y + h).min(WIN_H) {
            if x < WIN_W {
                self.buf[row * WIN_W + x] = color;
            }
            if x + w - 1 < WIN_W {
                self.buf[row * WIN_W + x + w - 1] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn set_pixel_signed(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    /// Minimal bitmap font — 3×5 characters drawn at an integer scale.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32, scale: usize) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > WIN_W {
                break;
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}
