//! Colors in dual RGB/HSL form.
//!
//! A color is either an RGB or an HSL triple (channels normalized to
//! `[0, 1]`) plus an alpha; arithmetic converts to RGB and returns fresh
//! values. Parsing accepts keywords, `#rgb`/`#rrggbb` hashes, and the
//! `rgb()`/`rgba()`/`hsl()`/`hsla()` functions; printing picks the shortest
//! of keyword, hex, functional, and `transparent` forms.

use serde::Serialize;

use sassafras_tree::{AnyKind, NodeId, NodeKind, TokenTree};

use crate::error::CompileError;
use crate::tokens;

/// The 16 CSS keywords plus the extended names the minifier folds to.
const COLOR_MAP: [(&str, [u8; 3]); 30] = [
    ("black", [0, 0, 0]),
    ("silver", [192, 192, 192]),
    ("gray", [128, 128, 128]),
    ("white", [255, 255, 255]),
    ("maroon", [128, 0, 0]),
    ("red", [255, 0, 0]),
    ("purple", [128, 0, 128]),
    ("fuchsia", [255, 0, 255]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("olive", [128, 128, 0]),
    ("yellow", [255, 255, 0]),
    ("navy", [0, 0, 128]),
    ("blue", [0, 0, 255]),
    ("teal", [0, 128, 128]),
    ("aqua", [0, 255, 255]),
    // extended colors:
    ("azure", [240, 255, 255]),
    ("brown", [165, 42, 42]),
    ("coral", [255, 127, 80]),
    ("cyan", [0, 255, 255]),
    ("gold", [255, 215, 0]),
    ("grey", [128, 128, 128]),
    ("linen", [250, 240, 230]),
    ("orange", [255, 165, 0]),
    ("peru", [205, 133, 63]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("snow", [255, 250, 250]),
    ("tan", [210, 180, 140]),
    ("wheat", [245, 222, 179]),
];

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.clamp(min, max)
}

/// The active representation of a color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Repr {
    /// Red/green/blue channels in `[0, 1]`.
    Rgb {
        /// Red channel.
        r: f64,
        /// Green channel.
        g: f64,
        /// Blue channel.
        b: f64,
    },
    /// Hue/saturation/lightness, each normalized to `[0, 1]`.
    Hsl {
        /// Hue as a fraction of a full turn.
        h: f64,
        /// Saturation.
        s: f64,
        /// Lightness.
        l: f64,
    },
}

/// A color plus its alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    /// The active triple.
    pub repr: Repr,
    /// Alpha in `[0, 1]`.
    pub alpha: f64,
}

impl Color {
    /// Opaque black.
    #[must_use]
    pub fn black() -> Self {
        Color::from_rgb(0.0, 0.0, 0.0, 1.0)
    }

    /// A color from RGB channels in `[0, 1]`.
    #[must_use]
    pub fn from_rgb(r: f64, g: f64, b: f64, alpha: f64) -> Self {
        Color {
            repr: Repr::Rgb {
                r: clamp(r, 0.0, 1.0),
                g: clamp(g, 0.0, 1.0),
                b: clamp(b, 0.0, 1.0),
            },
            alpha,
        }
    }

    /// A color from HSL channels in `[0, 1]`.
    #[must_use]
    pub fn from_hsl(h: f64, s: f64, l: f64, alpha: f64) -> Self {
        Color {
            repr: Repr::Hsl {
                h: clamp(h, 0.0, 1.0),
                s: clamp(s, 0.0, 1.0),
                l: clamp(l, 0.0, 1.0),
            },
            alpha,
        }
    }

    /// Parse a color keyword.
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        COLOR_MAP.iter().find(|(keyword, _)| *keyword == name).map(
            |&(_, [r, g, b])| {
                Color::from_rgb(
                    f64::from(r) / 255.0,
                    f64::from(g) / 255.0,
                    f64::from(b) / 255.0,
                    1.0,
                )
            },
        )
    }

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |a: &str| u8::from_str_radix(a, 16).ok();
        match hex.len() {
            // Three-digit form replicates each digit: #f00 == #ff0000.
            3 => {
                let r = channel(&hex[0..1].repeat(2))?;
                let g = channel(&hex[1..2].repeat(2))?;
                let b = channel(&hex[2..3].repeat(2))?;
                Some(Color::from_rgb(
                    f64::from(r) / 255.0,
                    f64::from(g) / 255.0,
                    f64::from(b) / 255.0,
                    1.0,
                ))
            }
            6 => {
                let r = channel(&hex[0..2])?;
                let g = channel(&hex[2..4])?;
                let b = channel(&hex[4..6])?;
                Some(Color::from_rgb(
                    f64::from(r) / 255.0,
                    f64::from(g) / 255.0,
                    f64::from(b) / 255.0,
                    1.0,
                ))
            }
            _ => None,
        }
    }

    /// Build a color from an identifier, hash, or color-function token.
    ///
    /// This is the one place in the pipeline where a failure is caught
    /// inline: callers fall back to treating the token as a non-color.
    ///
    /// # Errors
    /// Fails when the token is not a recognizable color.
    pub fn from_node(tree: &TokenTree, id: NodeId) -> Result<Self, CompileError> {
        let not_a_color = || {
            CompileError::new(format!(
                "Unrecognized value \"{}\" assigned to color",
                tree.data(id)
            ))
        };
        match tree.kind(id) {
            NodeKind::Any(AnyKind::Ident) | NodeKind::Property => {
                Color::from_named(tree.data(id)).ok_or_else(not_a_color)
            }
            NodeKind::Any(AnyKind::Hash) => {
                Color::from_hex(tree.data(id)).ok_or_else(not_a_color)
            }
            NodeKind::Any(AnyKind::Function) => Color::from_function(tree, id),
            _ => Err(not_a_color()),
        }
    }

    /// Build from an `rgb`/`rgba`/`hsl`/`hsla` function token.
    fn from_function(tree: &TokenTree, id: NodeId) -> Result<Self, CompileError> {
        let name = tokens::function_name(tree, id)?;
        let arguments = tokens::function_arguments(tree, id, false);
        match name.as_str() {
            "rgb" => {
                if arguments.len() != 3 {
                    return Err(CompileError::new(format!(
                        "RGB colors must have 3 arguments, has {}",
                        arguments.len()
                    )));
                }
                Ok(Color::from_rgb(
                    channel_arg(tree, arguments[0], NumberFormat::Int)?,
                    channel_arg(tree, arguments[1], NumberFormat::Int)?,
                    channel_arg(tree, arguments[2], NumberFormat::Int)?,
                    1.0,
                ))
            }
            "rgba" => {
                if arguments.len() != 4 {
                    return Err(CompileError::new(format!(
                        "RGBA colors must have 4 arguments, has {}",
                        arguments.len()
                    )));
                }
                Ok(Color::from_rgb(
                    channel_arg(tree, arguments[0], NumberFormat::Int)?,
                    channel_arg(tree, arguments[1], NumberFormat::Int)?,
                    channel_arg(tree, arguments[2], NumberFormat::Int)?,
                    channel_arg(tree, arguments[3], NumberFormat::Float)?,
                ))
            }
            "hsl" => {
                if arguments.len() != 3 {
                    return Err(CompileError::new(format!(
                        "HSL colors must have 3 arguments, has {}",
                        arguments.len()
                    )));
                }
                Ok(Color::from_hsl(
                    channel_arg(tree, arguments[0], NumberFormat::Degree)?,
                    channel_arg(tree, arguments[1], NumberFormat::Float)?,
                    channel_arg(tree, arguments[2], NumberFormat::Float)?,
                    1.0,
                ))
            }
            "hsla" => {
                if arguments.len() != 4 {
                    return Err(CompileError::new(format!(
                        "HSLA colors must have 4 arguments, has {}",
                        arguments.len()
                    )));
                }
                Ok(Color::from_hsl(
                    channel_arg(tree, arguments[0], NumberFormat::Degree)?,
                    channel_arg(tree, arguments[1], NumberFormat::Float)?,
                    channel_arg(tree, arguments[2], NumberFormat::Float)?,
                    channel_arg(tree, arguments[3], NumberFormat::Float)?,
                ))
            }
            _ => Err(CompileError::new(format!(
                "Unrecognized value \"{name}(…)\" assigned to color"
            ))),
        }
    }

    /// RGB channels of this color, converting from HSL when needed.
    #[must_use]
    pub fn rgb(&self) -> (f64, f64, f64) {
        match self.repr {
            Repr::Rgb { r, g, b } => (r, g, b),
            Repr::Hsl { h, s, l } => hls_to_rgb(h, l, s),
        }
    }

    /// HSL channels of this color, converting from RGB when needed.
    #[must_use]
    pub fn hsl(&self) -> (f64, f64, f64) {
        match self.repr {
            Repr::Rgb { r, g, b } => {
                let (h, l, s) = rgb_to_hls(r, g, b);
                (h, s, l)
            }
            Repr::Hsl { h, s, l } => (h, s, l),
        }
    }

    /// The same color with the RGB representation active.
    #[must_use]
    pub fn to_rgb(&self) -> Color {
        let (r, g, b) = self.rgb();
        Color::from_rgb(r, g, b, self.alpha)
    }

    /// The same color with the HSL representation active.
    #[must_use]
    pub fn to_hsl(&self) -> Color {
        let (h, s, l) = self.hsl();
        Color::from_hsl(h, s, l, self.alpha)
    }

    /// A copy with its lightness reduced by `amount` (0–1).
    #[must_use]
    pub fn darken(&self, amount: f64) -> Color {
        let (h, s, l) = self.hsl();
        Color::from_hsl(h, s, clamp(l - amount, 0.0, 1.0), self.alpha)
    }

    /// A copy with its lightness increased by `amount` (0–1).
    #[must_use]
    pub fn lighten(&self, amount: f64) -> Color {
        let (h, s, l) = self.hsl();
        Color::from_hsl(h, s, clamp(l + amount, 0.0, 1.0), self.alpha)
    }

    /// Any positive channel and a positive alpha.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        let (r, g, b) = self.rgb();
        (r > 0.0 || g > 0.0 || b > 0.0) && self.alpha > 0.0
    }

    /// Componentwise equality after converting both sides to RGB, alpha
    /// included.
    #[must_use]
    pub fn channels_equal(&self, other: &Color) -> bool {
        let (r1, g1, b1) = self.rgb();
        let (r2, g2, b2) = other.rgb();
        r1 == r2 && g1 == g2 && b1 == b2 && self.alpha == other.alpha
    }

    /// Shortest CSS representation: `transparent` at alpha 0, otherwise the
    /// shortest of keyword, hsl/hsla (when HSL is active), hex, and rgba.
    #[must_use]
    pub fn to_css(&self) -> String {
        if self.alpha == 0.0 {
            return "transparent".to_string();
        }

        let mut hsl_form = None;
        if let Repr::Hsl { h, s, l } = self.repr {
            hsl_form = Some(if self.alpha == 1.0 {
                format!(
                    "hsl({},{}%,{}%)",
                    (h * 360.0) as i64,
                    (s * 100.0) as i64,
                    (l * 100.0) as i64
                )
            } else {
                format!(
                    "hsla({},{}%,{}%,{})",
                    (h * 360.0) as i64,
                    (s * 100.0) as i64,
                    (l * 100.0) as i64,
                    format_alpha(self.alpha)
                )
            });
        }

        let (r, g, b) = self.rgb();
        let bytes = [
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
        ];

        let mut keyword_form = None;
        let mut hex_form = None;
        let mut rgb_form = None;
        if self.alpha == 1.0 {
            keyword_form = COLOR_MAP
                .iter()
                .find(|(_, rgb)| *rgb == bytes)
                .map(|(keyword, _)| (*keyword).to_string());

            let mut hex = format!("{:02x}{:02x}{:02x}", bytes[0], bytes[1], bytes[2]);
            let h: Vec<char> = hex.chars().collect();
            if h[0] == h[1] && h[2] == h[3] && h[4] == h[5] {
                hex = format!("{}{}{}", h[0], h[2], h[4]);
            }
            hex_form = Some(format!("#{hex}"));
        } else {
            rgb_form = Some(format!(
                "rgba({},{},{},{})",
                bytes[0],
                bytes[1],
                bytes[2],
                format_alpha(self.alpha)
            ));
        }

        // Always pick the shortest representation; on a tie the later
        // candidate wins (keyword < hsl < hex, hex beats rgba on a tie).
        let absent = usize::MAX;
        let len = |form: &Option<String>| form.as_ref().map_or(absent, String::len);
        let (key, hsl, hex, rgb) = (
            len(&keyword_form),
            len(&hsl_form),
            len(&hex_form),
            len(&rgb_form),
        );
        if key < hsl && key < hex && key < rgb {
            keyword_form.unwrap_or_default()
        } else if hsl < hex && hsl < rgb {
            hsl_form.unwrap_or_default()
        } else if hex < rgb {
            hex_form.unwrap_or_default()
        } else {
            rgb_form.unwrap_or_default()
        }
    }
}

/// What numeric shape a color-function argument takes.
#[derive(Clone, Copy)]
enum NumberFormat {
    /// A 0–255 channel.
    Int,
    /// A 0–1 fraction.
    Float,
    /// Degrees, wrapped into a fraction of a turn.
    Degree,
}

/// Turn a color-function argument token into a normalized channel.
fn channel_arg(
    tree: &TokenTree,
    id: NodeId,
    format: NumberFormat,
) -> Result<f64, CompileError> {
    let data = tree.data(id);
    let invalid =
        || CompileError::new("Color argument is not a valid number or percentage");

    match tree.kind(id) {
        NodeKind::Any(AnyKind::Number) => match format {
            NumberFormat::Int => {
                let value: i64 = data.parse().map_err(|_| invalid())?;
                Ok(clamp(value as f64 / 255.0, 0.0, 1.0))
            }
            NumberFormat::Float => {
                let value: f64 = data.parse().map_err(|_| invalid())?;
                Ok(clamp(value, 0.0, 1.0))
            }
            NumberFormat::Degree => {
                let value: f64 = data.parse().map_err(|_| invalid())?;
                Ok(clamp((value % 360.0) / 360.0, 0.0, 1.0))
            }
        },
        NodeKind::Any(AnyKind::Percentage) => {
            let digits = data.strip_suffix('%').unwrap_or(data);
            let value: i64 = digits.parse().map_err(|_| invalid())?;
            Ok(clamp(value as f64 / 100.0, 0.0, 1.0))
        }
        NodeKind::Any(AnyKind::Dimension)
            if matches!(format, NumberFormat::Degree)
                && data.to_lowercase().ends_with("deg") =>
        {
            let digits = &data[..data.len() - 3];
            let value: f64 = digits.parse().map_err(|_| invalid())?;
            Ok(clamp((value % 360.0) / 360.0, 0.0, 1.0))
        }
        _ => Err(invalid()),
    }
}

/// `str(alpha)` without the leading zero: 0.5 prints as `.5`.
fn format_alpha(alpha: f64) -> String {
    let text = format!("{alpha}");
    text.strip_prefix('0').map_or(text.clone(), String::from)
}

/// HLS → RGB, hue as a fraction of a turn.
fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

/// RGB → HLS, hue as a fraction of a turn.
fn rgb_to_hls(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let l = (minc + maxc) / 2.0;
    if maxc == minc {
        return (0.0, l, 0.0);
    }
    let delta = maxc - minc;
    let s = if l <= 0.5 {
        delta / (maxc + minc)
    } else {
        delta / (2.0 - maxc - minc)
    };
    let rc = (maxc - r) / delta;
    let gc = (maxc - g) / delta;
    let bc = (maxc - b) / delta;
    let h = if r == maxc {
        bc - gc
    } else if g == maxc {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), l, s)
}
