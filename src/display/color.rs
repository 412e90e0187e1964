use crate::mackie::{self, CHANNEL_COUNT};
use crate::{find_closest_color_in_palette, Context, OutputPort, StateCell};
use derive_more::Display;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::rc::{Rc, Weak};
use strum::EnumString;
use tracing::trace;

/// An RGB color with components within `0.0..=1.0`, as reported by the host.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct RgbColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl RgbColor {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

/// The colors scribble strips can show, indexed by their color code (bit 0 = red, bit 1 = green,
/// bit 2 = blue).
pub const SCRIBBLE_STRIP_PALETTE: [RgbColor; 8] = [
    RgbColor::new(0.0, 0.0, 0.0), // 0 - Black
    RgbColor::new(1.0, 0.0, 0.0), // 1 - Red
    RgbColor::new(0.0, 1.0, 0.0), // 2 - Green
    RgbColor::new(1.0, 1.0, 0.0), // 3 - Yellow
    RgbColor::new(0.0, 0.0, 1.0), // 4 - Blue
    RgbColor::new(1.0, 0.0, 1.0), // 5 - Magenta
    RgbColor::new(0.0, 1.0, 1.0), // 6 - Cyan
    RgbColor::new(1.0, 1.0, 1.0), // 7 - White
];

/// Color of one color source together with the information whether the source is assigned to
/// anything at all.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct ColorRecord {
    pub is_assigned: bool,
    pub color: RgbColor,
}

impl ColorRecord {
    pub const fn new(is_assigned: bool, color: RgbColor) -> Self {
        Self { is_assigned, color }
    }
}

/// Decides which color source determines a scribble strip's color.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    TryFromPrimitive,
    IntoPrimitive,
    Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
#[repr(usize)]
pub enum DisplayColorMode {
    /// Encoder color, falling back to the channel color if the encoder is unassigned.
    #[display(fmt = "Encoder colors")]
    Encoders,
    /// Channel color, white for unassigned channels with an assigned encoder.
    #[display(fmt = "Channel colors")]
    Channels,
    /// White if anything is assigned, black otherwise.
    #[display(fmt = "Black and white")]
    Mixed,
}

impl Default for DisplayColorMode {
    fn default() -> Self {
        Self::Encoders
    }
}

/// Combines the encoder and channel color of one channel into the color to be displayed.
pub fn resolve_color(
    mode: DisplayColorMode,
    encoder_color: ColorRecord,
    channel_color: ColorRecord,
) -> RgbColor {
    use DisplayColorMode::*;
    match mode {
        Encoders => {
            if encoder_color.is_assigned {
                encoder_color.color
            } else {
                channel_color.color
            }
        }
        Channels => {
            // Encoder titles on otherwise blank channels must stay readable
            if !channel_color.is_assigned && encoder_color.is_assigned {
                RgbColor::WHITE
            } else {
                channel_color.color
            }
        }
        Mixed => {
            if channel_color.is_assigned || encoder_color.is_assigned {
                RgbColor::WHITE
            } else {
                RgbColor::BLACK
            }
        }
    }
}

/// Scribble strip colors of one physical unit.
///
/// The unit only accepts the colors of all its channels at once, so every change retransmits the
/// complete set.
#[derive(Debug)]
pub struct ColorManager {
    port: OutputPort,
    color_codes: StateCell<[u8; CHANNEL_COUNT]>,
}

impl ColorManager {
    pub fn new(port: OutputPort) -> Self {
        Self {
            port,
            color_codes: StateCell::new([0; CHANNEL_COUNT]),
        }
    }

    pub fn color_code(&self, context: Context, channel_index: usize) -> u8 {
        self.color_codes.get(context)[channel_index]
    }

    /// Transmits the colors if the displayable color of the given channel changes.
    pub fn set_channel_color_rgb(&self, context: Context, channel_index: usize, color: RgbColor) {
        let mut color_codes = self.color_codes.get(context);
        color_codes[channel_index] = find_closest_color_in_palette(color, &SCRIBBLE_STRIP_PALETTE);
        if self.color_codes.set(context, color_codes) {
            self.send_colors(context);
        }
    }

    /// Transmits the current colors unconditionally.
    pub fn send_colors(&self, context: Context) {
        let color_codes = self.color_codes.get(context);
        trace!("Sending scribble strip colors {color_codes:?}");
        self.port
            .send_sysex(context, &mackie::scribble_strip_colors(&color_codes));
    }

    /// Turns all scribble strips black.
    pub fn reset_colors(&self, context: Context) {
        self.color_codes.set(context, [0; CHANNEL_COUNT]);
        self.send_colors(context);
    }
}

/// Connects the two color sources of one channel with its scribble strip color.
#[derive(Debug)]
pub struct ChannelColorBinding {
    mode: DisplayColorMode,
    channel_index: usize,
    encoder_color: StateCell<ColorRecord>,
    channel_color: StateCell<ColorRecord>,
    color_manager: Rc<ColorManager>,
}

impl ChannelColorBinding {
    pub fn new(
        mode: DisplayColorMode,
        channel_index: usize,
        color_manager: Rc<ColorManager>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let binding = Self {
                mode,
                channel_index,
                encoder_color: StateCell::new(Default::default()),
                channel_color: StateCell::new(Default::default()),
                color_manager,
            };
            for cell in [&binding.encoder_color, &binding.channel_color] {
                let weak = weak.clone();
                cell.add_on_change_callback(move |context, _| {
                    if let Some(binding) = weak.upgrade() {
                        binding.update_color(context);
                    }
                });
            }
            binding
        })
    }

    pub fn set_encoder_color(&self, context: Context, color: ColorRecord) {
        self.encoder_color.set(context, color);
    }

    pub fn set_channel_color(&self, context: Context, color: ColorRecord) {
        self.channel_color.set(context, color);
    }

    fn update_color(&self, context: Context) {
        let color = resolve_color(
            self.mode,
            self.encoder_color.get(context),
            self.channel_color.get(context),
        );
        self.color_manager
            .set_channel_color_rgb(context, self.channel_index, color);
    }
}
