use crate::mackie::{self, CHANNEL_COUNT, LCD_CELL_WIDTH, LCD_ROW_WIDTH};
use crate::{Context, OutputPort, StateCell};
use derive_more::Display;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use tracing::trace;

/// One of the two text rows of a scribble strip display.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Display,
)]
#[repr(usize)]
pub enum DisplayRow {
    #[display(fmt = "Upper row")]
    Upper = 0,
    #[display(fmt = "Lower row")]
    Lower = 1,
}

impl DisplayRow {
    pub const ALL: [DisplayRow; 2] = [DisplayRow::Upper, DisplayRow::Lower];

    pub fn other(self) -> Self {
        match self {
            DisplayRow::Upper => DisplayRow::Lower,
            DisplayRow::Lower => DisplayRow::Upper,
        }
    }
}

/// The two-row LCD of one physical unit, split into one cell per channel.
#[derive(Debug)]
pub struct LcdDisplay {
    port: OutputPort,
    channel_width: usize,
    /// Last text sent to each cell, row-major. Empty until something has been sent.
    cells: Vec<StateCell<String>>,
}

impl LcdDisplay {
    /// `channel_width` is the number of characters usable per channel (at most the cell width).
    /// The remaining characters of a cell are kept blank as a gap between channels.
    pub fn new(port: OutputPort, channel_width: usize) -> Self {
        Self {
            port,
            channel_width: channel_width.min(LCD_CELL_WIDTH),
            cells: (0..DisplayRow::ALL.len() * CHANNEL_COUNT)
                .map(|_| StateCell::new(String::new()))
                .collect(),
        }
    }

    pub fn channel_width(&self) -> usize {
        self.channel_width
    }

    /// Returns the text last sent to the given cell.
    pub fn text(&self, context: Context, row: DisplayRow, channel_index: usize) -> String {
        self.cell(row, channel_index).get(context)
    }

    /// Writes the given text to the given channel cell unless the cell shows it already.
    ///
    /// Returns whether something was transmitted.
    pub fn send_text(
        &self,
        context: Context,
        row: DisplayRow,
        channel_index: usize,
        text: &str,
    ) -> bool {
        let text = self.fit_to_cell(text);
        if !self.cell(row, channel_index).set(context, text.clone()) {
            return false;
        }
        trace!("Sending {text:?} to channel {channel_index}, {row}");
        let offset = mackie::lcd_offset(row.into(), channel_index);
        self.port
            .send_sysex(context, &mackie::lcd_text(offset, text.as_bytes()));
        true
    }

    /// Blanks both rows unconditionally.
    pub fn clear_displays(&self, context: Context) {
        let blank_cell = " ".repeat(LCD_CELL_WIDTH);
        for cell in &self.cells {
            cell.set(context, blank_cell.clone());
        }
        let blank_row = [b' '; LCD_ROW_WIDTH];
        for row in DisplayRow::ALL {
            let offset = mackie::lcd_offset(row.into(), 0);
            self.port
                .send_sysex(context, &mackie::lcd_text(offset, &blank_row));
        }
    }

    fn cell(&self, row: DisplayRow, channel_index: usize) -> &StateCell<String> {
        &self.cells[usize::from(row) * CHANNEL_COUNT + channel_index]
    }

    /// Replaces non-ASCII characters, truncates to the channel width and pads to the cell width.
    fn fit_to_cell(&self, text: &str) -> String {
        let mut fitted: String = text
            .chars()
            .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { ' ' })
            .take(self.channel_width)
            .collect();
        let padding = LCD_CELL_WIDTH - fitted.len();
        fitted.extend(std::iter::repeat(' ').take(padding));
        fitted
    }
}
