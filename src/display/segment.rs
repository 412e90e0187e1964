use crate::mackie;
use crate::{Context, Led, OutputPort, StateCell};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use std::rc::Rc;
use tracing::debug;

/// Number of 7-segment cells: ten for the time followed by two for the assignment.
pub const SEGMENT_CELL_COUNT: usize = 12;

/// Host time format tag which lights the SMPTE lamp.
pub const SECONDS_TIME_FORMAT: &str = "Seconds";

/// Host time format tag which lights the Beats lamp.
pub const BARS_BEATS_TIME_FORMAT: &str = "Bars+Beats";

const TIME_CELLS: Range<usize> = 0..10;
const ASSIGNMENT_CELLS: Range<usize> = 10..SEGMENT_CELL_COUNT;

const DIGIT_BASE: u8 = 0x30;
const BLANK: u8 = 0x20;
const DOT_FLAG: u8 = 0x40;

/// Times consisting of four groups, e.g. bars, beats, sixteenths and ticks.
static FOUR_GROUP_TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([\d ]+[.:])([\d ]+)([.:])([\d ]+)([.:])([\d ]+)$")
        .expect("invalid time regex")
});

/// A physical unit which shows the segment display.
#[derive(Clone, Debug)]
pub struct SegmentDisplayUnit {
    pub port: OutputPort,
    pub smpte_lamp: Rc<Led>,
    pub beats_lamp: Rc<Led>,
}

/// The time code and assignment display.
///
/// All units show identical content, so each cell is gated once for all of them.
#[derive(Debug)]
pub struct SegmentDisplay {
    units: Vec<SegmentDisplayUnit>,
    cell_values: Vec<StateCell<u8>>,
    last_time_format: StateCell<String>,
}

impl SegmentDisplay {
    pub fn new(units: Vec<SegmentDisplayUnit>) -> Self {
        Self {
            units,
            cell_values: (0..SEGMENT_CELL_COUNT).map(|_| StateCell::new(0)).collect(),
            last_time_format: StateCell::new(String::new()),
        }
    }

    /// Returns the byte last written to the given cell.
    pub fn cell_value(&self, context: Context, cell_id: usize) -> u8 {
        self.cell_values[cell_id].get(context)
    }

    /// Shows the given time, a string of digits, spaces, dots and colons.
    pub fn update_time(&self, context: Context, time: &str, time_format: &str) {
        if self
            .last_time_format
            .set(context, time_format.to_string())
        {
            for unit in &self.units {
                unit.smpte_lamp
                    .set(context, time_format == SECONDS_TIME_FORMAT);
                unit.beats_lamp
                    .set(context, time_format == BARS_BEATS_TIME_FORMAT);
            }
        }
        let time = align_time(time);
        self.update_cells_by_string(context, TIME_CELLS, &time);
    }

    /// Like [`Self::update_time`] but writes the lamps even if they are believed to be in the
    /// right state already.
    pub fn init_time(&self, context: Context, time: &str, time_format: &str) {
        debug!("Initializing time display with {time:?} ({time_format})");
        for unit in &self.units {
            unit.smpte_lamp
                .force(context, time_format == SECONDS_TIME_FORMAT);
            unit.beats_lamp
                .force(context, time_format == BARS_BEATS_TIME_FORMAT);
        }
        self.last_time_format
            .set(context, time_format.to_string());
        self.update_time(context, time, time_format);
    }

    /// Shows a label of at most two characters, right-aligned. Separators light the dot of the
    /// character left of them and don't take a cell.
    pub fn set_assignment(&self, context: Context, assignment: &str) {
        let separator_count = assignment.chars().filter(|c| is_separator(*c)).count();
        let width = ASSIGNMENT_CELLS.len() + separator_count;
        let assignment = format!("{assignment:>width$}");
        self.update_cells_by_string(context, ASSIGNMENT_CELLS, &assignment);
    }

    pub fn clear_assignment(&self, context: Context) {
        for cell_id in ASSIGNMENT_CELLS {
            self.update_cell(context, cell_id, None, false);
        }
    }

    pub fn clear_time(&self, context: Context) {
        for cell_id in TIME_CELLS {
            self.update_cell(context, cell_id, None, false);
        }
    }

    /// Writes the string from right to left, beginning with the first cell of the given range.
    /// Separators are shown as the dot of the cell left of them.
    fn update_cells_by_string(&self, context: Context, cells: Range<usize>, text: &str) {
        let mut cell_ids = cells;
        let mut has_dot = false;
        for c in text.chars().rev() {
            if is_separator(c) {
                has_dot = true;
                continue;
            }
            let Some(cell_id) = cell_ids.next() else {
                break;
            };
            self.update_cell(context, cell_id, c.to_digit(10), has_dot);
            has_dot = false;
        }
    }

    fn update_cell(&self, context: Context, cell_id: usize, digit: Option<u32>, has_dot: bool) {
        let value = encode_cell(digit, has_dot);
        if !self.cell_values[cell_id].set(context, value) {
            return;
        }
        let message = mackie::segment_cell(cell_id as u8, value);
        for unit in &self.units {
            unit.port.send_short(context, message);
        }
    }
}

fn is_separator(c: char) -> bool {
    c == '.' || c == ':'
}

fn encode_cell(digit: Option<u32>, has_dot: bool) -> u8 {
    let base = match digit {
        None => BLANK,
        Some(d) => DIGIT_BASE + d as u8,
    };
    if has_dot {
        base + DOT_FLAG
    } else {
        base
    }
}

/// Pads the groups of four-group times to the device's digit grouping and left-pads the result
/// so that it fills all time cells.
fn align_time(time: &str) -> String {
    let time = match FOUR_GROUP_TIME_REGEX.captures(time) {
        None => time.to_string(),
        Some(c) => format!(
            "{}{:>2}{}{:>2}{}{:>3}",
            &c[1], &c[2], &c[3], &c[4], &c[5], &c[6]
        ),
    };
    let separator_count = time.chars().filter(|c| is_separator(*c)).count();
    let width = TIME_CELLS.len() + separator_count;
    format!("{time:>width$}")
}
