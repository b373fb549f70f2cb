//! Text rendering of a frame's flux waveform
//!
//! Every clock cell becomes one symbol: [`FILLER`] for a cell without a flux
//! transition, [`SEPARATOR`] for the cell a transition ends. A period of `n`
//! cells is `n - 1` fillers and one separator. The RLL decoder pattern
//! matches directly against this text.

use crate::constants::{FILLER, SEPARATOR};
use crate::error::DecodeError;
use crate::types::{ClockPeriod, Frame};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Rendered waveform of one frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Waveform(String);

impl Waveform {
    /// Render clock periods as waveform text
    ///
    /// The filler runs are joined by separators and one more separator closes
    /// the last period, so an empty period list renders as a single
    /// separator. A zero period renders like a period of one.
    pub fn from_periods(periods: &[ClockPeriod]) -> Self {
        let cells: usize = periods.iter().map(|&p| p.max(1) as usize).sum();
        let mut text = String::with_capacity(cells.max(1));
        for (i, &period) in periods.iter().enumerate() {
            if i > 0 {
                text.push(SEPARATOR);
            }
            text.extend(core::iter::repeat(FILLER).take(period.saturating_sub(1) as usize));
        }
        text.push(SEPARATOR);
        Self(text)
    }

    /// Parse waveform text, rejecting anything but filler and separator
    /// symbols or text not closed by a separator
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        if let Some(bad) = text.chars().find(|&c| c != FILLER && c != SEPARATOR) {
            return Err(DecodeError::InvalidWaveform(alloc::format!(
                "unexpected symbol {:?}",
                bad
            )));
        }
        if !text.ends_with(SEPARATOR) {
            return Err(DecodeError::InvalidWaveform(String::from(
                "waveform must end with a transition",
            )));
        }
        Ok(Self(String::from(text)))
    }

    /// Recover the clock periods this waveform was rendered from
    ///
    /// Inverse of [`Waveform::from_periods`] for non-empty lists of periods
    /// of one or more. An empty frame and a single one-cell period both
    /// render as `|`; this returns the latter.
    pub fn periods(&self) -> Vec<ClockPeriod> {
        let Some(body) = self.0.strip_suffix(SEPARATOR) else {
            return Vec::new();
        };
        body.split(SEPARATOR)
            .map(|run| run.len() as ClockPeriod + 1)
            .collect()
    }

    /// Waveform text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in clock cells
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True only for the degenerate default waveform
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&Frame> for Waveform {
    fn from(frame: &Frame) -> Self {
        Waveform::from_periods(&frame.periods)
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render a frame as waveform text
pub fn render(frame: &Frame) -> Waveform {
    Waveform::from(frame)
}
