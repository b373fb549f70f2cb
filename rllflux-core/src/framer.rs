//! Frame splitting on the clock sync pattern

use crate::constants::SYNC_PATTERN;
use crate::error::DecodeError;
use crate::types::{ClockPeriod, Frame};
use alloc::vec::Vec;
use core::mem;

#[cfg(feature = "logging")]
use tracing::debug;

/// Splits a clock period stream into frames at every sync pattern
///
/// Each time the accumulated periods end in [`SYNC_PATTERN`], the periods
/// before it are yielded as one frame and accumulation restarts. Whatever is
/// left at end of input is yielded as a final frame, even when empty. A
/// source error is passed through and ends the stream without a final frame.
#[derive(Debug, Clone)]
pub struct Framer<I> {
    periods: I,
    acc: Vec<ClockPeriod>,
    index: usize,
    finished: bool,
}

impl<I> Framer<I>
where
    I: Iterator<Item = Result<ClockPeriod, DecodeError>>,
{
    /// Wrap a clock period stream
    pub fn new(periods: I) -> Self {
        Self {
            periods,
            acc: Vec::new(),
            index: 0,
            finished: false,
        }
    }

    fn emit(&mut self, periods: Vec<ClockPeriod>) -> Frame {
        let frame = Frame::new(self.index, periods);
        self.index += 1;

        #[cfg(feature = "logging")]
        debug!("Frame {} holds {} periods", frame.index, frame.len());

        frame
    }
}

impl<I> Iterator for Framer<I>
where
    I: Iterator<Item = Result<ClockPeriod, DecodeError>>,
{
    type Item = Result<Frame, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            match self.periods.next() {
                Some(Ok(period)) => {
                    self.acc.push(period);
                    if self.acc.ends_with(&SYNC_PATTERN) {
                        let mut periods = mem::take(&mut self.acc);
                        periods.truncate(periods.len() - SYNC_PATTERN.len());
                        return Some(Ok(self.emit(periods)));
                    }
                }
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                None => {
                    self.finished = true;
                    let periods = mem::take(&mut self.acc);
                    return Some(Ok(self.emit(periods)));
                }
            }
        }
    }
}

/// Split an in-memory period sequence into frames
pub fn split_frames(periods: &[ClockPeriod]) -> Vec<Frame> {
    Framer::new(periods.iter().copied().map(Ok))
        .filter_map(Result::ok)
        .collect()
}
