//! Wrapping sequence counter for output labels

use super::types::{BatchError, Result};

/// Counter cycling through `start..=end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceCounter {
    start: u32,
    end: u32,
    current: u32,
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self {
            start: 1,
            end: 4,
            current: 1,
        }
    }
}

impl SequenceCounter {
    /// Counter over `start..=end` (start >= 1, end >= start)
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if start < 1 || end < start {
            return Err(BatchError::InvalidSequence { start, end });
        }
        Ok(Self {
            start,
            end,
            current: start,
        })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    /// Number of values in one cycle; also the export chunk size
    pub fn cycle_len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    /// Step forward, wrapping past `end` back to `start`. Returns the new value.
    pub fn advance(&mut self) -> u32 {
        self.current = if self.current >= self.end {
            self.start
        } else {
            self.current + 1
        };
        self.current
    }

    /// Back to `start`
    pub fn reset(&mut self) {
        self.current = self.start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraparound_sequence() {
        let mut counter = SequenceCounter::new(1, 3).unwrap();
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(counter.current());
            counter.advance();
        }
        assert_eq!(seen, vec![1, 2, 3, 1, 2]);
    }

    #[test]
    fn test_single_value_range() {
        let mut counter = SequenceCounter::new(7, 7).unwrap();
        assert_eq!(counter.advance(), 7);
        assert_eq!(counter.advance(), 7);
        assert_eq!(counter.cycle_len(), 1);
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(matches!(
            SequenceCounter::new(0, 3),
            Err(BatchError::InvalidSequence { start: 0, end: 3 })
        ));
        assert!(SequenceCounter::new(5, 4).is_err());
    }

    #[test]
    fn test_cycle_len_and_reset() {
        let mut counter = SequenceCounter::new(3, 6).unwrap();
        assert_eq!(counter.cycle_len(), 4);
        counter.advance();
        counter.advance();
        assert_eq!(counter.current(), 5);
        counter.reset();
        assert_eq!(counter.current(), 3);
    }

    #[test]
    fn test_stays_in_range() {
        let mut counter = SequenceCounter::new(2, 5).unwrap();
        for _ in 0..50 {
            let v = counter.advance();
            assert!((2..=5).contains(&v));
        }
    }
}
