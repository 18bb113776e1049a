//! A memory tape that grows in both directions, one fixed-size segment at a time.
//!
//! Segments live in two directories: `right` holds segment indices `0, 1, 2, ...`
//! and `left` holds `-1, -2, ...`. A segment is allocated, zeroed, exactly when
//! the data pointer first crosses into it and is kept until the tape is dropped.

/// Default number of cells per segment.
pub const SEGMENT_SIZE: usize = 1024;

type Segment = Box<[u8]>;

#[derive(Debug, Clone)]
pub struct Tape {
    right: Vec<Segment>,
    left: Vec<Segment>,
    segment_size: usize,
    // Index of the current segment; negative values address `left`.
    segment: isize,
    offset: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    /// A tape with one segment of [`SEGMENT_SIZE`] cells, pointer centered.
    pub fn new() -> Self {
        Self::with_segment_size(SEGMENT_SIZE)
    }

    /// A tape with a custom segment size.
    ///
    /// # Panics
    ///
    /// Panics if `segment_size` is zero.
    pub fn with_segment_size(segment_size: usize) -> Self {
        assert!(segment_size > 0, "segment size must be non-zero");
        Self {
            right: vec![zeroed(segment_size)],
            left: Vec::new(),
            segment_size,
            segment: 0,
            offset: segment_size / 2,
        }
    }

    pub fn segment_size(&self) -> usize {
        self.segment_size
    }

    /// Number of segments allocated so far.
    pub fn segment_count(&self) -> usize {
        self.right.len() + self.left.len()
    }

    /// Signed distance of the data pointer from the cell it started on.
    pub fn position(&self) -> isize {
        self.segment * self.segment_size as isize + self.offset as isize
            - (self.segment_size / 2) as isize
    }

    pub fn get(&self) -> u8 {
        let (dir, idx) = self.locate();
        match dir {
            Side::Right => self.right[idx][self.offset],
            Side::Left => self.left[idx][self.offset],
        }
    }

    pub fn set(&mut self, value: u8) {
        *self.cell_mut() = value;
    }

    /// Add a signed delta to the current cell, wrapping modulo 256.
    pub fn add(&mut self, delta: i64) {
        let cell = self.cell_mut();
        *cell = cell.wrapping_add(delta as u8);
    }

    pub fn shift_right(&mut self, distance: usize) {
        self.offset += distance;
        while self.offset >= self.segment_size {
            self.offset -= self.segment_size;
            self.segment += 1;
            self.ensure_segment();
        }
    }

    pub fn shift_left(&mut self, distance: usize) {
        // Rebase whole segments first so the offset never goes negative.
        let mut remaining = distance;
        while remaining > self.offset {
            remaining -= self.offset + 1;
            self.offset = self.segment_size - 1;
            self.segment -= 1;
            self.ensure_segment();
        }
        self.offset -= remaining;
    }

    fn cell_mut(&mut self) -> &mut u8 {
        let (dir, idx) = self.locate();
        match dir {
            Side::Right => &mut self.right[idx][self.offset],
            Side::Left => &mut self.left[idx][self.offset],
        }
    }

    fn locate(&self) -> (Side, usize) {
        if self.segment >= 0 {
            (Side::Right, self.segment as usize)
        } else {
            (Side::Left, (-self.segment - 1) as usize)
        }
    }

    // Segments are entered one at a time, so at most one allocation is needed.
    fn ensure_segment(&mut self) {
        let (dir, idx) = self.locate();
        let segments = match dir {
            Side::Right => &mut self.right,
            Side::Left => &mut self.left,
        };
        if idx == segments.len() {
            segments.push(zeroed(self.segment_size));
            tracing::trace!(
                segment = self.segment,
                total = self.right.len() + self.left.len(),
                "allocated tape segment"
            );
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Right,
    Left,
}

fn zeroed(size: usize) -> Segment {
    vec![0u8; size].into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_centered_with_one_zeroed_segment() {
        let tape = Tape::new();
        assert_eq!(tape.segment_count(), 1);
        assert_eq!(tape.position(), 0);
        assert_eq!(tape.get(), 0);
        assert_eq!(tape.offset, SEGMENT_SIZE / 2);
    }

    #[test]
    fn add_wraps_both_ways() {
        let mut tape = Tape::new();
        tape.add(-1);
        assert_eq!(tape.get(), 255);
        tape.add(2);
        assert_eq!(tape.get(), 1);
        tape.add(256 * 3);
        assert_eq!(tape.get(), 1);
    }

    #[test]
    fn moves_within_a_segment_do_not_allocate() {
        let mut tape = Tape::with_segment_size(8);
        tape.shift_right(3);
        tape.shift_left(7);
        assert_eq!(tape.position(), -4);
        assert_eq!(tape.segment_count(), 1);
    }

    #[test]
    fn crossing_right_allocates_lazily() {
        let mut tape = Tape::with_segment_size(8);
        tape.shift_right(4);
        assert_eq!(tape.segment_count(), 2);
        assert_eq!(tape.position(), 4);
        tape.shift_right(7);
        assert_eq!(tape.segment_count(), 2);
        tape.shift_right(1);
        assert_eq!(tape.segment_count(), 3);
    }

    #[test]
    fn crossing_left_allocates_lazily() {
        let mut tape = Tape::with_segment_size(8);
        tape.shift_left(4);
        assert_eq!(tape.segment_count(), 1);
        tape.shift_left(1);
        assert_eq!(tape.segment_count(), 2);
        assert_eq!(tape.position(), -5);
        assert_eq!(tape.get(), 0);
    }

    #[test]
    fn long_shift_allocates_every_crossed_segment() {
        let mut tape = Tape::with_segment_size(4);
        tape.shift_right(20);
        assert_eq!(tape.position(), 20);
        assert_eq!(tape.segment_count(), 6);
        tape.shift_left(40);
        assert_eq!(tape.position(), -20);
        assert_eq!(tape.segment_count(), 11);
    }

    #[test]
    fn values_survive_round_trips_across_segments() {
        let mut tape = Tape::new();
        tape.add(7);
        tape.shift_right(3000);
        tape.add(1);
        tape.shift_left(6000);
        tape.add(2);
        tape.shift_right(3000);
        assert_eq!(tape.position(), 0);
        assert_eq!(tape.get(), 7);
        tape.shift_right(3000);
        assert_eq!(tape.get(), 1);
        tape.shift_left(6000);
        assert_eq!(tape.get(), 2);
    }

    #[test]
    fn segment_size_one_still_works() {
        let mut tape = Tape::with_segment_size(1);
        tape.set(9);
        tape.shift_left(3);
        tape.shift_right(3);
        assert_eq!(tape.get(), 9);
        assert_eq!(tape.segment_count(), 4);
    }
}
