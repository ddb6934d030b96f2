//! Code dictionaries and the code-width growth schedule.
//!
//! Both sides of the codec grow an append-only dictionary during a single
//! call and throw it away afterwards. Codes 0, 1 and 2 are control codes and
//! never name a fragment.
//!
//! The encoder keys fragments by `(prefix code, next unit)` instead of by
//! their full text: a fragment is always a known fragment extended by one
//! unit, so the pair identifies it uniquely.

use std::collections::{HashMap, HashSet};

/// Control code: an 8-bit literal follows.
pub const LITERAL_NARROW: u32 = 0;

/// Control code: a 16-bit literal follows.
pub const LITERAL_WIDE: u32 = 1;

/// Control code: end of stream.
pub const END_OF_STREAM: u32 = 2;

/// First code assigned to a fragment.
pub const FIRST_FRAGMENT_CODE: u32 = 3;

/// Cap used by the bounded decoder variant.
pub const MAX_DICTIONARY_SIZE: usize = 1 << 16;

/// Tracks how many bits a dictionary code occupies.
///
/// `remaining` counts down once per dictionary growth event; when it hits
/// zero it resets to `2^width` and `width` grows by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthSchedule {
    width: u8,
    remaining: u64,
}

impl GrowthSchedule {
    /// Encoder start state: the first registered unit does not count.
    pub fn for_encoder() -> Self {
        Self {
            width: 2,
            remaining: 2,
        }
    }

    /// Decoder start state: accounts for the three control codes and the seed.
    pub fn for_decoder() -> Self {
        Self {
            width: 3,
            remaining: 4,
        }
    }

    /// Current code width in bits.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Record one growth event, widening when the countdown expires.
    pub fn consume(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.remaining = 1u64 << self.width;
            self.width += 1;
        }
    }

    /// Width after `events` growth events from this state.
    pub fn width_after(mut self, events: usize) -> u8 {
        for _ in 0..events {
            self.consume();
        }
        self.width
    }
}

/// A fragment currently being extended by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    /// Dictionary code of the whole fragment
    pub code: u32,
    /// First unit of the fragment
    pub first: u16,
    /// Whether the fragment is a single unit
    pub single: bool,
}

/// Encode-side dictionary: fragment -> code.
#[derive(Debug, Default)]
pub struct EncoderDictionary {
    units: HashMap<u16, u32>,
    extensions: HashMap<(u32, u16), u32>,
    /// Units that have a code but have not been sent as a literal yet
    pending: HashSet<u16>,
    next_code: u32,
}

impl EncoderDictionary {
    pub fn new() -> Self {
        Self {
            next_code: FIRST_FRAGMENT_CODE,
            ..Self::default()
        }
    }

    /// Single-unit fragment for `unit`, registering the unit if it is new.
    ///
    /// A new unit takes the next code immediately and stays pending until
    /// its literal escape is written.
    pub fn unit(&mut self, unit: u16) -> Fragment {
        let code = match self.units.get(&unit) {
            Some(&code) => code,
            None => {
                let code = self.allocate();
                self.units.insert(unit, code);
                self.pending.insert(unit);
                code
            }
        };
        Fragment {
            code,
            first: unit,
            single: true,
        }
    }

    /// The fragment `w + unit`, if it already has a code.
    pub fn extension(&self, w: &Fragment, unit: u16) -> Option<Fragment> {
        self.extensions
            .get(&(w.code, unit))
            .map(|&code| Fragment {
                code,
                first: w.first,
                single: false,
            })
    }

    /// Assign the next code to `w + unit`.
    pub fn insert_extension(&mut self, w: &Fragment, unit: u16) {
        let code = self.allocate();
        self.extensions.insert((w.code, unit), code);
    }

    /// If `w` is a unit still awaiting its literal, clear the mark and return true.
    pub fn take_pending(&mut self, w: &Fragment) -> bool {
        w.single && self.pending.remove(&w.first)
    }

    /// Number of codes in use, control codes included.
    pub fn size(&self) -> usize {
        self.next_code as usize
    }

    fn allocate(&mut self) -> u32 {
        let code = self.next_code;
        self.next_code += 1;
        code
    }
}

/// Decode-side dictionary: code -> fragment.
#[derive(Debug)]
pub struct DecoderDictionary {
    entries: Vec<Vec<u16>>,
    limit: Option<usize>,
}

impl DecoderDictionary {
    /// Dictionary holding the three control placeholders.
    ///
    /// With `limit`, fragment insertions stop once `limit` entries exist;
    /// literal registrations are never limited.
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            entries: vec![Vec::new(); FIRST_FRAGMENT_CODE as usize],
            limit,
        }
    }

    /// Register a literal unit and return its code.
    pub fn push_literal(&mut self, unit: u16) -> u32 {
        self.entries.push(vec![unit]);
        (self.entries.len() - 1) as u32
    }

    /// Fragment for `code`. Control codes never resolve.
    pub fn get(&self, code: u32) -> Option<&[u16]> {
        if code < FIRST_FRAGMENT_CODE {
            return None;
        }
        self.entries.get(code as usize).map(Vec::as_slice)
    }

    /// The code the next insertion will receive.
    pub fn next_code(&self) -> u32 {
        self.entries.len() as u32
    }

    /// Insert `w + first` unless the dictionary is at its limit.
    ///
    /// Returns whether an entry was added.
    pub fn insert_extension(&mut self, w: &[u16], first: u16) -> bool {
        if self.limit.is_some_and(|limit| self.entries.len() >= limit) {
            return false;
        }
        let mut entry = Vec::with_capacity(w.len() + 1);
        entry.extend_from_slice(w);
        entry.push(first);
        self.entries.push(entry);
        true
    }

    /// Number of codes in use, control codes included.
    pub fn size(&self) -> usize {
        self.entries.len()
    }
}
