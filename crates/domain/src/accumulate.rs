use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::line::{LineKind, classify_line};

/// Line-kind counts for one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTally {
    pub total: u64,
    pub code: u64,
    pub comments: u64,
    pub blank: u64,
}

impl LineTally {
    pub fn record(&mut self, kind: LineKind) {
        self.total += 1;
        match kind {
            LineKind::Code => self.code += 1,
            LineKind::Comment => self.comments += 1,
            LineKind::Blank => self.blank += 1,
        }
    }
}

impl Add for LineTally {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for LineTally {
    fn add_assign(&mut self, rhs: Self) {
        self.total += rhs.total;
        self.code += rhs.code;
        self.comments += rhs.comments;
        self.blank += rhs.blank;
    }
}

/// Count the lines of `content` by kind.
///
/// Lines are the segments of a plain split on `\n`: content ending in a
/// newline yields one extra blank line. Empty content counts as nothing.
pub fn accumulate(content: &str) -> LineTally {
    let mut tally = LineTally::default();
    if content.is_empty() {
        return tally;
    }
    for line in content.split('\n') {
        tally.record(classify_line(line));
    }
    tally
}
