use rand::Rng;

/// A finite set of actions `{0, 1, ..., n - 1}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discrete {
    pub n: usize,
}

impl Discrete {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    pub fn contains(&self, value: usize) -> bool {
        value < self.n
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.n)
    }
}

/// An integer box with per-feature bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxSpace {
    pub low: Vec<i64>,
    pub high: Vec<i64>,
}

impl BoxSpace {
    pub fn new(low: Vec<i64>, high: Vec<i64>) -> Self {
        debug_assert_eq!(low.len(), high.len());
        Self { low, high }
    }

    /// Same bounds for every one of `len` features
    pub fn uniform(low: i64, high: i64, len: usize) -> Self {
        Self::new(vec![low; len], vec![high; len])
    }

    pub fn shape(&self) -> [usize; 1] {
        [self.low.len()]
    }

    pub fn contains(&self, value: &[i64]) -> bool {
        value.len() == self.low.len()
            && value
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(v, (lo, hi))| lo <= v && v <= hi)
    }
}
