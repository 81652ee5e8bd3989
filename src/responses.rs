//! Canned reply selection.

use crate::error::TalkbackError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Supplies one reply string per call.
pub trait ResponseSource {
    /// Draw a reply. Each call is independent of the previous ones.
    fn pick(&mut self) -> Result<String, TalkbackError>;
}

/// Fixed, ordered set of candidate replies drawn uniformly with replacement.
#[derive(Debug, Clone)]
pub struct ResponseSet {
    responses: Vec<String>,
    rng: StdRng,
}

impl ResponseSet {
    /// Build a set seeded from OS entropy.
    ///
    /// Fails with [`TalkbackError::EmptyResponseSet`] when `responses` is empty.
    pub fn new<I, S>(responses: I) -> Result<Self, TalkbackError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_rng(responses, StdRng::from_entropy())
    }

    /// Build a set with a caller-provided generator (deterministic in tests).
    pub fn with_rng<I, S>(responses: I, rng: StdRng) -> Result<Self, TalkbackError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let responses: Vec<String> = responses.into_iter().map(Into::into).collect();
        if responses.is_empty() {
            return Err(TalkbackError::EmptyResponseSet);
        }
        Ok(Self { responses, rng })
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

impl ResponseSource for ResponseSet {
    fn pick(&mut self) -> Result<String, TalkbackError> {
        self.responses
            .choose(&mut self.rng)
            .cloned()
            .ok_or(TalkbackError::EmptyResponseSet)
    }
}
