use conjugator_core::model::Lives;

/// Level-wide lives counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LivesCounter {
    remaining: Option<u32>,
}

impl LivesCounter {
    #[must_use]
    pub fn new(policy: Lives) -> Self {
        Self {
            remaining: policy.initial(),
        }
    }

    /// Lives left, or `None` when unlimited.
    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Take one life for a wrong answer. Returns true once no lives remain.
    pub fn lose_one(&mut self) -> bool {
        if let Some(left) = self.remaining.as_mut() {
            *left = left.saturating_sub(1);
        }
        self.is_depleted()
    }
}
