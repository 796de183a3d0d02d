use crate::error::{MarkovError, MarkovResult};

/// Default cap on chain extensions per walk.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Tunables of a `MarkovModel`.
///
/// # Invariants
/// - `max_steps >= 1`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkovConfig {
	/// Maximum number of continuation draws in a single forward or backward
	/// walk. A walk only reaches it if the store keeps changing under it or
	/// was fed inconsistent records; it then stops with what it has.
	max_steps: usize,
}

impl Default for MarkovConfig {
	fn default() -> Self {
		Self { max_steps: DEFAULT_MAX_STEPS }
	}
}

impl MarkovConfig {
	pub fn max_steps(&self) -> usize {
		self.max_steps
	}

	/// Sets the walk cap.
	///
	/// # Errors
	/// Returns an error if `max_steps` is 0.
	pub fn set_max_steps(&mut self, max_steps: usize) -> MarkovResult<()> {
		if max_steps == 0 {
			return Err(MarkovError::Config("max_steps must be >= 1".to_owned()));
		}
		self.max_steps = max_steps;
		Ok(())
	}
}
