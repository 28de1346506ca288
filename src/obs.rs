//! Optional observability helpers for connector operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `brand_central.operation` with the
//!   `operation` and `stage` (call site) fields.
//! - Enable `metrics` to increment the `brand_central_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Connector operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Client-credentials token acquisition.
	Token,
	/// Asset detail lookup.
	AssetDetails,
	/// Paged asset search.
	Search,
	/// File-type catalog lookup.
	FileTypes,
	/// Download + host import of a remote file.
	Import,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Token => "token",
			Operation::AssetDetails => "asset_details",
			Operation::Search => "search",
			Operation::FileTypes => "file_types",
			Operation::Import => "import",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records success or failure for a finished operation.
pub fn record_result<T>(operation: Operation, result: &Result<T>) {
	match result {
		Ok(_) => record_outcome(operation, OperationOutcome::Success),
		Err(_err) => {
			#[cfg(feature = "tracing")]
			::tracing::warn!(operation = operation.as_str(), error = %_err, "operation failed");

			record_outcome(operation, OperationOutcome::Failure)
		},
	}
}

/// Runs `fut` inside the operation span, recording the attempt and the outcome.
pub async fn observe<T>(
	operation: Operation,
	stage: &'static str,
	fut: impl Future<Output = Result<T>>,
) -> Result<T> {
	record_outcome(operation, OperationOutcome::Attempt);

	let result = OperationSpan::new(operation, stage).instrument(fut).await;

	record_result(operation, &result);

	result
}
