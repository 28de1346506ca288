// self
use crate::{_prelude::*, obs::Operation};

/// Future returned by [`OperationSpan::instrument`]; the input future itself without `tracing`.
#[cfg(feature = "tracing")]
pub type Traced<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`OperationSpan::instrument`]; the input future itself without `tracing`.
#[cfg(not(feature = "tracing"))]
pub type Traced<F> = F;

/// `brand_central.operation` span carrying the `operation` and `stage` fields.
///
/// Zero-sized when the `tracing` feature is off.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Opens the span for `operation` at call site `stage`.
	pub fn new(operation: Operation, stage: &'static str) -> Self {
		#[cfg(not(feature = "tracing"))]
		let _ = (operation, stage);

		Self {
			#[cfg(feature = "tracing")]
			span: tracing::info_span!(
				"brand_central.operation",
				operation = operation.as_str(),
				stage
			),
		}
	}

	/// Attaches the span to `fut`; the span is entered on every poll, never held across awaits.
	pub fn instrument<Fut>(self, fut: Fut) -> Traced<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			tracing::Instrument::instrument(fut, self.span)
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
