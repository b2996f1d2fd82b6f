// self
use crate::{
	flows::FlowType,
	obs::{CacheOutcome, FlowOutcome},
};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(flow: FlowType, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"vkontakte_auth_flow_total",
			"flow" => flow.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (flow, outcome);
	}
}

/// Records a client registry lookup (when enabled).
pub fn record_client_cache(outcome: CacheOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("vkontakte_auth_client_cache_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}
