use pointerbox_host::{Environment, HostError, Invocation, RequestKind};
use crate::capability::{CapabilityRequest, ResolvedCapability};
use crate::CaptureError;


/// Invoke a resolved request method on `target`. Deferred outcomes are handed back to the host,
/// which reports a rejection later as a host event.
pub(crate) fn issue<E: Environment>(env: &mut E, target: &E::Element,
	capability: &CapabilityRequest, resolved: ResolvedCapability, kind: RequestKind)
	-> Result<(), CaptureError>
{
	let method = resolved.name()
		.ok_or(CaptureError::CapabilityUnavailable { capability: capability.canonical_name })?;

	match env.invoke(target, method) {
		Ok(Invocation::Returned) => {
			log::trace!("{method} returned");
			Ok(())
		}

		Ok(Invocation::Deferred(outcome)) => {
			log::trace!("{method} deferred");
			env.watch(kind, outcome);
			Ok(())
		}

		Err(HostError::Threw(reason)) => Err(CaptureError::RequestRejected {
			capability: capability.canonical_name,
			reason,
		}),

		Err(error) => Err(error.into()),
	}
}

/// Whether `element` is what the document reports under any of `capability`s names.
/// Every name is checked since a browser only populates its own variant.
pub(crate) fn is_reported_element<E: Environment>(env: &E, capability: &CapabilityRequest, element: &E::Element) -> bool {
	capability.candidate_names.iter()
		.any(|property| env.document_element(property).as_ref() == Some(element))
}
