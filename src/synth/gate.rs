//! Hand-off marker between synthesis and runtime initialization.
//!
//! [`Initialized`] is only produced when synthesis yielded at least one producer.
//! The runtime step consumes it and does nothing when it is absent.

use crate::context::{ContextContainer, Qualifier};
use crate::synth::component::GeneratedComponent;
use tracing::{debug, warn};

/// Zero-sized marker: synthesis ran and at least one binding exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct Initialized;

impl Initialized {
    /// The marker for a component, present iff it has producers.
    pub fn for_component(component: &GeneratedComponent) -> Option<Self> {
        component.has_producers().then_some(Initialized)
    }
}

/// Runtime-initialization step: inspect the freshly created container.
///
/// Returns `false` without doing anything when synthesis produced no marker.
pub fn on_container_created(initialized: Option<Initialized>, container: &ContextContainer) -> bool {
    if initialized.is_none() {
        debug!("No bindings synthesized, skipping runtime initialization");
        return false;
    }

    if container.contains(&Qualifier::Default) {
        debug!("Default query-context producer registered");
    } else {
        warn!("No default query-context producer registered");
    }
    debug!(
        named = ?container.names(),
        producers = container.len(),
        "Query-context container created"
    );
    true
}
