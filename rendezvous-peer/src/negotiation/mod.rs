mod negotiation_error;
mod negotiation_loop;
mod negotiation_state;
mod session;

pub use negotiation_error::NegotiationError;
pub use negotiation_loop::NegotiationLoop;
pub use negotiation_state::NegotiationState;
pub use session::{Session, SessionOutcome};
