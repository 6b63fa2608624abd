pub use rendezvous_core::model::{Role, RoomId};

pub mod model {
    pub use rendezvous_core::model::*;
    pub use rendezvous_core::utils::*;
}

#[cfg(feature = "peer")]
pub mod peer {
    pub use rendezvous_peer::*;
}
