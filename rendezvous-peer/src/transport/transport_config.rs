use rendezvous_core::utils::default_stun_servers;

/// ICE configuration for the peer connection.
#[derive(Clone, Debug)]
pub struct TransportConfig {
    pub ice_servers: Vec<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: default_stun_servers(),
        }
    }
}
