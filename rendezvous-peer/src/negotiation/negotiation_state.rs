use rendezvous_core::Role;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Start,
    RoleResolved(Role),
    OfferSent,
    AwaitingOffer,
    Connected,
    Closed,
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::RoleResolved(role) => write!(f, "role resolved ({role})"),
            Self::OfferSent => f.write_str("offer sent"),
            Self::AwaitingOffer => f.write_str("awaiting offer"),
            Self::Connected => f.write_str("connected"),
            Self::Closed => f.write_str("closed"),
        }
    }
}
