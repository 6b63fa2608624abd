mod connection_facade;
mod connection_observer;
mod rtc_connection;
mod track_pump;
mod transport_config;
mod transport_error;

pub use connection_facade::ConnectionFacade;
pub use connection_observer::{ConnectionObserver, LoggingObserver, ObserverSet};
pub use rtc_connection::RtcConnection;
pub use transport_config::TransportConfig;
pub use transport_error::TransportError;
