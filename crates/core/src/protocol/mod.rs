pub mod envelope;
pub mod packet;
pub mod transport;

pub use envelope::{unwrap_envelope, wrap_envelope};
pub use packet::{
    build_color_packet, build_enable_packet, check_led_capacity, checksum, Command, Packet,
    MAX_LEDS,
};
pub use transport::{LightOutput, UdpTransport, KEEP_ALIVE_INTERVAL};
