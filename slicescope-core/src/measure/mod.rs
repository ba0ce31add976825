mod latency;
mod packet_rate;
mod packet_size;
mod throughput;
mod utilization;

pub use self::{
    latency::{Latency, LatencyError},
    packet_rate::{PacketRate, PacketRateError, PacketRateParseError},
    packet_size::{PacketSize, PacketSizeError},
    throughput::{Throughput, ThroughputError},
    utilization::{Stability, Utilization, UtilizationError},
};
