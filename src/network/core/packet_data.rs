use std::borrow::Cow;
use std::time::Instant;

/// Opaque handle for one packet travelling through the host pipeline.
///
/// Hooks receive it but never look inside; it exists so the host can hand
/// something to each callback and so tests can push real-looking traffic.
#[derive(Debug, Clone)]
pub struct PacketData<'a> {
    /// Raw packet bytes as seen by the host
    pub data: Cow<'a, [u8]>,

    /// Timestamp when the packet entered the pipeline
    pub arrival_time: Instant,
}

impl<'a> From<&'a [u8]> for PacketData<'a> {
    fn from(data: &'a [u8]) -> Self {
        PacketData {
            data: Cow::Borrowed(data),
            arrival_time: Instant::now(),
        }
    }
}

impl From<Vec<u8>> for PacketData<'static> {
    fn from(data: Vec<u8>) -> Self {
        PacketData {
            data: Cow::Owned(data),
            arrival_time: Instant::now(),
        }
    }
}

impl PacketData<'_> {
    /// Returns the size of the packet in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns the time elapsed since the packet entered the pipeline
    pub fn age(&self) -> std::time::Duration {
        self.arrival_time.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_data_creation() {
        let bytes = [1u8, 2, 3, 4];
        let packet_data = PacketData::from(&bytes[..]);

        assert_eq!(packet_data.size(), 4);
        assert_eq!(packet_data.data[..], [1, 2, 3, 4]);
        assert!(packet_data.age().as_secs() < 1);
    }

    #[test]
    fn test_owned_packet() {
        let packet_data = PacketData::from(vec![0u8; 20]);
        assert_eq!(packet_data.size(), 20);
        assert!(matches!(packet_data.data, Cow::Owned(_)));
    }
}
