//! Codemasters Mode 1 packet decoding for DiRT Rally 2.0.
//!
//! Enable in-game: Settings → Accessibility → UDP Telemetry, port 20777,
//! extradata 3. Each datagram is a fixed 264-byte record of little-endian
//! `f32` values; only the fields the HUD draws are extracted.

use crate::error::DecodeError;
use crate::snapshot::TelemetrySnapshot;

/// Exact length of one Mode 1 (extradata 3) record.
pub const PACKET_SIZE: usize = 264;

/// Receive buffer size; larger than any valid record so oversized datagrams
/// are seen as oversized instead of being silently truncated to 264 bytes.
pub const RECV_BUFFER_SIZE: usize = 512;

/// Session time in seconds (float 0).
pub const OFF_TIME: usize = 0;
/// Vehicle speed in m/s (float 7).
pub const OFF_SPEED: usize = 28;
/// Throttle input, 0..1 (float 29).
pub const OFF_THROTTLE: usize = 116;
/// Steering input, -1..1 (float 30).
pub const OFF_STEER: usize = 120;
/// Brake input, 0..1 (float 31).
pub const OFF_BRAKE: usize = 124;
/// Lateral g-force (float 34). Floats 32 and 33 are clutch and gear.
pub const OFF_GFORCE_LAT: usize = 136;
/// Longitudinal g-force (float 35).
pub const OFF_GFORCE_LON: usize = 140;

/// A snapshot field carried by the packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Float 0, [`OFF_TIME`].
    Time,
    /// Float 7, [`OFF_SPEED`].
    Speed,
    /// Float 29, [`OFF_THROTTLE`].
    Throttle,
    /// Float 30, [`OFF_STEER`].
    Steer,
    /// Float 31, [`OFF_BRAKE`].
    Brake,
    /// Float 34, [`OFF_GFORCE_LAT`].
    GforceLat,
    /// Float 35, [`OFF_GFORCE_LON`].
    GforceLon,
}

impl Field {
    fn slot(self, snapshot: &mut TelemetrySnapshot) -> &mut f32 {
        match self {
            Field::Time => &mut snapshot.time,
            Field::Speed => &mut snapshot.speed,
            Field::Throttle => &mut snapshot.throttle,
            Field::Steer => &mut snapshot.steer,
            Field::Brake => &mut snapshot.brake,
            Field::GforceLat => &mut snapshot.gforce_lat,
            Field::GforceLon => &mut snapshot.gforce_lon,
        }
    }

    fn value(self, snapshot: &TelemetrySnapshot) -> f32 {
        match self {
            Field::Time => snapshot.time,
            Field::Speed => snapshot.speed,
            Field::Throttle => snapshot.throttle,
            Field::Steer => snapshot.steer,
            Field::Brake => snapshot.brake,
            Field::GforceLat => snapshot.gforce_lat,
            Field::GforceLon => snapshot.gforce_lon,
        }
    }
}

/// Byte offset of every decoded field.
pub const FIELD_LAYOUT: [(Field, usize); 7] = [
    (Field::Time, OFF_TIME),
    (Field::Speed, OFF_SPEED),
    (Field::Throttle, OFF_THROTTLE),
    (Field::Steer, OFF_STEER),
    (Field::Brake, OFF_BRAKE),
    (Field::GforceLat, OFF_GFORCE_LAT),
    (Field::GforceLon, OFF_GFORCE_LON),
];

/// Read a little-endian `f32` from `data` at `offset`. Returns `None` if out of bounds.
fn read_f32(data: &[u8], offset: usize) -> Option<f32> {
    data.get(offset..offset.checked_add(4)?)
        .and_then(|b| b.try_into().ok())
        .map(f32::from_le_bytes)
}

/// Decode one datagram into a snapshot.
///
/// The datagram must be exactly [`PACKET_SIZE`] bytes. Decoding is all or
/// nothing: on error no snapshot is produced.
///
/// # Errors
///
/// Returns [`DecodeError::WrongSize`] if `data` is not one full record.
pub fn decode_packet(data: &[u8]) -> Result<TelemetrySnapshot, DecodeError> {
    let Ok(record) = <&[u8; PACKET_SIZE]>::try_from(data) else {
        return Err(DecodeError::WrongSize {
            expected: PACKET_SIZE,
            actual: data.len(),
        });
    };

    let mut snapshot = TelemetrySnapshot::ZERO;
    for (field, offset) in FIELD_LAYOUT {
        // Every offset in the table lies inside the fixed-size record.
        *field.slot(&mut snapshot) = read_f32(record, offset).unwrap_or_default();
    }
    Ok(snapshot)
}

/// Encode a snapshot into a Mode 1 record, leaving every other field zero.
#[must_use]
pub fn encode_packet(snapshot: &TelemetrySnapshot) -> [u8; PACKET_SIZE] {
    let mut record = [0u8; PACKET_SIZE];
    for (field, offset) in FIELD_LAYOUT {
        if let Some(dst) = record.get_mut(offset..offset + 4) {
            dst.copy_from_slice(&field.value(snapshot).to_le_bytes());
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn write_f32(buf: &mut [u8], offset: usize, value: f32) {
        if let Some(dst) = buf.get_mut(offset..offset + 4) {
            dst.copy_from_slice(&value.to_le_bytes());
        }
    }

    #[test]
    fn test_layout_fits_in_record() {
        for (_, offset) in FIELD_LAYOUT {
            assert!(offset + 4 <= PACKET_SIZE);
            assert_eq!(offset % 4, 0, "Mode 1 fields are 4-byte aligned");
        }
    }

    #[test]
    fn test_layout_fields_do_not_overlap() {
        let mut offsets: Vec<usize> = FIELD_LAYOUT.iter().map(|(_, o)| *o).collect();
        offsets.sort_unstable();
        for pair in offsets.windows(2) {
            if let [lower, upper] = pair {
                assert!(upper - lower >= 4);
            }
        }
    }

    #[test]
    fn test_decode_known_values() -> TestResult {
        let mut buf = vec![0u8; PACKET_SIZE];
        write_f32(&mut buf, OFF_TIME, 12.5);
        write_f32(&mut buf, OFF_SPEED, 27.75);
        write_f32(&mut buf, OFF_THROTTLE, 0.8);
        write_f32(&mut buf, OFF_STEER, -0.25);
        write_f32(&mut buf, OFF_BRAKE, 0.1);
        write_f32(&mut buf, OFF_GFORCE_LAT, 1.2);
        write_f32(&mut buf, OFF_GFORCE_LON, -0.6);

        let snap = decode_packet(&buf)?;
        assert_eq!(snap.time.to_bits(), 12.5f32.to_bits());
        assert_eq!(snap.speed.to_bits(), 27.75f32.to_bits());
        assert_eq!(snap.throttle.to_bits(), 0.8f32.to_bits());
        assert_eq!(snap.steer.to_bits(), (-0.25f32).to_bits());
        assert_eq!(snap.brake.to_bits(), 0.1f32.to_bits());
        assert_eq!(snap.gforce_lat.to_bits(), 1.2f32.to_bits());
        assert_eq!(snap.gforce_lon.to_bits(), (-0.6f32).to_bits());
        Ok(())
    }

    #[test]
    fn test_decode_ignores_clutch_and_gear() -> TestResult {
        let mut buf = vec![0u8; PACKET_SIZE];
        write_f32(&mut buf, 128, 1.0); // clutch
        write_f32(&mut buf, 132, 4.0); // gear
        let snap = decode_packet(&buf)?;
        assert!(snap.is_zero());
        Ok(())
    }

    #[test]
    fn test_decode_rejects_short_and_long() {
        assert_eq!(
            decode_packet(&[0u8; PACKET_SIZE - 1]),
            Err(DecodeError::WrongSize {
                expected: PACKET_SIZE,
                actual: PACKET_SIZE - 1
            })
        );
        assert!(decode_packet(&[0u8; PACKET_SIZE + 4]).is_err());
        assert!(decode_packet(&[]).is_err());
    }

    #[test]
    fn test_encode_then_decode_preserves_fields() -> TestResult {
        let snap = TelemetrySnapshot {
            time: 100.0,
            speed: 40.0,
            throttle: 1.0,
            steer: 0.5,
            brake: 0.0,
            gforce_lat: -2.0,
            gforce_lon: 0.75,
        };
        assert_eq!(decode_packet(&encode_packet(&snap))?, snap);
        Ok(())
    }

    #[test]
    fn test_read_f32_out_of_bounds() {
        assert!(read_f32(&[0u8; 3], 0).is_none());
        assert!(read_f32(&[0u8; 8], usize::MAX).is_none());
    }
}
