//! Property-based tests for packet decoding and the invalid-packet policy.

use dr2_hud_telemetry::packet::{
    OFF_BRAKE, OFF_GFORCE_LAT, OFF_GFORCE_LON, OFF_SPEED, OFF_STEER, OFF_THROTTLE, OFF_TIME,
};
use dr2_hud_telemetry::{
    DatagramOutcome, GForceRange, HudModel, PACKET_SIZE, PacketProcessor, ReceiverCounters,
    TelemetrySnapshot, TelemetryStore, decode_packet,
};
use proptest::prelude::*;
use std::sync::Arc;

fn write_f32(buf: &mut [u8], offset: usize, value: f32) {
    if let Some(dst) = buf.get_mut(offset..offset + 4) {
        dst.copy_from_slice(&value.to_le_bytes());
    }
}

fn finite() -> impl Strategy<Value = f32> {
    -1.0e6f32..1.0e6f32
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Values placed at the seven offsets come back bit for bit, whatever the
    /// rest of the record holds.
    #[test]
    fn prop_decode_reproduces_fields(
        mut background in proptest::collection::vec(any::<u8>(), PACKET_SIZE..=PACKET_SIZE),
        time in finite(),
        speed in finite(),
        throttle in finite(),
        steer in finite(),
        brake in finite(),
        lat in finite(),
        lon in finite(),
    ) {
        write_f32(&mut background, OFF_TIME, time);
        write_f32(&mut background, OFF_SPEED, speed);
        write_f32(&mut background, OFF_THROTTLE, throttle);
        write_f32(&mut background, OFF_STEER, steer);
        write_f32(&mut background, OFF_BRAKE, brake);
        write_f32(&mut background, OFF_GFORCE_LAT, lat);
        write_f32(&mut background, OFF_GFORCE_LON, lon);

        let snap = decode_packet(&background).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(snap.time.to_bits(), time.to_bits());
        prop_assert_eq!(snap.speed.to_bits(), speed.to_bits());
        prop_assert_eq!(snap.throttle.to_bits(), throttle.to_bits());
        prop_assert_eq!(snap.steer.to_bits(), steer.to_bits());
        prop_assert_eq!(snap.brake.to_bits(), brake.to_bits());
        prop_assert_eq!(snap.gforce_lat.to_bits(), lat.to_bits());
        prop_assert_eq!(snap.gforce_lon.to_bits(), lon.to_bits());
    }

    /// Arbitrary bytes of any length never panic the decoder.
    #[test]
    fn prop_random_bytes_no_panic(
        data in proptest::collection::vec(any::<u8>(), 0..1024)
    ) {
        let result = decode_packet(&data);
        prop_assert_eq!(result.is_ok(), data.len() == PACKET_SIZE);
    }

    /// Any datagram whose length is not 264 leaves the store untouched.
    #[test]
    fn prop_wrong_size_leaves_store_unchanged(
        len in (0usize..600).prop_filter("not a full record", |l| *l != PACKET_SIZE),
        fill in any::<u8>(),
        prior in finite(),
    ) {
        let store = Arc::new(TelemetryStore::new());
        let before = TelemetrySnapshot::uniform(prior);
        store.write(before);

        let mut processor =
            PacketProcessor::new(Arc::clone(&store), Arc::new(ReceiverCounters::default()), 10);
        let outcome = processor.handle_datagram(&vec![fill; len]);

        prop_assert_eq!(outcome, DatagramOutcome::Skipped { consecutive: 1 });
        prop_assert_eq!(store.read(), before);
    }

    /// The loop gives up exactly when the consecutive-invalid count reaches the
    /// threshold, and a valid packet anywhere before that resets the count.
    #[test]
    fn prop_threshold_counts_consecutive_only(
        threshold in 1u32..20,
        pattern in proptest::collection::vec(any::<bool>(), 1..60),
    ) {
        let store = Arc::new(TelemetryStore::new());
        let mut processor =
            PacketProcessor::new(store, Arc::new(ReceiverCounters::default()), threshold);
        let valid = [0u8; PACKET_SIZE];
        let invalid = [0u8; 3];

        let mut run = 0u32;
        for is_valid in pattern {
            let outcome = if is_valid {
                processor.handle_datagram(&valid)
            } else {
                processor.handle_datagram(&invalid)
            };
            if is_valid {
                run = 0;
                prop_assert_eq!(outcome, DatagramOutcome::Decoded);
            } else {
                run += 1;
                if run >= threshold {
                    prop_assert!(matches!(outcome, DatagramOutcome::Exhausted(_)));
                    break;
                }
                prop_assert_eq!(outcome, DatagramOutcome::Skipped { consecutive: run });
            }
        }
    }

    /// HUD bar fractions and indicator position are always in range.
    #[test]
    fn prop_hud_model_in_range(
        throttle in any::<f32>(),
        brake in any::<f32>(),
        lat in any::<f32>(),
        lon in any::<f32>(),
    ) {
        let snap = TelemetrySnapshot {
            throttle,
            brake,
            gforce_lat: lat,
            gforce_lon: lon,
            ..Default::default()
        };
        let model = HudModel::from_snapshot(&snap, &GForceRange::default());
        prop_assert!((0.0..=1.0).contains(&model.throttle));
        prop_assert!((0.0..=1.0).contains(&model.brake));
        prop_assert!((-1.0..=1.0).contains(&model.gforce.x));
        prop_assert!((-1.0..=1.0).contains(&model.gforce.y));

        let placement = model.gforce.place(256.0, 24.0);
        prop_assert!(placement.left >= 0.0 && placement.left + placement.size <= 256.0);
        prop_assert!(placement.top >= 0.0 && placement.top + placement.size <= 256.0);
    }
}
