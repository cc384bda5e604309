//! Driver behaviour against the simulated chip.
//!
//! Every test runs the public API on top of `MockTransport` and checks both
//! the cached state and the exact bytes that went out on the bus.

use ad51xx_digipot::transport::mock::Transaction;
use ad51xx_digipot::{Ad51xx, Error, MockTransport, OperationalMode, TransportError, Variant};

const ADDR: u8 = 0x2C;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Connected device with an empty transaction log.
fn open(variant: Variant) -> Ad51xx<MockTransport> {
    init_logging();
    let mut pot = Ad51xx::new(MockTransport::new(ADDR), ADDR, variant).unwrap();
    pot.connect(false).unwrap();
    pot.transport_mut().clear_log();
    pot
}

#[test]
fn test_new_rejects_10bit_address() {
    let result = Ad51xx::new(MockTransport::new(ADDR), 0x80, Variant::AD5144);
    assert!(matches!(result, Err(Error::InvalidAddress(0x80))));
}

#[test]
fn test_accessors_follow_variant() {
    let pot = open(Variant::AD5122A);
    assert_eq!(pot.address(), ADDR);
    assert_eq!(pot.variant(), Variant::AD5122A);
    assert_eq!(pot.channel_count(), 2);
    assert_eq!(pot.max_value(), 127);
}

#[test]
fn test_connect_absent_device_has_no_side_effects() {
    init_logging();
    let mut bus = MockTransport::new(ADDR);
    bus.set_present(false);
    let mut pot = Ad51xx::new(bus, ADDR, Variant::AD5144).unwrap();

    match pot.connect(true) {
        Err(Error::DeviceNotFound { address }) => assert_eq!(address, ADDR),
        other => panic!("Expected DeviceNotFound, got: {:?}", other),
    }
    assert!(pot.transport_mut().writes().is_empty());
    assert!(!pot.is_connected());
}

#[test]
fn test_connect_wrong_address() {
    init_logging();
    let mut pot = Ad51xx::new(MockTransport::new(ADDR), 0x2D, Variant::AD5144).unwrap();
    assert!(pot.connect(false).is_err());
}

#[test]
fn test_begin_resets_and_loads_eeprom_defaults() {
    init_logging();
    let mut bus = MockTransport::new(ADDR);
    for (ch, raw) in [10u8, 20, 30, 40].into_iter().enumerate() {
        bus.set_eeprom(ch, raw);
    }
    let mut pot = Ad51xx::new(bus, ADDR, Variant::AD5144).unwrap();
    pot.begin().unwrap();

    for (ch, expected) in [10u8, 20, 30, 40].into_iter().enumerate() {
        assert_eq!(pot.read(ch as u8).unwrap(), expected);
    }
    let writes = pot.transport_mut().writes();
    assert_eq!(writes[0], (0xB0, 0x00));
    assert_eq!(
        &writes[1..],
        &[(0x30, 0x01), (0x31, 0x01), (0x32, 0x01), (0x33, 0x01)]
    );
}

#[test]
fn test_reset_refresh_failure_keeps_cache() {
    let mut pot = open(Variant::AD5144);
    pot.write(0, 50).unwrap();
    pot.transport_mut().set_eeprom(0, 99);
    pot.transport_mut().set_eeprom(1, 99);
    // Reset write, ch0 select, ch0 read, ch1 select -> fail.
    pot.transport_mut().fail_transaction(3);

    assert!(matches!(pot.reset(), Err(Error::Transport(_))));
    assert_eq!(pot.read(0).unwrap(), 50);
    assert_eq!(pot.read(1).unwrap(), 0);
}

#[test]
fn test_write_out_of_range_value_is_rejected() {
    for variant in Variant::ALL {
        if variant.max_value() == 255 {
            continue; // every u8 is a valid 8-bit value
        }
        let mut pot = open(variant);
        pot.write(0, 5).unwrap();
        match pot.write(0, variant.max_value() + 1) {
            Err(Error::InvalidValue { value, max_value }) => {
                assert_eq!(value, 128);
                assert_eq!(max_value, 127);
            }
            other => panic!("{}: expected InvalidValue, got {:?}", variant, other),
        }
        assert_eq!(pot.read(0).unwrap(), 5, "{}: cache changed", variant);
        assert_eq!(pot.transport_mut().writes().len(), 1);
    }
}

#[test]
fn test_write_out_of_range_channel_is_rejected() {
    for variant in Variant::ALL {
        let mut pot = open(variant);
        let bad = variant.channel_count();
        match pot.write(bad, 0) {
            Err(Error::InvalidChannel {
                channel,
                channel_count,
            }) => {
                assert_eq!(channel, bad);
                assert_eq!(channel_count, variant.channel_count());
            }
            other => panic!("{}: expected InvalidChannel, got {:?}", variant, other),
        }
        assert!(pot.read(bad).is_err());
        assert!(pot.transport_mut().transactions().is_empty());
    }
}

#[test]
fn test_write_read_8bit() {
    let mut pot = open(Variant::AD5144);
    pot.write(0, 200).unwrap();
    assert_eq!(pot.read(0).unwrap(), 200);
    assert_eq!(pot.cached_value(0).unwrap(), 200);
    assert_eq!(pot.transport_mut().writes(), vec![(0x10, 200)]);
    assert_eq!(pot.transport_mut().rdac(0), 200);
}

#[test]
fn test_write_read_7bit_is_shifted_on_the_wire() {
    let mut pot = open(Variant::AD5123);
    pot.write(2, 100).unwrap();
    assert_eq!(pot.read(2).unwrap(), 100);
    assert_eq!(pot.cached_value(2).unwrap(), 200);
    assert_eq!(pot.transport_mut().writes(), vec![(0x12, 200)]);
    assert_eq!(pot.read_back_rdac(2).unwrap(), 100);
}

#[test]
fn test_write_transport_failure_keeps_cache() {
    let mut pot = open(Variant::AD5144);
    pot.write(1, 42).unwrap();
    pot.transport_mut().fail_transaction(0);

    match pot.write(1, 99) {
        Err(Error::Transport(TransportError::Bus(_))) => {}
        other => panic!("Expected transport error, got {:?}", other),
    }
    assert_eq!(pot.read(1).unwrap(), 42);
}

#[test]
fn test_write_all_and_convenience_values() {
    let mut pot = open(Variant::AD5144);
    pot.zero_all().unwrap();
    for ch in 0..4 {
        assert_eq!(pot.read(ch).unwrap(), 0);
    }
    pot.mid_scale_all().unwrap();
    for ch in 0..4 {
        assert_eq!(pot.read(ch).unwrap(), 128);
    }
    pot.max_scale_all().unwrap();
    assert_eq!(pot.read(3).unwrap(), 255);
    assert_eq!(
        pot.transport_mut().writes(),
        vec![(0x18, 0), (0x18, 128), (0x18, 255)]
    );
}

#[test]
fn test_single_channel_convenience_7bit() {
    let mut pot = open(Variant::AD5121);
    pot.mid_scale(0).unwrap();
    assert_eq!(pot.read(0).unwrap(), 64);
    pot.max_scale(0).unwrap();
    assert_eq!(pot.read(0).unwrap(), 127);
    pot.zero(0).unwrap();
    assert_eq!(pot.read(0).unwrap(), 0);
    assert_eq!(
        pot.transport_mut().writes(),
        vec![(0x10, 128), (0x10, 254), (0x10, 0)]
    );
}

#[test]
fn test_write_all_rejects_out_of_range() {
    let mut pot = open(Variant::AD5124);
    assert!(matches!(
        pot.write_all(200),
        Err(Error::InvalidValue { .. })
    ));
    assert!(pot.transport_mut().transactions().is_empty());
}

#[test]
fn test_store_to_memory() {
    let mut pot = open(Variant::AD5122A);
    pot.write(1, 33).unwrap();
    pot.store_to_memory(1, None).unwrap();
    assert_eq!(pot.transport_mut().eeprom(1), 66);

    pot.store_to_memory(0, Some(100)).unwrap();
    assert_eq!(pot.transport_mut().eeprom(0), 200);
    assert!(matches!(
        pot.store_to_memory(0, Some(128)),
        Err(Error::InvalidValue { .. })
    ));
    assert!(matches!(
        pot.store_to_memory(2, None),
        Err(Error::InvalidChannel { .. })
    ));
    assert_eq!(
        pot.transport_mut().writes(),
        vec![(0x11, 66), (0x71, 0x01), (0x80, 200)]
    );
}

#[test]
fn test_recall_from_memory_refreshes_one_channel() {
    let mut pot = open(Variant::AD5144);
    pot.write_all(5).unwrap();
    pot.transport_mut().set_eeprom(2, 77);
    pot.transport_mut().clear_log();

    pot.recall_from_memory(2).unwrap();
    assert_eq!(pot.read(2).unwrap(), 77);
    assert_eq!(pot.read(1).unwrap(), 5);
    assert_eq!(pot.transport_mut().rdac(2), 77);
    assert_eq!(pot.transport_mut().writes(), vec![(0x32, 0x01), (0x72, 0x00)]);
}

#[test]
fn test_recall_failure_keeps_cache() {
    let mut pot = open(Variant::AD5144);
    pot.write(0, 9).unwrap();
    pot.transport_mut().set_eeprom(0, 200);
    // Select, read, then the recall command itself fails.
    pot.transport_mut().fail_transaction(2);
    assert!(pot.recall_from_memory(0).is_err());
    assert_eq!(pot.read(0).unwrap(), 9);
}

#[test]
fn test_scale_commands() {
    let mut pot = open(Variant::AD5144);
    pot.set_top_scale(1).unwrap();
    pot.clear_top_scale(1).unwrap();
    pot.set_bottom_scale(3).unwrap();
    pot.clear_bottom_scale(3).unwrap();
    pot.set_top_scale_all().unwrap();
    pot.clear_top_scale_all().unwrap();
    pot.set_bottom_scale_all().unwrap();
    pot.clear_bottom_scale_all().unwrap();
    assert!(matches!(
        pot.set_top_scale(4),
        Err(Error::InvalidChannel { .. })
    ));
    assert_eq!(
        pot.transport_mut().writes(),
        vec![
            (0x91, 0x81),
            (0x91, 0x80),
            (0x93, 0x01),
            (0x93, 0x00),
            (0x98, 0x81),
            (0x98, 0x80),
            (0x98, 0x01),
            (0x98, 0x00),
        ]
    );
}

#[test]
fn test_mode_read_modify_write_preserves_other_bits() {
    let mut pot = open(Variant::AD5144);
    pot.transport_mut().set_control(0b0000_0011);

    pot.set_linear_mode(0).unwrap();
    assert_eq!(pot.transport_mut().control(), 0b0000_0111);
    assert_eq!(pot.operational_mode(0).unwrap(), OperationalMode::Linear);
    assert!(pot.operational_mode(0).unwrap().is_linear());

    pot.set_potentiometer_mode(0).unwrap();
    assert_eq!(pot.transport_mut().control(), 0b0000_0011);
    assert_eq!(
        pot.operational_mode(0).unwrap(),
        OperationalMode::Potentiometer
    );
    assert_eq!(pot.read_back_control(0).unwrap(), 0b0000_0011);

    let writes = pot.transport_mut().writes();
    assert_eq!(&writes[..2], &[(0x30, 0x02), (0xD0, 0x07)]);
}

#[test]
fn test_mode_change_aborts_if_read_back_fails() {
    let mut pot = open(Variant::AD5144);
    pot.transport_mut().set_control(0x01);
    pot.transport_mut().fail_transaction(1);
    assert!(pot.set_linear_mode(0).is_err());
    assert_eq!(pot.transport_mut().control(), 0x01);
    assert!(!pot
        .transport_mut()
        .writes()
        .iter()
        .any(|&(cmd, _)| cmd == 0xD0));
}

#[test]
fn test_write_control_register_is_raw() {
    let mut pot = open(Variant::AD5144);
    pot.transport_mut().set_control(0x07);
    pot.write_control_register(0x02).unwrap();
    assert_eq!(pot.transport_mut().control(), 0x02);
    assert_eq!(pot.transport_mut().writes(), vec![(0xD0, 0x02)]);
}

#[test]
fn test_increment_decrement_commands() {
    let mut pot = open(Variant::AD5144);
    pot.write(2, 100).unwrap();
    pot.transport_mut().clear_log();

    pot.increment_linear(2).unwrap();
    pot.decrement_linear(2).unwrap();
    pot.increment_linear_all().unwrap();
    pot.decrement_linear_all().unwrap();
    pot.increment_6db(2).unwrap();
    pot.decrement_6db(2).unwrap();
    pot.increment_6db_all().unwrap();
    pot.decrement_6db_all().unwrap();
    assert!(pot.increment_linear(4).is_err());

    assert_eq!(
        pot.transport_mut().writes(),
        vec![
            (0x42, 0x01),
            (0x42, 0x00),
            (0x48, 0x01),
            (0x48, 0x00),
            (0x52, 0x01),
            (0x52, 0x00),
            (0x58, 0x01),
            (0x58, 0x00),
        ]
    );
    // Steps are not mirrored in the cache.
    assert_eq!(pot.read(2).unwrap(), 100);
}

#[test]
fn test_preload_does_not_move_wiper() {
    let mut pot = open(Variant::AD5143);
    pot.write(0, 1).unwrap();
    pot.preload(0, 150).unwrap();
    pot.preload_all(60).unwrap();
    assert_eq!(pot.read(0).unwrap(), 1);
    assert_eq!(pot.transport_mut().rdac(0), 1);
    assert_eq!(pot.read_back_input(3).unwrap(), 60);
    assert_eq!(
        &pot.transport_mut().writes()[..3],
        &[(0x10, 1), (0x20, 150), (0x28, 60)]
    );
}

#[test]
fn test_preload_validation() {
    let mut pot = open(Variant::AD5122A);
    assert!(matches!(
        pot.preload(2, 0),
        Err(Error::InvalidChannel { .. })
    ));
    assert!(matches!(
        pot.preload(0, 128),
        Err(Error::InvalidValue { .. })
    ));
    assert!(matches!(
        pot.preload_all(255),
        Err(Error::InvalidValue { .. })
    ));
    assert!(pot.transport_mut().transactions().is_empty());
}

#[test]
fn test_sync_refreshes_only_masked_channels() {
    let mut pot = open(Variant::AD5144);
    for ch in 0..4 {
        pot.preload(ch, 10 * (ch + 1)).unwrap();
    }
    pot.transport_mut().clear_log();

    pot.sync(0b0011).unwrap();
    assert_eq!(pot.read(0).unwrap(), 10);
    assert_eq!(pot.read(1).unwrap(), 20);
    assert_eq!(pot.read(2).unwrap(), 0);
    assert_eq!(pot.read(3).unwrap(), 0);

    assert_eq!(
        pot.transport_mut().transactions(),
        &[
            Transaction::Write {
                address: ADDR,
                command: 0x63,
                data: vec![0x00]
            },
            Transaction::Write {
                address: ADDR,
                command: 0x30,
                data: vec![0x03]
            },
            Transaction::Read {
                address: ADDR,
                register: 0x00,
                len: 1
            },
            Transaction::Write {
                address: ADDR,
                command: 0x31,
                data: vec![0x03]
            },
            Transaction::Read {
                address: ADDR,
                register: 0x00,
                len: 1
            },
        ]
    );
}

#[test]
fn test_sync_7bit_cache_stays_native() {
    let mut pot = open(Variant::AD5124);
    pot.preload(3, 100).unwrap();
    pot.sync(0b1000).unwrap();
    assert_eq!(pot.read(3).unwrap(), 100);
    assert_eq!(pot.cached_value(3).unwrap(), 200);
}

#[test]
fn test_sync_ignores_mask_bits_beyond_channel_count() {
    let mut pot = open(Variant::AD5142A);
    pot.preload_all(7).unwrap();
    pot.transport_mut().clear_log();
    pot.sync(0x0F).unwrap();
    assert_eq!(pot.read(0).unwrap(), 7);
    assert_eq!(pot.read(1).unwrap(), 7);
    // One sync write plus a select/read pair per existing channel.
    assert_eq!(pot.transport_mut().transactions().len(), 5);
}

#[test]
fn test_sync_invalid_mask() {
    let mut pot = open(Variant::AD5144);
    match pot.sync(0x10) {
        Err(Error::InvalidMask(mask)) => assert_eq!(mask, 0x10),
        other => panic!("Expected InvalidMask, got {:?}", other),
    }
    assert!(pot.transport_mut().transactions().is_empty());
}

#[test]
fn test_sync_read_back_failure_keeps_cache() {
    let mut pot = open(Variant::AD5144);
    pot.preload(0, 50).unwrap();
    pot.preload(1, 60).unwrap();
    // Sync, ch0 select, ch0 read, ch1 select -> fail.
    pot.transport_mut().fail_transaction(3);
    assert!(pot.sync(0b0011).is_err());
    assert_eq!(pot.read(0).unwrap(), 0);
    assert_eq!(pot.read(1).unwrap(), 0);
}

#[test]
fn test_shutdown() {
    let mut pot = open(Variant::AD5141);
    pot.shutdown().unwrap();
    assert!(pot.transport_mut().is_shut_down());
    assert_eq!(pot.transport_mut().writes(), vec![(0xC8, 0x01)]);
}

#[test]
fn test_read_back_registers() {
    let mut pot = open(Variant::AD5122A);
    pot.transport_mut().set_eeprom(1, 180);
    pot.transport_mut().set_rdac(1, 40);
    pot.transport_mut().set_control(0x05);

    assert_eq!(pot.read_back_eeprom(1).unwrap(), 90);
    assert_eq!(pot.read_back_rdac(1).unwrap(), 20);
    assert_eq!(pot.read_back_input(1).unwrap(), 0);
    // Control is not a wiper value and is never shifted.
    assert_eq!(pot.read_back_control(1).unwrap(), 0x05);
    assert!(pot.read_back_rdac(2).is_err());
    // Read-back never touches the cache.
    assert_eq!(pot.read(1).unwrap(), 0);
}

#[test]
fn test_read_back_failure_is_reported() {
    let mut pot = open(Variant::AD5144);
    pot.transport_mut().set_present(false);
    match pot.read_back_rdac(0) {
        Err(Error::Transport(TransportError::Nack { address })) => assert_eq!(address, ADDR),
        other => panic!("Expected Nack, got {:?}", other),
    }
}

#[test]
fn test_two_devices_share_one_bus() {
    init_logging();
    let mut bus = MockTransport::new(ADDR);
    {
        let mut pot = Ad51xx::new(&mut bus, ADDR, Variant::AD5144).unwrap();
        pot.write(3, 17).unwrap();
    }
    {
        let mut other = Ad51xx::new(&mut bus, 0x2F, Variant::AD5144).unwrap();
        assert!(other.write(0, 1).is_err());
    }
    assert_eq!(bus.rdac(3), 17);
    assert_eq!(bus.writes(), vec![(0x13, 17), (0x10, 1)]);
}

#[test]
fn test_error_classification() {
    let mut pot = open(Variant::AD5144);
    let invalid_channel = pot.write(9, 0).unwrap_err();
    assert_eq!(invalid_channel.status_code(), 1);
    assert!(invalid_channel.is_caller_error());

    let mut pot7 = open(Variant::AD5121);
    let invalid_value = pot7.write(0, 255).unwrap_err();
    assert_eq!(invalid_value.status_code(), 2);
    assert!(invalid_value.is_caller_error());

    let invalid_mask = pot.sync(0xFF).unwrap_err();
    assert_eq!(invalid_mask.status_code(), 3);
    assert!(invalid_mask.is_caller_error());

    pot.transport_mut().set_fail_all(true);
    let transport = pot.write(0, 0).unwrap_err();
    assert_eq!(transport.status_code(), 3);
    assert!(!transport.is_caller_error());
}

#[test]
fn test_release_returns_transport() {
    let mut pot = open(Variant::AD5144);
    pot.write(0, 3).unwrap();
    let bus = pot.release();
    assert_eq!(bus.rdac(0), 3);
}
