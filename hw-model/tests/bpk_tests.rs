/*++

Licensed under the Apache-2.0 license.

File Name:

    bpk_tests.rs

Abstract:

    File contains test cases for the battery-backed key bank API

--*/

use quartz_drivers::{BpkErr, KeyRegion, LockBits, BPK_KEY_LENGTH};
use quartz_hw_model::TamperModel;

fn ready_model() -> TamperModel {
    let model = TamperModel::new();
    model.bpk().wait_ready().unwrap();
    model
}

#[test]
fn test_ready_after_power_up() {
    let model = TamperModel::new();
    let bpk = model.bpk();
    // The bank takes a few cycles to come up; a single poll is not enough.
    assert!(!bpk.is_ready());
    bpk.wait_ready().unwrap();
    assert!(bpk.is_ready());
}

#[test]
fn test_ready_timeout() {
    let mut model = TamperModel::new();
    model.hold_bpk_not_ready(true);
    assert_eq!(
        model.bpk().wait_ready(),
        Err(BpkErr::ReadyTimeoutFailure.into())
    );
}

#[test]
fn test_read_after_write() {
    let model = ready_model();
    let mut bpk = model.bpk();

    let words: [u32; BPK_KEY_LENGTH] = core::array::from_fn(|i| 0x1234_0000 | i as u32);
    bpk.write_key(&words, 0).unwrap();

    let mut readback = [0u32; BPK_KEY_LENGTH];
    bpk.read_key(&mut readback, 0).unwrap();
    assert_eq!(readback, words);
}

#[test]
fn test_partial_write_at_offset() {
    let model = ready_model();
    let mut bpk = model.bpk();

    bpk.write_key(&[0xaaaa_aaaa, 0xbbbb_bbbb], 6).unwrap();
    let words = model.bpk_words();
    assert_eq!(words[6], 0xaaaa_aaaa);
    assert_eq!(words[7], 0xbbbb_bbbb);
    assert_eq!(words[5], 0);
    assert_eq!(words[8], 0);
}

#[test]
fn test_not_ready_rejection() {
    let mut model = TamperModel::new();
    model.provision_keys(&[0x5a5a_5a5a; BPK_KEY_LENGTH]);
    model.hold_bpk_not_ready(true);

    let mut bpk = model.bpk();
    assert_eq!(
        bpk.write_key(&[0u32; BPK_KEY_LENGTH], 0),
        Err(BpkErr::NotReadyFailure.into())
    );

    let mut readback = [0u32; BPK_KEY_LENGTH];
    assert_eq!(
        bpk.read_key(&mut readback, 0),
        Err(BpkErr::NotReadyFailure.into())
    );

    // The rejected write never reached the bank.
    assert_eq!(model.bpk_words(), [0x5a5a_5a5a; BPK_KEY_LENGTH]);
}

#[test]
fn test_out_of_range_rejection() {
    let mut model = ready_model();
    model.provision_keys(&[0x5a5a_5a5a; BPK_KEY_LENGTH]);

    let mut bpk = model.bpk();
    assert_eq!(
        bpk.write_key(&[0u32; 8], BPK_KEY_LENGTH - 7),
        Err(BpkErr::OutOfRangeFailure.into())
    );

    let mut readback = [0u32; 8];
    assert_eq!(
        bpk.read_key(&mut readback, BPK_KEY_LENGTH - 7),
        Err(BpkErr::OutOfRangeFailure.into())
    );

    assert_eq!(model.bpk_words(), [0x5a5a_5a5a; BPK_KEY_LENGTH]);
}

#[test]
fn test_clear_region() {
    let mut model = ready_model();
    model.provision_keys(&[0xdead_beef; BPK_KEY_LENGTH]);

    let mut bpk = model.bpk();
    bpk.clear_region(KeyRegion::Region0).unwrap();
    assert_eq!(model.bpk_words(), [0; BPK_KEY_LENGTH]);
}

#[test]
fn test_write_lock_blocks_clear() {
    let mut model = ready_model();
    model.provision_keys(&[0xdead_beef; BPK_KEY_LENGTH]);

    let mut bpk = model.bpk();
    bpk.set_write_lock(KeyRegion::Region0, true);
    assert_eq!(
        bpk.clear_region(KeyRegion::Region0),
        Err(BpkErr::ClearTimeoutFailure.into())
    );
    assert_eq!(model.bpk_words(), [0xdead_beef; BPK_KEY_LENGTH]);
}

#[test]
fn test_read_lock_reads_zero() {
    let model = ready_model();
    let mut bpk = model.bpk();

    bpk.write_key(&[0xcafe_f00d; BPK_KEY_LENGTH], 0).unwrap();
    bpk.set_read_lock(KeyRegion::Region0, true);

    let mut readback = [0xffff_ffff; BPK_KEY_LENGTH];
    bpk.read_key(&mut readback, 0).unwrap();
    assert_eq!(readback, [0; BPK_KEY_LENGTH]);

    bpk.set_read_lock(KeyRegion::Region0, false);
    bpk.read_key(&mut readback, 0).unwrap();
    assert_eq!(readback, [0xcafe_f00d; BPK_KEY_LENGTH]);
}

#[test]
fn test_self_lock_irreversible() {
    let mut model = ready_model();
    let mut bpk = model.bpk();

    bpk.set_write_lock(KeyRegion::Region0, true);
    bpk.set_self_lock();
    assert!(bpk.lock_status(LockBits::SELF_LOCK));
    assert!(bpk.lock_status(LockBits::WRITE_LOCK_R0));

    // Every lock-state change is dropped while the self-lock holds.
    bpk.set_write_lock(KeyRegion::Region0, false);
    assert!(bpk.lock_status(LockBits::WRITE_LOCK_R0));
    bpk.set_read_lock(KeyRegion::Region0, true);
    assert!(!bpk.lock_status(LockBits::READ_LOCK_R0));
    bpk.set_lock(LockBits::SELF_LOCK, false);
    assert!(bpk.lock_status(LockBits::SELF_LOCK));

    // Only a battery-domain power cycle releases the ratchet.
    model.battery_power_cycle();
    let bpk = model.bpk();
    bpk.wait_ready().unwrap();
    assert!(!bpk.lock_status(LockBits::SELF_LOCK));
    assert!(!bpk.lock_status(LockBits::WRITE_LOCK_R0));
}

#[test]
fn test_contents_survive_warm_reset() {
    let mut model = ready_model();
    let mut bpk = model.bpk();
    bpk.write_key(&[0x0bad_cafe; BPK_KEY_LENGTH], 0).unwrap();

    model.warm_reset();
    let bpk = model.bpk();
    // Readiness latency restarts with main power.
    assert!(!bpk.is_ready());
    bpk.wait_ready().unwrap();

    let mut readback = [0u32; BPK_KEY_LENGTH];
    bpk.read_key(&mut readback, 0).unwrap();
    assert_eq!(readback, [0x0bad_cafe; BPK_KEY_LENGTH]);
}
