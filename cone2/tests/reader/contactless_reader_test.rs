#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cone2::prelude::*;
use cone2::sdk::{MockSdk, SdkCall};

#[test]
fn detect_select_and_release() -> anyhow::Result<()> {
    let mock = MockSdk::new();
    mock.push_search(Status::Ok, 0x6F, vec![]);
    mock.push_search(Status::Ok, 0x01, common::fixtures::iso_b_atr());
    mock.push_rf_reply(Status::Ok, [vec![0x00], common::fixtures::sw_ok()].concat());
    let dir = common::helpers::directory(&mock)?;
    let nfc = dir.contactless_reader();

    nfc.activate_protocol("ISO_14443_B")?;
    assert!(nfc.wait_for_card_insertion()?);
    assert!(nfc.check_card_presence()?);
    assert_eq!(
        nfc.rfid_tag().map(|t| t.communication_mode()),
        Some(CommunicationMode::IsoB)
    );
    assert_eq!(
        nfc.power_on_data().as_deref(),
        Some(common::fixtures::ISO_B_ATR_HEX)
    );

    nfc.open_physical_channel()?;
    let answer = nfc.transmit_apdu(&common::fixtures::select_application_apdu())?;
    assert_eq!(answer, common::fixtures::sw_ok());

    nfc.close_physical_channel();
    assert!(!nfc.check_card_presence()?);
    assert_eq!(nfc.power_on_data(), None);
    Ok(())
}

#[test]
fn transmit_asymmetry_between_readers() -> anyhow::Result<()> {
    let mock = MockSdk::new();
    mock.push_sam_reply(Status::Ok, vec![0x90, 0x00]);
    mock.push_rf_reply(Status::Ok, vec![0x90, 0x00]);
    let dir = common::helpers::directory(&mock)?;

    let contact = dir.contact_reader(SamSlot::One).transmit_apdu(&[0x00])?;
    let contactless = dir.contactless_reader().transmit_apdu(&[0x00])?;
    assert_eq!(contact, vec![0x90, 0x00]);
    assert_eq!(contactless, vec![0x00]);
    Ok(())
}

#[test]
fn short_answers_fail_on_both_readers() -> anyhow::Result<()> {
    let mock = MockSdk::new();
    mock.push_sam_reply(Status::Ok, vec![0x90]);
    mock.push_rf_reply_with_len(Status::Ok, vec![0x00, 0x90, 0x00], 1);
    let dir = common::helpers::directory(&mock)?;

    assert!(matches!(
        dir.contact_reader(SamSlot::Two).transmit_apdu(&[0x00]),
        Err(Error::ReaderIo(_))
    ));
    assert!(matches!(
        dir.contactless_reader().transmit_apdu(&[0x00]),
        Err(Error::ReaderIo(_))
    ));
    Ok(())
}

#[test]
fn no_card_result_retries() -> anyhow::Result<()> {
    let mock = MockSdk::new();
    for _ in 0..3 {
        mock.push_search(Status::Ok, 0x6F, vec![]);
    }
    mock.push_search(Status::Ok, 0x02, common::fixtures::b_prime_atr());
    let dir = common::helpers::directory(&mock)?;
    let nfc = dir.contactless_reader();
    nfc.activate_protocol("INNOVATRON_B_PRIME")?;

    let first = nfc.enter_hunt_phase()?;
    assert!(first.is_empty());
    assert!(!nfc.check_card_presence()?);

    assert!(nfc.wait_for_card_insertion()?);
    assert_eq!(
        mock.count_calls(|c| matches!(c, SdkCall::SearchCard(_))),
        4
    );
    assert_eq!(
        mock.count_calls(|c| matches!(c, SdkCall::EnterHuntPhaseParameters(_))),
        4
    );
    Ok(())
}

#[test]
fn stop_returns_within_one_iteration() -> anyhow::Result<()> {
    let mock = MockSdk::new();
    let per_call = Duration::from_millis(20);
    mock.set_call_delay(per_call);
    let dir = common::helpers::directory(&mock)?;
    let nfc = Arc::clone(dir.contactless_reader());
    nfc.activate_protocol("ISO_14443")?;

    let waiter = {
        let nfc = Arc::clone(&nfc);
        thread::spawn(move || nfc.wait_for_card_insertion())
    };
    while !nfc.is_waiting_for_card() {
        thread::yield_now();
    }
    thread::sleep(Duration::from_millis(50));

    let stopped_at = Instant::now();
    nfc.stop_wait_for_card_insertion();
    let found = waiter.join().expect("wait thread panicked")?;

    assert!(!found);
    // One iteration is two delayed calls; allow generous slack for CI.
    assert!(stopped_at.elapsed() < per_call * 2 + Duration::from_millis(500));
    assert!(!nfc.check_card_presence()?);
    Ok(())
}

#[test]
fn wait_is_reachable_through_the_directory() -> anyhow::Result<()> {
    let mock = MockSdk::new();
    mock.push_search(Status::Ok, 0x04, vec![0x44, 0x00]);
    let dir = common::helpers::directory(&mock)?;
    let reader = dir.reader("Cone2ContactlessReader").expect("contactless reader");
    reader.activate_protocol("MIFARE")?;

    let wait = reader
        .as_card_insertion_wait()
        .expect("contactless reader supports insertion wait");
    assert!(wait.wait_for_card_insertion()?);
    assert!(reader.check_card_presence()?);
    Ok(())
}
