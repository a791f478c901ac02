#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cone2::prelude::*;
use cone2::sdk::{MockSdk, SdkCall};

#[test]
fn hardware_calls_never_overlap() -> anyhow::Result<()> {
    let mock = MockSdk::new();
    mock.set_call_delay(Duration::from_millis(1));
    let dir = common::helpers::directory(&mock)?;

    let sam = Arc::clone(dir.contact_reader(SamSlot::One));
    sam.activate_protocol("ISO_7816_3_T1")?;
    let nfc = Arc::clone(dir.contactless_reader());
    nfc.activate_protocol("ISO_14443")?;

    let mut workers = Vec::new();
    for _ in 0..2 {
        let sam = Arc::clone(&sam);
        workers.push(thread::spawn(move || {
            for _ in 0..20 {
                let _ = sam.check_card_presence();
                let _ = sam.transmit_apdu(&[0x00, 0x84, 0x00, 0x00, 0x08]);
            }
        }));
        let nfc = Arc::clone(&nfc);
        workers.push(thread::spawn(move || {
            for _ in 0..20 {
                let _ = nfc.enter_hunt_phase();
                let _ = nfc.transmit_apdu(&[0x00, 0xB2, 0x01, 0x04, 0x1D]);
            }
        }));
    }
    for w in workers {
        w.join().expect("worker panicked");
    }

    assert_eq!(mock.max_concurrent_calls(), 1);
    assert_eq!(
        mock.count_calls(|c| matches!(c, SdkCall::SearchCard(_))),
        40
    );
    assert_eq!(
        mock.count_calls(|c| matches!(c, SdkCall::IsoCommandSam(_))),
        40
    );
    Ok(())
}

#[test]
fn hunt_parameters_and_search_stay_paired() -> anyhow::Result<()> {
    let mock = MockSdk::new();
    let dir = common::helpers::directory(&mock)?;
    let sam = Arc::clone(dir.contact_reader(SamSlot::Two));
    sam.activate_protocol("ISO_7816_3_T0")?;
    let nfc = Arc::clone(dir.contactless_reader());

    let a = {
        let nfc = Arc::clone(&nfc);
        thread::spawn(move || {
            for _ in 0..50 {
                let _ = nfc.enter_hunt_phase();
            }
        })
    };
    let b = thread::spawn(move || {
        for _ in 0..50 {
            let _ = sam.check_card_presence();
        }
    });
    a.join().expect("hunt thread panicked");
    b.join().expect("presence thread panicked");

    // A select may never land between a hunt-phase setup and its search.
    let calls = mock.calls();
    for (i, call) in calls.iter().enumerate() {
        if matches!(call, SdkCall::EnterHuntPhaseParameters(_)) {
            assert!(matches!(calls.get(i + 1), Some(SdkCall::SearchCard(_))));
        }
    }
    Ok(())
}
