#[path = "../common/mod.rs"]
mod common;

use cone2::prelude::*;
use cone2::sdk::{MockSdk, SdkCall};

#[test]
fn sam_session_open_exchange_close() -> anyhow::Result<()> {
    let mock = MockSdk::new();
    mock.push_reset(Status::Ok, common::fixtures::sam_atr());
    mock.push_sam_reply(Status::Ok, common::fixtures::challenge_response());
    let dir = common::helpers::directory(&mock)?;
    let sam = dir.contact_reader(SamSlot::One);

    sam.activate_protocol("ISO_7816_3_T0")?;
    sam.open_physical_channel()?;
    assert!(sam.is_physical_channel_open());
    assert_eq!(
        sam.power_on_data().as_deref(),
        Some(common::fixtures::SAM_ATR_HEX)
    );

    let answer = sam.transmit_apdu(&common::fixtures::get_challenge_apdu())?;
    assert_eq!(answer, common::fixtures::challenge_response());

    sam.close_physical_channel();
    assert!(!sam.is_physical_channel_open());
    assert_eq!(sam.power_on_data(), None);

    assert_eq!(
        mock.calls(),
        vec![
            SdkCall::SelectSam {
                slot: 1,
                protocol: 0x01
            },
            SdkCall::ResetSam { slot: 1 },
            SdkCall::IsoCommandSam(common::fixtures::get_challenge_apdu()),
        ]
    );
    Ok(())
}

#[test]
fn atr_is_cut_to_reported_length() -> anyhow::Result<()> {
    let mock = MockSdk::new();
    mock.push_reset_with_len(Status::Ok, vec![0x3B, 0x00, 0xAA, 0xBB], 2);
    let dir = common::helpers::directory(&mock)?;
    let sam = dir.contact_reader(SamSlot::Two);

    sam.activate_protocol("ISO_7816_3_T1")?;
    sam.open_physical_channel()?;
    assert_eq!(sam.power_on_data().as_deref(), Some("3B00"));
    assert_eq!(sam.atr(), Some(vec![0x3B, 0x00]));
    Ok(())
}

#[test]
fn select_failure_keeps_channel_closed() -> anyhow::Result<()> {
    let mock = MockSdk::new();
    mock.push_select(Status::Code(0x04));
    let dir = common::helpers::directory(&mock)?;
    let sam = dir.contact_reader(SamSlot::One);

    sam.activate_protocol("ISO_7816_3_T0")?;
    let err = sam.open_physical_channel().unwrap_err();
    assert!(matches!(err, Error::ReaderIo(_)));
    assert!(!sam.is_physical_channel_open());
    Ok(())
}

#[test]
fn protocol_state_errors() -> anyhow::Result<()> {
    let mock = MockSdk::new();
    let dir = common::helpers::directory(&mock)?;
    let sam = dir.contact_reader(SamSlot::One);

    assert!(matches!(
        sam.open_physical_channel(),
        Err(Error::ProtocolState(_))
    ));
    assert!(!sam.is_physical_channel_open());

    assert!(matches!(
        sam.deactivate_protocol("ISO_7816_3_T0"),
        Err(Error::ProtocolState(_))
    ));

    sam.activate_protocol("INNOVATRON_HIGH_SPEED_PROTOCOL")?;
    assert!(matches!(
        sam.deactivate_protocol("ISO_7816_3_T1"),
        Err(Error::ProtocolState(_))
    ));
    assert!(sam.is_current_protocol("INNOVATRON_HIGH_SPEED_PROTOCOL"));
    Ok(())
}

#[test]
fn slots_are_independent() -> anyhow::Result<()> {
    let mock = MockSdk::new();
    mock.push_reset(Status::Ok, vec![0x3B, 0x00]);
    let dir = common::helpers::directory(&mock)?;

    let sam1 = dir.contact_reader(SamSlot::One);
    let sam2 = dir.contact_reader(SamSlot::Two);
    sam1.activate_protocol("ISO_7816_3_T0")?;
    sam1.open_physical_channel()?;

    assert!(sam1.is_physical_channel_open());
    assert!(!sam2.is_physical_channel_open());
    assert_eq!(sam2.current_protocol(), None);
    Ok(())
}

#[test]
fn uninitialized_session_is_reported() {
    let mock = MockSdk::new();
    let session = cone2::test_support::mock_session(&mock).unwrap();
    let sam = ContactReader::new(SamSlot::One, session);
    sam.activate_protocol("ISO_7816_3_T0").unwrap();
    assert!(matches!(
        sam.open_physical_channel(),
        Err(Error::NotInitialized)
    ));
    assert!(matches!(
        sam.transmit_apdu(&[0x00, 0x84, 0x00, 0x00, 0x08]),
        Err(Error::NotInitialized)
    ));
    assert!(mock.calls().is_empty());
}
