//! Public-surface security decoding: descriptors, SDDL rendering, and
//! SID string forms

use ntquery::security::{
    decode_security_descriptor, descriptor_string, Sid, GENERIC_ALL, SE_DACL_PRESENT,
    SE_SELF_RELATIVE,
};
use ntquery::BufferView;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn descriptor(control: u16, owner: Option<&Sid>, group: Option<&Sid>, dacl: Option<&[u8]>) -> Vec<u8> {
    let mut buf = vec![0u8; 20];
    buf[0] = 1;
    buf[2..4].copy_from_slice(&control.to_le_bytes());
    if let Some(owner) = owner {
        let offset = buf.len() as u32;
        buf[4..8].copy_from_slice(&offset.to_le_bytes());
        buf.extend_from_slice(owner.as_bytes());
    }
    if let Some(group) = group {
        let offset = buf.len() as u32;
        buf[8..12].copy_from_slice(&offset.to_le_bytes());
        buf.extend_from_slice(group.as_bytes());
    }
    if let Some(dacl) = dacl {
        let offset = buf.len() as u32;
        buf[16..20].copy_from_slice(&offset.to_le_bytes());
        buf.extend_from_slice(dacl);
    }
    buf
}

fn acl(aces: &[(u8, u8, u32, &Sid)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (ace_type, flags, mask, sid) in aces {
        let size = (8 + sid.as_bytes().len()) as u16;
        body.push(*ace_type);
        body.push(*flags);
        body.extend_from_slice(&size.to_le_bytes());
        body.extend_from_slice(&mask.to_le_bytes());
        body.extend_from_slice(sid.as_bytes());
    }
    let mut out = vec![2u8, 0];
    out.extend_from_slice(&((8 + body.len()) as u16).to_le_bytes());
    out.extend_from_slice(&(aces.len() as u16).to_le_bytes());
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(&body);
    out
}

#[test]
fn owner_group_and_dacl_render_as_sddl() {
    let admins = Sid::parse("S-1-5-32-544").unwrap();
    let users = Sid::parse("S-1-5-32-545").unwrap();
    let list = acl(&[
        (0, 0, GENERIC_ALL, &Sid::local_system()),
        (1, 0, 0x8000_0000, &users),
    ]);
    let raw = descriptor(
        SE_SELF_RELATIVE | SE_DACL_PRESENT,
        Some(&admins),
        Some(&users),
        Some(&list),
    );
    let info = decode_security_descriptor(&BufferView::new(&raw)).unwrap();
    assert_eq!(
        descriptor_string(&info),
        "O:BAG:BUD:(A;;GA;;;SY)(D;;GR;;;BU)"
    );
}

#[test]
fn null_dacl_string_differs_from_empty_dacl_string() {
    let null_raw = descriptor(SE_SELF_RELATIVE | SE_DACL_PRESENT, None, None, None);
    let empty_raw = descriptor(
        SE_SELF_RELATIVE | SE_DACL_PRESENT,
        None,
        None,
        Some(&acl(&[])),
    );
    let null_info = decode_security_descriptor(&BufferView::new(&null_raw)).unwrap();
    let empty_info = decode_security_descriptor(&BufferView::new(&empty_raw)).unwrap();
    assert_eq!(descriptor_string(&null_info), "D:(A;;GA;;;WD)");
    assert_eq!(descriptor_string(&empty_info), "D:");
}

#[test]
fn descriptor_serializes_with_string_sids() {
    let admins = Sid::parse("S-1-5-32-544").unwrap();
    let raw = descriptor(SE_SELF_RELATIVE | SE_DACL_PRESENT, Some(&admins), None, None);
    let info = decode_security_descriptor(&BufferView::new(&raw)).unwrap();
    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["owner"], "S-1-5-32-544");
    assert_eq!(json["dacl"]["null_dacl"], true);
    assert_eq!(json["dacl"]["entries"][0]["sid"], "S-1-1-0");
}

#[test]
fn well_known_sids_have_expected_strings() {
    assert_eq!(Sid::everyone().to_string(), "S-1-1-0");
    assert_eq!(Sid::local_system().to_string(), "S-1-5-18");
    assert_eq!(Sid::everyone().rid(), Some(0));
}

proptest! {
    /// Any structurally valid SID survives a string round trip
    #[test]
    fn sid_string_round_trip(
        authority in 0u64..(1u64 << 48),
        subs in proptest::collection::vec(any::<u32>(), 0..15)
    ) {
        let sid = Sid::from_parts(authority, &subs).unwrap();
        let reparsed = Sid::parse(&sid.to_string()).unwrap();
        prop_assert_eq!(sid, reparsed);
    }

    /// Binary decoding accepts exactly what from_parts produced
    #[test]
    fn sid_binary_round_trip(
        authority in 0u64..(1u64 << 48),
        subs in proptest::collection::vec(any::<u32>(), 1..15)
    ) {
        let sid = Sid::from_parts(authority, &subs).unwrap();
        let decoded = Sid::from_bytes(sid.as_bytes()).unwrap();
        prop_assert_eq!(sid.sub_authorities(), decoded.sub_authorities());
        prop_assert_eq!(sid.authority(), decoded.authority());
    }
}
