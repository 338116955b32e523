// Fixture builders for resource-group test data.
//
// Byte layouts follow the framework structs as stored on chain, including
// fields the decoders do not read (ObjectCore's transfer event handle).

#![allow(dead_code)]

pub const OWNER: [u8; 32] = [0xa1; 32];
pub const METADATA: [u8; 32] = [0x0a; 32];
pub const GUID_CREATION_NUM: u64 = 0x4000_0000_0000_0000;
pub const FA_BALANCE: u64 = 250_000_000;

pub fn framework_address() -> [u8; 32] {
    let mut a = [0u8; 32];
    a[31] = 1;
    a
}

pub fn uleb(mut v: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (v & 0x7f) as u8;
        v >>= 7;
        if v == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

pub fn entry(address: [u8; 32], module: &str, name: &str, payload: &[u8]) -> Vec<u8> {
    let mut out = address.to_vec();
    out.push(module.len() as u8);
    out.extend_from_slice(module.as_bytes());
    out.push(name.len() as u8);
    out.extend_from_slice(name.as_bytes());
    uleb(payload.len() as u64, &mut out);
    out.extend_from_slice(payload);
    out
}

pub fn group(entries: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    uleb(entries.len() as u64, &mut out);
    for e in entries {
        out.extend_from_slice(e);
    }
    out
}

/// Creation write op around `data`.
pub fn creation(data: &[u8]) -> Vec<u8> {
    let mut out = vec![0x00];
    uleb(data.len() as u64, &mut out);
    out.extend_from_slice(data);
    out
}

pub fn object_core_payload() -> Vec<u8> {
    let mut out = GUID_CREATION_NUM.to_le_bytes().to_vec();
    out.extend_from_slice(&OWNER);
    out.push(0); // allow_ungated_transfer
    // transfer_events: counter, guid.creation_num, guid.addr
    out.extend_from_slice(&0u64.to_le_bytes());
    out.extend_from_slice(&0x4000_0000_0000_0001u64.to_le_bytes());
    out.extend_from_slice(&OWNER);
    out
}

pub fn fungible_store_payload() -> Vec<u8> {
    let mut out = METADATA.to_vec();
    out.extend_from_slice(&FA_BALANCE.to_le_bytes());
    out.push(0); // frozen
    out
}

/// Bare object group: ObjectCore followed by FungibleStore.
pub fn object_group() -> Vec<u8> {
    group(&[
        entry(framework_address(), "object", "ObjectCore", &object_core_payload()),
        entry(
            framework_address(),
            "fungible_asset",
            "FungibleStore",
            &fungible_store_payload(),
        ),
    ])
}

/// Snapshot value for the object group, as found in delta.json.
pub fn object_group_value() -> Vec<u8> {
    creation(&object_group())
}

pub fn object_group_hex() -> String {
    format!("0x{}", hex::encode(object_group_value()))
}

/// CoinStore delta value in the shape the balance fast path reads.
pub fn coin_store_value(balance: u64) -> Vec<u8> {
    let mut out = Vec::new();
    uleb(246, &mut out);
    out.push(0x69);
    out.extend_from_slice(&balance.to_le_bytes());
    out.push(0); // frozen
    out.extend_from_slice(&[0u8; 24]);
    out
}
