//! End-to-end tests against the public API, covering the vectors from the
//! reference construction plus the chunking-independence property.

extern crate hex;
extern crate poly1305;

use poly1305::{auth, Key, State};

fn key_from_hex(s: &str) -> Key {
    let bytes = hex::decode(s).unwrap();
    Key::from_slice(&bytes)
}

fn tag_from_hex(s: &str) -> [u8; 16] {
    let bytes = hex::decode(s).unwrap();
    let mut tag = [0u8; 16];
    tag.copy_from_slice(&bytes);
    tag
}

// Vector A, from the NaCl/djb test suite.
#[test]
fn nacl_vector() {
    let key = key_from_hex(concat!(
        "eea6a7251c1e72916d11c2cb214d3c25",
        "2539121d8e234e652d651fa4c8cff880",
    ));
    let msg = hex::decode(concat!(
        "8e993b9f48681273c29650ba32fc76ce48332ea7164d96a4476fb8c531a1186a",
        "c0dfc17c98dce87b4da7f011ec48c97271d2c20f9b928fe2270d6fb863d51738",
        "b48eeee314a7cc8ab932164548e526ae90224368517acfeabd6bb3732bc0e9da",
        "99832b61ca01b6de56244a9e88d5f9b37973f622a43d14a6599b1f654cb45a74",
        "e355a5",
    ))
    .unwrap();
    let expected = tag_from_hex("f3ffc7703f9400e52a7dfb4b3d3305d9");

    let tag = auth(&key, &msg);
    assert_eq!(tag.as_bytes(), expected);
    assert!(tag == poly1305::auth(&key, &msg));
}

// Vector B: r = 2, s = 0, a 16-byte message of 0xff confirms the modular
// wraparound at the top of the field.
#[test]
fn modular_wrap_vector() {
    let mut key_bytes = [0u8; 32];
    key_bytes[0] = 2;
    let key = Key::from_bytes(key_bytes);
    let msg = [0xffu8; 16];

    let mut expected = [0u8; 16];
    expected[0] = 3;

    assert_eq!(auth(&key, &msg).as_bytes(), expected);
}

// Vector A again, but streamed through `State` with irregular, boundary-
// straddling chunk sizes. The tag must not depend on how the caller chose
// to split the message.
#[test]
fn chunking_does_not_change_the_tag() {
    let key = key_from_hex(concat!(
        "eea6a7251c1e72916d11c2cb214d3c25",
        "2539121d8e234e652d651fa4c8cff880",
    ));
    let msg = hex::decode(concat!(
        "8e993b9f48681273c29650ba32fc76ce48332ea7164d96a4476fb8c531a1186a",
        "c0dfc17c98dce87b4da7f011ec48c97271d2c20f9b928fe2270d6fb863d51738",
        "b48eeee314a7cc8ab932164548e526ae90224368517acfeabd6bb3732bc0e9da",
        "99832b61ca01b6de56244a9e88d5f9b37973f622a43d14a6599b1f654cb45a74",
        "e355a5",
    ))
    .unwrap();

    let whole = auth(&key, &msg);

    let chunk_sizes: &[usize] = &[32, 64, 16, 8, 4, 2, 1, 1, 1, 1, 1];
    let mut state = State::new(&key);
    let mut offset = 0;
    for &chunk in chunk_sizes {
        state.update(&msg[offset..offset + chunk]);
        offset += chunk;
    }
    assert_eq!(offset, msg.len());
    let streamed = state.finish();

    assert!(streamed == whole);

    // Byte-at-a-time is the most extreme chunking; same message, same tag.
    let mut one_at_a_time = State::new(&key);
    for b in &msg {
        one_at_a_time.update(std::slice::from_ref(b));
    }
    assert!(one_at_a_time.finish() == whole);
}

// init_ext's length hint is advisory only: two contexts given the same
// message but different (or absent) hints must still agree.
#[test]
fn bytes_hint_does_not_change_the_tag() {
    let key = key_from_hex(concat!(
        "eea6a7251c1e72916d11c2cb214d3c25",
        "2539121d8e234e652d651fa4c8cff880",
    ));
    let msg = b"some message whose length we may or may not have told the context about";

    let mut unhinted = State::new(&key);
    unhinted.update(msg);
    let unhinted_tag = unhinted.finish();

    let mut hinted = State::with_bytes_hint(&key, msg.len() as u64);
    hinted.update(msg);
    let hinted_tag = hinted.finish();

    let mut wrongly_hinted = State::with_bytes_hint(&key, 1);
    wrongly_hinted.update(msg);
    let wrongly_hinted_tag = wrongly_hinted.finish();

    assert!(unhinted_tag == hinted_tag);
    assert!(unhinted_tag == wrongly_hinted_tag);
}

#[test]
fn empty_message_tag_equals_s() {
    let mut key_bytes = [0u8; 32];
    for (i, b) in key_bytes.iter_mut().enumerate() {
        *b = i as u8;
    }
    let key = Key::from_bytes(key_bytes);
    let tag = auth(&key, &[]);
    assert_eq!(&tag.as_bytes()[..], &key_bytes[16..32]);
}

#[test]
fn self_test_passes_on_this_host() {
    assert!(poly1305::detect());
    assert!(poly1305::power_on_self_test());
}

#[test]
fn tag_equality_is_order_independent_and_rejects_mutation() {
    let key = Key::from_bytes([4u8; 32]);
    let a = auth(&key, b"identical input");
    let b = auth(&key, b"identical input");
    assert!(a == b);

    let c = auth(&key, b"different input");
    assert!(a != c);
}
