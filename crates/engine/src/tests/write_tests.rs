use crate::tests::helpers::*;
use crate::{Store, StoreError, ACTIVE_LOG};
use anyhow::Result;
use record::put_len;
use tempfile::tempdir;

// --------------------- Round trips ---------------------

#[test]
fn put_then_get_returns_value() -> Result<()> {
    let dir = tempdir()?;
    let mut store = Store::open(dir.path())?;

    store.put(b"name".to_vec(), b"alice".to_vec())?;
    assert_eq!(store.get(b"name")?, b"alice");
    Ok(())
}

#[test]
fn distinct_keys_each_return_their_value() -> Result<()> {
    let dir = tempdir()?;
    let mut store = Store::open(dir.path())?;

    for i in 0..50u32 {
        store.put(
            format!("key{:03}", i).into_bytes(),
            format!("val{:03}", i).into_bytes(),
        )?;
    }
    for i in 0..50u32 {
        let got = store.get(format!("key{:03}", i).as_bytes())?;
        assert_eq!(got, format!("val{:03}", i).into_bytes());
    }
    Ok(())
}

#[test]
fn overwrite_returns_latest_value() -> Result<()> {
    let dir = tempdir()?;
    let mut store = Store::open(dir.path())?;

    store.put(b"k".to_vec(), b"v1".to_vec())?;
    store.put(b"k".to_vec(), b"v2".to_vec())?;

    assert_eq!(store.get(b"k")?, b"v2");
    Ok(())
}

#[test]
fn empty_value_roundtrip() -> Result<()> {
    let dir = tempdir()?;
    let mut store = Store::open(dir.path())?;

    store.put(b"k".to_vec(), Vec::new())?;
    assert_eq!(store.get(b"k")?, Vec::<u8>::new());
    Ok(())
}

#[test]
fn binary_keys_and_values() -> Result<()> {
    let dir = tempdir()?;
    let mut store = Store::open(dir.path())?;

    let key = vec![0u8, 1, 255, 0, 42];
    let value = vec![9u8, 0, 0, 7];
    store.put(key.clone(), value.clone())?;
    assert_eq!(store.get(&key)?, value);
    Ok(())
}

// --------------------- Deletes ---------------------

#[test]
fn delete_hides_key() -> Result<()> {
    let dir = tempdir()?;
    let mut store = Store::open(dir.path())?;

    store.put(b"k".to_vec(), b"v".to_vec())?;
    store.delete(b"k".to_vec())?;

    assert!(matches!(store.get(b"k"), Err(StoreError::NotFound)));
    Ok(())
}

#[test]
fn delete_absent_key_still_appends_tombstone() -> Result<()> {
    let dir = tempdir()?;
    let mut store = Store::open(dir.path())?;

    store.delete(b"ghost".to_vec())?;
    drop(store); // flush

    let recs = read_records(&dir.path().join(ACTIVE_LOG));
    assert_eq!(recs, vec![del("ghost")]);
    Ok(())
}

#[test]
fn put_after_delete_revives_key() -> Result<()> {
    let dir = tempdir()?;
    let mut store = Store::open(dir.path())?;

    store.put(b"k".to_vec(), b"v1".to_vec())?;
    store.delete(b"k".to_vec())?;
    store.put(b"k".to_vec(), b"v2".to_vec())?;

    assert_eq!(store.get(b"k")?, b"v2");
    Ok(())
}

// --------------------- Keydir bookkeeping ---------------------

#[test]
fn offsets_point_at_record_start() -> Result<()> {
    let dir = tempdir()?;
    let mut store = Store::open(dir.path())?;

    store.put(b"first".to_vec(), b"aaaa".to_vec())?;
    store.put(b"second".to_vec(), b"bb".to_vec())?;

    let first = store.keydir.get(b"first").unwrap();
    assert_eq!(first.offset, 0);
    assert_eq!(first.file_id, ACTIVE_LOG);

    let second = store.keydir.get(b"second").unwrap();
    assert_eq!(second.offset, put_len(b"first", b"aaaa"));
    Ok(())
}

#[test]
fn overwrite_moves_keydir_entry_forward() -> Result<()> {
    let dir = tempdir()?;
    let mut store = Store::open(dir.path())?;

    store.put(b"k".to_vec(), b"v1".to_vec())?;
    let before = store.keydir.get(b"k").unwrap().offset;
    store.put(b"k".to_vec(), b"v2".to_vec())?;
    let after = store.keydir.get(b"k").unwrap().offset;

    assert!(after > before);
    Ok(())
}

#[test]
fn len_counts_live_keys() -> Result<()> {
    let dir = tempdir()?;
    let mut store = Store::open(dir.path())?;
    assert!(store.is_empty());

    store.put(b"a".to_vec(), b"1".to_vec())?;
    store.put(b"b".to_vec(), b"2".to_vec())?;
    store.put(b"a".to_vec(), b"3".to_vec())?;
    assert_eq!(store.len(), 2);

    store.delete(b"a".to_vec())?;
    assert_eq!(store.len(), 1);
    Ok(())
}

// --------------------- Log contents ---------------------

#[test]
fn log_records_every_mutation_in_order() -> Result<()> {
    let dir = tempdir()?;
    let mut store = Store::open(dir.path())?;

    store.put(b"k".to_vec(), b"v1".to_vec())?;
    store.put(b"k".to_vec(), b"v2".to_vec())?;
    store.delete(b"k".to_vec())?;
    drop(store);

    let recs = read_records(&dir.path().join(ACTIVE_LOG));
    assert_eq!(recs, vec![put("k", "v1"), put("k", "v2"), del("k")]);
    Ok(())
}
